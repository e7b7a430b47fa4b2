use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use diagnosis_lib::client::{self, Conversation, HttpTransport, PendingStore, ResyncStatus, Turn};
use diagnosis_lib::config::merger::{
    PartialClientConfig, PartialServerConfig, PartialTemplateConfig,
};
use diagnosis_lib::config::secrets::{SecretsConfig, COMPLETION_KEY, CRM_KEY, EMAIL_KEY};
use diagnosis_lib::config::{load_config, AppConfig, PartialConfig};
use diagnosis_lib::crm::{CrmClient, LeadStatus};
use diagnosis_lib::diagnosis::QUESTIONS;
use diagnosis_lib::narrative::NarrativeGenerator;
use diagnosis_lib::pipeline::{LeadService, PipelineServices};
use diagnosis_lib::server::{self, ServerAppState};
use diagnosis_lib::shutdown::{register_signal_handlers, ShutdownState};
use diagnosis_lib::{templates, utils};

/// Business automation diagnosis: question flow, CRM submission and HTTP API
#[derive(Parser, Debug)]
#[command(name = "diagnosis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory whose templates override the builtin ones by file name
    #[arg(long, global = true, env = "DIAGNOSIS_TEMPLATES_DIR")]
    templates_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to bind the server to
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Address to bind the server to
        #[arg(long)]
        bind: Option<String>,

        /// Allowed CORS origin (repeatable); any origin when omitted
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Answer the diagnosis in the terminal and submit it
    Chat {
        /// Diagnosis server base URL
        #[arg(long)]
        server_url: Option<String>,

        /// Pending diagnosis file
        #[arg(long)]
        pending_path: Option<PathBuf>,
    },

    /// Resubmit a diagnosis that was saved locally
    Sync {
        /// Diagnosis server base URL
        #[arg(long)]
        server_url: Option<String>,

        /// Pending diagnosis file
        #[arg(long)]
        pending_path: Option<PathBuf>,
    },

    /// Print the question catalog
    Questions {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow up leads in the CRM
    Lead {
        #[command(subcommand)]
        action: LeadAction,
    },

    /// Manage API keys in ~/.diagnosis/secrets.toml
    Secrets {
        #[command(subcommand)]
        action: SecretsAction,
    },
}

#[derive(Subcommand, Debug)]
enum LeadAction {
    /// Show a lead and its tasks
    Show { email: String },

    /// Change a lead's pipeline status
    Status {
        lead_id: String,
        /// nuevo, contactado, calificado, negociacion, cliente or perdido
        status: LeadStatus,
    },

    /// Mark a task as completed
    CompleteTask { task_id: String },
}

#[derive(Subcommand, Debug)]
enum SecretsAction {
    /// Store an API key (file mode 600)
    Set { target: SecretTarget, key: String },

    /// Remove a stored API key
    Delete { target: SecretTarget },

    /// Print the secrets file location
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SecretTarget {
    Crm,
    Email,
    Completion,
}

impl SecretTarget {
    fn key_id(self) -> &'static str {
        match self {
            SecretTarget::Crm => CRM_KEY,
            SecretTarget::Email => EMAIL_KEY,
            SecretTarget::Completion => COMPLETION_KEY,
        }
    }
}

impl Cli {
    /// CLI flags as the highest-priority config layer
    fn overrides(&self) -> PartialConfig {
        let mut partial = PartialConfig {
            templates: Some(PartialTemplateConfig {
                templates_dir: self.templates_dir.clone(),
            }),
            ..Default::default()
        };

        match &self.command {
            Commands::Serve {
                port,
                bind,
                cors_origins,
            } => {
                partial.server = Some(PartialServerConfig {
                    bind: bind.clone(),
                    port: *port,
                    cors_origins: (!cors_origins.is_empty()).then(|| cors_origins.clone()),
                });
            }
            Commands::Chat {
                server_url,
                pending_path,
            }
            | Commands::Sync {
                server_url,
                pending_path,
            } => {
                partial.client = Some(PartialClientConfig {
                    server_url: server_url.clone(),
                    pending_path: pending_path.clone(),
                });
            }
            Commands::Questions { .. } | Commands::Lead { .. } | Commands::Secrets { .. } => {}
        }

        partial
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Secrets are edited before loading config so a bad file can still be fixed
    if let Commands::Secrets { action } = &cli.command {
        return manage_secrets(action);
    }

    let mut config = load_config(Some(cli.overrides()))?;
    if config.templates.templates_dir.is_none() {
        config.templates.templates_dir = utils::templates_dir().filter(|dir| dir.is_dir());
    }

    match cli.command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Chat { .. } => chat(&config).await,
        Commands::Sync { .. } => sync(&config).await,
        Commands::Questions { json } => print_questions(json),
        Commands::Lead { action } => lead(&config, action).await,
        Commands::Secrets { .. } => Ok(()),
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let shutdown_state = ShutdownState::new();
    register_signal_handlers(shutdown_state.clone());

    let services = PipelineServices::from_config(&config)?;
    let state = ServerAppState::new(config, services, shutdown_state);

    server::run_server(state).await.map_err(anyhow::Error::msg)
}

/// Print assistant messages added since `printed`
fn print_new_messages(conversation: &Conversation, printed: &mut usize) {
    for message in &conversation.messages()[*printed..] {
        if message.role == client::ChatRole::Assistant {
            println!("\n{}", message.content);
        }
    }
    *printed = conversation.messages().len();
}

async fn chat(config: &AppConfig) -> Result<()> {
    let transport = HttpTransport::from_config(&config.client);
    let store = PendingStore::from_config(&config.client)?;
    let engine = templates::load_engine(config.templates.templates_dir.as_deref())?;
    let narratives = NarrativeGenerator::new(Arc::new(engine));

    if store.has_pending() {
        println!(
            "Hay un diagnóstico pendiente de sincronizar en {:?}. Ejecuta `diagnosis sync`.",
            store.path()
        );
    }

    let mut conversation = Conversation::start();
    let mut printed = 0;
    print_new_messages(&conversation, &mut printed);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !conversation.is_complete() {
        print!("\n[{}] > ", conversation.progress_label());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nConversación interrumpida; no se ha enviado nada.");
            return Ok(());
        };
        let turn = conversation.answer(&line?)?;
        print_new_messages(&conversation, &mut printed);
        if turn == Turn::Complete {
            break;
        }
    }

    println!(
        "\n{}",
        narratives.generate_summary(conversation.state(), Utc::now())?
    );

    client::finish_conversation(&mut conversation, &transport, &store).await?;
    print_new_messages(&conversation, &mut printed);
    Ok(())
}

async fn sync(config: &AppConfig) -> Result<()> {
    let transport = HttpTransport::from_config(&config.client);
    let store = PendingStore::from_config(&config.client)?;

    if store.has_pending() {
        println!("{}", client::chat::SYNCING_MESSAGE);
    }
    match client::resync(&transport, &store).await? {
        ResyncStatus::NothingPending => println!("No hay diagnósticos pendientes."),
        ResyncStatus::Synced(receipt) => {
            println!("{}", client::chat::SUCCESS_MESSAGE);
            if let Some(lead_id) = receipt.lead_id {
                println!("Lead: {}", lead_id);
            }
        }
        ResyncStatus::Failed { error } => {
            println!("{}", client::chat::saved_locally_message(&error));
        }
    }
    Ok(())
}

fn print_questions(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(QUESTIONS)?);
        return Ok(());
    }

    for (i, question) in QUESTIONS.iter().enumerate() {
        let kind = serde_json::to_value(question.validation)?;
        println!(
            "{:>2}. [{}] {} ({})",
            i + 1,
            question.id,
            question.prompt,
            kind.as_str().unwrap_or_default()
        );
    }
    Ok(())
}

async fn lead(config: &AppConfig, action: LeadAction) -> Result<()> {
    let leads = LeadService::new(Arc::new(CrmClient::from_config(&config.crm)));

    match action {
        LeadAction::Show { email } => {
            let Some(overview) = leads.overview(&email).await? else {
                println!("No hay ningún lead con el email {}.", email);
                return Ok(());
            };
            let lead = &overview.lead;
            println!("Lead {}", lead.id);
            println!("  Nombre:  {}", lead.name.as_deref().unwrap_or("-"));
            println!("  Empresa: {}", lead.company.as_deref().unwrap_or("-"));
            println!("  Estado:  {}", lead.status.as_deref().unwrap_or("-"));
            println!("  Enlace:  {}", config.crm.lead_url(&lead.id));
            println!("  Tareas:");
            for task in &overview.tasks {
                println!(
                    "    [{}] {} {} (vence {})",
                    if task.completed { "x" } else { " " },
                    task.id,
                    task.title.as_deref().unwrap_or("-"),
                    task.due_at.as_deref().unwrap_or("-")
                );
            }
        }
        LeadAction::Status { lead_id, status } => {
            leads.set_status(&lead_id, status).await?;
            println!("Lead {} -> {}", lead_id, status.as_str());
        }
        LeadAction::CompleteTask { task_id } => {
            leads.complete_task(&task_id).await?;
            println!("Tarea {} completada.", task_id);
        }
    }
    Ok(())
}

fn manage_secrets(action: &SecretsAction) -> Result<()> {
    match action {
        SecretsAction::Set { target, key } => {
            let mut secrets = SecretsConfig::load()?;
            secrets.set_key(target.key_id(), key.trim());
            secrets.save()?;
            println!("Clave '{}' guardada.", target.key_id());
        }
        SecretsAction::Delete { target } => {
            let mut secrets = SecretsConfig::load()?;
            if secrets.delete_key(target.key_id()) {
                secrets.save()?;
                println!("Clave '{}' eliminada.", target.key_id());
            } else {
                println!("No había clave '{}'.", target.key_id());
            }
        }
        SecretsAction::Path => match SecretsConfig::get_secrets_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine home directory"),
        },
    }
    Ok(())
}
