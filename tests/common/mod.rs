// In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use diagnosis_lib::client::{DiagnosisTransport, SubmissionReceipt, TransportError};
use diagnosis_lib::completion::{CompletionError, CompletionProvider};
use diagnosis_lib::config::{CrmConfig, EmailConfig};
use diagnosis_lib::crm::types::CrmTask;
use diagnosis_lib::crm::{
    CreateLeadPayload, CrmApi, CrmError, InteractionPayload, Lead, LeadStatus, TaskPayload,
};
use diagnosis_lib::diagnosis::{submit_answer, AnswerResult, DiagnosisState};
use diagnosis_lib::email::{EmailComposer, EmailError, EmailMessage, EmailSender};
use diagnosis_lib::narrative::NarrativeGenerator;
use diagnosis_lib::pipeline::PipelineServices;

/// One valid answer per catalog question, in order
pub const ANSWERS: [&str; 13] = [
    "Ana García",
    "ana@acme.com",
    "+34 600 123 456",
    "Acme",
    "Retail",
    "Pedidos por email y Excel",
    "Facturación manual",
    "Errores en pedidos",
    "20 horas a la semana",
    "Perder clientes grandes",
    "Escalar sin contratar",
    "9",
    "Sí",
];

/// Answer the whole catalog through the flow engine
pub fn complete_state() -> DiagnosisState {
    ANSWERS.iter().fold(DiagnosisState::new(), |state, answer| {
        match submit_answer(&state, answer).unwrap() {
            AnswerResult::Accepted { updated_state } => updated_state,
            AnswerResult::Invalid { error } => panic!("{:?} rejected: {}", answer, error),
        }
    })
}

fn api_error(message: &str) -> CrmError {
    CrmError::Api {
        status: 500,
        message: message.to_string(),
        details: None,
        hint: None,
    }
}

/// CRM fake with upsert-by-email semantics and switchable failures
#[derive(Default)]
pub struct FakeCrm {
    pub fail_lead: bool,
    pub fail_notes: bool,
    pub fail_task: bool,
    pub leads: Mutex<HashMap<String, Lead>>,
    pub lead_calls: Mutex<usize>,
    pub notes: Mutex<Vec<(String, InteractionPayload)>>,
    pub tasks: Mutex<Vec<(String, TaskPayload)>>,
    pub completed_tasks: Mutex<Vec<String>>,
}

impl FakeCrm {
    pub fn lead_calls(&self) -> usize {
        *self.lead_calls.lock().unwrap()
    }

    pub fn lead_count(&self) -> usize {
        self.leads.lock().unwrap().len()
    }

    pub fn note_count(&self) -> usize {
        self.notes.lock().unwrap().len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn insert_lead(&self, lead: Lead) {
        let email = lead.email.clone().unwrap_or_default();
        self.leads.lock().unwrap().insert(email, lead);
    }
}

#[async_trait]
impl CrmApi for FakeCrm {
    async fn create_or_update_lead(&self, payload: &CreateLeadPayload) -> Result<Lead, CrmError> {
        *self.lead_calls.lock().unwrap() += 1;
        if self.fail_lead {
            return Err(api_error("lead rejected"));
        }

        let email = payload.email.clone().unwrap_or_default();
        let mut leads = self.leads.lock().unwrap();
        let next_id = format!("lead-{}", leads.len() + 1);
        let lead = leads.entry(email.clone()).or_insert_with(|| Lead::new(next_id));
        lead.name = Some(payload.name.clone());
        lead.email = Some(email);
        lead.company = payload.company.clone();
        Ok(lead.clone())
    }

    async fn create_interaction(
        &self,
        lead_id: &str,
        payload: &InteractionPayload,
    ) -> Result<Option<String>, CrmError> {
        if self.fail_notes {
            return Err(api_error("notes unavailable"));
        }
        let mut notes = self.notes.lock().unwrap();
        notes.push((lead_id.to_string(), payload.clone()));
        Ok(Some(format!("note-{}", notes.len())))
    }

    async fn create_task(
        &self,
        lead_id: &str,
        payload: &TaskPayload,
    ) -> Result<Option<String>, CrmError> {
        if self.fail_task {
            return Err(api_error("tasks unavailable"));
        }
        let mut tasks = self.tasks.lock().unwrap();
        tasks.push((lead_id.to_string(), payload.clone()));
        Ok(Some(format!("task-{}", tasks.len())))
    }

    async fn search_lead_by_email(&self, email: &str) -> Result<Option<Lead>, CrmError> {
        Ok(self.leads.lock().unwrap().get(email).cloned())
    }

    async fn get_lead(&self, lead_id: &str) -> Result<Lead, CrmError> {
        self.leads
            .lock()
            .unwrap()
            .values()
            .find(|l| l.id == lead_id)
            .cloned()
            .ok_or_else(|| api_error("not found"))
    }

    async fn update_lead_status(&self, lead_id: &str, status: LeadStatus) -> Result<Lead, CrmError> {
        let mut leads = self.leads.lock().unwrap();
        let lead = leads
            .values_mut()
            .find(|l| l.id == lead_id)
            .ok_or_else(|| api_error("not found"))?;
        lead.status = Some(status.as_str().to_string());
        Ok(lead.clone())
    }

    async fn list_lead_tasks(&self, lead_id: &str) -> Result<Vec<CrmTask>, CrmError> {
        let completed = self.completed_tasks.lock().unwrap();
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, (lead, _))| lead == lead_id)
            .map(|(i, (_, task))| {
                let id = format!("task-{}", i + 1);
                CrmTask {
                    completed: completed.contains(&id),
                    id,
                    title: Some(task.title.clone()),
                    description: Some(task.description.clone()),
                    kind: None,
                    priority: None,
                    due_at: Some(task.due_at.to_rfc3339()),
                }
            })
            .collect())
    }

    async fn complete_task(&self, task_id: &str) -> Result<(), CrmError> {
        self.completed_tasks.lock().unwrap().push(task_id.to_string());
        Ok(())
    }
}

/// Email fake that records every message
#[derive(Default)]
pub struct FakeEmail {
    pub fail: bool,
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl FakeEmail {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.subject.clone()).collect()
    }
}

#[async_trait]
impl EmailSender for FakeEmail {
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        if self.fail {
            return Err(EmailError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(Some("email-1".to_string()))
    }
}

/// Completion fake returning a fixed text, or failing
pub struct FakeCompletion {
    pub reply: Option<String>,
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        self.reply.clone().ok_or(CompletionError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Pipeline services over the fakes, with a consultant address configured
pub fn services(
    crm: Arc<FakeCrm>,
    email: Arc<FakeEmail>,
    completion: Option<Arc<dyn CompletionProvider>>,
) -> PipelineServices {
    let narratives = NarrativeGenerator::builtin().unwrap();
    let email_config = EmailConfig {
        consultant_email: Some("consultor@dimensionexpert.com".to_string()),
        ..Default::default()
    };
    let composer = EmailComposer::new(
        narratives.engine().clone(),
        email_config,
        CrmConfig::default(),
    );

    PipelineServices {
        crm,
        email,
        completion,
        narratives,
        composer,
    }
}

/// Transport fake: fails while `fail` is set, otherwise forwards to the CRM fake's upsert
pub struct FakeTransport {
    pub fail: Mutex<bool>,
    pub crm: Arc<FakeCrm>,
    pub submissions: Mutex<Vec<DiagnosisState>>,
}

impl FakeTransport {
    pub fn new(crm: Arc<FakeCrm>, fail: bool) -> Self {
        Self {
            fail: Mutex::new(fail),
            crm,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// A submission whose reply never reaches the caller
    pub async fn submit_ignoring_reply(&self, state: &DiagnosisState) {
        let _ = DiagnosisTransport::submit(self, state).await;
    }
}

#[async_trait]
impl DiagnosisTransport for FakeTransport {
    async fn submit(&self, state: &DiagnosisState) -> Result<SubmissionReceipt, TransportError> {
        self.submissions.lock().unwrap().push(state.clone());
        if *self.fail.lock().unwrap() {
            return Err(TransportError::Connection("connection refused".to_string()));
        }

        let payload = CreateLeadPayload::from_state(state, String::new());
        let lead = self
            .crm
            .create_or_update_lead(&payload)
            .await
            .map_err(|e| TransportError::Status {
                status: 500,
                message: e.to_string(),
            })?;
        Ok(SubmissionReceipt {
            success: true,
            lead_id: Some(lead.id),
            ..Default::default()
        })
    }
}
