// Template system for narratives, prompts and emails

pub mod builtin;
pub mod engine;
pub mod resolver;

pub use engine::{TemplateContext, TemplateEngine};
pub use resolver::{ResolvedTemplate, TemplateResolver, TemplateSource};

use anyhow::Result;
use std::path::Path;

/// Engine preloaded with every builtin template name, each resolved through
/// the optional override directory
pub fn load_engine(override_dir: Option<&Path>) -> Result<TemplateEngine> {
    let mut resolver = match override_dir {
        Some(dir) => TemplateResolver::new().with_override_dir(dir),
        None => TemplateResolver::new(),
    };
    let engine = TemplateEngine::new();

    for name in builtin::list_builtin_templates() {
        let template = resolver.resolve(name)?;
        engine.add_template(name, &template.content)?;
    }

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_builtin_engine_renders_every_template() {
        let engine = load_engine(None).unwrap();
        let ctx = TemplateContext::new(Utc::now());
        let state = crate::diagnosis::DiagnosisState::new();
        let full = TemplateContext::from_state(&state, Utc::now())
            .with("aggressive", &false)
            .with("version", "v-1")
            .with("pitch", "")
            .with("consultation_notes", "")
            .with("investment_display", "")
            .with("time_display", "")
            .with("executive_html", "")
            .with("plans_html", "")
            .with("booking_url", "")
            .with("lead_url", "")
            .with("preview", "")
            .with("view_url", "");

        for name in builtin::list_builtin_templates() {
            assert!(engine.render(name, &full).is_ok(), "failed to render {}", name);
        }
        assert!(engine.render(builtin::TEST_EMAIL, &ctx).is_ok());
    }
}
