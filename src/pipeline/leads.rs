// Operator follow-up on leads the pipeline created

use std::sync::Arc;

use crate::crm::{CrmApi, CrmError, CrmTask, Lead, LeadStatus};

/// A lead with the tasks scheduled on it
#[derive(Debug, Clone, PartialEq)]
pub struct LeadOverview {
    pub lead: Lead,
    pub tasks: Vec<CrmTask>,
}

impl LeadOverview {
    pub fn open_tasks(&self) -> impl Iterator<Item = &CrmTask> {
        self.tasks.iter().filter(|task| !task.completed)
    }
}

#[derive(Clone)]
pub struct LeadService {
    crm: Arc<dyn CrmApi>,
}

impl LeadService {
    pub fn new(crm: Arc<dyn CrmApi>) -> Self {
        Self { crm }
    }

    /// Find a lead by email and load its full record and tasks.
    ///
    /// `None` when no lead has that email.
    pub async fn overview(&self, email: &str) -> Result<Option<LeadOverview>, CrmError> {
        let Some(found) = self.crm.search_lead_by_email(email.trim()).await? else {
            return Ok(None);
        };

        let lead = self.crm.get_lead(&found.id).await?;
        let tasks = self.crm.list_lead_tasks(&lead.id).await?;
        log::debug!("[leads] {} has {} task(s)", lead.id, tasks.len());
        Ok(Some(LeadOverview { lead, tasks }))
    }

    pub async fn set_status(&self, lead_id: &str, status: LeadStatus) -> Result<Lead, CrmError> {
        let lead = self.crm.update_lead_status(lead_id, status).await?;
        log::info!("[leads] Lead {} moved to '{}'", lead_id, status.as_str());
        Ok(lead)
    }

    pub async fn complete_task(&self, task_id: &str) -> Result<(), CrmError> {
        self.crm.complete_task(task_id).await?;
        log::info!("[leads] Task {} completed", task_id);
        Ok(())
    }
}
