// Volkern CRM HTTP client

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{
    CompleteTaskPayload, CreateLeadPayload, CreatedResponse, CrmErrorBody, CrmTask,
    InteractionPayload, Lead, LeadResponse, LeadSearchResponse, LeadStatus, LeadStatusPayload,
    TaskListResponse, TaskPayload,
};
use super::{CrmApi, CrmError};
use crate::config::CrmConfig;

/// CRM API client
///
/// Authenticates every request with the `X-API-Key` header.
pub struct CrmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CrmClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn from_config(config: &CrmConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, CrmError> {
        let api_key = self.api_key.as_ref().ok_or(CrmError::MissingApiKey)?;
        Ok(self
            .http
            .request(method, self.url(path))
            .header("X-API-Key", api_key)
            .header("Content-Type", "application/json"))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, CrmError> {
        let response = builder
            .send()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| CrmError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CrmError> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.send(builder).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CrmError> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(builder).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CrmError> {
        let builder = self.request(Method::PATCH, path)?.json(body);
        self.send(builder).await
    }
}

/// Turn a non-2xx response into `CrmError::Api`, reading the `{error, details, hint}` body
async fn check_status(response: Response) -> Result<Response, CrmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body: CrmErrorBody = serde_json::from_str(&text).unwrap_or_default();

    Err(CrmError::Api {
        status: status.as_u16(),
        message: body
            .error
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        details: body.details,
        hint: body.hint,
    })
}

fn require_id(lead: Lead) -> Result<Lead, CrmError> {
    if lead.id.trim().is_empty() {
        return Err(CrmError::MissingLeadId);
    }
    Ok(lead)
}

#[async_trait]
impl CrmApi for CrmClient {
    async fn create_or_update_lead(&self, payload: &CreateLeadPayload) -> Result<Lead, CrmError> {
        let response: LeadResponse = self.post("/leads", payload).await?;
        let lead = require_id(response.into_lead())?;
        log::info!("[crm] Lead processed with ID: {}", lead.id);
        Ok(lead)
    }

    async fn create_interaction(
        &self,
        lead_id: &str,
        payload: &InteractionPayload,
    ) -> Result<Option<String>, CrmError> {
        let path = format!("/leads/{}/interactions", lead_id);
        let response: CreatedResponse = self.post(&path, payload).await?;
        Ok(response.id)
    }

    async fn create_task(
        &self,
        lead_id: &str,
        payload: &TaskPayload,
    ) -> Result<Option<String>, CrmError> {
        let path = format!("/leads/{}/tasks", lead_id);
        let response: CreatedResponse = self.post(&path, payload).await?;
        log::info!(
            "[crm] Task created for lead {}: {}",
            lead_id,
            response.id.as_deref().unwrap_or("N/A")
        );
        Ok(response.id)
    }

    async fn search_lead_by_email(&self, email: &str) -> Result<Option<Lead>, CrmError> {
        let response: LeadSearchResponse = self
            .get("/leads", &[("search", email), ("limit", "1")])
            .await?;
        Ok(response
            .data
            .into_iter()
            .find(|lead| !lead.id.trim().is_empty()))
    }

    async fn get_lead(&self, lead_id: &str) -> Result<Lead, CrmError> {
        let response: LeadResponse = self.get(&format!("/leads/{}", lead_id), &[]).await?;
        require_id(response.into_lead())
    }

    async fn update_lead_status(
        &self,
        lead_id: &str,
        status: LeadStatus,
    ) -> Result<Lead, CrmError> {
        let response: LeadResponse = self
            .patch(&format!("/leads/{}", lead_id), &LeadStatusPayload { status })
            .await?;
        require_id(response.into_lead())
    }

    async fn list_lead_tasks(&self, lead_id: &str) -> Result<Vec<CrmTask>, CrmError> {
        let response: TaskListResponse =
            self.get(&format!("/leads/{}/tasks", lead_id), &[]).await?;
        Ok(response.data)
    }

    async fn complete_task(&self, task_id: &str) -> Result<(), CrmError> {
        let body = CompleteTaskPayload {
            completed: true,
            completed_at: Utc::now(),
        };
        let _: serde_json::Value = self.patch(&format!("/tasks/{}", task_id), &body).await?;
        Ok(())
    }
}
