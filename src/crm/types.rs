// CRM wire types
//
// Field names on the wire are Spanish; Rust names are English.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::diagnosis::{DiagnosisField, DiagnosisState};
use crate::utils::slugify;

/// Tag added to every lead created from a diagnosis
pub const DIAGNOSIS_TAG: &str = "diagnostico-ia";
pub const URGENT_TAG: &str = "urgente";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadChannel {
    Web,
    Referido,
    Whatsapp,
    Telefono,
    Email,
    Otro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Nuevo,
    Contactado,
    Calificado,
    Negociacion,
    Cliente,
    Perdido,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Nuevo => "nuevo",
            LeadStatus::Contactado => "contactado",
            LeadStatus::Calificado => "calificado",
            LeadStatus::Negociacion => "negociacion",
            LeadStatus::Cliente => "cliente",
            LeadStatus::Perdido => "perdido",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nuevo" => Ok(LeadStatus::Nuevo),
            "contactado" => Ok(LeadStatus::Contactado),
            "calificado" => Ok(LeadStatus::Calificado),
            "negociacion" => Ok(LeadStatus::Negociacion),
            "cliente" => Ok(LeadStatus::Cliente),
            "perdido" => Ok(LeadStatus::Perdido),
            other => Err(format!(
                "Estado desconocido '{}': nuevo, contactado, calificado, negociacion, cliente o perdido",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Llamada,
    Email,
    Reunion,
    Recordatorio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Alta,
    Media,
    Baja,
}

impl TaskPriority {
    /// Map a 1-10 urgency score: 8+ alta, 5+ media, else baja
    pub fn from_score(score: Option<i64>) -> Self {
        match score {
            Some(s) if s >= 8 => TaskPriority::Alta,
            Some(s) if s >= 5 => TaskPriority::Media,
            _ => TaskPriority::Baja,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Nota,
    Llamada,
    Email,
    Reunion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionOutcome {
    Positivo,
    Neutral,
    Negativo,
}

/// Canonical CRM lead
///
/// Decoding is lenient: nulls, numbers and unexpected shapes in optional
/// fields never make a lead unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(default, deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, rename = "nombre", deserialize_with = "de_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub email: Option<String>,
    #[serde(default, rename = "telefono", deserialize_with = "de_text")]
    pub phone: Option<String>,
    #[serde(default, rename = "empresa", deserialize_with = "de_text")]
    pub company: Option<String>,
    #[serde(default, rename = "canal", deserialize_with = "de_text")]
    pub channel: Option<String>,
    #[serde(default, rename = "estado", deserialize_with = "de_text")]
    pub status: Option<String>,
    #[serde(default, rename = "contextoProyecto", deserialize_with = "de_text")]
    pub project_context: Option<String>,
    #[serde(default, rename = "etiquetas", deserialize_with = "de_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "de_text")]
    pub updated_at: Option<String>,
}

impl Lead {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            phone: None,
            company: None,
            channel: None,
            status: None,
            project_context: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Diagnosis answers recoverable from the lead record
    pub fn to_state(&self) -> DiagnosisState {
        let mut state = DiagnosisState::new();
        let fields = [
            (DiagnosisField::Name, &self.name),
            (DiagnosisField::Email, &self.email),
            (DiagnosisField::Phone, &self.phone),
            (DiagnosisField::Company, &self.company),
        ];
        for (field, value) in fields {
            if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                state = state.with(field, v);
            }
        }
        state
    }
}

fn id_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Accept string or numeric ids
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(id_of(&Value::deserialize(deserializer)?))
}

/// Strings, numbers and booleans as text; anything else is absent
fn de_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Tag list, a comma separated string, or nothing
fn de_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// `null` as the type's default
fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lead response: either `{"lead": {...}}` or the bare lead.
///
/// A wrapped lead without an id falls back to a top-level `id`.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadResponse {
    Wrapped(Lead),
    Bare(Lead),
}

impl<'de> Deserialize<'de> for LeadResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(D::Error::custom("expected a lead object"));
        }

        let top_id = value.get("id").map(id_of).unwrap_or_default();
        match value.get_mut("lead").map(Value::take) {
            Some(inner @ Value::Object(_)) => {
                let mut lead = Lead::deserialize(inner).map_err(D::Error::custom)?;
                if lead.id.trim().is_empty() {
                    lead.id = top_id;
                }
                Ok(LeadResponse::Wrapped(lead))
            }
            _ => Lead::deserialize(value)
                .map(LeadResponse::Bare)
                .map_err(D::Error::custom),
        }
    }
}

impl LeadResponse {
    pub fn into_lead(self) -> Lead {
        match self {
            LeadResponse::Wrapped(lead) => lead,
            LeadResponse::Bare(lead) => lead,
        }
    }
}

/// `GET /leads?search=` response
#[derive(Debug, Clone, Deserialize)]
pub struct LeadSearchResponse {
    #[serde(default, deserialize_with = "de_null_default")]
    pub data: Vec<Lead>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `POST /leads`; the CRM upserts by email
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "empresa", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(rename = "canal")]
    pub channel: LeadChannel,
    #[serde(rename = "estado")]
    pub status: LeadStatus,
    #[serde(rename = "contextoProyecto")]
    pub project_context: String,
    #[serde(rename = "etiquetas")]
    pub tags: Vec<String>,
}

impl CreateLeadPayload {
    /// Map a diagnosis to a new web lead
    pub fn from_state(state: &DiagnosisState, project_context: String) -> Self {
        let owned = |field| state.answer(field).map(str::to_string);
        Self {
            name: state.text(DiagnosisField::Name).to_string(),
            email: owned(DiagnosisField::Email),
            phone: state.phone_number().map(str::to_string),
            company: owned(DiagnosisField::Company),
            channel: LeadChannel::Web,
            status: LeadStatus::Nuevo,
            project_context,
            tags: lead_tags(state),
        }
    }
}

/// `diagnostico-ia`, the slugified industry, and `urgente` at priority 8+
pub fn lead_tags(state: &DiagnosisState) -> Vec<String> {
    let mut tags = vec![DIAGNOSIS_TAG.to_string()];
    if let Some(industry) = state.answer(DiagnosisField::Industry) {
        let slug = slugify(industry);
        if !slug.is_empty() {
            tags.push(slug);
        }
    }
    if state.is_urgent() {
        tags.push(URGENT_TAG.to_string());
    }
    tags
}

/// Body of `POST /leads/{id}/interactions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionPayload {
    #[serde(rename = "tipo")]
    pub kind: InteractionKind,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "resultado")]
    pub outcome: InteractionOutcome,
}

impl InteractionPayload {
    pub fn note(content: impl Into<String>, outcome: InteractionOutcome) -> Self {
        Self {
            kind: InteractionKind::Nota,
            content: content.into(),
            outcome,
        }
    }
}

/// Body of `POST /leads/{id}/tasks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    #[serde(rename = "tipo")]
    pub kind: TaskKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "prioridad")]
    pub priority: TaskPriority,
    #[serde(rename = "fechaVencimiento")]
    pub due_at: DateTime<Utc>,
}

/// A task as listed by the CRM
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrmTask {
    #[serde(default, deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, rename = "titulo", deserialize_with = "de_text")]
    pub title: Option<String>,
    #[serde(default, rename = "descripcion", deserialize_with = "de_text")]
    pub description: Option<String>,
    #[serde(default, rename = "tipo", deserialize_with = "de_text")]
    pub kind: Option<String>,
    #[serde(default, rename = "prioridad", deserialize_with = "de_text")]
    pub priority: Option<String>,
    #[serde(default, rename = "completada", deserialize_with = "de_null_default")]
    pub completed: bool,
    #[serde(default, rename = "fechaVencimiento", deserialize_with = "de_text")]
    pub due_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskListResponse {
    #[serde(default, deserialize_with = "de_null_default")]
    pub data: Vec<CrmTask>,
}

/// Response of create endpoints that only matter for their id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedResponse {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = de_id(deserializer)?;
    Ok(Some(id).filter(|s| !s.is_empty()))
}

/// Body of `PATCH /tasks/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct CompleteTaskPayload {
    #[serde(rename = "completada")]
    pub completed: bool,
    #[serde(rename = "fechaCompletado")]
    pub completed_at: DateTime<Utc>,
}

/// Body of `PATCH /leads/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusPayload {
    #[serde(rename = "estado")]
    pub status: LeadStatus,
}

/// Error body returned by the CRM
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrmErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::SKIPPED_ANSWER;

    #[test]
    fn test_lead_response_shapes_normalise() {
        let wrapped: LeadResponse =
            serde_json::from_str(r#"{"lead":{"id":"L1","nombre":"Ana"}}"#).unwrap();
        let bare: LeadResponse = serde_json::from_str(r#"{"id":"L1","nombre":"Ana"}"#).unwrap();
        assert_eq!(wrapped.into_lead(), bare.into_lead());
    }

    #[test]
    fn test_null_fields_do_not_lose_the_lead() {
        let wrapped: LeadResponse = serde_json::from_str(
            r#"{"success":true,"lead":{"id":"L1","etiquetas":null,"createdAt":1735689600,"email":null}}"#,
        )
        .unwrap();
        assert!(matches!(wrapped, LeadResponse::Wrapped(_)));
        let lead = wrapped.into_lead();
        assert_eq!(lead.id, "L1");
        assert!(lead.tags.is_empty());
        assert_eq!(lead.created_at.as_deref(), Some("1735689600"));
        assert!(lead.email.is_none());

        let bare: LeadResponse =
            serde_json::from_str(r#"{"id":"L2","etiquetas":null,"telefono":600123456}"#).unwrap();
        let lead = bare.into_lead();
        assert_eq!(lead.id, "L2");
        assert_eq!(lead.phone.as_deref(), Some("600123456"));
    }

    #[test]
    fn test_wrapped_lead_without_id_uses_top_level_id() {
        let response: LeadResponse =
            serde_json::from_str(r#"{"id":"L3","lead":{"nombre":"Ana","etiquetas":"a, b"}}"#)
                .unwrap();
        let lead = response.into_lead();
        assert_eq!(lead.id, "L3");
        assert_eq!(lead.name.as_deref(), Some("Ana"));
        assert_eq!(lead.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let search: LeadSearchResponse =
            serde_json::from_str(r#"{"data":null,"total":0}"#).unwrap();
        assert!(search.data.is_empty());

        let tasks: TaskListResponse =
            serde_json::from_str(r#"{"data":[{"id":7,"titulo":null,"completada":null}]}"#)
                .unwrap();
        assert_eq!(tasks.data[0].id, "7");
        assert!(!tasks.data[0].completed);
    }

    #[test]
    fn test_lead_status_parses_wire_names() {
        assert_eq!("Negociacion".parse::<LeadStatus>(), Ok(LeadStatus::Negociacion));
        assert_eq!(LeadStatus::Cliente.as_str(), "cliente");
        assert!("ganado".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_numeric_id_and_missing_id() {
        let lead = LeadResponse::deserialize(serde_json::json!({"id": 42})).unwrap();
        assert_eq!(lead.into_lead().id, "42");

        let lead = LeadResponse::deserialize(serde_json::json!({"ok": true})).unwrap();
        assert_eq!(lead.into_lead().id, "");
    }

    #[test]
    fn test_payload_from_state() {
        let state = DiagnosisState::new()
            .with(DiagnosisField::Name, "Ana")
            .with(DiagnosisField::Email, "ana@acme.com")
            .with(DiagnosisField::Phone, SKIPPED_ANSWER)
            .with(DiagnosisField::Industry, "Retail Moda")
            .with(DiagnosisField::Priority, "8");

        let payload = CreateLeadPayload::from_state(&state, "ctx".to_string());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["nombre"], "Ana");
        assert_eq!(json["canal"], "web");
        assert_eq!(json["estado"], "nuevo");
        assert_eq!(json["contextoProyecto"], "ctx");
        assert!(json.get("telefono").is_none());
        assert!(json.get("empresa").is_none());
        assert_eq!(
            json["etiquetas"],
            serde_json::json!(["diagnostico-ia", "retail-moda", "urgente"])
        );
    }

    #[test]
    fn test_task_priority_from_score() {
        assert_eq!(TaskPriority::from_score(Some(9)), TaskPriority::Alta);
        assert_eq!(TaskPriority::from_score(Some(5)), TaskPriority::Media);
        assert_eq!(TaskPriority::from_score(Some(2)), TaskPriority::Baja);
        assert_eq!(TaskPriority::from_score(None), TaskPriority::Baja);
    }

    #[test]
    fn test_interaction_wire_names() {
        let json =
            serde_json::to_value(InteractionPayload::note("x", InteractionOutcome::Positivo))
                .unwrap();
        assert_eq!(json, serde_json::json!({"tipo":"nota","contenido":"x","resultado":"positivo"}));
    }

    #[test]
    fn test_lead_to_state() {
        let mut lead = Lead::new("L1");
        lead.name = Some("Ana".to_string());
        lead.company = Some(" ".to_string());
        let state = lead.to_state();
        assert_eq!(state.name.as_deref(), Some("Ana"));
        assert!(state.company.is_none());
    }
}
