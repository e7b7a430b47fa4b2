// Integration tests for the HTTP surface

mod common;

#[cfg(test)]
mod server_integration_tests {
    use super::common::{complete_state, services, FakeCrm, FakeEmail};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use diagnosis_lib::config::AppConfig;
    use diagnosis_lib::crm::Lead;
    use diagnosis_lib::server::{build_router, ServerAppState};
    use diagnosis_lib::shutdown::ShutdownState;

    fn app(crm: &Arc<FakeCrm>, email: &Arc<FakeEmail>) -> Router {
        let mut config = AppConfig::default();
        config.crm.api_key = Some("vk_live_1234567890".to_string());
        let state = ServerAppState::new(
            config,
            services(crm.clone(), email.clone(), None),
            ShutdownState::new(),
        );
        build_router(state)
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(&Arc::default(), &Arc::default());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_questions_lists_catalog() {
        let (status, body) = call(app(&Arc::default(), &Arc::default()), "GET", "/api/questions", None).await;
        assert_eq!(status, StatusCode::OK);
        let questions = body.as_array().unwrap();
        assert_eq!(questions.len(), 13);
        assert_eq!(questions[0]["id"], "q1");
        assert_eq!(questions[1]["field"], "email");
    }

    #[tokio::test]
    async fn test_complete_returns_outcome() {
        let crm = Arc::new(FakeCrm::default());
        let email = Arc::new(FakeEmail::default());

        let state = serde_json::to_value(complete_state()).unwrap();
        let (status, body) = call(app(&crm, &email), "POST", "/api/diagnosis/complete", Some(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["leadId"], "lead-1");
        assert_eq!(body["noteSuccess"], true);
        assert_eq!(body["taskSuccess"], true);
        assert_eq!(body["emailSent"], true);
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_complete_without_email_is_bad_request() {
        let crm = Arc::new(FakeCrm::default());
        let (status, body) = call(
            app(&crm, &Arc::default()),
            "POST",
            "/api/diagnosis/complete",
            Some(json!({"nombre": "Ana"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "El email es requerido");
        assert_eq!(body["field"], "email");
        assert_eq!(crm.lead_calls(), 0);
    }

    #[tokio::test]
    async fn test_complete_with_lead_failure_is_server_error() {
        let crm = Arc::new(FakeCrm {
            fail_lead: true,
            ..Default::default()
        });
        let email = Arc::new(FakeEmail::default());

        let state = serde_json::to_value(complete_state()).unwrap();
        let (status, body) = call(app(&crm, &email), "POST", "/api/diagnosis/complete", Some(state)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error al procesar el diagnóstico");
        assert!(body["details"].as_str().unwrap().contains("lead rejected"));
        assert_eq!(email.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let crm = Arc::new(FakeCrm::default());
        let request = Request::builder()
            .method("POST")
            .uri("/api/diagnosis/complete")
            .header("content-type", "application/json")
            .body(Body::from("{\"nombre\": \"Ana\""))
            .unwrap();

        let response = app(&crm, &Arc::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Cuerpo de la petición inválido");
        assert!(body["details"].is_string());
        assert_eq!(crm.lead_calls(), 0);
    }

    #[tokio::test]
    async fn test_mistyped_proposal_body_gets_json_error() {
        let (status, body) = call(
            app(&Arc::default(), &Arc::default()),
            "POST",
            "/api/proposal/generate",
            Some(json!({"email": 42, "mode": "aggressive"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Cuerpo de la petición inválido");
    }

    #[tokio::test]
    async fn test_answer_advances_and_reports_progress() {
        let (status, body) = call(
            app(&Arc::default(), &Arc::default()),
            "POST",
            "/api/diagnosis/answer",
            Some(json!({"state": {"name": "Ana"}, "answer": " ana@acme.com "})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["state"]["email"], "ana@acme.com");
        assert_eq!(body["nextQuestion"]["field"], "phone");
        assert_eq!(body["complete"], false);
        assert_eq!(body["progress"]["current"], 3);
        assert_eq!(body["progress"]["total"], 13);
    }

    #[tokio::test]
    async fn test_invalid_answer_returns_error_message() {
        let (status, body) = call(
            app(&Arc::default(), &Arc::default()),
            "POST",
            "/api/diagnosis/answer",
            Some(json!({"state": {"name": "Ana"}, "answer": "no-es-email"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert!(body["error"].is_string());
        assert!(body.get("state").is_none());
        assert_eq!(body["nextQuestion"]["field"], "email");
    }

    #[tokio::test]
    async fn test_answer_on_complete_state_conflicts() {
        let state = serde_json::to_value(complete_state()).unwrap();
        let (status, body) = call(
            app(&Arc::default(), &Arc::default()),
            "POST",
            "/api/diagnosis/answer",
            Some(json!({"state": state, "answer": "más"})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_config_masks_api_key() {
        let (status, body) = call(
            app(&Arc::default(), &Arc::default()),
            "GET",
            "/api/diagnosis/config",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keyConfigured"], true);
        assert_eq!(body["keyPreview"], "vk_live_...");
        assert_eq!(body["baseUrl"], "https://volkern.app/api");
    }

    #[tokio::test]
    async fn test_proposal_for_unknown_lead_is_not_found() {
        let (status, body) = call(
            app(&Arc::default(), &Arc::default()),
            "POST",
            "/api/proposal/generate",
            Some(json!({"email": "nadie@acme.com", "mode": "aggressive"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Lead no encontrado en el CRM.");
    }

    #[tokio::test]
    async fn test_proposal_without_mode_is_bad_request() {
        let (status, _) = call(
            app(&Arc::default(), &Arc::default()),
            "POST",
            "/api/proposal/generate",
            Some(json!({"email": "ana@acme.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_proposal_for_known_lead() {
        let crm = Arc::new(FakeCrm::default());
        let mut lead = Lead::new("lead-9");
        lead.email = Some("ana@acme.com".to_string());
        lead.company = Some("Acme".to_string());
        crm.insert_lead(lead);

        let (status, body) = call(
            app(&crm, &Arc::default()),
            "POST",
            "/api/proposal/generate",
            Some(json!({"email": "ana@acme.com", "mode": "conservative"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["leadId"], "lead-9");
        assert_eq!(body["mode"], "conservative");
        assert!(body["version"].as_str().unwrap().starts_with("v-"));
    }

    #[tokio::test]
    async fn test_test_email_goes_to_consultant() {
        let email = Arc::new(FakeEmail::default());
        let (status, body) = call(app(&Arc::default(), &email), "POST", "/api/test-email", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(email.subjects(), vec!["Volkern Diagnosis - TEST EMAIL".to_string()]);
    }
}
