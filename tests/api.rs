// tests/api.rs

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use supplier_compliance::{
    app,
    config::{AppConfig, AppState},
    models::auth::CallerRole,
};

struct TestApp {
    router: Router,
    state: AppState,
}

fn test_app() -> TestApp {
    let config = AppConfig {
        bind_addr: "127.0.0.1:0".into(),
        jwt_secret: "segredo-de-teste".into(),
        field_codec_key: Some(vec![42u8; 32]),
        legacy_codec_key: None,
        seed_file: None,
        compliance_interval: Duration::from_secs(3600),
        require_delete_reason: false,
    };
    let state = AppState::new(&config).unwrap();
    TestApp { router: app(state.clone()), state }
}

impl TestApp {
    fn token(&self, role: CallerRole, supplier_id: Option<Uuid>, plan_id: Option<&str>) -> String {
        self.token_for(Uuid::new_v4(), role, supplier_id, plan_id)
    }

    fn token_for(&self, sub: Uuid, role: CallerRole, supplier_id: Option<Uuid>, plan_id: Option<&str>) -> String {
        self.state
            .auth_service
            .issue_token(sub, role, supplier_id, plan_id.map(String::from))
            .unwrap()
    }

    fn admin(&self) -> String {
        self.token(CallerRole::Admin, None, None)
    }

    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create_supplier(&self, name_en: &str, expiry_offset_days: i64) -> Uuid {
        let expiry = Utc::now().date_naive() + chrono::Duration::days(expiry_offset_days);
        let (status, body) = self
            .call(
                Method::POST,
                "/api/suppliers",
                Some(&self.admin()),
                Some(json!({
                    "companyNameAr": "شركة البناء",
                    "companyNameEn": name_en,
                    "email": "contato@building.sa",
                    "phone": "+966500000000",
                    "crNumber": "1010123456",
                    "crExpiryDate": expiry.to_string(),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

#[tokio::test]
async fn health_is_public_and_suppliers_require_a_token() {
    let app = test_app();

    let (status, _) = app.call(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call(Method::GET, "/api/suppliers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let customer = app.token(CallerRole::Customer, None, Some("free"));
    let (status, _) = app.call(Method::GET, "/api/suppliers", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn created_supplier_has_derived_status_and_revealed_phone() {
    let app = test_app();
    let id = app.create_supplier("Building Co", 20).await;

    let (status, body) = app
        .call(Method::GET, &format!("/api/suppliers/{}", id), Some(&app.admin()), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["phone"], "+966500000000");
    assert_eq!(body["commercialRegistration"]["status"], "expiring");
    assert_eq!(body["commercialRegistration"]["daysUntilExpiry"], 20);
    assert_eq!(body["allowedActions"], json!(["suspend", "ban", "delete"]));

    // No documento o telefone fica cifrado
    let stored = app.state.supplier_repo.find_by_id(id).await.unwrap();
    assert!(stored.phone.starts_with("v2:"));
}

#[tokio::test]
async fn lifecycle_transitions_over_http() {
    let app = test_app();
    let admin = app.admin();
    let id = app.create_supplier("Building Co", 365).await;
    let base = format!("/api/suppliers/{}", id);

    let (status, _) = app
        .call(Method::POST, &format!("{}/suspend", base), Some(&admin), Some(json!({ "reason": "  " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(Method::POST, &format!("{}/suspend", base), Some(&admin), Some(json!({ "reason": "Documentos pendentes" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "suspended");
    assert_eq!(body["suspendReason"], "Documentos pendentes");
    assert_eq!(body["suspensionOrigin"], "manual");

    // Suspender de novo não é idempotente
    let (status, _) = app
        .call(Method::POST, &format!("{}/suspend", base), Some(&admin), Some(json!({ "reason": "de novo" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.call(Method::POST, &format!("{}/unsuspend", base), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert!(body["suspendedAt"].is_null());

    let (status, body) = app.call(Method::DELETE, &base, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");
    assert_eq!(body["allowedActions"], json!([]));

    for action in ["unban", "unsuspend"] {
        let (status, _) = app.call(Method::POST, &format!("{}/{}", base, action), Some(&admin), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
    let (status, _) = app.call(Method::DELETE, &base, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn compliance_run_auto_suspends_expired_supplier() {
    let app = test_app();
    let admin = app.admin();
    let expired = app.create_supplier("Late Co", -1).await;
    let healthy = app.create_supplier("Fine Co", 400).await;

    let (status, report) = app.call(Method::POST, "/api/compliance/run", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["autoSuspended"], json!([expired.to_string()]));

    let (_, body) = app
        .call(Method::GET, &format!("/api/suppliers/{}", expired), Some(&admin), None)
        .await;
    assert_eq!(body["status"], "suspended");
    assert_eq!(body["suspensionOrigin"], "system");
    assert!(body["suspendReason"].as_str().unwrap().contains("[system]"));
    assert_eq!(body["commercialRegistration"]["status"], "expired");

    let (_, body) = app
        .call(Method::GET, &format!("/api/suppliers/{}", healthy), Some(&admin), None)
        .await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["commercialRegistration"]["status"], "valid");
}

#[tokio::test]
async fn alert_settings_are_versioned_and_validated() {
    let app = test_app();
    let admin = app.admin();

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/settings/alerts",
            Some(&admin),
            Some(json!({
                "firstAlertDays": 10, "secondAlertDays": 30, "finalAlertDays": 7,
                "autoSuspendOnExpiry": true, "notifyAdminOnExpiry": true, "requireAdminReview": false
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/settings/alerts",
            Some(&admin),
            Some(json!({
                "firstAlertDays": 15, "secondAlertDays": 10, "finalAlertDays": 3,
                "autoSuspendOnExpiry": false, "notifyAdminOnExpiry": true, "requireAdminReview": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 2);

    // Reclassifica imediatamente com o novo limite
    let id = app.create_supplier("Building Co", 20).await;
    let (_, body) = app.call(Method::GET, &format!("/api/suppliers/{}", id), Some(&admin), None).await;
    assert_eq!(body["commercialRegistration"]["status"], "valid");
}

#[tokio::test]
async fn renewal_under_review_until_admin_approves() {
    let app = test_app();
    let admin = app.admin();
    let id = app.create_supplier("Building Co", 5).await;
    let owner = app.token(CallerRole::SupplierOwner, Some(id), Some("professional"));

    app.call(
        Method::PUT,
        "/api/settings/alerts",
        Some(&admin),
        Some(json!({
            "firstAlertDays": 60, "secondAlertDays": 30, "finalAlertDays": 7,
            "autoSuspendOnExpiry": true, "notifyAdminOnExpiry": true, "requireAdminReview": true
        })),
    )
    .await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/suppliers/{}/registration", id),
            Some(&owner),
            Some(json!({ "number": "2020123456", "expiryDate": "2035-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["commercialRegistration"]["status"], "pending_review");

    let (_, body) = app
        .call(Method::POST, &format!("/api/suppliers/{}/registration/approve", id), Some(&admin), None)
        .await;
    assert_eq!(body["commercialRegistration"]["status"], "valid");
    assert_eq!(body["commercialRegistration"]["number"], "2020123456");
}

#[tokio::test]
async fn directory_masks_names_for_free_plan() {
    let app = test_app();
    app.create_supplier("Alpha", 365).await;

    let free = app.token(CallerRole::Customer, None, Some("free"));
    let (status, body) = app.call(Method::GET, "/api/directory", Some(&free), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["companyName"]["en"], "A***a");

    let pro = app.token(CallerRole::Customer, None, Some("professional"));
    let (_, body) = app.call(Method::GET, "/api/directory", Some(&pro), None).await;
    assert_eq!(body[0]["companyName"]["en"], "Alpha");
}

#[tokio::test]
async fn plan_endpoints_fail_safe_on_unknown_plan() {
    let app = test_app();

    let (status, body) = app.call(Method::GET, "/api/plans/gold/features/noDownload", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);

    let (status, _) = app.call(Method::GET, "/api/plans/gold/usage", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(Method::GET, "/api/plans/basic/usage?usedProjects=9&usedStorageMb=4096", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remainingProjects"], 0);
    assert_eq!(body["storage"]["remaining"], 0);
    assert_eq!(body["storage"]["percentage"], 100.0);
}

#[tokio::test]
async fn view_only_employee_cannot_toggle_services() {
    let app = test_app();
    let id = app.create_supplier("Building Co", 365).await;
    let owner = app.token(CallerRole::SupplierOwner, Some(id), Some("professional"));

    let (status, employee) = app
        .call(
            Method::POST,
            &format!("/api/suppliers/{}/employees", id),
            Some(&owner),
            Some(json!({ "name": "Sara", "email": "sara@building.sa", "role": "view_only" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(employee["status"], "pending");
    let employee_id: Uuid = employee["id"].as_str().unwrap().parse().unwrap();

    let employee_token = app.token_for(employee_id, CallerRole::SupplierEmployee, Some(id), None);
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/suppliers/{}/employees/{}/login", id, employee_id),
            Some(&employee_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let toggle = format!("/api/suppliers/{}/services/delivery/standard/toggle", id);
    let (status, _) = app.call(Method::POST, &toggle, Some(&employee_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(Method::GET, &format!("/api/suppliers/{}/services", id), Some(&employee_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["readOnly"], true);
    assert_eq!(body["services"]["delivery"][0]["enabled"], false);

    // O dono pode
    let (status, body) = app.call(Method::POST, &toggle, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["delivery"][0]["enabled"], true);
}

#[tokio::test]
async fn toggling_permission_turns_role_custom() {
    let app = test_app();
    let id = app.create_supplier("Building Co", 365).await;
    let owner = app.token(CallerRole::SupplierOwner, Some(id), None);

    let (_, employee) = app
        .call(
            Method::POST,
            &format!("/api/suppliers/{}/employees", id),
            Some(&owner),
            Some(json!({ "name": "Omar", "email": "omar@building.sa", "role": "products" })),
        )
        .await;
    let employee_id = employee["id"].as_str().unwrap().to_string();

    let (status, roster) = app
        .call(
            Method::POST,
            &format!("/api/suppliers/{}/employees/{}/permissions/toggle", id, employee_id),
            Some(&owner),
            Some(json!({ "permission": "edit_prices" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster[0]["role"], "custom");
    assert_eq!(
        roster[0]["permissions"],
        json!(["view_products", "add_products", "edit_products", "delete_products"])
    );

    // Pendente não pode ser desativado
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/suppliers/{}/employees/{}/deactivate", id, employee_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn listings_reflect_auto_suspension_without_waiting_for_the_tick() {
    let app = test_app();
    let expired = app.create_supplier("Late Co", -1).await;
    let healthy = app.create_supplier("Fine Co", 400).await;

    let (status, list) = app.call(Method::GET, "/api/suppliers", Some(&app.admin()), None).await;
    assert_eq!(status, StatusCode::OK);
    let late = list
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == expired.to_string())
        .unwrap();
    assert_eq!(late["commercialRegistration"]["status"], "expired");
    assert_eq!(late["status"], "suspended");
    assert_eq!(late["suspensionOrigin"], "system");

    let customer = app.token(CallerRole::Customer, None, Some("professional"));
    let (status, directory) = app.call(Method::GET, "/api/directory", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = directory
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["id"].as_str())
        .collect();
    assert_eq!(ids, vec![healthy.to_string().as_str()]);
}

#[tokio::test]
async fn expired_supplier_leaves_directory_on_first_listing() {
    let app = test_app();
    app.create_supplier("Late Co", -1).await;

    let customer = app.token(CallerRole::Customer, None, Some("free"));
    let (status, directory) = app.call(Method::GET, "/api/directory", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(directory, json!([]));
}

#[tokio::test]
async fn reminder_body_uses_camel_case_fields() {
    let app = test_app();
    let id = app.create_supplier("Building Co", 20).await;

    let (status, body) = app
        .call(Method::POST, &format!("/api/suppliers/{}/reminder", id), Some(&app.admin()), None)
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["kind"], "cr_reminder");
    assert_eq!(body["supplierId"], id.to_string());
    assert_eq!(body["daysUntilExpiry"], 20);
}

#[tokio::test]
async fn contact_fields_are_sealed_at_rest() {
    let app = test_app();
    let id = app.create_supplier("Building Co", 365).await;
    let owner = app.token(CallerRole::SupplierOwner, Some(id), None);

    let (status, employee) = app
        .call(
            Method::POST,
            &format!("/api/suppliers/{}/employees", id),
            Some(&owner),
            Some(json!({ "name": "Sara", "email": "sara@building.sa", "phone": "+966511111111", "role": "orders" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(employee["phone"], "+966511111111");

    let stored = app.state.supplier_repo.find_by_id(id).await.unwrap();
    assert!(stored.email.starts_with("v2:"));
    assert!(stored.phone.starts_with("v2:"));
    assert!(stored.employees[0].phone.as_deref().unwrap().starts_with("v2:"));

    let (_, body) = app
        .call(Method::GET, &format!("/api/suppliers/{}", id), Some(&app.admin()), None)
        .await;
    assert_eq!(body["email"], "contato@building.sa");
    assert_eq!(body["employees"][0]["phone"], "+966511111111");

    let (_, roster) = app
        .call(Method::GET, &format!("/api/suppliers/{}/employees", id), Some(&owner), None)
        .await;
    assert_eq!(roster[0]["phone"], "+966511111111");
}
