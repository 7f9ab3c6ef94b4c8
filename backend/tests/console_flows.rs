//! End-to-end console flows against in-memory stores.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use vakaalat_console::domain::{OrphanPolicy, TRACE_ID_HEADER, Table};

mod support;

use support::{InMemoryBackend, bearer, console_app};

#[fixture]
fn backend() -> Arc<InMemoryBackend> {
    InMemoryBackend::new()
}

async fn call(
    backend: &Arc<InMemoryBackend>,
    policy: OrphanPolicy,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(console_app(backend, policy)).await;
    let response =
        actix_test::call_service(&app, request.insert_header(bearer()).to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn lawyer_request() -> Value {
    json!({
        "role": "lawyer",
        "email": "meera@example.in",
        "password": "hunter22",
        "profile": {
            "fullName": "Meera Iyer",
            "age": "38",
            "phone": "98100 00000",
            "city": "Pune",
            "state": "Maharashtra",
            "barCouncilNumber": "MH/1234/2015",
            "lawSchool": "ILS Law College",
            "primarySpecialization": "Civil Law",
            "otherSpecializations": ["Civil Law", "Property Law"],
            "experienceYears": 6
        },
        "photo": { "fileName": "meera.jpeg", "contentType": "image/jpeg", "data": "aGVsbG8=" },
        "experiences": [
            { "caseTitle": "Desai v. Desai", "caseDomain": "Property Law", "caseOutcome": "Settled" },
            { "caseTitle": "" }
        ]
    })
}

fn client_request(email: &str) -> Value {
    json!({
        "role": "client",
        "email": email,
        "password": "s3cret!",
        "profile": { "fullName": "Ravi Kumar", "occupation": "Teacher" }
    })
}

#[rstest]
#[actix_rt::test]
async fn lawyer_account_lifecycle(backend: Arc<InMemoryBackend>) {
    let policy = OrphanPolicy::Retain;

    let (status, created) = call(
        &backend,
        policy,
        actix_test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(lawyer_request()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["principalId"].as_str().expect("principal id").to_owned();

    let lawyers = backend.rows(Table::Lawyers);
    assert_eq!(lawyers.len(), 1);
    let row = &lawyers[0];
    assert_eq!(row.get("id"), Some(&json!(id)));
    assert_eq!(row.get("occupation"), Some(&json!("Lawyer")));
    assert_eq!(row.get("age"), Some(&json!(38)));
    assert_eq!(row.get("experience_years"), Some(&json!(6)));
    assert_eq!(row.get("other_specializations"), Some(&json!(["Property Law"])));
    assert_eq!(
        row.get("profile_photo_url"),
        Some(&json!(format!(
            "https://store.test/storage/v1/object/public/Photos/{id}/profile.jpeg"
        )))
    );
    assert_eq!(backend.object_paths(), vec![format!("{id}/profile.jpeg")]);
    let history = backend.rows(Table::LawyerExperience);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].get("lawyer_id"), Some(&json!(id)));

    let (status, saved) = call(
        &backend,
        policy,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/records/lawyers/{id}"))
            .set_json(json!({
                "fields": { "phone": "98111 11111", "law_school": "NLSIU" },
                "newPassword": "brand-new-secret"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["identityUpdated"], json!(true));
    let principal = backend.principal(&id).expect("principal exists");
    assert_eq!(principal.phone.as_deref(), Some("98111 11111"));
    assert_eq!(principal.credential, "brand-new-secret");
    assert_eq!(
        backend.rows(Table::Lawyers)[0].get("law_school"),
        Some(&json!("NLSIU"))
    );

    let (status, _) = call(
        &backend,
        policy,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/accounts/{id}/ban"))
            .set_json(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        backend.principal(&id).and_then(|p| p.ban_hours),
        Some(876_000)
    );

    let (status, deleted) = call(
        &backend,
        policy,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/accounts/lawyer/{id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "principalDeleted": true }));
    assert!(backend.rows(Table::Lawyers).is_empty());
    assert!(backend.principal(&id).is_none());
}

#[rstest]
#[case(OrphanPolicy::Retain, StatusCode::BAD_GATEWAY, "partial_commit", 1)]
#[case(OrphanPolicy::DeletePrincipal, StatusCode::BAD_GATEWAY, "store_failure", 0)]
#[actix_rt::test]
async fn refused_profile_insert_follows_orphan_policy(
    backend: Arc<InMemoryBackend>,
    #[case] policy: OrphanPolicy,
    #[case] expected_status: StatusCode,
    #[case] expected_code: &str,
    #[case] principals_left: usize,
) {
    backend.refuse_inserts_into(Table::Clients);

    let (status, body) = call(
        &backend,
        policy,
        actix_test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(client_request("ravi@example.in")),
    )
    .await;

    assert_eq!(status, expected_status);
    assert_eq!(body["code"], json!(expected_code));
    assert_eq!(
        body["message"],
        json!("permission denied for table clients")
    );
    assert_eq!(backend.principal_count(), principals_left);
}

#[rstest]
#[actix_rt::test]
async fn duplicate_email_is_refused_by_the_identity_store(backend: Arc<InMemoryBackend>) {
    let policy = OrphanPolicy::Retain;
    let request = || {
        actix_test::TestRequest::post()
            .uri("/api/v1/accounts")
            .set_json(client_request("ravi@example.in"))
    };
    let (first, _) = call(&backend, policy, request()).await;
    let (second, body) = call(&backend, policy, request()).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], json!("store_failure"));
    assert_eq!(backend.rows(Table::Clients).len(), 1);
}

#[rstest]
#[actix_rt::test]
async fn case_edits_match_on_case_id_and_skip_identity(backend: Arc<InMemoryBackend>) {
    backend.seed(
        Table::Cases,
        json!({
            "case_id": "CASE-0042",
            "status": "open",
            "client_id": "c-1",
            "clients": { "full_name": "Ravi Kumar" }
        }),
    );

    let (status, body) = call(
        &backend,
        OrphanPolicy::Retain,
        actix_test::TestRequest::patch()
            .uri("/api/v1/records/case_table/CASE-0042")
            .set_json(json!({
                "fields": { "status": "closed", "client_id": "c-2" },
                "newPassword": "ignored-for-cases"
            })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["applied"], json!({ "status": "closed" }));
    assert_eq!(body["identityUpdated"], json!(false));
    let cases = backend.rows(Table::Cases);
    assert_eq!(cases[0].get("status"), Some(&json!("closed")));
    assert_eq!(cases[0].get("client_id"), Some(&json!("c-1")));
}

#[rstest]
#[actix_rt::test]
async fn broadcast_writes_one_unread_row_per_recipient(backend: Arc<InMemoryBackend>) {
    let (status, body) = call(
        &backend,
        OrphanPolicy::Retain,
        actix_test::TestRequest::post()
            .uri("/api/v1/notifications")
            .set_json(json!({
                "recipients": ["u-1", "u-2", "u-1"],
                "title": "Maintenance",
                "message": "The portal is offline on Sunday."
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["delivered"], json!(2));
    let rows = backend.rows(Table::Notifications);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.get("is_read") == Some(&json!(false))));
}

#[rstest]
#[actix_rt::test]
async fn wrong_secret_is_refused_with_a_trace_id(backend: Arc<InMemoryBackend>) {
    let app = actix_test::init_service(console_app(&backend, OrphanPolicy::Retain)).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/accounts")
        .insert_header(("Authorization", "Bearer not-the-key"))
        .set_json(client_request("ravi@example.in"))
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    assert_eq!(backend.principal_count(), 0);
}
