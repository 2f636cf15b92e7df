mod common;

use chrono::NaiveDate;
use common::TestClient;
use edu_client::models::common::AssignmentStatus;
use edu_client::models::path::{NewPathTemplate, PathCategory, PathStep};
use edu_client::services::NotificationLevel;
use edu_client::{ApiError, ErrorKind};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fractions_template(title: &str) -> NewPathTemplate {
    NewPathTemplate {
        title: title.to_string(),
        description: "Halves and quarters".to_string(),
        category: PathCategory::Math,
        steps: vec![PathStep {
            title: "Halves".to_string(),
            description: String::new(),
            quiz_id: None,
        }],
        estimated_days: Some(7),
    }
}

#[tokio::test]
async fn test_created_template_is_returned_by_id() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    let stored = json!({
        "id": 12,
        "title": "X",
        "description": "Halves and quarters",
        "category_id": 1,
        "estimated_days": 7,
        "steps": [{"title": "Halves"}]
    });

    Mock::given(method("POST"))
        .and(path("/api/paths/templates"))
        .respond_with(ResponseTemplate::new(201).set_body_json(stored.clone()))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/paths/templates/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .expect(1)
        .mount(&app.server)
        .await;

    let paths = app.context.paths();
    let created = paths.create_template(&fractions_template("X")).await.unwrap();
    let fetched = paths.get_template(&created.id).await.unwrap();

    assert_eq!(created.id, "12");
    assert_eq!(fetched.title, "X");
    assert_eq!(fetched.category, PathCategory::Math);
    assert_eq!(fetched, created);
    assert_eq!(app.notifier.count(NotificationLevel::Success), 1);
}

#[tokio::test]
async fn test_create_sends_category_id() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    Mock::given(method("POST"))
        .and(path("/api/paths/templates"))
        .and(body_json(json!({
            "title": "Planets",
            "description": "",
            "category_id": 2,
            "steps": []
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "p-1",
            "title": "Planets",
            "category_id": 2
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let template = NewPathTemplate {
        title: "Planets".to_string(),
        description: String::new(),
        category: PathCategory::Science,
        steps: Vec::new(),
        estimated_days: None,
    };
    let created = app.context.paths().create_template(&template).await.unwrap();

    assert_eq!(created.id, "p-1");
    assert_eq!(created.category, PathCategory::Science);
}

#[tokio::test]
async fn test_assign_sends_dates_and_ids() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    Mock::given(method("POST"))
        .and(path("/api/paths/assignments"))
        .and(body_json(json!({
            "template_id": "12",
            "student_id": "17",
            "start_date": "2024-09-01",
            "end_date": "2024-09-30"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 90,
            "template_id": 12,
            "student_id": 17,
            "start_date": "2024-09-01",
            "end_date": "2024-09-30",
            "status": "in_progress",
            "progress": 10.0
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let assigned = app
        .context
        .paths()
        .assign("12", "17", date(2024, 9, 1), date(2024, 9, 30))
        .await
        .unwrap();

    assert_eq!(assigned.id, "90");
    assert_eq!(assigned.student_id, "17");
    assert_eq!(assigned.status, AssignmentStatus::InProgress);
    assert_eq!(assigned.progress, 10.0);
}

#[tokio::test]
async fn test_assign_rejects_end_before_start_without_request() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    Mock::given(method("POST"))
        .and(path("/api/paths/assignments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.server)
        .await;

    let err = app
        .context
        .paths()
        .assign("12", "17", date(2024, 9, 30), date(2024, 9, 1))
        .await
        .unwrap_err();

    match err {
        ApiError::Validation { fields, .. } => assert_eq!(fields[0].field, "end_date"),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_student_paths_accepts_wrapped_list() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/api/paths/students/17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": 90,
                "template_id": 12,
                "student_id": 17,
                "start_date": "2024-09-01",
                "end_date": "2024-09-30",
                "status": "completed",
                "progress": 100.0,
                "template": {"id": 12, "title": "Fractions", "category_id": 1}
            }]
        })))
        .mount(&app.server)
        .await;

    let assigned = app.context.paths().get_student_paths("17").await.unwrap();

    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].status, AssignmentStatus::Completed);
    assert_eq!(
        assigned[0].template.as_ref().map(|t| t.title.as_str()),
        Some("Fractions")
    );
}

#[tokio::test]
async fn test_update_progress_clamps_value() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    Mock::given(method("PUT"))
        .and(path("/api/paths/assignments/90/progress"))
        .and(body_json(json!({"progress": 100.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 90,
            "template_id": 12,
            "student_id": 17,
            "start_date": "2024-09-01",
            "end_date": "2024-09-30",
            "status": "completed",
            "progress": 100.0
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let updated = app
        .context
        .paths()
        .update_progress("90", 140.0)
        .await
        .unwrap();

    assert_eq!(updated.progress, 100.0);
}

#[tokio::test]
async fn test_missing_template_is_not_found_with_one_notification() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/api/paths/templates/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Template not found"})))
        .mount(&app.server)
        .await;

    let err = app.context.paths().get_template("404").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        app.notifier.entries(),
        vec![(NotificationLevel::Error, "Template not found".to_string())]
    );
}

#[tokio::test]
async fn test_delete_template_accepts_no_content() {
    let app = TestClient::spawn().await;
    app.store_tokens("valid-token", "refresh-1");

    Mock::given(method("DELETE"))
        .and(path("/api/paths/templates/12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    app.context.paths().delete_template("12").await.unwrap();
    assert_eq!(app.notifier.count(NotificationLevel::Success), 1);
}
