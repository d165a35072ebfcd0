mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Local};
use pretty_assertions::assert_eq;
use serde_json::json;
use todo_api::models::Task;

use common::{init_app, test_state};

#[actix_rt::test]
async fn test_task_crud_flow() {
    let state = test_state();
    let app = init_app(&state).await;

    // 1. Create Task (no session needed for the task API)
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({
            "title": "CRUD Task",
            "description": "Initial description",
            "due_date": "2030-01-15"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Task = test::read_body_json(resp).await;
    assert_eq!(created.title, "CRUD Task");
    assert!(!created.completed);
    assert_eq!(created.description.as_deref(), Some("Initial description"));

    // 2. Duplicate title
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({ "title": "CRUD Task" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 3. Get by id and by title
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .to_request();
    let fetched: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::get()
        .uri("/api/tasks/title/CRUD%20Task")
        .to_request();
    let fetched: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.id, created.id);

    // 4. Update by title
    let req = test::TestRequest::put()
        .uri("/api/tasks")
        .set_json(json!({
            "title": "CRUD Task",
            "description": "Updated description",
            "completed": true,
            "due_date": "2030-02-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, created.title);
    assert!(updated.completed);
    assert_eq!(updated.description.as_deref(), Some("Updated description"));
    assert_eq!(updated.due_date.map(|d| d.to_string()).as_deref(), Some("2030-02-01"));

    // 5. Delete by title
    let req = test::TestRequest::delete()
        .uri("/api/tasks/title/CRUD%20Task")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/api/tasks/title/CRUD%20Task")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_filtered_views() {
    let state = test_state();
    let app = init_app(&state).await;
    let today = Local::now().date_naive();

    let tasks = [
        json!({ "title": "due today", "due_date": today }),
        json!({ "title": "due tomorrow", "due_date": today + Duration::days(1) }),
        json!({ "title": "due yesterday", "due_date": today - Duration::days(1) }),
        json!({ "title": "done today", "completed": true, "due_date": today }),
    ];
    for task in tasks {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(task)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let fetch = |uri: &'static str| test::TestRequest::get().uri(uri).to_request();

    let all: Vec<Task> = test::call_and_read_body_json(&app, fetch("/api/tasks")).await;
    let pending: Vec<Task> = test::call_and_read_body_json(&app, fetch("/api/tasks/pending")).await;
    let completed: Vec<Task> = test::call_and_read_body_json(&app, fetch("/api/tasks/completed")).await;
    let today_tasks: Vec<Task> = test::call_and_read_body_json(&app, fetch("/api/tasks/today")).await;

    assert_eq!(all.len(), 4);
    assert_eq!(pending.len() + completed.len(), all.len());
    assert!(pending.iter().all(|t| !t.completed));
    assert!(completed.iter().all(|t| t.completed));
    assert_eq!(
        today_tasks.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
        vec!["due today"]
    );
}

#[actix_rt::test]
async fn test_buy_milk_example() {
    let state = test_state();
    let app = init_app(&state).await;
    let today = Local::now().date_naive();

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({ "title": "buy milk", "completed": false, "due_date": today }))
        .to_request();
    let created: Task = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri("/api/tasks/today").to_request();
    let due: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(due, vec![created]);

    let req = test::TestRequest::put()
        .uri("/api/tasks")
        .set_json(json!({ "title": "buy milk", "completed": true, "due_date": today }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/tasks/today").to_request();
    let due: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(due.is_empty());
}

#[actix_rt::test]
async fn test_invalid_task_requests() {
    let state = test_state();
    let app = init_app(&state).await;

    let cases = vec![
        (json!({ "description": "no title" }), StatusCode::BAD_REQUEST, "missing title"),
        (json!({ "title": "" }), StatusCode::BAD_REQUEST, "empty title"),
        (json!({ "title": "   " }), StatusCode::BAD_REQUEST, "blank title"),
        (json!({ "title": "a".repeat(201) }), StatusCode::BAD_REQUEST, "title too long"),
        (json!({ "title": "bad date", "due_date": "tomorrow" }), StatusCode::BAD_REQUEST, "unparseable date"),
    ];
    for (payload, expected, description) in cases {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "case: {}", description);
    }

    let req = test::TestRequest::put()
        .uri("/api/tasks")
        .set_json(json!({ "title": "never created" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/tasks/not-a-uuid").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let all: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(all.is_empty());
}
