mod common;

use common::{bearer, body, setup_app};
use poem::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_duplicate_category_is_rejected() {
    let app = setup_app().await;
    app.user("admin", &["IT Staff"]).await;
    let token = app.token("admin").await;

    let resp = app
        .client
        .post("/api/admin/categories")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "name": "Hardware" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    let resp = app
        .client
        .post("/api/admin/categories")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "name": "Hardware" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"], "conflict");
}

#[tokio::test]
async fn test_deleting_category_keeps_its_tickets() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/admin/categories")
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "name": "Network" }))
        .send()
        .await;
    let category_id = body(resp).await["id"].as_i64().unwrap();

    for n in 0..3 {
        app.client
            .post("/api/tickets")
            .header("Authorization", bearer(&token_alice))
            .body_json(&json!({
                "title": format!("Outage {}", n),
                "description": "No connectivity",
                "category": category_id,
            }))
            .send()
            .await
            .assert_status(StatusCode::CREATED);
    }

    app.client
        .delete(format!("/api/admin/categories/{}", category_id))
        .header("Authorization", bearer(&token_admin))
        .send()
        .await
        .assert_status_is_ok();

    let resp = app
        .client
        .get("/api/tickets")
        .header("Authorization", bearer(&token_admin))
        .send()
        .await;
    let tickets = body(resp).await;
    let tickets = tickets.as_array().unwrap();
    assert_eq!(tickets.len(), 3);
    assert!(tickets.iter().all(|ticket| ticket["category"].is_null()));
}

#[tokio::test]
async fn test_admin_endpoints_reject_regular_users() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    app.user("agent1", &["Support Team"]).await;
    let token_alice = app.token("alice").await;
    let token_agent = app.token("agent1").await;

    for token in [&token_alice, &token_agent] {
        for path in ["/api/admin/dashboard", "/api/admin/categories", "/api/admin/assignments"] {
            app.client
                .get(path)
                .header("Authorization", bearer(token))
                .send()
                .await
                .assert_status(StatusCode::FORBIDDEN);
        }
    }
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    app.user("agent1", &["Support Team"]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_admin = app.token("admin").await;

    for n in 0..6 {
        app.client
            .post("/api/tickets")
            .header("Authorization", bearer(&token_alice))
            .body_json(&json!({ "title": format!("Issue {}", n), "description": "details", "priority": "High" }))
            .send()
            .await
            .assert_status(StatusCode::CREATED);
    }

    let resp = app
        .client
        .get("/api/admin/dashboard")
        .header("Authorization", bearer(&token_admin))
        .send()
        .await;
    resp.assert_status_is_ok();
    let dashboard = body(resp).await;

    assert_eq!(dashboard["total_tickets"], 6);
    assert_eq!(dashboard["tickets_by_status"]["Open"], 6);
    assert_eq!(dashboard["tickets_by_status"]["Closed"], 0);
    assert_eq!(dashboard["tickets_by_priority"]["High"], 6);
    assert_eq!(dashboard["unassigned_tickets"], 6);
    assert_eq!(dashboard["total_users"], 3);
    assert_eq!(dashboard["support_team_count"], 1);
    assert_eq!(dashboard["recent_tickets"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_user_management_is_superuser_only() {
    let app = setup_app().await;
    app.user("admin", &["IT Staff"]).await;
    app.superuser("root").await;
    let token_admin = app.token("admin").await;
    let token_root = app.token("root").await;

    app.client
        .get("/api/admin/users")
        .header("Authorization", bearer(&token_admin))
        .send()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let resp = app
        .client
        .post("/api/admin/users")
        .header("Authorization", bearer(&token_root))
        .body_json(&json!({
            "username": "agent9",
            "password": "a-long-password",
            "email": "agent9@example.com",
            "groups": ["Support Team"],
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let created = body(resp).await;
    assert_eq!(created["groups"], json!(["Support Team"]));
    assert!(created.get("password_hash").is_none());

    let resp = app
        .client
        .post("/api/admin/users")
        .header("Authorization", bearer(&token_root))
        .body_json(&json!({ "username": "agent9", "password": "a-long-password" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = app
        .client
        .patch(format!("/api/admin/users/{}", created["id"]))
        .header("Authorization", bearer(&token_root))
        .body_json(&json!({ "groups": ["IT Staff"] }))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert_eq!(body(resp).await["groups"], json!(["IT Staff"]));

    app.client
        .delete(format!("/api/admin/users/{}", created["id"]))
        .header("Authorization", bearer(&token_root))
        .send()
        .await
        .assert_status_is_ok();
    app.client
        .get(format!("/api/admin/users/{}", created["id"]))
        .header("Authorization", bearer(&token_root))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = setup_app().await;
    let root = app.superuser("root").await;
    let leaver = app.user("leaver", &[]).await;
    let token_root = app.token("root").await;
    let token_leaver = app.token("leaver").await;

    app.client
        .delete(format!("/api/admin/users/{}", leaver.id))
        .header("Authorization", bearer(&token_root))
        .send()
        .await
        .assert_status_is_ok();

    app.client
        .get("/api/tickets")
        .header("Authorization", bearer(&token_leaver))
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.client
        .delete(format!("/api/admin/users/{}", root.id))
        .header("Authorization", bearer(&token_root))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assignment_requires_support_team_member() {
    let app = setup_app().await;
    let alice = app.user("alice", &[]).await;
    let agent = app.user("agent1", &["Support Team"]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token_alice))
        .body_json(&json!({ "title": "Laptop battery", "description": "Drains fast" }))
        .send()
        .await;
    let id = body(resp).await["id"].as_i64().unwrap();
    let assign_path = format!("/api/admin/tickets/{}/assign", id);

    let resp = app
        .client
        .get("/api/admin/assignments")
        .header("Authorization", bearer(&token_admin))
        .send()
        .await;
    assert_eq!(body(resp).await.as_array().unwrap().len(), 1);

    app.client
        .patch(&assign_path)
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "assigned_to": alice.id }))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.client
        .patch(&assign_path)
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "assigned_to": 9999 }))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let resp = app
        .client
        .patch(&assign_path)
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "assigned_to": agent.id }))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert_eq!(body(resp).await["assigned_to_username"], "agent1");

    let resp = app
        .client
        .get("/api/admin/assignments")
        .header("Authorization", bearer(&token_admin))
        .send()
        .await;
    assert!(body(resp).await.as_array().unwrap().is_empty());
}
