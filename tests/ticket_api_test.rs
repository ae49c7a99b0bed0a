mod common;

use common::{bearer, body, setup_app};
use poem::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = setup_app().await;

    let resp = app.client.get("/api/health").send().await;

    resp.assert_status_is_ok();
    assert_eq!(body(resp).await["status"], "healthy");
}

#[tokio::test]
async fn test_tickets_require_bearer_token() {
    let app = setup_app().await;

    let resp = app.client.get("/api/tickets").send().await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    let resp = app
        .client
        .get("/api/tickets")
        .header("Authorization", bearer("not-a-jwt"))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_ticket_ignores_spoofed_fields() {
    let app = setup_app().await;
    let alice = app.user("alice", &[]).await;
    let mallory = app.user("mallory", &[]).await;
    let agent = app.user("agent1", &["Support Team"]).await;
    let token = app.token("alice").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token))
        .body_json(&json!({
            "title": "Printer jam",
            "description": "Tray 2 is stuck",
            "created_by": mallory.id,
            "status": "Closed",
            "assigned_to": agent.id,
        }))
        .send()
        .await;

    resp.assert_status(StatusCode::CREATED);
    let ticket = body(resp).await;
    assert_eq!(ticket["created_by"], alice.id);
    assert_eq!(ticket["created_by_username"], "alice");
    assert_eq!(ticket["status"], "Open");
    assert_eq!(ticket["priority"], "Medium");
    assert!(ticket["assigned_to"].is_null());
}

#[tokio::test]
async fn test_create_ticket_reports_field_errors() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    let token = app.token("alice").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "title": "x".repeat(51), "category": 999 }))
        .send()
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let error = body(resp).await;
    let fields: Vec<&str> = error["field_errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|violation| violation["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"description"));
    assert!(fields.contains(&"category"));
}

#[tokio::test]
async fn test_printer_jam_visibility() {
    let app = setup_app().await;
    app.user("user_a", &[]).await;
    app.user("user_b", &[]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_a = app.token("user_a").await;
    let token_b = app.token("user_b").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token_a))
        .body_json(&json!({ "title": "Printer jam", "description": "Paper stuck" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let id = body(resp).await["id"].as_i64().unwrap();
    let path = format!("/api/tickets/{}", id);

    let resp = app
        .client
        .get(&path)
        .header("Authorization", bearer(&token_b))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(body(resp).await["status_code"], 403);

    let resp = app
        .client
        .get(&path)
        .header("Authorization", bearer(&token_admin))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert_eq!(body(resp).await["title"], "Printer jam");

    let resp = app
        .client
        .get("/api/tickets/9999")
        .header("Authorization", bearer(&token_admin))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_is_scoped_to_own_tickets() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    app.user("bob", &[]).await;
    let token_alice = app.token("alice").await;
    let token_bob = app.token("bob").await;

    for (token, title) in [(&token_alice, "Alice 1"), (&token_bob, "Bob 1"), (&token_alice, "Alice 2")] {
        app.client
            .post("/api/tickets")
            .header("Authorization", bearer(token))
            .body_json(&json!({ "title": title, "description": "details" }))
            .send()
            .await
            .assert_status(StatusCode::CREATED);
    }

    let resp = app
        .client
        .get("/api/tickets")
        .header("Authorization", bearer(&token_alice))
        .send()
        .await;
    resp.assert_status_is_ok();
    let tickets = body(resp).await;
    let titles: Vec<&str> = tickets
        .as_array()
        .unwrap()
        .iter()
        .map(|ticket| ticket["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Alice 2", "Alice 1"]);
}

#[tokio::test]
async fn test_internal_comments_hidden_from_creator() {
    let app = setup_app().await;
    let alice = app.user("alice", &[]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token_alice))
        .body_json(&json!({ "title": "VPN down", "description": "Cannot connect" }))
        .send()
        .await;
    let id = body(resp).await["id"].as_i64().unwrap();
    let comments_path = format!("/api/tickets/{}/comments", id);

    let resp = app
        .client
        .post(&comments_path)
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "content": "Check the firewall logs", "is_internal": true }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    assert_eq!(body(resp).await["is_internal"], true);

    let resp = app
        .client
        .post(&comments_path)
        .header("Authorization", bearer(&token_alice))
        .body_json(&json!({ "content": "Still broken", "is_internal": true, "author": 9999 }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let comment = body(resp).await;
    assert_eq!(comment["author"], alice.id);
    assert_eq!(comment["is_internal"], false);

    let resp = app
        .client
        .get(&comments_path)
        .header("Authorization", bearer(&token_alice))
        .send()
        .await;
    resp.assert_status_is_ok();
    let visible = body(resp).await;
    let visible = visible.as_array().unwrap();
    assert_eq!(visible.len(), 1);
    assert!(visible.iter().all(|comment| comment["is_internal"] == false));

    let resp = app
        .client
        .get(&comments_path)
        .header("Authorization", bearer(&token_admin))
        .send()
        .await;
    assert_eq!(body(resp).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_only_assigned_agent_updates_ticket() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    let agent1 = app.user("agent1", &["Support Team"]).await;
    app.user("agent2", &["Support Team"]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_agent1 = app.token("agent1").await;
    let token_agent2 = app.token("agent2").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token_alice))
        .body_json(&json!({ "title": "Monitor flickers", "description": "Since Monday" }))
        .send()
        .await;
    let id = body(resp).await["id"].as_i64().unwrap();

    let resp = app
        .client
        .patch(format!("/api/admin/tickets/{}/assign", id))
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "assigned_to": agent1.id }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let before = body(resp).await;
    let path = format!("/api/tickets/{}", id);

    let resp = app
        .client
        .patch(&path)
        .header("Authorization", bearer(&token_agent2))
        .body_json(&json!({ "status": "In progress" }))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = app
        .client
        .patch(&path)
        .header("Authorization", bearer(&token_agent1))
        .body_json(&json!({ "status": "In progress" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let after = body(resp).await;

    assert_eq!(after["status"], "In progress");
    assert_eq!(after["created_at"], before["created_at"]);
    assert_ne!(after["updated_at"], before["updated_at"]);
}

#[tokio::test]
async fn test_open_ticket_cannot_jump_to_resolved() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token_alice))
        .body_json(&json!({ "title": "Mouse", "description": "Double clicks" }))
        .send()
        .await;
    let id = body(resp).await["id"].as_i64().unwrap();

    let resp = app
        .client
        .patch(format!("/api/tickets/{}", id))
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "status": "Resolved" }))
        .send()
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let error = body(resp).await;
    let fields: Vec<&str> = error["field_errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|violation| violation["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["status"]);
}

#[tokio::test]
async fn test_assigned_agent_may_echo_own_assignment() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    let agent1 = app.user("agent1", &["Support Team"]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_agent1 = app.token("agent1").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token_alice))
        .body_json(&json!({ "title": "Headset", "description": "No audio" }))
        .send()
        .await;
    let id = body(resp).await["id"].as_i64().unwrap();
    app.client
        .patch(format!("/api/admin/tickets/{}/assign", id))
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "assigned_to": agent1.id }))
        .send()
        .await
        .assert_status_is_ok();

    let resp = app
        .client
        .patch(format!("/api/tickets/{}", id))
        .header("Authorization", bearer(&token_agent1))
        .body_json(&json!({ "assigned_to": agent1.id, "status": "In progress" }))
        .send()
        .await;

    resp.assert_status_is_ok();
    let updated = body(resp).await;
    assert_eq!(updated["assigned_to"], agent1.id);
    assert_eq!(updated["status"], "In progress");
}

#[tokio::test]
async fn test_agent_cannot_reassign_ticket() {
    let app = setup_app().await;
    app.user("alice", &[]).await;
    let agent1 = app.user("agent1", &["Support Team"]).await;
    let agent2 = app.user("agent2", &["Support Team"]).await;
    app.user("admin", &["IT Staff"]).await;
    let token_alice = app.token("alice").await;
    let token_agent1 = app.token("agent1").await;
    let token_admin = app.token("admin").await;

    let resp = app
        .client
        .post("/api/tickets")
        .header("Authorization", bearer(&token_alice))
        .body_json(&json!({ "title": "Keyboard", "description": "Sticky keys" }))
        .send()
        .await;
    let id = body(resp).await["id"].as_i64().unwrap();
    app.client
        .patch(format!("/api/admin/tickets/{}/assign", id))
        .header("Authorization", bearer(&token_admin))
        .body_json(&json!({ "assigned_to": agent1.id }))
        .send()
        .await
        .assert_status_is_ok();

    let resp = app
        .client
        .patch(format!("/api/tickets/{}", id))
        .header("Authorization", bearer(&token_agent1))
        .body_json(&json!({ "assigned_to": agent2.id }))
        .send()
        .await;

    resp.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_whoami_reflects_current_groups() {
    let app = setup_app().await;
    let user = app.user("agent1", &["Support Team"]).await;
    let token = app.token("agent1").await;

    let resp = app
        .client
        .get("/api/auth/whoami")
        .header("Authorization", bearer(&token))
        .send()
        .await;

    resp.assert_status_is_ok();
    let whoami = body(resp).await;
    assert_eq!(whoami["user_id"], user.id);
    assert_eq!(whoami["roles"], json!(["Support Team"]));
}

#[tokio::test]
async fn test_token_rejects_bad_password() {
    let app = setup_app().await;
    app.user("alice", &[]).await;

    let resp = app
        .client
        .post("/api/auth/token")
        .body_json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(body(resp).await["error"], "invalid_credentials");
}
