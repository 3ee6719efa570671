mod common;

use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_sign_up_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/sign-up")
        .json(&json!({
            "username": "alice",
            "password": "secret"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    let external_id = body["data"]["externalId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(external_id).is_ok());
}

#[tokio::test]
async fn test_sign_up_duplicate_username() {
    let app = TestApp::spawn().await;
    app.sign_up("alice", "secret").await;

    let response = app
        .post("/auth/sign-up")
        .json(&json!({
            "username": "alice",
            "password": "another"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_sign_up_missing_fields() {
    let app = TestApp::spawn().await;

    for payload in [
        json!({ "username": "", "password": "secret" }),
        json!({ "username": "alice", "password": "" }),
        json!({ "username": "alice" }),
        json!({}),
    ] {
        let response = app
            .post("/auth/sign-up")
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", payload);
    }
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let app = TestApp::spawn().await;

    for path in ["/auth/sign-up", "/auth/sign-in"] {
        let wrong_type = app
            .post(path)
            .json(&json!({ "username": 5, "password": "secret" }))
            .send()
            .await
            .expect("Failed to execute request");
        let not_json = app
            .post(path)
            .form(&[("username", "alice"), ("password", "secret")])
            .send()
            .await
            .expect("Failed to execute request");
        let truncated = app
            .post(path)
            .header("content-type", "application/json")
            .body(r#"{"username": "alice""#)
            .send()
            .await
            .expect("Failed to execute request");

        for response in [wrong_type, not_json, truncated] {
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);

            let body: serde_json::Value =
                response.json().await.expect("Failed to parse response");
            assert_eq!(body["status_code"], 400);
            assert!(body["data"]["message"].is_string());
        }
    }
}

#[tokio::test]
async fn test_concurrent_sign_ups_one_wins() {
    let app = TestApp::spawn().await;

    let request = || {
        app.post("/auth/sign-up")
            .json(&json!({ "username": "bob", "password": "secret" }))
            .send()
    };
    let (first, second) = tokio::join!(request(), request());

    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::BAD_REQUEST]);
}

#[tokio::test]
async fn test_sign_in_returns_token_for_subject() {
    let app = TestApp::spawn().await;
    let external_id = app.sign_up("alice", "secret").await;

    let response = app
        .post("/auth/sign-in")
        .json(&json!({
            "username": "alice",
            "password": "secret"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let token = body["data"]["accessToken"].as_str().unwrap();
    let claims = app.claims(token);

    assert_eq!(claims.sub, external_id);
    assert_eq!(claims.username, "alice");
    assert_eq!(body["data"]["expiresAt"], claims.exp);
    assert!(claims.exp > Utc::now().timestamp());
}

#[tokio::test]
async fn test_sign_in_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.sign_up("alice", "secret").await;

    let mut bodies = Vec::new();
    for payload in [
        json!({ "username": "nobody", "password": "secret" }),
        json!({ "username": "alice", "password": "wrong" }),
    ] {
        let response = app
            .post("/auth/sign-in")
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(response.text().await.unwrap());
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn test_me_echoes_principal() {
    let app = TestApp::spawn().await;
    let external_id = app.sign_up("alice", "secret").await;
    let token = app.sign_in("alice", "secret").await;

    let response = app
        .get_authenticated("/auth/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["sub"], external_id.as_str());
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/auth/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_invalid_tokens() {
    let app = TestApp::spawn().await;
    let external_id = app.sign_up("alice", "secret").await;

    let expired = app
        .token_issuer
        .sign(&auth::Claims {
            sub: external_id.clone(),
            username: "alice".to_string(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        })
        .unwrap();
    let forged = auth::TokenIssuer::new(b"some-other-secret-that-is-32-bytes-long")
        .sign(&auth::Claims::for_user(
            &external_id,
            "alice",
            chrono::Duration::minutes(5),
        ))
        .unwrap();

    for token in [expired.as_str(), forged.as_str(), "not-a-token"] {
        let response = app
            .get_authenticated("/auth/me", token)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_users_require_token() {
    let app = TestApp::spawn().await;
    let external_id = app.sign_up("alice", "secret").await;

    let list = app.get("/users").send().await.unwrap();
    let delete = app
        .api_client
        .delete(format!("{}/users/{}", app.address, external_id))
        .send()
        .await
        .unwrap();

    assert_eq!(list.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_hides_password_hash() {
    let app = TestApp::spawn().await;
    app.sign_up("alice", "secret").await;
    app.sign_up("bob", "secret").await;
    let token = app.sign_in("alice", "secret").await;

    let response = app
        .get_authenticated("/users", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["username"], "bob");
    for user in users {
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("password_hash").is_none());
        assert!(user["createdAt"].is_string());
    }
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::spawn().await;
    let external_id = app.sign_up("alice", "secret").await;
    let token = app.sign_in("alice", "secret").await;

    let response = app
        .get_authenticated(&format!("/users/{}", external_id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["externalId"], external_id.as_str());

    let malformed = app
        .get_authenticated("/users/not-a-uuid", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_user_then_lookup_not_found() {
    let app = TestApp::spawn().await;
    app.sign_up("admin", "secret").await;
    let victim = app.sign_up("alice", "secret").await;
    let token = app.sign_in("admin", "secret").await;

    let response = app
        .delete_authenticated(&format!("/users/{}", victim), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let lookup = app
        .get_authenticated(&format!("/users/{}", victim), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);

    let again = app
        .delete_authenticated(&format!("/users/{}", victim), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    // The removed account can no longer sign in.
    let sign_in = app
        .post("/auth/sign-in")
        .json(&json!({ "username": "alice", "password": "secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(sign_in.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_user_requires_token() {
    let app = TestApp::spawn().await;
    app.sign_up("admin", "secret").await;
    let token = app.sign_in("admin", "secret").await;

    let anonymous = app
        .post("/users")
        .json(&json!({ "username": "carol", "password": "secret" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_authenticated("/users", &token)
        .json(&json!({ "username": "carol", "password": "secret" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let external_id = body["data"]["externalId"].as_str().unwrap().to_string();

    let duplicate = app
        .post_authenticated("/users", &token)
        .json(&json!({ "username": "carol", "password": "other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    // The created account signs in like any other.
    let carol_token = app.sign_in("carol", "secret").await;
    assert_eq!(app.claims(&carol_token).sub, external_id);
}
