// tests/rest_api.rs
// End-to-end coverage of auth, users, teams, projects, and tasks over the
// HTTP surface.


use axum::http::StatusCode;
use serde_json::json;
use test_helpers::{create_test_app, create_test_state, register_user, register_with_team, request};

#[tokio::test]
async fn test_register_login_round_trip() {
    let app = create_test_app(create_test_state().await);

    let (_, token) = register_user(&app, "Ada", "ada@example.com").await;
    assert!(!token.is_empty());

    // Same credentials log in
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "correct-horse-battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");

    // Wrong password is a 401 with a uniform message
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_weak_input() {
    let app = create_test_app(create_test_state().await);

    register_user(&app, "Ada", "ada@example.com").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Imposter", "email": "ada@example.com", "password": "long-enough-pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Shorty", "email": "short@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "NoAt", "email": "not-an-email", "password": "long-enough-pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_test_app(create_test_state().await);

    let (status, body) = request(&app, "GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access token required");

    let (status, body) = request(&app, "GET", "/api/users/me", Some("bogus-token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_current_user_profile_update() {
    let app = create_test_app(create_test_state().await);
    let (user_id, token) = register_user(&app, "Ada", "ada@example.com").await;

    let (status, body) = request(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["role"], "member");

    let (status, body) = request(
        &app,
        "PUT",
        "/api/users/me",
        Some(&token),
        Some(json!({ "name": "Ada Lovelace" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada Lovelace");

    // Empty update is a 400
    let (status, _) = request(&app, "PUT", "/api/users/me", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_team_membership_flow() {
    let app = create_test_app(create_test_state().await);
    let (owner_id, owner_token, team_id) =
        register_with_team(&app, "Ada", "ada@example.com").await;
    let (bob_id, bob_token) = register_user(&app, "Bob", "bob@example.com").await;

    // The creator became a member with the owner role
    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/members"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["user_id"], owner_id.as_str());
    assert_eq!(body[0]["role"], "owner");

    // Outsiders cannot see the roster
    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/members"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Add Bob, then adding him again conflicts
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/teams/{team_id}/members"),
        Some(&owner_token),
        Some(json!({ "user_id": bob_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/teams/{team_id}/members"),
        Some(&owner_token),
        Some(json!({ "user_id": bob_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User is already a team member");

    // Bob now sees the team in his listing, members ordered by name
    let (status, body) = request(&app, "GET", "/api/teams", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let teams = body.as_array().unwrap();
    assert_eq!(teams.len(), 1);
    let members = teams[0]["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["user"]["name"], "Ada");
    assert_eq!(members[1]["user"]["name"], "Bob");
}

#[tokio::test]
async fn test_project_crud() {
    let app = create_test_app(create_test_state().await);
    let (_, token, team_id) = register_with_team(&app, "Ada", "ada@example.com").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({ "name": "Apollo", "team_id": team_id, "description": "Moonshot" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["status"], "active");
    assert_eq!(body["progress"], 0);
    assert_eq!(body["task_count"], 0);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/projects/{project_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Apollo");

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/projects/{project_id}"),
        Some(&token),
        Some(json!({ "status": "on-hold" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "on-hold");
    // Untouched fields survive a partial update
    assert_eq!(body["description"], "Moonshot");

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/projects?team_id={team_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/projects/{project_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/projects/{project_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_access_is_team_scoped() {
    let app = create_test_app(create_test_state().await);
    let (_, ada_token, team_id) = register_with_team(&app, "Ada", "ada@example.com").await;
    let (_, eve_token) = register_user(&app, "Eve", "eve@example.com").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/projects",
        Some(&ada_token),
        Some(json!({ "name": "Apollo", "team_id": team_id })),
    )
    .await;
    let project_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/projects/{project_id}"),
        Some(&eve_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "No access to this project");
}

#[tokio::test]
async fn test_task_lifecycle_updates_project_counters() {
    let app = create_test_app(create_test_state().await);
    let (user_id, token, team_id) = register_with_team(&app, "Ada", "ada@example.com").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({ "name": "Apollo", "team_id": team_id })),
    )
    .await;
    let project_id = body["id"].as_str().unwrap().to_string();

    // Two tasks with defaults
    let mut task_ids = Vec::new();
    for title in ["Design", "Build"] {
        let (status, body) = request(
            &app,
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({
                "title": title,
                "project_id": project_id,
                "assignee_id": user_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "backlog");
        assert_eq!(body["priority"], "medium");
        assert_eq!(body["is_overdue"], false);
        assert_eq!(body["assignee"]["id"], user_id.as_str());
        task_ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/projects/{project_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["task_count"], 2);
    assert_eq!(body["completed_task_count"], 0);
    assert_eq!(body["progress"], 0);

    // Completing one of two tasks brings progress to 50
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/tasks/{}/status", task_ids[0]),
        Some(&token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/projects/{project_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["completed_task_count"], 1);
    assert_eq!(body["progress"], 50);

    // Deleting the open task leaves a fully complete project
    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/tasks/{}", task_ids[1]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/projects/{project_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["task_count"], 1);
    assert_eq!(body["progress"], 100);
}

#[tokio::test]
async fn test_overdue_flag_is_derived_from_due_date() {
    let app = create_test_app(create_test_state().await);
    let (_, token, team_id) = register_with_team(&app, "Ada", "ada@example.com").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({ "name": "Apollo", "team_id": team_id })),
    )
    .await;
    let project_id = body["id"].as_str().unwrap().to_string();

    let yesterday = chrono::Utc::now() - chrono::Duration::days(1);
    let (status, body) = request(
        &app,
        "POST",
        "/api/tasks",
        Some(&token),
        Some(json!({
            "title": "Late already",
            "project_id": project_id,
            "due_date": yesterday.to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_overdue"], true);
    let task_id = body["id"].as_str().unwrap().to_string();

    // Done tasks are never overdue
    let (_, body) = request(
        &app,
        "PATCH",
        &format!("/api/tasks/{task_id}/status"),
        Some(&token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(body["is_overdue"], false);
}
