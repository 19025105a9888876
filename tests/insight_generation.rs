// tests/insight_generation.rs
// Rule-engine behavior against a real (in-memory) database, plus the HTTP
// generation surface.


use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

use teamdeck::insights::InsightEngine;
use teamdeck::projects::types::{CreateProjectRequest, ProjectStatus, UpdateProjectRequest};
use teamdeck::tasks::types::CreateTaskRequest;
use teamdeck::{AppState, TeamdeckError};

use test_helpers::{create_test_app, create_test_state, register_with_team, request};

/// Create a team + project directly through the stores; returns project id.
async fn seed_project(state: &AppState, name: &str) -> String {
    let team = state
        .team_store
        .create(format!("{name} team"), None, &seed_user(state, name).await)
        .await
        .expect("create team");

    let project = state
        .project_store
        .create(CreateProjectRequest {
            name: name.to_string(),
            description: None,
            team_id: team.id,
            status: None,
            due_date: None,
        })
        .await
        .expect("create project");

    project.id
}

async fn seed_user(state: &AppState, name: &str) -> String {
    let response = state
        .auth_service
        .register(teamdeck::auth::models::RegisterRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            password: "correct-horse-battery".to_string(),
            role: None,
        })
        .await
        .expect("register user");

    response.user.id
}

fn task(project_id: &str, title: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        description: None,
        project_id: project_id.to_string(),
        assignee_id: None,
        status: None,
        priority: None,
        due_date: None,
        tags: None,
    }
}

async fn backdate_project(state: &AppState, project_id: &str, days: i64) {
    let then = (chrono::Utc::now() - chrono::Duration::days(days)).naive_utc();
    sqlx::query("UPDATE projects SET updated_at = ? WHERE id = ?")
        .bind(then)
        .bind(project_id)
        .execute(&state.pool)
        .await
        .expect("backdate project");
}

#[tokio::test]
async fn test_missing_project_is_not_found_with_zero_inserts() {
    let state = create_test_state().await;

    let err = state
        .insight_engine
        .generate_for_project("no-such-project")
        .await
        .unwrap_err();
    assert!(matches!(err, TeamdeckError::NotFound(_)));

    let insights = state.insight_store.list(None).await.unwrap();
    assert!(insights.is_empty());
}

#[tokio::test]
async fn test_quiet_project_generates_nothing() {
    let state = create_test_state().await;
    let project_id = seed_project(&state, "Quiet").await;

    let insights = state
        .insight_engine
        .generate_for_project(&project_id)
        .await
        .unwrap();
    assert!(insights.is_empty());
}

#[tokio::test]
async fn test_overdue_tasks_generate_a_risk() {
    let state = create_test_state().await;
    let project_id = seed_project(&state, "Slipping").await;

    let yesterday = chrono::Utc::now() - chrono::Duration::days(1);
    let mut req = task(&project_id, "Late");
    req.due_date = Some(yesterday);
    // One completed task so the zero-progress rule stays quiet
    let mut done = task(&project_id, "Done");
    done.status = Some(teamdeck::tasks::TaskStatus::Done);
    state.task_store.create(req).await.unwrap();
    state.task_store.create(done).await.unwrap();

    let insights = state
        .insight_engine
        .generate_for_project(&project_id)
        .await
        .unwrap();

    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, teamdeck::insights::InsightType::Risk);
    assert_eq!(
        insights[0].severity,
        teamdeck::insights::InsightSeverity::Medium
    );
    assert_eq!(
        insights[0].description,
        "1 task is overdue. This may impact project deadlines."
    );
}

#[tokio::test]
async fn test_stale_on_hold_project_generates_a_suggestion() {
    let state = create_test_state().await;
    let project_id = seed_project(&state, "Parked").await;

    state
        .project_store
        .update(
            &project_id,
            UpdateProjectRequest {
                name: None,
                description: None,
                status: Some(ProjectStatus::OnHold),
                due_date: None,
            },
        )
        .await
        .unwrap();
    backdate_project(&state, &project_id, 6).await;

    let insights = state
        .insight_engine
        .generate_for_project(&project_id)
        .await
        .unwrap();

    assert_eq!(insights.len(), 1);
    assert_eq!(
        insights[0].kind,
        teamdeck::insights::InsightType::Suggestion
    );
    assert!(insights[0].description.contains("on hold for 6 days"));

    // At exactly five days nothing fires
    let fresh = seed_project(&state, "Barely parked").await;
    state
        .project_store
        .update(
            &fresh,
            UpdateProjectRequest {
                name: None,
                description: None,
                status: Some(ProjectStatus::OnHold),
                due_date: None,
            },
        )
        .await
        .unwrap();
    backdate_project(&state, &fresh, 5).await;

    let insights = state.insight_engine.generate_for_project(&fresh).await.unwrap();
    assert!(insights.is_empty());
}

#[tokio::test]
async fn test_multiple_rules_fire_in_fixed_order() {
    let state = create_test_state().await;
    let project_id = seed_project(&state, "Troubled").await;

    // Five open tasks, four of them overdue: overdue risk at high
    // severity plus the zero-progress risk.
    let yesterday = chrono::Utc::now() - chrono::Duration::days(1);
    for i in 0..5 {
        let mut req = task(&project_id, &format!("Task {i}"));
        if i < 4 {
            req.due_date = Some(yesterday);
        }
        state.task_store.create(req).await.unwrap();
    }

    // Park the project long enough for the stale rule too
    state
        .project_store
        .update(
            &project_id,
            UpdateProjectRequest {
                name: None,
                description: None,
                status: Some(ProjectStatus::OnHold),
                due_date: None,
            },
        )
        .await
        .unwrap();
    backdate_project(&state, &project_id, 10).await;

    let insights = state
        .insight_engine
        .generate_for_project(&project_id)
        .await
        .unwrap();

    let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Overdue Tasks Detected",
            "Consider Resuming Project",
            "No Completed Tasks",
        ]
    );
    assert_eq!(
        insights[0].severity,
        teamdeck::insights::InsightSeverity::High
    );
    assert_eq!(
        insights[0].description,
        "4 tasks are overdue. This may impact project deadlines."
    );

    // Everything was persisted
    let stored = state.insight_store.list(Some(&project_id)).await.unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn test_near_completion_fires_for_active_projects() {
    let state = create_test_state().await;
    let project_id = seed_project(&state, "Almost there").await;

    // Four of five tasks done: derived progress is exactly 80
    for i in 0..5 {
        let mut req = task(&project_id, &format!("Task {i}"));
        if i < 4 {
            req.status = Some(teamdeck::tasks::TaskStatus::Done);
        }
        state.task_store.create(req).await.unwrap();
    }

    let insights = state
        .insight_engine
        .generate_for_project(&project_id)
        .await
        .unwrap();

    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].title, "Project Nearing Completion");
    assert_eq!(
        insights[0].description,
        "Almost there is 80% complete and on track."
    );
}

#[tokio::test]
async fn test_rerunning_generation_appends_by_default() {
    let state = create_test_state().await;
    let project_id = seed_project(&state, "Repeat").await;
    state.task_store.create(task(&project_id, "Open")).await.unwrap();

    for _ in 0..2 {
        state
            .insight_engine
            .generate_for_project(&project_id)
            .await
            .unwrap();
    }

    // The zero-progress risk was recorded twice: append-only history
    let stored = state.insight_store.list(Some(&project_id)).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn test_dedupe_flag_suppresses_repeats() {
    let state = create_test_state().await;
    let project_id = seed_project(&state, "Repeat").await;
    state.task_store.create(task(&project_id, "Open")).await.unwrap();

    let engine = InsightEngine::new(
        state.project_store.clone(),
        state.task_store.clone(),
        state.insight_store.clone(),
        true,
    );

    let first = engine.generate_for_project(&project_id).await.unwrap();
    assert_eq!(first.len(), 1);

    let second = engine.generate_for_project(&project_id).await.unwrap();
    assert!(second.is_empty());

    let stored = state.insight_store.list(Some(&project_id)).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_generation_over_http() {
    let state = create_test_state().await;
    let app = create_test_app(Arc::clone(&state));
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

    let (_, _) = request(
        &app,
        "POST",
        "/api/tasks",
        Some(&token),
        Some(json!({ "title": "Open task", "project_id": project_id })),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/insights/generate/{project_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let generated = body.as_array().unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0]["type"], "risk");
    assert_eq!(generated[0]["title"], "No Completed Tasks");

    // Unknown project surfaces the engine's NotFound as a 404 and
    // performs no inserts for it.
    let (status, body) = request(
        &app,
        "POST",
        "/api/insights/generate/no-such-project",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");

    let (_, body) = request(
        &app,
        "GET",
        "/api/insights?project_id=no-such-project",
        Some(&token),
        None,
    )
    .await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_manual_insight_crud_over_http() {
    let state = create_test_state().await;
    let app = create_test_app(Arc::clone(&state));
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

    let (status, body) = request(
        &app,
        "POST",
        "/api/insights",
        Some(&token),
        Some(json!({
            "project_id": project_id,
            "type": "suggestion",
            "severity": "low",
            "title": "Add a second reviewer",
            "description": "Review latency is creeping up.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let insight_id = body["id"].as_str().unwrap().to_string();

    // Unknown enum values are rejected at deserialization
    let (status, _) = request(
        &app,
        "POST",
        "/api/insights",
        Some(&token),
        Some(json!({
            "project_id": project_id,
            "type": "catastrophe",
            "severity": "low",
            "title": "Nope",
            "description": "Nope.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/insights/{insight_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/insights/{insight_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
