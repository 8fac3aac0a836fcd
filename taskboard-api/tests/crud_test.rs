/// Integration tests for the Taskboard API
///
/// These tests drive the real router against a live Postgres (env-configured)
/// and verify the externally observable contract:
/// - registration and the write-only password
/// - token issuance and bearer authentication
/// - CRUD status codes and per-field validation bodies
/// - cascade/nullify delete propagation
/// - filtered listings and scoped creation

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::{json, Value};
use taskboard_shared::models::membership::{CreateProjectMember, MemberRole, ProjectMember};
use taskboard_shared::models::user::User;

/// Valid task creation body pointed at a project
fn task_body(project: i64) -> Value {
    json!({
        "title": "Write the report",
        "description": "Quarterly numbers",
        "status": "To Do",
        "priority": "Medium",
        "project": project,
        "due_date": "2030-07-01T12:00:00Z",
    })
}

/// Creates a project through the API and returns its id
async fn create_project(ctx: &TestContext, token: &str, name: &str) -> i64 {
    let (status, body) = ctx
        .send(
            "POST",
            "/projects/",
            Some(token),
            Some(json!({"name": name, "description": "d"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "project creation failed: {}", body);
    body["id"].as_i64().unwrap()
}

/// Creates a task through the API and returns its id
async fn create_task(ctx: &TestContext, token: &str, body: Value) -> i64 {
    let (status, body) = ctx.send("POST", "/tasks/", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "task creation failed: {}", body);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_register_hides_password_everywhere() {
    let ctx = TestContext::new().await.unwrap();
    let username = common::unique_name("reg");

    let (status, body) = ctx
        .send(
            "POST",
            "/users/register/",
            None,
            Some(json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "p@ss",
                "first_name": "Ada",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], json!(username));
    assert_eq!(body["first_name"], json!("Ada"));
    assert_eq!(body["last_name"], json!(""));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    assert!(!body.to_string().contains("p@ss"));

    let id = body["id"].as_i64().unwrap();

    // Retrieve
    let (status, body) = ctx
        .send("GET", &format!("/users/{}/", id), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("password").is_none());
    assert!(!body.to_string().contains("p@ss"));

    // List
    let (status, body) = ctx.send("GET", "/users/", Some(ctx.token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.to_string().contains("p@ss"));
    assert!(!body.to_string().contains("argon2"));

    User::delete(&ctx.db, id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_register_duplicate_username_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let username = common::unique_name("dup");

    let body = json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "p@ss",
    });

    let (status, _) = ctx
        .send("POST", "/users/register/", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, errors) = ctx.send("POST", "/users/register/", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(errors["username"][0]
        .as_str()
        .unwrap()
        .contains("already exists"));

    let user = User::find_by_username(&ctx.db, &username).await.unwrap().unwrap();
    User::delete(&ctx.db, user.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_register_missing_fields_name_every_field() {
    let ctx = TestContext::new().await.unwrap();

    let (status, errors) = ctx
        .send("POST", "/users/register/", None, Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["username", "email", "password"] {
        assert_eq!(
            errors[field][0],
            json!("This field is required."),
            "missing error for {}",
            field
        );
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_token_flow() {
    let ctx = TestContext::new().await.unwrap();
    let username = common::unique_name("login");
    let user = common::create_user(&ctx.db, &username, "S3cret-pass").await.unwrap();

    // Wrong password
    let (status, _) = ctx
        .send(
            "POST",
            "/auth/token/",
            None,
            Some(json!({"username": username, "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Right password
    let (status, body) = ctx
        .send(
            "POST",
            "/auth/token/",
            None,
            Some(json!({"username": username, "password": "S3cret-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().unwrap().to_string();
    let refresh = body["refresh"].as_str().unwrap().to_string();

    // Access token authenticates
    let (status, _) = ctx.send("GET", "/users/", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);

    // Refresh token does not authenticate API requests
    let (status, _) = ctx.send("GET", "/users/", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Refresh yields a fresh, working access token
    let (status, body) = ctx
        .send(
            "POST",
            "/auth/token/refresh/",
            None,
            Some(json!({"refresh": refresh})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["access"].as_str().unwrap();
    let (status, _) = ctx.send("GET", "/users/", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);

    User::delete(&ctx.db, user.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    for uri in ["/users/", "/projects/", "/tasks/", "/comments/"] {
        let (status, _) = ctx.send("GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "no 401 for {}", uri);
    }

    // Registration and health stay public
    let (status, _) = ctx.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_project_create_sets_owner_and_anyone_can_patch() {
    let ctx = TestContext::new().await.unwrap();
    let user_b = common::create_user(&ctx.db, &common::unique_name("b"), "p@ss").await.unwrap();
    let token_b = ctx.token_for(&user_b);

    // Owner in the body is ignored; the caller becomes owner
    let (status, body) = ctx
        .send(
            "POST",
            "/projects/",
            Some(ctx.token()),
            Some(json!({"name": "X", "description": "d", "owner": 999999})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner"], json!(ctx.user.id));
    assert_eq!(body["name"], json!("X"));
    let project_id = body["id"].as_i64().unwrap();

    // A different authenticated user may rename it (no ownership check)
    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/projects/{}/", project_id),
            Some(&token_b),
            Some(json!({"name": "Y"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Y"));
    assert_eq!(body["owner"], json!(ctx.user.id));

    User::delete(&ctx.db, user_b.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_task_choice_sets_are_enforced() {
    let ctx = TestContext::new().await.unwrap();
    let project = create_project(&ctx, ctx.token(), "choices").await;

    // Every enumerated combination is accepted
    for status_choice in ["To Do", "In Progress", "Done"] {
        for priority_choice in ["Low", "Medium", "High"] {
            let mut body = task_body(project);
            body["status"] = json!(status_choice);
            body["priority"] = json!(priority_choice);

            let (status, body) = ctx.send("POST", "/tasks/", Some(ctx.token()), Some(body)).await;
            assert_eq!(status, StatusCode::CREATED, "rejected valid body: {}", body);
            assert_eq!(body["status"], json!(status_choice));
            assert_eq!(body["priority"], json!(priority_choice));
        }
    }

    // Anything else is rejected naming the field
    let mut bad = task_body(project);
    bad["status"] = json!("Blocked");
    let (status, errors) = ctx.send("POST", "/tasks/", Some(ctx.token()), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = errors["status"][0].as_str().unwrap();
    assert!(message.contains("not a valid choice"));
    assert!(message.contains("To Do, In Progress, Done"));

    let mut bad = task_body(project);
    bad["priority"] = json!("Urgent");
    let (status, errors) = ctx.send("POST", "/tasks/", Some(ctx.token()), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(errors["priority"][0].as_str().unwrap().contains("Low, Medium, High"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_task_list_filtered_by_project() {
    let ctx = TestContext::new().await.unwrap();
    let p1 = create_project(&ctx, ctx.token(), "p1").await;
    let p2 = create_project(&ctx, ctx.token(), "p2").await;

    let t1 = create_task(&ctx, ctx.token(), task_body(p1)).await;
    let t2 = create_task(&ctx, ctx.token(), task_body(p1)).await;
    let _other = create_task(&ctx, ctx.token(), task_body(p2)).await;

    let (status, body) = ctx
        .send(
            "GET",
            &format!("/tasks/?project_id={}", p1),
            Some(ctx.token()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    let ids: Vec<i64> = tasks.iter().map(|t| t["id"].as_i64().unwrap()).collect();

    // Exactly the tasks of p1, in insertion order
    assert_eq!(ids, vec![t1, t2]);
    for task in tasks {
        assert_eq!(task["project"], json!(p1));
    }

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_scoped_task_create() {
    let ctx = TestContext::new().await.unwrap();
    let p1 = create_project(&ctx, ctx.token(), "scoped").await;
    let p2 = create_project(&ctx, ctx.token(), "other").await;

    // Missing scoping project answers with the custom payload
    let (status, body) = ctx
        .send(
            "POST",
            "/projects/999999/tasks/",
            Some(ctx.token()),
            Some(task_body(p1)),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Project does not exist."}));

    // Validation failures win over the scoping check
    let (status, errors) = ctx
        .send(
            "POST",
            "/projects/999999/tasks/",
            Some(ctx.token()),
            Some(json!({"title": "t"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(errors.get("description").is_some());

    // The path id overrides the body's project
    let (status, body) = ctx
        .send(
            "POST",
            &format!("/projects/{}/tasks/", p1),
            Some(ctx.token()),
            Some(task_body(p2)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["project"], json!(p1));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_scoped_comment_create() {
    let ctx = TestContext::new().await.unwrap();
    let project = create_project(&ctx, ctx.token(), "comments").await;
    let task = create_task(&ctx, ctx.token(), task_body(project)).await;

    // Missing scoping task answers with the custom payload
    let (status, body) = ctx
        .send(
            "POST",
            "/tasks/999999/comments/",
            Some(ctx.token()),
            Some(json!({"content": "hi", "user": ctx.user.id, "task": task})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Task does not exist."}));

    // Scoped creation lands on the path task
    let (status, body) = ctx
        .send(
            "POST",
            &format!("/tasks/{}/comments/", task),
            Some(ctx.token()),
            Some(json!({"content": "hi", "user": ctx.user.id, "task": 999999})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["task"], json!(task));
    assert_eq!(body["user"], json!(ctx.user.id));

    // Filtered listing returns it
    let (status, body) = ctx
        .send(
            "GET",
            &format!("/comments/?task_id={}", task),
            Some(ctx.token()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_delete_project_cascades() {
    let ctx = TestContext::new().await.unwrap();
    let member = common::create_user(&ctx.db, &common::unique_name("member"), "p@ss").await.unwrap();
    let project = create_project(&ctx, ctx.token(), "cascade").await;

    // Membership rows are store-only; write them directly
    ProjectMember::create(
        &ctx.db,
        CreateProjectMember {
            project_id: project,
            user_id: member.id,
            role: MemberRole::Admin,
        },
    )
    .await
    .unwrap();

    let task = create_task(&ctx, ctx.token(), task_body(project)).await;
    let (_, comment) = ctx
        .send(
            "POST",
            "/comments/",
            Some(ctx.token()),
            Some(json!({"content": "c", "user": member.id, "task": task})),
        )
        .await;
    let comment = comment["id"].as_i64().unwrap();

    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/projects/{}/", project),
            Some(ctx.token()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Tasks, membership rows, and comments are gone
    let (status, _) = ctx
        .send("GET", &format!("/tasks/{}/", task), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let members = ProjectMember::list_by_project(&ctx.db, project).await.unwrap();
    assert!(members.is_empty());

    let (status, _) = ctx
        .send("GET", &format!("/comments/{}/", comment), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    User::delete(&ctx.db, member.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_delete_user_nullifies_assignment_and_removes_owned_projects() {
    let ctx = TestContext::new().await.unwrap();
    let victim = common::create_user(&ctx.db, &common::unique_name("victim"), "p@ss").await.unwrap();
    let victim_token = ctx.token_for(&victim);

    // Victim owns a project; a task in the fixture user's project is
    // assigned to the victim
    let owned = create_project(&ctx, &victim_token, "owned").await;
    let survivor_project = create_project(&ctx, ctx.token(), "survivor").await;

    let mut body = task_body(survivor_project);
    body["assigned_to"] = json!(victim.id);
    let task = create_task(&ctx, ctx.token(), body).await;

    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/users/{}/", victim.id),
            Some(ctx.token()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The task survives unassigned
    let (status, body) = ctx
        .send("GET", &format!("/tasks/{}/", task), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_to"], json!(null));

    // The owned project is gone
    let (status, _) = ctx
        .send("GET", &format!("/projects/{}/", owned), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_task_partial_update() {
    let ctx = TestContext::new().await.unwrap();
    let project = create_project(&ctx, ctx.token(), "partial").await;
    let task = create_task(&ctx, ctx.token(), task_body(project)).await;

    // PATCH with a subset keeps omitted fields
    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/tasks/{}/", task),
            Some(ctx.token()),
            Some(json!({"status": "Done"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("Done"));
    assert_eq!(body["title"], json!("Write the report"));
    assert_eq!(body["priority"], json!("Medium"));

    // PUT behaves the same way
    let (status, body) = ctx
        .send(
            "PUT",
            &format!("/tasks/{}/", task),
            Some(ctx.token()),
            Some(json!({"priority": "High"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priority"], json!("High"));
    assert_eq!(body["status"], json!("Done"));

    // Explicit null clears the assignee; reassignment works
    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/tasks/{}/", task),
            Some(ctx.token()),
            Some(json!({"assigned_to": ctx.user.id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_to"], json!(ctx.user.id));

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/tasks/{}/", task),
            Some(ctx.token()),
            Some(json!({"assigned_to": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_to"], json!(null));

    // Bad values on update validate like creation
    let (status, errors) = ctx
        .send(
            "PATCH",
            &format!("/tasks/{}/", task),
            Some(ctx.token()),
            Some(json!({"status": "Blocked"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(errors.get("status").is_some());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_dangling_reference_rejected_per_field() {
    let ctx = TestContext::new().await.unwrap();
    let project = create_project(&ctx, ctx.token(), "dangling").await;

    let mut body = task_body(project);
    body["assigned_to"] = json!(999999);

    let (status, errors) = ctx.send("POST", "/tasks/", Some(ctx.token()), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(errors["assigned_to"][0]
        .as_str()
        .unwrap()
        .contains("does not exist"));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_destroy_and_missing_ids() {
    let ctx = TestContext::new().await.unwrap();
    let project = create_project(&ctx, ctx.token(), "destroy").await;
    let task = create_task(&ctx, ctx.token(), task_body(project)).await;

    let (status, body) = ctx
        .send("DELETE", &format!("/tasks/{}/", task), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    // Gone means 404 with an empty body, for every operation
    let (status, body) = ctx
        .send("GET", &format!("/tasks/{}/", task), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);

    let (status, _) = ctx
        .send("DELETE", &format!("/tasks/{}/", task), Some(ctx.token()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/tasks/{}/", task),
            Some(ctx.token()),
            Some(json!({"title": "x"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_user_update() {
    let ctx = TestContext::new().await.unwrap();
    let user = common::create_user(&ctx.db, &common::unique_name("upd"), "p@ss").await.unwrap();

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/users/{}/", user.id),
            Some(ctx.token()),
            Some(json!({"first_name": "Grace"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], json!("Grace"));
    assert_eq!(body["username"], json!(user.username));

    // date_joined is immutable; a write attempt is silently ignored
    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/users/{}/", user.id),
            Some(ctx.token()),
            Some(json!({"date_joined": "2001-01-01T00:00:00Z"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date_joined"], serde_json::to_value(user.date_joined).unwrap());

    let (status, _) = ctx
        .send(
            "PATCH",
            "/users/999999/",
            Some(ctx.token()),
            Some(json!({"first_name": "x"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    User::delete(&ctx.db, user.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_trailing_slash_forms_are_equivalent() {
    let ctx = TestContext::new().await.unwrap();

    let (with_slash, _) = ctx.send("GET", "/projects/", Some(ctx.token()), None).await;
    let (without_slash, _) = ctx.send("GET", "/projects", Some(ctx.token()), None).await;

    assert_eq!(with_slash, StatusCode::OK);
    assert_eq!(without_slash, StatusCode::OK);

    ctx.cleanup().await.unwrap();
}
