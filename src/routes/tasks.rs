use crate::{
    access::{can_access, list_scope},
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
    store::TaskStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

/// Loads a task and applies the ownership rule.
///
/// Absence is checked first, so a caller probing someone else's task gets
/// `403`, and only a truly missing id gets `404`.
async fn load_accessible(
    store: &dyn TaskStore,
    id: Uuid,
    caller: &AuthenticatedUser,
) -> Result<Task, AppError> {
    let task = store
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if !can_access(caller.role, caller.id, task.owner_id) {
        log::info!("user {} denied access to task {}", caller.id, task.id);
        return Err(AppError::Forbidden("Not allowed".into()));
    }
    Ok(task)
}

/// Lists tasks visible to the caller, newest first.
///
/// Admins see every task; everyone else sees only their own.
///
/// ## Responses:
/// - `200 OK`: `{tasks: [...]}`.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    store: web::Data<dyn TaskStore>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = store.list(list_scope(&caller)).await?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Creates a new task owned by the caller.
///
/// The owner always comes from the token, never from the body.
///
/// ## Request Body:
/// - `title`: required, non-blank.
/// - `description` (optional).
///
/// ## Responses:
/// - `201 Created`: `{message, task}`.
/// - `400 Bad Request`: missing or blank title.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn TaskStore>,
    caller: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let input = task_data.into_inner();
    let title = input.title.unwrap_or_default();
    let task = store
        .insert(Task::new(&title, input.description, caller.id))
        .await?;
    log::info!("user {} created task {}", caller.id, task.id);

    Ok(HttpResponse::Created().json(json!({ "message": "Task created", "task": task })))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: `{task}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the task belongs to someone else and the caller is not an admin.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn TaskStore>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = load_accessible(store.get_ref(), task_id.into_inner(), &caller).await?;
    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Partially updates a task.
///
/// Any subset of `title`, `description` and `completed` may be sent. A
/// present-but-blank title is rejected; an omitted one is left unchanged.
/// `"description": null` clears the description.
///
/// The body is only read as loose JSON up front; its shape is checked after
/// existence and ownership, so a bad body never masks a 404 or 403.
///
/// ## Responses:
/// - `200 OK`: `{message, task}`.
/// - `400 Bad Request`: blank title or wrongly typed field.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: not the owner and not an admin.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn TaskStore>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    body: web::Json<Value>,
) -> Result<impl Responder, AppError> {
    let mut task = load_accessible(store.get_ref(), task_id.into_inner(), &caller).await?;

    let update: TaskUpdate = serde_json::from_value(body.into_inner())
        .map_err(|e| AppError::validation(format!("Invalid JSON payload: {}", e)))?;
    update.validate()?;

    task.apply(update);
    let task = store
        .update(&task)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated", "task": task })))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `200 OK`: `{message}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: not the owner and not an admin.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn TaskStore>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = load_accessible(store.get_ref(), task_id.into_inner(), &caller).await?;

    if !store.delete(task.id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }
    log::info!("user {} deleted task {}", caller.id, task.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
