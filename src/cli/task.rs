use crate::cli::Notice;
use crate::domain;
use crate::domain::task::{TaskId, TaskList, TaskStore};
use crate::dto::task::{TaskForm, TaskRow};
use crate::external_connections::ExternalConnectivity;
use crate::gateway::http_task_driven_ports::{HttpTaskReader, HttpTaskWriter};
use tracing::{error, info};
use validator::Validate;

pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet. Create one to get started!";
const MISSING_TASK: &str = "That task no longer exists.";

/// Renders the task list one row per task
pub fn render_task_list(tasks: &TaskList) -> String {
    if tasks.is_empty() {
        return EMPTY_LIST_MESSAGE.to_owned();
    }

    tasks
        .tasks()
        .iter()
        .map(|task| TaskRow::from(task).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fetches the latest tasks from the backend and lists them
pub async fn list_tasks(
    store: &TaskStore,
    ext_cxn: &impl ExternalConnectivity,
    task_service: &impl domain::task::driving_ports::TaskPort,
) -> Notice {
    info!("Refreshing tasks");
    let task_read = HttpTaskReader;

    match task_service.refresh_tasks(store, ext_cxn, &task_read).await {
        Ok(tasks) => Notice::success(
            format!("{} task(s)", tasks.len()),
            render_task_list(&tasks),
        ),
        Err(err) => {
            error!("Failed to fetch tasks: {err}");
            Notice::from_error_or_missing("Could not load tasks", &err, MISSING_TASK)
        }
    }
}

/// Creates a task
pub async fn add_task(
    form: TaskForm,
    store: &TaskStore,
    ext_cxn: &impl ExternalConnectivity,
    task_service: &impl domain::task::driving_ports::TaskPort,
) -> Notice {
    info!("Creating task {form}");
    if let Err(validation_errors) = form.validate() {
        return Notice::from_error("Could not create task", &validation_errors.into());
    }

    let content = domain::task::TaskContent::from(form);
    let task_write = HttpTaskWriter;

    match task_service
        .create_task(&content, store, ext_cxn, &task_write)
        .await
    {
        Ok(task) => Notice::success("Task created", TaskRow::from(&task).to_string()),
        Err(err) => {
            error!("Failed to create task: {err}");
            Notice::from_error_or_missing("Could not create task", &err, MISSING_TASK)
        }
    }
}

/// Replaces a task's name, description and completion flag
pub async fn edit_task(
    id: TaskId,
    form: TaskForm,
    store: &TaskStore,
    ext_cxn: &impl ExternalConnectivity,
    task_service: &impl domain::task::driving_ports::TaskPort,
) -> Notice {
    info!("Editing task {id}");
    if let Err(validation_errors) = form.validate() {
        return Notice::from_error("Could not update task", &validation_errors.into());
    }

    let content = domain::task::TaskContent::from(form);
    let task_write = HttpTaskWriter;

    match task_service
        .edit_task(&id, &content, store, ext_cxn, &task_write)
        .await
    {
        Ok(task) => Notice::success("Task updated", TaskRow::from(&task).to_string()),
        Err(err) => {
            error!("Failed to update task {id}: {err}");
            Notice::from_error_or_missing("Could not update task", &err, MISSING_TASK)
        }
    }
}

/// Flips a task between done and not done
pub async fn toggle_task(
    id: TaskId,
    store: &TaskStore,
    ext_cxn: &impl ExternalConnectivity,
    task_service: &impl domain::task::driving_ports::TaskPort,
) -> Notice {
    info!("Toggling task {id}");
    let task_write = HttpTaskWriter;

    match task_service
        .toggle_task(&id, store, ext_cxn, &task_write)
        .await
    {
        Ok(task) => {
            let title = if task.status {
                "Task completed"
            } else {
                "Task reopened"
            };
            Notice::success(title, TaskRow::from(&task).to_string())
        }
        Err(err) => {
            error!("Failed to toggle task {id}: {err}");
            Notice::from_error_or_missing("Could not update task", &err, MISSING_TASK)
        }
    }
}

/// Deletes a task
pub async fn delete_task(
    id: TaskId,
    store: &TaskStore,
    ext_cxn: &impl ExternalConnectivity,
    task_service: &impl domain::task::driving_ports::TaskPort,
) -> Notice {
    info!("Deleting task {id}");
    let task_write = HttpTaskWriter;

    match task_service
        .remove_task(&id, store, ext_cxn, &task_write)
        .await
    {
        Ok(()) => Notice::success("Task deleted", ""),
        Err(err) => {
            error!("Failed to delete task {id}: {err}");
            Notice::from_error_or_missing("Could not delete task", &err, MISSING_TASK)
        }
    }
}
