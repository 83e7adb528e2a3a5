use crate::domain;
use derive_more::Display;
use validator::Validate;

/// Form for creating or editing a task
#[derive(Clone, Debug, Display, Validate)]
#[display("{name}")]
pub struct TaskForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub status: bool,
}

impl From<TaskForm> for domain::task::TaskContent {
    fn from(value: TaskForm) -> Self {
        domain::task::TaskContent {
            name: value.name,
            description: value.description,
            status: value.status,
        }
    }
}

/// One line of the task listing
#[derive(Debug, Display)]
#[display("[{}] {name} - {description} ({id})", if *status { "x" } else { " " })]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: bool,
}

impl From<&domain::task::Task> for TaskRow {
    fn from(value: &domain::task::Task) -> Self {
        TaskRow {
            id: value.id.to_string(),
            name: value.name.clone(),
            description: value.description.clone(),
            status: value.status,
        }
    }
}
