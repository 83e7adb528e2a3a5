use crate::domain;
use crate::domain::DrivenPortError;
use crate::domain::task::{FetchedTask, TaskContent, TaskId};
use crate::external_connections::ExternalConnectivity;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

const TASKS_PATH: &str = "/api/tasks";
/// What the backend serializes for a task that was never assigned an ObjectId
const BLANK_OBJECT_ID: &str = "000000000000000000000000";

/// Task as the backend spells it
#[derive(Deserialize, Debug)]
struct RemoteTask {
    #[serde(rename = "_id", alias = "id", default)]
    id: Option<String>,
    #[serde(alias = "title")]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: bool,
    #[serde(alias = "createdAt", default)]
    created_at: Option<Value>,
    #[serde(alias = "updatedAt", default)]
    updated_at: Option<Value>,
}

impl RemoteTask {
    /// Translates into the client entity. Falls back to [known_id] when the backend left the
    /// identifier out, and gives up when neither is available.
    fn into_fetched(self, known_id: Option<&TaskId>) -> Option<FetchedTask> {
        let id = match self
            .id
            .filter(|id| !id.is_empty() && id != BLANK_OBJECT_ID)
        {
            Some(id) => TaskId::from(id),
            None => known_id?.clone(),
        };

        Some(FetchedTask {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
            created_at: super::parse_timestamp(self.created_at.as_ref().and_then(Value::as_str)),
            updated_at: super::parse_timestamp(self.updated_at.as_ref().and_then(Value::as_str)),
        })
    }
}

#[derive(Deserialize)]
struct TaskEnvelope {
    task: Option<RemoteTask>,
}

#[derive(Deserialize)]
struct TaskListEnvelope {
    tasks: Option<Vec<RemoteTask>>,
}

#[derive(Serialize)]
struct TaskBody<'content> {
    name: &'content str,
    description: &'content str,
    status: bool,
}

impl<'content> From<&'content TaskContent> for TaskBody<'content> {
    fn from(value: &'content TaskContent) -> Self {
        TaskBody {
            name: &value.name,
            description: &value.description,
            status: value.status,
        }
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: bool,
}

/// Address of a single task. The id travels as one percent-encoded path segment, so ids holding
/// `/`, `?` or `#` can never reach another endpoint.
fn task_url(ext_cxn: &impl ExternalConnectivity, id: &TaskId) -> Result<Url, DrivenPortError> {
    if matches!(id.as_str(), "" | "." | "..") {
        return Err(DrivenPortError::DoesNotExist);
    }

    let mut url = Url::parse(&ext_cxn.endpoint(TASKS_PATH))
        .map_err(|err| super::comms_failure(err, "trying to build a task address"))?;
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id.as_str());
    }

    Ok(url)
}

pub struct HttpTaskReader;

impl domain::task::driven_ports::TaskReader for HttpTaskReader {
    async fn list_tasks(
        &self,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Vec<FetchedTask>, DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .get(ext_cxn.endpoint(TASKS_PATH))
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to fetch the task list"))?;
        let envelope: TaskListEnvelope =
            super::decode(response, "trying to read the task list").await?;

        let fetched = envelope
            .tasks
            .unwrap_or_default()
            .into_iter()
            .filter_map(|remote| {
                let fetched = remote.into_fetched(None);
                if fetched.is_none() {
                    warn!("skipping a listed task that has no identifier");
                }
                fetched
            })
            .collect();

        Ok(fetched)
    }
}

pub struct HttpTaskWriter;

impl HttpTaskWriter {
    async fn echoed_task(
        response: reqwest::Response,
        known_id: Option<&TaskId>,
        doing: &'static str,
    ) -> Result<Option<FetchedTask>, DrivenPortError> {
        let envelope: TaskEnvelope = super::decode(response, doing).await?;
        Ok(envelope
            .task
            .and_then(|remote| remote.into_fetched(known_id)))
    }
}

impl domain::task::driven_ports::TaskWriter for HttpTaskWriter {
    async fn create_task(
        &self,
        content: &TaskContent,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<FetchedTask>, DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .post(ext_cxn.endpoint(TASKS_PATH))
            .json(&TaskBody::from(content))
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to create a task"))?;

        Self::echoed_task(response, None, "trying to read the created task").await
    }

    async fn replace_task(
        &self,
        id: &TaskId,
        content: &TaskContent,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<FetchedTask>, DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .put(task_url(ext_cxn, id)?)
            .json(&TaskBody::from(content))
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to replace a task"))?;

        Self::echoed_task(response, Some(id), "trying to read the replaced task").await
    }

    async fn set_task_status(
        &self,
        id: &TaskId,
        status: bool,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<Option<FetchedTask>, DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .patch(task_url(ext_cxn, id)?)
            .json(&StatusBody { status })
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to update a task's status"))?;

        Self::echoed_task(response, Some(id), "trying to read the patched task").await
    }

    async fn delete_task(
        &self,
        id: &TaskId,
        ext_cxn: &impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let response = ext_cxn
            .http_client()
            .delete(task_url(ext_cxn, id)?)
            .send()
            .await
            .map_err(|err| super::comms_failure(err, "trying to delete a task"))?;
        super::check_status(response).await?;

        Ok(())
    }
}
