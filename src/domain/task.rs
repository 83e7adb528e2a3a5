use crate::domain::task::driven_ports::{TaskReader, TaskWriter};
use crate::domain::{DrivenPortError, Error};
use crate::external_connections::ExternalConnectivity;
use chrono::{DateTime, Utc};
use derive_more::Display;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// Identifier of a task. Issued by the backend, or generated locally for tasks the backend
/// never echoed back.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display)]
pub struct TaskId(String);

impl TaskId {
    fn generate() -> Self {
        TaskId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        TaskId(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_owned())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Bumped on every local mutation of this task
    pub revision: u64,
}

/// A task as reported by the backend, before its timestamps are normalized
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FetchedTask {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FetchedTask {
    fn into_task(self, now: DateTime<Utc>) -> Task {
        Task {
            id: self.id,
            name: self.name,
            description: self.description,
            status: self.status,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at,
            revision: 0,
        }
    }
}

impl From<&Task> for FetchedTask {
    fn from(value: &Task) -> Self {
        FetchedTask {
            id: value.id.clone(),
            name: value.name.clone(),
            description: value.description.clone(),
            status: value.status,
            created_at: Some(value.created_at),
            updated_at: value.updated_at,
        }
    }
}

/// Fields a caller may choose when adding a task locally. The id, creation time and
/// completion flag are always assigned by the store.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewTask {
    pub name: String,
    pub description: String,
}

impl From<&TaskContent> for NewTask {
    fn from(value: &TaskContent) -> Self {
        NewTask {
            name: value.name.clone(),
            description: value.description.clone(),
        }
    }
}

/// Full set of user-editable task fields, as sent to the backend on create and replace
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TaskContent {
    pub name: String,
    pub description: String,
    pub status: bool,
}

/// A partial update. Fields left as `None` are not touched.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskChanges {
    fn merge_into(&self, task: &mut Task) {
        if let Some(ref name) = self.name {
            task.name = name.clone();
        }
        if let Some(ref description) = self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if self.updated_at.is_some() {
            task.updated_at = self.updated_at;
        }
    }
}

impl From<FetchedTask> for TaskChanges {
    fn from(value: FetchedTask) -> Self {
        TaskChanges {
            name: Some(value.name),
            description: Some(value.description),
            status: Some(value.status),
            updated_at: value.updated_at,
        }
    }
}

/// Everything that can happen to the task list
#[derive(Clone, Debug)]
pub enum TaskAction {
    Add(NewTask),
    Update { id: TaskId, changes: TaskChanges },
    Delete(TaskId),
    ToggleComplete(TaskId),
    Sync(Vec<FetchedTask>),
    Upsert(FetchedTask),
    /// Applies a backend update response, unless the task changed locally after the
    /// request was issued against revision `based_on`
    Reconcile { task: FetchedTask, based_on: u64 },
}

/// Immutable snapshot of the current user's tasks. Every action produces a new snapshot;
/// `version` increases whenever the tasks actually changed.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    version: u64,
}

impl TaskList {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn with_tasks(&self, tasks: Vec<Task>) -> TaskList {
        TaskList {
            tasks,
            version: self.version + 1,
        }
    }

    /// Runs [mutate] against the task with the given id. Returns an unchanged copy when the
    /// task isn't present.
    fn modify(&self, id: &TaskId, mutate: impl FnOnce(&mut Task)) -> TaskList {
        let Some(idx) = self.position(id) else {
            return self.clone();
        };

        let mut tasks = self.tasks.clone();
        let task = &mut tasks[idx];
        mutate(task);
        task.revision += 1;

        self.with_tasks(tasks)
    }

    pub fn apply(&self, action: TaskAction) -> TaskList {
        self.apply_at(action, Utc::now())
    }

    /// Applies [action] using [now] as the current time for new and normalized timestamps
    pub fn apply_at(&self, action: TaskAction, now: DateTime<Utc>) -> TaskList {
        match action {
            TaskAction::Add(draft) => self.add_task(draft, now),
            TaskAction::Update { id, changes } => self.update_task(&id, &changes),
            TaskAction::Delete(id) => self.delete_task(&id),
            TaskAction::ToggleComplete(id) => self.toggle_complete(&id),
            TaskAction::Sync(fetched) => self.sync_tasks(fetched, now),
            TaskAction::Upsert(fetched) => self.upsert_task(fetched, now),
            TaskAction::Reconcile { task, based_on } => self.reconcile_task(task, based_on),
        }
    }

    pub fn add_task(&self, draft: NewTask, now: DateTime<Utc>) -> TaskList {
        let id = loop {
            let candidate = TaskId::generate();
            if self.position(&candidate).is_none() {
                break candidate;
            }
        };

        let mut tasks = self.tasks.clone();
        tasks.push(Task {
            id,
            name: draft.name,
            description: draft.description,
            status: false,
            created_at: now,
            updated_at: None,
            revision: 0,
        });

        self.with_tasks(tasks)
    }

    pub fn update_task(&self, id: &TaskId, changes: &TaskChanges) -> TaskList {
        self.modify(id, |task| changes.merge_into(task))
    }

    pub fn delete_task(&self, id: &TaskId) -> TaskList {
        let Some(idx) = self.position(id) else {
            return self.clone();
        };

        let mut tasks = self.tasks.clone();
        tasks.remove(idx);
        self.with_tasks(tasks)
    }

    pub fn toggle_complete(&self, id: &TaskId) -> TaskList {
        self.modify(id, |task| task.status = !task.status)
    }

    /// Replaces the whole collection. Tasks without a creation time get [now]; a repeated id
    /// keeps its first occurrence. A task that was already known moves past its previous
    /// revision, so updates issued before the sync can no longer reconcile.
    pub fn sync_tasks(&self, fetched: Vec<FetchedTask>, now: DateTime<Utc>) -> TaskList {
        let mut seen = HashSet::new();
        let tasks = fetched
            .into_iter()
            .filter(|task| {
                let first_sighting = seen.insert(task.id.clone());
                if !first_sighting {
                    warn!(task_id = %task.id, "dropping duplicate task from sync");
                }
                first_sighting
            })
            .map(|fetched| {
                let mut task = fetched.into_task(now);
                if let Some(prior) = self.find(&task.id) {
                    task.revision = prior.revision + 1;
                }
                task
            })
            .collect();

        self.with_tasks(tasks)
    }

    pub fn upsert_task(&self, fetched: FetchedTask, now: DateTime<Utc>) -> TaskList {
        if self.position(&fetched.id).is_some() {
            let id = fetched.id.clone();
            let changes = TaskChanges::from(fetched);
            return self.update_task(&id, &changes);
        }

        let mut tasks = self.tasks.clone();
        tasks.push(fetched.into_task(now));
        self.with_tasks(tasks)
    }

    pub fn reconcile_task(&self, fetched: FetchedTask, based_on: u64) -> TaskList {
        let Some(current) = self.find(&fetched.id) else {
            info!(task_id = %fetched.id, "task was removed before its update completed");
            return self.clone();
        };
        if current.revision != based_on {
            warn!(
                task_id = %fetched.id,
                based_on,
                current_revision = current.revision,
                "ignoring stale task update"
            );
            return self.clone();
        }

        let id = fetched.id.clone();
        self.update_task(&id, &TaskChanges::from(fetched))
    }
}

/// Handle to the current [TaskList]. Readers get cheap snapshots; writers go through
/// [TaskStore::dispatch].
#[derive(Default)]
pub struct TaskStore {
    current: RwLock<Arc<TaskList>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<TaskList> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Applies [action] to the current list and returns the resulting snapshot
    pub fn dispatch(&self, action: TaskAction) -> Arc<TaskList> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(current.apply(action));
        *current = Arc::clone(&next);

        next
    }
}

pub mod driven_ports {
    use super::*;

    pub trait TaskReader {
        async fn list_tasks(
            &self,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Vec<FetchedTask>, DrivenPortError>;
    }

    /// Writes tasks to the backend. Update operations return `None` when the backend
    /// acknowledged the change without echoing the task back.
    pub trait TaskWriter {
        async fn create_task(
            &self,
            content: &TaskContent,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<FetchedTask>, DrivenPortError>;

        async fn replace_task(
            &self,
            id: &TaskId,
            content: &TaskContent,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<FetchedTask>, DrivenPortError>;

        async fn set_task_status(
            &self,
            id: &TaskId,
            status: bool,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<Option<FetchedTask>, DrivenPortError>;

        async fn delete_task(
            &self,
            id: &TaskId,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait TaskPort {
        async fn refresh_tasks(
            &self,
            store: &TaskStore,
            ext_cxn: &impl ExternalConnectivity,
            task_read: &impl driven_ports::TaskReader,
        ) -> Result<Arc<TaskList>, Error>;
        async fn create_task(
            &self,
            content: &TaskContent,
            store: &TaskStore,
            ext_cxn: &impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<Task, Error>;
        async fn edit_task(
            &self,
            id: &TaskId,
            content: &TaskContent,
            store: &TaskStore,
            ext_cxn: &impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<Task, Error>;
        async fn toggle_task(
            &self,
            id: &TaskId,
            store: &TaskStore,
            ext_cxn: &impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<Task, Error>;
        async fn remove_task(
            &self,
            id: &TaskId,
            store: &TaskStore,
            ext_cxn: &impl ExternalConnectivity,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<(), Error>;
    }
}

fn current_task(store: &TaskStore, id: &TaskId) -> Result<Task, Error> {
    store.snapshot().find(id).cloned().ok_or(Error::DoesNotExist)
}

fn task_after(snapshot: &TaskList, id: &TaskId) -> Result<Task, Error> {
    snapshot.find(id).cloned().ok_or(Error::DoesNotExist)
}

/// Issues task requests and keeps the [TaskStore] in line with what the backend confirmed
pub struct TaskService {}

impl driving_ports::TaskPort for TaskService {
    #[tracing::instrument(skip_all)]
    async fn refresh_tasks(
        &self,
        store: &TaskStore,
        ext_cxn: &impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<Arc<TaskList>, Error> {
        let fetched = task_read
            .list_tasks(ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("fetch your tasks"))?;
        info!(count = fetched.len(), "synchronizing task list");

        Ok(store.dispatch(TaskAction::Sync(fetched)))
    }

    #[tracing::instrument(skip_all)]
    async fn create_task(
        &self,
        content: &TaskContent,
        store: &TaskStore,
        ext_cxn: &impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<Task, Error> {
        let created = task_write
            .create_task(content, ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("add a task"))?;

        match created {
            Some(task) => {
                let id = task.id.clone();
                let snapshot = store.dispatch(TaskAction::Upsert(task));
                task_after(&snapshot, &id)
            }
            None => {
                warn!("backend did not echo the created task, keeping a local copy");
                let snapshot = store.dispatch(TaskAction::Add(NewTask::from(content)));
                let local = snapshot.tasks().last().cloned().ok_or(Error::DoesNotExist)?;
                if !content.status {
                    return Ok(local);
                }

                let snapshot = store.dispatch(TaskAction::Update {
                    id: local.id.clone(),
                    changes: TaskChanges {
                        status: Some(true),
                        ..TaskChanges::default()
                    },
                });
                task_after(&snapshot, &local.id)
            }
        }
    }

    #[tracing::instrument(skip_all, fields(task_id = %id))]
    async fn edit_task(
        &self,
        id: &TaskId,
        content: &TaskContent,
        store: &TaskStore,
        ext_cxn: &impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<Task, Error> {
        let current = current_task(store, id)?;
        let replaced = task_write
            .replace_task(id, content, ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("update the task"))?;

        let confirmed = replaced.unwrap_or_else(|| FetchedTask {
            name: content.name.clone(),
            description: content.description.clone(),
            status: content.status,
            updated_at: Some(Utc::now()),
            ..FetchedTask::from(&current)
        });
        let snapshot = store.dispatch(TaskAction::Reconcile {
            task: FetchedTask {
                id: id.clone(),
                ..confirmed
            },
            based_on: current.revision,
        });

        task_after(&snapshot, id)
    }

    #[tracing::instrument(skip_all, fields(task_id = %id))]
    async fn toggle_task(
        &self,
        id: &TaskId,
        store: &TaskStore,
        ext_cxn: &impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<Task, Error> {
        let current = current_task(store, id)?;
        let wanted = !current.status;
        let patched = task_write
            .set_task_status(id, wanted, ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("update the task status"))?;

        let confirmed = patched.unwrap_or_else(|| FetchedTask {
            status: wanted,
            ..FetchedTask::from(&current)
        });
        let snapshot = store.dispatch(TaskAction::Reconcile {
            task: FetchedTask {
                id: id.clone(),
                ..confirmed
            },
            based_on: current.revision,
        });

        task_after(&snapshot, id)
    }

    #[tracing::instrument(skip_all, fields(task_id = %id))]
    async fn remove_task(
        &self,
        id: &TaskId,
        store: &TaskStore,
        ext_cxn: &impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<(), Error> {
        match task_write.delete_task(id, ext_cxn).await {
            Ok(()) => {}
            Err(DrivenPortError::DoesNotExist) => {
                info!("task was already gone on the backend");
            }
            Err(err) => return Err(err.into_error_trying_to("delete the task")),
        }

        store.dispatch(TaskAction::Delete(id.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod task_list_tests {
    use super::test_util::*;
    use super::*;
    use chrono::Duration;
    use speculoos::prelude::*;

    #[test]
    fn added_tasks_get_unique_ids_in_insertion_order() {
        let mut list = TaskList::default();
        for idx in 0..50 {
            list = list.apply(TaskAction::Add(draft(&format!("Task {idx}"), "")));
        }

        let names: Vec<&str> = list.tasks().iter().map(|task| task.name.as_str()).collect();
        let expected: Vec<String> = (0..50).map(|idx| format!("Task {idx}")).collect();
        assert_eq!(expected, names);

        let ids: HashSet<&TaskId> = list.tasks().iter().map(|task| &task.id).collect();
        assert_that!(ids.len()).is_equal_to(50);
    }

    #[test]
    fn add_forces_status_and_timestamp() {
        let now = Utc::now();
        let list = TaskList::default().add_task(draft("Water plants", "the ferns"), now);

        assert_that!(list.tasks()).matches(|tasks| {
            matches!(tasks, [Task {
                name,
                description,
                status: false,
                created_at,
                updated_at: None,
                revision: 0,
                ..
            }] if name == "Water plants" && description == "the ferns" && *created_at == now)
        });
    }

    #[test]
    fn update_only_touches_patched_fields() {
        let created = Utc::now() - Duration::days(2);
        let list = TaskList::default().sync_tasks(
            vec![
                fetched("a", "First", Some(created)),
                fetched("b", "Second", Some(created)),
            ],
            Utc::now(),
        );

        let updated = list.update_task(
            &TaskId::from("a"),
            &TaskChanges {
                description: Some("now with details".into()),
                ..TaskChanges::default()
            },
        );

        let first = updated.find(&TaskId::from("a")).expect("task a should remain");
        assert_that!(first.name.as_str()).is_equal_to("First");
        assert_that!(first.description.as_str()).is_equal_to("now with details");
        assert_that!(first.created_at).is_equal_to(created);
        assert_that!(first.status).is_false();
        assert_that!(first.revision).is_equal_to(1);
        assert_eq!(list.tasks()[1], updated.tasks()[1]);
    }

    #[test]
    fn update_of_missing_task_changes_nothing() {
        let list = TaskList::default().sync_tasks(vec![fetched("a", "First", None)], Utc::now());

        let updated = list.update_task(
            &TaskId::from("zzz"),
            &TaskChanges {
                name: Some("Renamed".into()),
                ..TaskChanges::default()
            },
        );

        assert_eq!(list, updated);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let list = TaskList::default().sync_tasks(
            vec![
                fetched("a", "First", None),
                fetched("b", "Second", None),
                fetched("c", "Third", None),
            ],
            Utc::now(),
        );

        let deleted = list.delete_task(&TaskId::from("b"));
        assert_that!(deleted.len()).is_equal_to(2);
        assert_that!(deleted.find(&TaskId::from("b"))).is_none();
        assert_that!(deleted.find(&TaskId::from("a"))).is_some();
        assert_that!(deleted.find(&TaskId::from("c"))).is_some();

        let unchanged = deleted.delete_task(&TaskId::from("b"));
        assert_eq!(deleted, unchanged);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let list = TaskList::default().sync_tasks(vec![fetched("a", "First", None)], Utc::now());
        let id = TaskId::from("a");

        let once = list.toggle_complete(&id);
        assert_that!(once.find(&id).map(|task| task.status)).is_some().is_true();

        let twice = once.toggle_complete(&id);
        assert_that!(twice.find(&id).map(|task| task.status)).is_some().is_false();
    }

    #[test]
    fn sync_replaces_everything_and_normalizes_timestamps() {
        let now = Utc::now();
        let stamped = now - Duration::hours(5);
        let list = TaskList::default()
            .add_task(draft("Local only", ""), now)
            .add_task(draft("Another local", ""), now);

        let synced = list.sync_tasks(
            vec![
                fetched("a", "From backend", Some(stamped)),
                fetched("b", "No timestamp", None),
                fetched("a", "Duplicate", None),
            ],
            now,
        );

        assert_that!(synced.tasks()).matches(|tasks| {
            matches!(tasks, [
                Task { name: first, created_at: first_created, .. },
                Task { name: second, created_at: second_created, .. },
            ] if first == "From backend"
                && *first_created == stamped
                && second == "No timestamp"
                && *second_created == now)
        });
        assert_that!(synced.version()).is_greater_than(list.version());
    }

    #[test]
    fn upsert_inserts_new_and_updates_known_tasks() {
        let created = Utc::now() - Duration::days(1);
        let list = TaskList::default().upsert_task(fetched("a", "First", Some(created)), Utc::now());
        assert_that!(list.len()).is_equal_to(1);

        let mut renamed = fetched("a", "Renamed", None);
        renamed.status = true;
        let list = list.upsert_task(renamed, Utc::now());

        assert_that!(list.tasks()).matches(|tasks| {
            matches!(tasks, [Task { name, status: true, created_at, .. }]
                if name == "Renamed" && *created_at == created)
        });
    }

    #[test]
    fn reconcile_ignores_stale_responses() {
        let list = TaskList::default().sync_tasks(vec![fetched("a", "First", None)], Utc::now());
        let id = TaskId::from("a");

        // A local edit landed after the request was issued against revision 0
        let edited = list.toggle_complete(&id);
        let mut response = fetched("a", "From a slow response", None);
        response.status = false;

        let reconciled = edited.reconcile_task(response, 0);
        assert_eq!(edited, reconciled);
    }

    #[test]
    fn reconcile_applies_fresh_responses() {
        let list = TaskList::default().sync_tasks(vec![fetched("a", "First", None)], Utc::now());
        let mut response = fetched("a", "First", None);
        response.status = true;

        let reconciled = list.reconcile_task(response, 0);
        assert_that!(reconciled.find(&TaskId::from("a")))
            .is_some()
            .matches(|task| task.status && task.revision == 1);
    }

    #[test]
    fn sync_invalidates_updates_in_flight() {
        let list = TaskList::default().sync_tasks(vec![fetched("a", "First", None)], Utc::now());
        let based_on = list
            .find(&TaskId::from("a"))
            .map(|task| task.revision)
            .expect("task a should exist");

        let refreshed = list.sync_tasks(
            vec![fetched("a", "First", None), fetched("b", "Second", None)],
            Utc::now(),
        );
        assert_that!(refreshed.find(&TaskId::from("a")).map(|task| task.revision))
            .is_some()
            .is_equal_to(based_on + 1);
        assert_that!(refreshed.find(&TaskId::from("b")).map(|task| task.revision))
            .is_some()
            .is_equal_to(0);

        let mut late_response = fetched("a", "From a slow response", None);
        late_response.status = true;
        let reconciled = refreshed.reconcile_task(late_response, based_on);
        assert_eq!(refreshed, reconciled);
    }

    #[test]
    fn buy_milk_lifecycle() {
        let list = TaskList::default();
        let list = list.apply(TaskAction::Add(draft("Buy milk", "2%")));
        assert_that!(list.len()).is_equal_to(1);

        let task = list.tasks()[0].clone();
        assert_that!(task.status).is_false();
        assert_that!(task.id.as_str().is_empty()).is_false();
        assert_that!((Utc::now() - task.created_at).num_seconds()).is_less_than(5);

        let list = list.apply(TaskAction::ToggleComplete(task.id.clone()));
        assert_that!(list.find(&task.id).map(|task| task.status))
            .is_some()
            .is_true();

        let list = list.apply(TaskAction::Delete(task.id.clone()));
        assert_that!(list.is_empty()).is_true();
    }

    #[test]
    fn store_snapshots_are_immutable() {
        let store = TaskStore::new();
        let before = store.snapshot();

        let after = store.dispatch(TaskAction::Add(draft("Call mom", "")));

        assert_that!(before.is_empty()).is_true();
        assert_that!(after.len()).is_equal_to(1);
        assert_eq!(*after, *store.snapshot());
    }
}
