//! List views for tasks, notes and goals.
//!
//! A panel mirrors one record collection locally. Mutations go to the
//! backend first; local state changes only after the backend succeeds.
//! Failures are logged, returned to the caller and leave the list as it was.

use crate::api::{ApiClient, RemoteRecord};
use crate::error::{ClientError, ClientResult};
use lifedesk_core::{Category, Completable, Goal, NoteDraft, RecordId, Task};
use log::{error, info};

/// Remote operations a panel needs.
pub trait RecordBackend<R: RemoteRecord> {
    fn fetch_all(&self) -> ClientResult<Vec<R>>;
    fn create(&self, draft: &R::Draft) -> ClientResult<R>;
    fn update(&self, id: RecordId, patch: &R::Patch) -> ClientResult<R>;
    fn delete(&self, id: RecordId) -> ClientResult<()>;
}

impl<R: RemoteRecord> RecordBackend<R> for ApiClient {
    fn fetch_all(&self) -> ClientResult<Vec<R>> {
        self.list::<R>()
    }

    fn create(&self, draft: &R::Draft) -> ClientResult<R> {
        ApiClient::create::<R>(self, draft)
    }

    fn update(&self, id: RecordId, patch: &R::Patch) -> ClientResult<R> {
        ApiClient::update::<R>(self, id, patch)
    }

    fn delete(&self, id: RecordId) -> ClientResult<()> {
        ApiClient::delete::<R>(self, id).map(|_| ())
    }
}

impl<R: RemoteRecord, T: RecordBackend<R> + ?Sized> RecordBackend<R> for &T {
    fn fetch_all(&self) -> ClientResult<Vec<R>> {
        (**self).fetch_all()
    }

    fn create(&self, draft: &R::Draft) -> ClientResult<R> {
        (**self).create(draft)
    }

    fn update(&self, id: RecordId, patch: &R::Patch) -> ClientResult<R> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: RecordId) -> ClientResult<()> {
        (**self).delete(id)
    }
}

/// How local state follows a successful mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Merge the server's response into the local list.
    #[default]
    MergeResponse,
    /// Reload the full list from the server.
    RefetchAfterMutation,
}

pub struct Panel<R, B> {
    backend: B,
    items: Vec<R>,
    policy: SyncPolicy,
}

impl<R: RemoteRecord, B: RecordBackend<R>> Panel<R, B> {
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, SyncPolicy::default())
    }

    pub fn with_policy(backend: B, policy: SyncPolicy) -> Self {
        Self {
            backend,
            items: Vec::new(),
            policy,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Replaces local state with the server's list.
    pub fn load(&mut self) -> ClientResult<()> {
        let items = self.logged("load", self.backend.fetch_all())?;
        self.items = items;
        Ok(())
    }

    /// Creates a record and puts it at the top of the list.
    pub fn add(&mut self, draft: R::Draft) -> ClientResult<&R> {
        R::check_draft(&draft)?;
        let created = self.logged("add", self.backend.create(&draft))?;
        let id = created.id();
        match self.policy {
            SyncPolicy::MergeResponse => self.items.insert(0, created),
            SyncPolicy::RefetchAfterMutation => self.load()?,
        }
        self.find(id)
    }

    pub fn update(&mut self, id: RecordId, patch: R::Patch) -> ClientResult<&R> {
        let updated = self.logged("update", self.backend.update(id, &patch))?;
        match self.policy {
            SyncPolicy::MergeResponse => {
                if let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) {
                    *slot = updated;
                }
            }
            SyncPolicy::RefetchAfterMutation => self.load()?,
        }
        self.find(id)
    }

    pub fn delete(&mut self, id: RecordId) -> ClientResult<()> {
        self.logged("delete", self.backend.delete(id))?;
        match self.policy {
            SyncPolicy::MergeResponse => self.items.retain(|item| item.id() != id),
            SyncPolicy::RefetchAfterMutation => self.load()?,
        }
        Ok(())
    }

    fn find(&self, id: RecordId) -> ClientResult<&R> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| ClientError::Validation(format!("{} {id} is not loaded", R::LABEL)))
    }

    fn logged<T>(&self, action: &str, result: ClientResult<T>) -> ClientResult<T> {
        match &result {
            Ok(_) => info!(
                "event=panel_{action} module=client status=ok kind={}",
                R::LABEL
            ),
            Err(err) => error!(
                "event=panel_{action} module=client status=error kind={} error={err}",
                R::LABEL
            ),
        }
        result
    }
}

impl<R: RemoteRecord + Completable, B: RecordBackend<R>> Panel<R, B> {
    /// Flips the completion flag of a loaded record.
    pub fn toggle(&mut self, id: RecordId) -> ClientResult<&R> {
        let current = self.find(id)?.is_completed();
        self.update(id, R::completion_patch(!current))
    }
}

/// Task list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => task.category == *category,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<Category>()
            .map(Self::Only)
            .map_err(|err| ClientError::Validation(err.to_string()))
    }
}

impl<B: RecordBackend<Task>> Panel<Task, B> {
    pub fn filtered(&self, filter: CategoryFilter) -> Vec<&Task> {
        self.items.iter().filter(|task| filter.matches(task)).collect()
    }
}

/// Splits comma-separated tag input, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds a note draft from raw form input.
pub fn note_draft(title: &str, content: &str, tags_input: &str) -> NoteDraft {
    NoteDraft {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        tags: Some(parse_tags(tags_input)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

impl GoalProgress {
    pub fn of(goals: &[Goal]) -> Self {
        let total = goals.len();
        let completed = goals.iter().filter(|goal| goal.is_completed).count();
        let percent = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            completed,
            total,
            percent,
        }
    }

    pub fn rounded_percent(&self) -> u32 {
        self.percent.round() as u32
    }
}

impl<B: RecordBackend<Goal>> Panel<Goal, B> {
    pub fn progress(&self) -> GoalProgress {
        GoalProgress::of(&self.items)
    }
}
