//! Owner-scoped CRUD for tasks, notes and goals.
//!
//! # Invariants
//! - Every operation takes the caller's identity; no path reads or writes a
//!   record owned by someone else.
//! - `update`/`delete` check existence before ownership, so a missing id is
//!   `NotFound` for every caller.
//! - Created and updated records are returned as read back from storage.

use crate::model::record::{now_ms, OwnedRecord, RecordId, RecordValidationError, UserId};
use crate::repo::record_repo::{RecordRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

#[derive(Debug)]
pub enum RecordServiceError {
    Validation(RecordValidationError),
    NotFound(RecordId),
    /// Record exists but belongs to another user.
    Forbidden(RecordId),
    Repo(RepoError),
    /// A write succeeded but its read-back did not.
    InconsistentState(&'static str),
}

impl Display for RecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Forbidden(id) => write!(f, "record {id} is owned by another user"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
        }
    }
}

impl Error for RecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RecordServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RecordServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type RecordServiceResult<T> = Result<T, RecordServiceError>;

/// Service facade over one record kind's repository.
pub struct RecordService<R, S> {
    repo: S,
    _record: PhantomData<fn() -> R>,
}

impl<R: OwnedRecord, S: RecordRepository<R>> RecordService<R, S> {
    pub fn new(repo: S) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    /// Lists the caller's records in the kind's display order.
    ///
    /// An empty list is a normal result.
    pub fn list(&self, owner: UserId) -> RecordServiceResult<Vec<R>> {
        Ok(self.repo.list_by_owner(owner)?)
    }

    /// Loads one record owned by the caller.
    pub fn get(&self, id: RecordId, owner: UserId) -> RecordServiceResult<R> {
        let record = self
            .repo
            .get(id)?
            .ok_or(RecordServiceError::NotFound(id))?;
        if record.owner() != owner {
            warn!(
                "event=record_access module=service status=forbidden kind={} record_id={id}",
                R::LABEL
            );
            return Err(RecordServiceError::Forbidden(id));
        }
        Ok(record)
    }

    /// Validates `draft`, stores a new record owned by the caller and
    /// returns it with its assigned id.
    pub fn create(&self, owner: UserId, draft: R::Draft) -> RecordServiceResult<R> {
        let record = R::from_draft(owner, draft, now_ms())?;
        let id = self.repo.insert(&record)?;
        info!(
            "event=record_create module=service status=ok kind={} record_id={id}",
            R::LABEL
        );
        self.repo
            .get(id)?
            .ok_or(RecordServiceError::InconsistentState(
                "created record not found in read-back",
            ))
    }

    /// Merges set-if-present fields from `patch` into the caller's record.
    pub fn update(&self, id: RecordId, owner: UserId, patch: R::Patch) -> RecordServiceResult<R> {
        let mut record = self.get(id, owner)?;
        record.apply_patch(patch)?;
        record.touch(now_ms());
        self.repo.update(&record)?;
        info!(
            "event=record_update module=service status=ok kind={} record_id={id}",
            R::LABEL
        );
        self.repo
            .get(id)?
            .ok_or(RecordServiceError::InconsistentState(
                "updated record not found in read-back",
            ))
    }

    /// Removes the caller's record. A second delete of the same id is `NotFound`.
    pub fn delete(&self, id: RecordId, owner: UserId) -> RecordServiceResult<()> {
        self.get(id, owner)?;
        self.repo.delete(id)?;
        info!(
            "event=record_delete module=service status=ok kind={} record_id={id}",
            R::LABEL
        );
        Ok(())
    }
}
