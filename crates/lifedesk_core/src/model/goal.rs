//! Goal record.
//!
//! `date` defaults to the creation time and drives list ordering.

use super::record::{require, Completable, OwnedRecord, RecordId, RecordValidationError, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    pub owner: UserId,
    pub title: String,
    pub is_completed: bool,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /goals`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Body of `PUT /goals/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl OwnedRecord for Goal {
    const LABEL: &'static str = "Goal";

    type Draft = GoalDraft;
    type Patch = GoalPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn from_draft(
        owner: UserId,
        draft: GoalDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            title: require("title", draft.title)?,
            is_completed: false,
            date: now,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: GoalPatch) -> Result<(), RecordValidationError> {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Completable for Goal {
    fn is_completed(&self) -> bool {
        self.is_completed
    }

    fn completion_patch(is_completed: bool) -> GoalPatch {
        GoalPatch {
            title: None,
            is_completed: Some(is_completed),
        }
    }
}
