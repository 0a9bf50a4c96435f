//! Note record.

use super::record::{require, OwnedRecord, RecordId, RecordValidationError, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub owner: UserId,
    pub title: String,
    pub content: String,
    /// Tags in the order the user entered them.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /notes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Body of `PUT /notes/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl OwnedRecord for Note {
    const LABEL: &'static str = "Note";

    type Draft = NoteDraft;
    type Patch = NotePatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn from_draft(
        owner: UserId,
        draft: NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        let title = require("title", draft.title)?;
        let content = require("content", draft.content)?;

        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            title,
            content,
            tags: draft.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: NotePatch) -> Result<(), RecordValidationError> {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
