//! Task record.
//!
//! # Invariants
//! - `category` is one of `work|personal|study` and defaults to `personal`.
//! - `is_completed` defaults to `false`.

use super::record::{
    double_option, parse_date_input, require, Completable, OwnedRecord, RecordId,
    RecordValidationError, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Task grouping shown as a filter in the task panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    #[default]
    Personal,
    Study,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Study];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Study => "study",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RecordValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "study" => Ok(Category::Study),
            other => Err(RecordValidationError::InvalidCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub owner: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /tasks`.
///
/// `category` stays a string here so an unknown value surfaces as a
/// validation error rather than a body decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Body of `PUT /tasks/:id`.
///
/// `description` and `dueDate` are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<String>>,
}

impl OwnedRecord for Task {
    const LABEL: &'static str = "Task";

    type Draft = TaskDraft;
    type Patch = TaskPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn from_draft(
        owner: UserId,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        let title = require("title", draft.title)?;
        let category = match draft.category.as_deref() {
            Some(raw) => raw.parse()?,
            None => Category::default(),
        };
        let due_date = match draft.due_date.as_deref() {
            Some(raw) => parse_date_input(raw)?,
            None => None,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            title,
            description: draft.description,
            category,
            is_completed: false,
            due_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply_patch(&mut self, patch: TaskPatch) -> Result<(), RecordValidationError> {
        // Parse everything first so a rejected patch leaves the record untouched.
        let category = patch
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;
        let due_date = match patch.due_date {
            Some(Some(raw)) => Some(parse_date_input(&raw)?),
            Some(None) => Some(None),
            None => None,
        };

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(due_date) = due_date {
            self.due_date = due_date;
        }
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Completable for Task {
    fn is_completed(&self) -> bool {
        self.is_completed
    }

    fn completion_patch(is_completed: bool) -> TaskPatch {
        TaskPatch {
            is_completed: Some(is_completed),
            ..TaskPatch::default()
        }
    }
}
