use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const TITLE_REQUIRED: &str = "Title is required";

/// Matches the `VARCHAR(255)` column; counted in characters, as Postgres does.
pub const MAX_TITLE_LEN: usize = 255;

/// Todo entity - a single item on a user's private list.
///
/// `due_date` is a calendar date with no time-of-day component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new, incomplete todo owned by `user_id`.
    pub fn new(user_id: Uuid, input: NewTodo) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Apply a validated patch. Only supplied fields change; `updated_at`
    /// is always touched.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        self.updated_at = Utc::now();
    }
}

/// Validated input for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl NewTodo {
    /// Trims the title and rejects it when empty. Blank descriptions are
    /// stored as absent.
    pub fn parse(
        title: &str,
        description: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(title)?,
            description: description.and_then(non_blank),
            due_date,
        })
    }
}

/// Partial update of a todo.
///
/// The outer `Option` marks whether a field was supplied at all; for the
/// nullable attributes the inner `Option` carries "set to null".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub is_completed: Option<bool>,
}

impl TodoPatch {
    /// Normalize the patch so that an accepted update can never leave an
    /// empty title behind.
    pub fn validated(self) -> Result<Self, DomainError> {
        let title = self.title.as_deref().map(normalize_title).transpose()?;

        Ok(Self {
            title,
            description: self.description.map(|d| d.and_then(non_blank)),
            ..self
        })
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.is_completed.is_none()
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(TITLE_REQUIRED.to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
