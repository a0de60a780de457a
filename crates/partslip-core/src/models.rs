//! Data models for decoded schedule assignments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an assignment names one participant or a participant plus assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Single,
    Paired,
}

impl Role {
    pub fn of(co_participant: Option<&str>) -> Self {
        match co_participant {
            Some(_) => Role::Paired,
            None => Role::Single,
        }
    }
}

/// One decoded schedule cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFragment {
    pub slot_number: u32,
    pub participant: String,
    pub co_participant: Option<String>,
}

impl AssignmentFragment {
    pub fn role(&self) -> Role {
        Role::of(self.co_participant.as_deref())
    }
}

/// An assignment for one week, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub source_date: String,
    pub localized_date: String,
    pub slot_number: u32,
    pub role: Role,
    pub participant: String,
    pub co_participant: Option<String>,
}

impl AssignmentRecord {
    /// Build a record for a week header. The role always follows the fragment.
    pub fn from_fragment(
        source_date: &str,
        localized_date: String,
        fragment: AssignmentFragment,
    ) -> Self {
        Self {
            source_date: source_date.to_string(),
            localized_date,
            slot_number: fragment.slot_number,
            role: fragment.role(),
            participant: fragment.participant,
            co_participant: fragment.co_participant,
        }
    }
}

/// A rendered message and its one-line title for list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub title: String,
    pub body: String,
}

/// The records produced by one load. Replaced wholesale on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub records: Vec<AssignmentRecord>,
    pub loaded_at: DateTime<Utc>,
}

impl Schedule {
    pub fn new(records: Vec<AssignmentRecord>) -> Self {
        Self {
            records,
            loaded_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.loaded_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}
