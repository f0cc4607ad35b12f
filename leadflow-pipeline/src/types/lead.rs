//! Lead types: Lead, Activity, and the create/update payloads

use super::ids::{ActivityId, ColumnId, LeadId};
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sales prospect on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Estimated deal value, never negative
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub source: String,
    /// Column the lead sits in
    pub status: ColumnId,
    #[serde(default)]
    pub location: String,
    /// Display order is insertion order
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Append-only history
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Lead {
    /// Build a stored lead from a validated payload.
    ///
    /// Both timestamps share one instant and the history starts with a
    /// single note carrying `origin` ("Lead created", "Lead imported").
    pub fn from_new(new: NewLead, origin: &str) -> Self {
        let now = Utc::now();
        Self {
            id: LeadId::new(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            value: new.value,
            source: new.source,
            status: new.status,
            location: new.location,
            tags: new.tags,
            category: new.category,
            created_at: now,
            updated_at: now,
            activities: vec![Activity::at(ActivityKind::Note, origin, now)],
        }
    }

    /// Whether any of the lead's tags is in `selected`
    pub fn has_any_tag(&self, selected: &[String]) -> bool {
        self.tags.iter().any(|t| selected.contains(t))
    }

    /// Apply a partial update, returning the previous status when it changed.
    ///
    /// Identity and creation time are never touched; `updated_at` always moves.
    pub fn apply(&mut self, patch: &LeadPatch) -> Option<ColumnId> {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(source) = &patch.source {
            self.source = source.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = dedup_tags(tags.clone());
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }

        let previous = match &patch.status {
            Some(status) if *status != self.status => {
                Some(std::mem::replace(&mut self.status, status.clone()))
            }
            _ => None,
        };

        self.updated_at = Utc::now();
        previous
    }

    /// Record a status move in the history
    pub fn log_status_change(&mut self, from: &ColumnId, to: &ColumnId) {
        self.activities.push(Activity::new(
            ActivityKind::StatusChange,
            format!("Status changed from \"{}\" to \"{}\"", from, to),
        ));
    }

    /// Check the invariants a stored lead must hold
    pub fn validate(&self) -> Result<()> {
        validate_contact(&self.name, &self.email, self.value)
    }
}

/// Kinds of history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Note,
    Email,
    Call,
    Meeting,
    StatusChange,
}

/// An immutable history line attached to a lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// New entry stamped now
    pub fn new(kind: ActivityKind, description: impl Into<String>) -> Self {
        Self::at(kind, description, Utc::now())
    }

    fn at(kind: ActivityKind, description: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ActivityId::new(),
            kind,
            description: description.into(),
            created_at,
        }
    }
}

/// Payload for creating a lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub source: String,
    pub status: ColumnId,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewLead {
    /// Minimal payload; everything else defaults
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        status: impl Into<ColumnId>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            value: 0.0,
            source: String::new(),
            status: status.into(),
            location: String::new(),
            tags: Vec::new(),
            category: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        validate_contact(&self.name, &self.email, self.value)
    }
}

/// Partial update of a lead; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub value: Option<f64>,
    pub source: Option<String>,
    pub status: Option<ColumnId>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the category
    pub category: Option<Option<String>>,
}

impl LeadPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only moves the lead
    pub fn status(status: impl Into<ColumnId>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_status(mut self, status: impl Into<ColumnId>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_contact(name: &str, email: &str, value: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PipelineError::validation("name", "must not be empty"));
    }
    let email = email.trim();
    if email.is_empty() {
        return Err(PipelineError::validation("email", "must not be empty"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(PipelineError::validation("email", "must be an email address")),
    }
    if !value.is_finite() || value < 0.0 {
        return Err(PipelineError::validation("value", "must be a non-negative number"));
    }
    Ok(())
}

/// Drop blank and repeated tags while keeping first-seen order
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> NewLead {
        NewLead::new("Ana", "ana@x.com", "new")
            .with_value(1000.0)
            .with_source("web")
            .with_location("SP")
    }

    #[test]
    fn test_from_new_stamps_creation() {
        let lead = Lead::from_new(ana(), "Lead created");
        assert_eq!(lead.created_at, lead.updated_at);
        assert_eq!(lead.activities.len(), 1);
        assert_eq!(lead.activities[0].kind, ActivityKind::Note);
        assert_eq!(lead.activities[0].description, "Lead created");
    }

    #[test]
    fn test_apply_same_status_reports_no_change() {
        let mut lead = Lead::from_new(ana(), "Lead created");
        let before = lead.updated_at;
        assert_eq!(lead.apply(&LeadPatch::status("new")), None);
        assert!(lead.updated_at >= before);
    }

    #[test]
    fn test_apply_new_status_returns_previous() {
        let mut lead = Lead::from_new(ana(), "Lead created");
        let previous = lead.apply(&LeadPatch::status("won"));
        assert_eq!(previous, Some(ColumnId::from_string("new")));
        assert_eq!(lead.status, "won");
    }

    #[test]
    fn test_validation() {
        assert!(ana().validate().is_ok());
        assert!(matches!(
            NewLead::new("", "a@b.c", "new").validate(),
            Err(PipelineError::Validation { field, .. }) if field == "name"
        ));
        assert!(NewLead::new("A", "not-an-email", "new").validate().is_err());
        assert!(ana().with_value(-1.0).validate().is_err());
        assert!(ana().with_value(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_tags_keep_insertion_order() {
        let lead = ana().with_tags(["urgent", "b2b", "urgent", " "]);
        assert_eq!(lead.tags, vec!["urgent", "b2b"]);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let lead = Lead::from_new(ana(), "Lead created");
        let json = serde_json::to_value(&lead).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["activities"][0]["kind"], "note");
        assert!(json.get("category").is_none());
    }
}
