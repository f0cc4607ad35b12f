//! Built-in stages, sources and categories.

use crate::types::Column;

/// Upper bound on the number of columns
pub const MAX_COLUMNS: usize = 10;

/// A board always keeps at least this many columns
pub const MIN_COLUMNS: usize = 1;

/// Color used for columns created without one
pub const DEFAULT_COLUMN_COLOR: &str = "#94a3b8";

/// Source assigned to imported leads that name none
pub const DEFAULT_SOURCE: &str = "other";

/// Known lead sources as `(value, label)`. Sources stay an open set.
pub const SOURCES: &[(&str, &str)] = &[
    ("website", "Website"),
    ("referral", "Referral"),
    ("linkedin", "LinkedIn"),
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
    ("google", "Google Ads"),
    ("event", "Event"),
    ("other", "Other"),
];

/// Known lead categories as `(value, label)`
pub const CATEGORIES: &[(&str, &str)] = &[
    ("small_business", "Small Business"),
    ("medium_business", "Medium Business"),
    ("large_business", "Large Business"),
    ("individual", "Individual"),
];

/// Stages seeded into an empty store
pub fn default_columns() -> Vec<Column> {
    [
        ("new", "New", "#3b82f6"),
        ("contacted", "Contacted", "#8b5cf6"),
        ("qualified", "Qualified", "#06b6d4"),
        ("proposal_sent", "Proposal Sent", "#f59e0b"),
        ("negotiation", "Negotiation", "#f97316"),
        ("won", "Won", "#10b981"),
        ("lost", "Lost", "#ef4444"),
    ]
    .into_iter()
    .enumerate()
    .map(|(order, (id, title, color))| Column::new(id, title, order).with_color(color))
    .collect()
}

/// Human label for a source value, if it is a known one
pub fn source_label(value: &str) -> Option<&'static str> {
    SOURCES
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
}
