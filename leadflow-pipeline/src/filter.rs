//! Search and facet filtering over leads

use crate::types::Lead;
use serde::{Deserialize, Serialize};

/// What the board is currently narrowed to
///
/// The text query matches name, email and location case-insensitively and
/// phone as typed; any one field matching is enough. Selected tags match when
/// the lead carries at least one of them, selected sources when the lead's
/// source is among them. Empty parts match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the filter lets every lead through
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.tags.is_empty() && self.sources.is_empty()
    }

    /// Number of active filter parts, the query counting as one
    pub fn active_count(&self) -> usize {
        self.tags.len() + self.sources.len() + usize::from(!self.query.is_empty())
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        self.matches_query(lead) && self.matches_tags(lead) && self.matches_sources(lead)
    }

    /// Leads passing the filter, in their original order
    pub fn apply<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        leads.iter().filter(|lead| self.matches(lead)).collect()
    }

    fn matches_query(&self, lead: &Lead) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        lead.name.to_lowercase().contains(&needle)
            || lead.email.to_lowercase().contains(&needle)
            || lead.phone.contains(&self.query)
            || lead.location.to_lowercase().contains(&needle)
    }

    fn matches_tags(&self, lead: &Lead) -> bool {
        self.tags.is_empty() || lead.has_any_tag(&self.tags)
    }

    fn matches_sources(&self, lead: &Lead) -> bool {
        self.sources.is_empty() || self.sources.contains(&lead.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewLead;

    fn lead(name: &str, email: &str, phone: &str, location: &str) -> Lead {
        Lead::from_new(
            NewLead::new(name, email, "new")
                .with_phone(phone)
                .with_location(location),
            "Lead created",
        )
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = LeadFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&lead("Ana", "ana@x.io", "", "")));
    }

    #[test]
    fn test_query_fields() {
        let ana = lead("Ana Souza", "contact@acme.io", "(81) 99999-1234", "Recife");

        assert!(LeadFilter::new().with_query("souza").matches(&ana));
        assert!(LeadFilter::new().with_query("ACME").matches(&ana));
        assert!(LeadFilter::new().with_query("recife").matches(&ana));
        assert!(LeadFilter::new().with_query("99999").matches(&ana));
        assert!(!LeadFilter::new().with_query("lisboa").matches(&ana));
    }

    #[test]
    fn test_phone_is_matched_as_typed() {
        let ana = lead("Ana", "ana@x.io", "(81) 99999-1234", "");
        assert!(LeadFilter::new().with_query("(81)").matches(&ana));
        assert!(!LeadFilter::new().with_query("81999").matches(&ana));
    }

    #[test]
    fn test_tags_any_of() {
        let mut ana = lead("Ana", "ana@x.io", "", "");
        ana.tags = vec!["vip".into(), "b2b".into()];

        assert!(LeadFilter::new().with_tags(["b2b", "cold"]).matches(&ana));
        assert!(!LeadFilter::new().with_tags(["cold"]).matches(&ana));
    }

    #[test]
    fn test_parts_are_anded() {
        let mut ana = lead("Ana", "ana@x.io", "", "");
        ana.source = "linkedin".into();
        ana.tags = vec!["vip".into()];

        let filter = LeadFilter::new()
            .with_query("ana")
            .with_tags(["vip"])
            .with_sources(["website"]);
        assert!(!filter.matches(&ana));
        assert_eq!(filter.active_count(), 3);

        let filter = filter.with_sources(["website", "linkedin"]);
        assert!(filter.matches(&ana));
    }

    #[test]
    fn test_apply_keeps_order() {
        let leads = vec![
            lead("Ana", "a@x.io", "", "Recife"),
            lead("Bruno", "b@x.io", "", "Natal"),
            lead("Carla", "c@x.io", "", "Recife"),
        ];
        let names: Vec<_> = LeadFilter::new()
            .with_query("recife")
            .apply(&leads)
            .into_iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana", "Carla"]);
    }
}
