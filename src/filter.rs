//! Predicate composition over record collections.
//!
//! Every option on [`RecordFilter`] is an independent predicate and the
//! result is their conjunction, so the order predicates run in never
//! changes which records survive. Unset options match everything.

use std::borrow::Cow;

use crate::models::PriorityLevel;

/// Records expose their filterable text by field name.
pub trait Filterable {
    /// `None` when the record has no such field or the field is empty.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact, case-sensitive match on one field.
    Equals { field: String, value: String },
    /// Case-insensitive substring match on any of the fields.
    Contains { fields: Vec<String>, needle: String },
}

impl Predicate {
    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        match self {
            Predicate::Equals { field, value } => {
                record.field(field).is_some_and(|v| *v == **value)
            }
            Predicate::Contains { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|f| {
                    record
                        .field(f)
                        .is_some_and(|v| v.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub status: Option<String>,
    pub discipline: Option<String>,
    pub priority: Option<String>,
    pub search_term: Option<String>,
    pub search_fields: Vec<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn discipline(mut self, discipline: impl Into<String>) -> Self {
        self.discipline = Some(discipline.into());
        self
    }

    pub fn priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = Some(priority.as_str().to_string());
        self
    }

    pub fn search<I, S>(mut self, term: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_term = Some(term.into());
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Predicates for the options that are set.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        let exact = [
            ("status", &self.status),
            ("discipline", &self.discipline),
            ("priority", &self.priority),
        ];
        for (field, value) in exact {
            if let Some(value) = value {
                out.push(Predicate::Equals {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }
        if let Some(term) = &self.search_term {
            out.push(Predicate::Contains {
                fields: self.search_fields.clone(),
                needle: term.clone(),
            });
        }
        out
    }

    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        self.predicates().iter().all(|p| p.matches(record))
    }

    /// Matching records in their original order.
    pub fn filter<'a, T: Filterable>(&self, records: &'a [T]) -> Vec<&'a T> {
        apply(records, &self.predicates())
    }
}

pub fn apply<'a, T: Filterable>(records: &'a [T], predicates: &[Predicate]) -> Vec<&'a T> {
    records
        .iter()
        .filter(|r| predicates.iter().all(|p| p.matches(*r)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Submittal {
        title: &'static str,
        status: &'static str,
        discipline: &'static str,
        contractor: Option<&'static str>,
    }

    impl Filterable for Submittal {
        fn field(&self, name: &str) -> Option<Cow<'_, str>> {
            match name {
                "title" => Some(Cow::Borrowed(self.title)),
                "status" => Some(Cow::Borrowed(self.status)),
                "discipline" => Some(Cow::Borrowed(self.discipline)),
                "contractor" => self.contractor.map(Cow::Borrowed),
                _ => None,
            }
        }
    }

    fn register() -> Vec<Submittal> {
        vec![
            Submittal { title: "AHU-1 shop drawings", status: "approved", discipline: "mechanical", contractor: Some("Norte HVAC") },
            Submittal { title: "Switchgear cut sheets", status: "pending", discipline: "electrical", contractor: None },
            Submittal { title: "Domestic water riser", status: "approved", discipline: "plumbing", contractor: Some("Aqua MEP") },
            Submittal { title: "Chiller data", status: "rejected", discipline: "mechanical", contractor: Some("Norte HVAC") },
        ]
    }

    fn titles(found: &[&Submittal]) -> Vec<&'static str> {
        found.iter().map(|s| s.title).collect()
    }

    #[test]
    fn status_filter_keeps_order() {
        let records = register();
        let found = RecordFilter::new().status("approved").filter(&records);
        assert_eq!(titles(&found), ["AHU-1 shop drawings", "Domestic water riser"]);
    }

    #[test]
    fn unset_filter_is_identity() {
        let records = register();
        let found = RecordFilter::new().filter(&records);
        assert_eq!(found.len(), records.len());
        for (a, b) in found.iter().zip(&records) {
            assert!(std::ptr::eq(*a, b));
        }
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let records = register();
        let found = RecordFilter::new()
            .search("norte", ["title", "contractor"])
            .filter(&records);
        assert_eq!(titles(&found), ["AHU-1 shop drawings", "Chiller data"]);

        let none = RecordFilter::new().search("norte", ["title"]).filter(&records);
        assert!(none.is_empty());
    }

    #[test]
    fn empty_search_term_matches_everything_searchable() {
        let records = register();
        let found = RecordFilter::new().search("", ["title"]).filter(&records);
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn options_compose_with_and() {
        let records = register();
        let found = RecordFilter::new()
            .discipline("mechanical")
            .status("rejected")
            .filter(&records);
        assert_eq!(titles(&found), ["Chiller data"]);
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let records = register();
        assert!(RecordFilter::new().status("Approved").filter(&records).is_empty());
    }

    #[test]
    fn priority_uses_canonical_name() {
        let f = RecordFilter::new().priority(PriorityLevel::Critical);
        assert_eq!(f.priority.as_deref(), Some("critical"));
    }
}
