//! Query filters over JSON documents

use serde::Serialize;
use serde_json::Value;

use super::Document;

/// A single predicate on a document field
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field equals the value
    Eq(String, Value),
    /// Field equals one of the values
    In(String, Vec<Value>),
    /// Field is an array containing the value
    Contains(String, Value),
    /// At least one of the nested filters matches
    AnyOf(Vec<Filter>),
}

impl Clause {
    fn matches(&self, doc: &Document) -> bool {
        match self {
            Clause::Eq(field, value) => doc.get(field).unwrap_or(&Value::Null) == value,
            Clause::In(field, values) => {
                let actual = doc.get(field).unwrap_or(&Value::Null);
                values.iter().any(|v| v == actual)
            }
            Clause::Contains(field, value) => doc
                .get(field)
                .and_then(|v| v.as_array())
                .map_or(false, |items| items.contains(value)),
            Clause::AnyOf(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

/// Conjunction of clauses. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Serialize) -> Self {
        self.clauses.push(Clause::Eq(field.to_string(), to_value(value)));
        self
    }

    /// Adds an equality clause only when the value is present
    pub fn eq_opt<T: Serialize>(self, field: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn one_of<T: Serialize>(mut self, field: &str, values: impl IntoIterator<Item = T>) -> Self {
        let values = values.into_iter().map(to_value).collect();
        self.clauses.push(Clause::In(field.to_string(), values));
        self
    }

    pub fn contains(mut self, field: &str, value: impl Serialize) -> Self {
        self.clauses
            .push(Clause::Contains(field.to_string(), to_value(value)));
        self
    }

    pub fn any_of(mut self, filters: Vec<Filter>) -> Self {
        self.clauses.push(Clause::AnyOf(filters));
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|c| c.matches(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::new().matches(&doc(json!({"id": "a"}))));
    }

    #[test]
    fn test_eq_and_missing_field() {
        let d = doc(json!({"id": "a", "status": "completed"}));
        assert!(Filter::new().eq("status", "completed").matches(&d));
        assert!(!Filter::new().eq("status", "pending").matches(&d));
        assert!(!Filter::new().eq("category", "work").matches(&d));
        assert!(Filter::new().eq("category", Value::Null).matches(&d));
    }

    #[test]
    fn test_one_of() {
        let d = doc(json!({"status": "in_progress"}));
        let f = Filter::new().one_of("status", ["completed", "in_progress"]);
        assert!(f.matches(&d));
        let f = Filter::new().one_of("status", ["skipped"]);
        assert!(!f.matches(&d));
    }

    #[test]
    fn test_contains_on_arrays_only() {
        let d = doc(json!({"tags": ["rust", "web"], "title": "rust"}));
        assert!(Filter::new().contains("tags", "rust").matches(&d));
        assert!(!Filter::new().contains("tags", "go").matches(&d));
        assert!(!Filter::new().contains("title", "rust").matches(&d));
    }

    #[test]
    fn test_any_of_combined_with_eq() {
        let mine = doc(json!({"user_id": "u1", "is_public": false, "kind": "poem"}));
        let public = doc(json!({"user_id": "u2", "is_public": true, "kind": "poem"}));
        let private = doc(json!({"user_id": "u2", "is_public": false, "kind": "poem"}));

        let f = Filter::new()
            .any_of(vec![
                Filter::new().eq("user_id", "u1"),
                Filter::new().eq("is_public", true),
            ])
            .eq("kind", "poem");

        assert!(f.matches(&mine));
        assert!(f.matches(&public));
        assert!(!f.matches(&private));
    }
}
