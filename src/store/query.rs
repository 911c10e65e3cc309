//! # Ordered Queries

use super::value::{Document, FieldValue};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Name used on the store wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Query over a single collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate the query over an in-process set of documents.
    ///
    /// Documents missing the order field sort as null.
    pub fn apply(&self, mut documents: Vec<Document>) -> Vec<Document> {
        if let Some(order) = &self.order_by {
            documents.sort_by(|a, b| {
                let x = a.field(&order.field).unwrap_or(&FieldValue::Null);
                let y = b.field(&order.field).unwrap_or(&FieldValue::Null);
                match order.direction {
                    Direction::Ascending => x.sort_cmp(y),
                    Direction::Descending => y.sort_cmp(x),
                }
            });
        }
        if let Some(limit) = self.limit {
            documents.truncate(limit);
        }
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::value::Fields;

    fn doc(id: &str, rank: Option<i64>) -> Document {
        let mut fields = Fields::new();
        if let Some(rank) = rank {
            fields.insert("Rank".to_string(), FieldValue::Integer(rank));
        }
        Document::new(id, fields)
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_descending_with_limit() {
        let docs = vec![doc("a", Some(1)), doc("b", Some(3)), doc("c", Some(2))];
        let query = Query::new().order_by("Rank", Direction::Descending).limit(2);
        assert_eq!(ids(&query.apply(docs)), vec!["b", "c"]);
    }

    #[test]
    fn test_missing_field_sorts_first_ascending() {
        let docs = vec![doc("a", Some(1)), doc("b", None)];
        let query = Query::new().order_by("Rank", Direction::Ascending);
        assert_eq!(ids(&query.apply(docs)), vec!["b", "a"]);
    }

    #[test]
    fn test_unordered_query_keeps_input() {
        let docs = vec![doc("x", None), doc("y", None)];
        assert_eq!(ids(&Query::new().apply(docs)), vec!["x", "y"]);
    }
}
