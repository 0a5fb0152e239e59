//! Clause evaluation and ordering over raw BSON documents.
//!
//! The in-memory store has no query engine to lean on, so filter clauses
//! and ordering pairs are evaluated here. Comparison follows BSON value
//! semantics with one relaxation: all numeric widths (int32, int64,
//! double) compare through f64, so a stored int64 matches a filter built
//! from an int32.

use std::cmp::Ordering;

use bson::{Bson, Document};

use typedstore_core::query::{FilterClause, FilterOp, OrderBy, SortDirection};

fn numeric(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// Value equality with numeric-width normalization.
pub(crate) fn values_equal(left: &Bson, right: &Bson) -> bool {
    if let (Some(a), Some(b)) = (numeric(left), numeric(right)) {
        return a == b;
    }

    match (left, right) {
        (Bson::Null, Bson::Null) => true,
        (Bson::Boolean(a), Bson::Boolean(b)) => a == b,
        (Bson::String(a), Bson::String(b)) => a == b,
        (Bson::DateTime(a), Bson::DateTime(b)) => a == b,
        (Bson::Array(a), Bson::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Bson::Document(a), Bson::Document(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => false,
    }
}

/// Value ordering; `None` when the two values are not mutually ordered.
pub(crate) fn compare_values(left: &Bson, right: &Bson) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (numeric(left), numeric(right)) {
        return a.partial_cmp(&b);
    }

    match (left, right) {
        (Bson::Boolean(a), Bson::Boolean(b)) => a.partial_cmp(b),
        (Bson::String(a), Bson::String(b)) => a.partial_cmp(b),
        (Bson::DateTime(a), Bson::DateTime(b)) => a.partial_cmp(b),
        _ => None,
    }
}

/// Whether `document` satisfies a single filter clause.
///
/// A document that lacks the addressed field never matches, whatever the
/// operator.
pub(crate) fn matches_clause(document: &Document, clause: &FilterClause) -> bool {
    let Some(stored) = document.get(&clause.field) else {
        return false;
    };

    match clause.op {
        FilterOp::Eq => values_equal(stored, &clause.value),
        FilterOp::Ne => !values_equal(stored, &clause.value),
        FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            match compare_values(stored, &clause.value) {
                Some(ordering) => match clause.op {
                    FilterOp::Lt => ordering == Ordering::Less,
                    FilterOp::Lte => ordering != Ordering::Greater,
                    FilterOp::Gt => ordering == Ordering::Greater,
                    FilterOp::Gte => ordering != Ordering::Less,
                    _ => unreachable!(),
                },
                None => false,
            }
        }
        FilterOp::In => candidates(&clause.value)
            .iter()
            .any(|candidate| values_equal(stored, candidate)),
        FilterOp::NotIn => !candidates(&clause.value)
            .iter()
            .any(|candidate| values_equal(stored, candidate)),
        FilterOp::Contains => match stored {
            Bson::Array(items) => items.iter().any(|item| values_equal(item, &clause.value)),
            _ => false,
        },
        FilterOp::ContainsAny => match stored {
            Bson::Array(items) => candidates(&clause.value)
                .iter()
                .any(|candidate| items.iter().any(|item| values_equal(item, candidate))),
            _ => false,
        },
    }
}

/// Whether `document` satisfies every clause of the conjunction.
pub(crate) fn matches_all(document: &Document, clauses: &[FilterClause]) -> bool {
    clauses.iter().all(|clause| matches_clause(document, clause))
}

/// Multi-key document ordering for the scan's ordering pairs.
///
/// Unordered or missing values compare as equal, which keeps the sort
/// stable for them.
pub(crate) fn compare_documents(left: &Document, right: &Document, order_by: &[OrderBy]) -> Ordering {
    for order in order_by {
        let a = left.get(&order.field).unwrap_or(&Bson::Null);
        let b = right.get(&order.field).unwrap_or(&Bson::Null);

        let ordering = match order.direction {
            SortDirection::Asc => compare_values(a, b),
            SortDirection::Desc => compare_values(b, a),
        }
        .unwrap_or(Ordering::Equal);

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

fn candidates(value: &Bson) -> &[Bson] {
    match value {
        Bson::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn clause(field: &str, op: FilterOp, value: impl Into<Bson>) -> FilterClause {
        FilterClause { field: field.to_string(), op, value: value.into() }
    }

    #[test]
    fn numeric_widths_compare_equal() {
        assert!(values_equal(&Bson::Int64(30), &Bson::Int32(30)));
        assert!(values_equal(&Bson::Double(30.0), &Bson::Int64(30)));
        assert!(!values_equal(&Bson::Int64(30), &Bson::String("30".into())));
    }

    #[test]
    fn ordering_operators() {
        let document = doc! { "age": 30i64 };

        assert!(matches_clause(&document, &clause("age", FilterOp::Gte, 30)));
        assert!(matches_clause(&document, &clause("age", FilterOp::Gt, 29)));
        assert!(!matches_clause(&document, &clause("age", FilterOp::Lt, 30)));
        // Unordered value pairs never match.
        assert!(!matches_clause(&document, &clause("age", FilterOp::Gt, "29")));
    }

    #[test]
    fn missing_field_never_matches() {
        let document = doc! { "name": "Alice" };

        assert!(!matches_clause(&document, &clause("age", FilterOp::Eq, 30)));
        assert!(!matches_clause(&document, &clause("age", FilterOp::Ne, 30)));
    }

    #[test]
    fn membership_and_array_operators() {
        let document = doc! { "age": 30i64, "tags": ["db", "rust"] };

        assert!(matches_clause(&document, &clause("age", FilterOp::In, vec![29i64, 30i64])));
        assert!(matches_clause(&document, &clause("age", FilterOp::NotIn, vec![1i64, 2i64])));
        assert!(matches_clause(&document, &clause("tags", FilterOp::Contains, "rust")));
        assert!(!matches_clause(&document, &clause("tags", FilterOp::Contains, "go")));
        assert!(matches_clause(
            &document,
            &clause("tags", FilterOp::ContainsAny, vec!["go", "db"])
        ));
    }

    #[test]
    fn multi_key_document_ordering() {
        let order = vec![
            OrderBy { field: "age".to_string(), direction: SortDirection::Asc },
            OrderBy { field: "name".to_string(), direction: SortDirection::Desc },
        ];

        let younger = doc! { "age": 20i64, "name": "Ann" };
        let older = doc! { "age": 30i64, "name": "Ann" };
        let zed = doc! { "age": 20i64, "name": "Zed" };

        assert_eq!(compare_documents(&younger, &older, &order), Ordering::Less);
        assert_eq!(compare_documents(&zed, &younger, &order), Ordering::Less);
        assert_eq!(compare_documents(&younger, &younger, &order), Ordering::Equal);
    }
}
