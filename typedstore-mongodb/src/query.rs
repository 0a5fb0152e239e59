//! Translation from query descriptors to MongoDB find syntax.

use bson::{Document, doc};

use typedstore_core::{
    error::{DataError, DataResult},
    query::{FilterClause, FilterOp, OrderBy, QueryDescriptor, SortDirection},
};

use crate::sanitize::sanitize_key;

/// Builds the `find` filter document for a descriptor's clause conjunction.
pub(crate) fn filter_document(query: &QueryDescriptor) -> DataResult<Document> {
    let mut clauses = query
        .filters
        .iter()
        .map(clause_document)
        .collect::<DataResult<Vec<_>>>()?;

    Ok(match clauses.len() {
        0 => doc! {},
        1 => clauses.remove(0),
        // Two clauses may address the same field, so they cannot be merged
        // into one document.
        _ => doc! { "$and": clauses },
    })
}

/// Builds the sort document for a descriptor's ordering pairs, preserving
/// their sequence.
pub(crate) fn sort_document(order_by: &[OrderBy]) -> Document {
    order_by
        .iter()
        .map(|order| {
            (
                sanitize_key(&order.field),
                match order.direction {
                    SortDirection::Asc => bson::Bson::Int32(1),
                    SortDirection::Desc => bson::Bson::Int32(-1),
                },
            )
        })
        .collect()
}

fn clause_document(clause: &FilterClause) -> DataResult<Document> {
    let field = sanitize_key(&clause.field);
    let value = clause.value.clone();

    let condition = match clause.op {
        FilterOp::Eq => doc! { "$eq": value },
        FilterOp::Ne => doc! { "$ne": value },
        FilterOp::Lt => doc! { "$lt": value },
        FilterOp::Lte => doc! { "$lte": value },
        FilterOp::Gt => doc! { "$gt": value },
        FilterOp::Gte => doc! { "$gte": value },
        FilterOp::In => doc! { "$in": membership_values(clause)? },
        FilterOp::NotIn => doc! { "$nin": membership_values(clause)? },
        FilterOp::Contains => doc! { "$elemMatch": { "$eq": value } },
        FilterOp::ContainsAny => doc! { "$in": membership_values(clause)? },
    };

    Ok(doc! { field: condition })
}

fn membership_values(clause: &FilterClause) -> DataResult<Vec<bson::Bson>> {
    match &clause.value {
        bson::Bson::Array(items) => Ok(items.clone()),
        other => Err(DataError::Store(format!(
            "{:?} operator requires an array value, got {other:?}",
            clause.op
        ))),
    }
}
