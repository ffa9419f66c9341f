//! Snapshot query building shared by the collection services

use shared::{Collection, RecordQuery, SortOrder};
use sqlx::{Postgres, QueryBuilder};

use crate::error::{AppError, AppResult};

/// Reject ranges that can never match
pub fn validate_query(query: &RecordQuery) -> AppResult<()> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(AppError::validation("from", "Start of range is after its end"));
        }
    }
    Ok(())
}

/// Build `SELECT <columns> FROM <collection>` with the query's date filters and
/// ordering. The result is always the complete matching set; there is no paging.
pub fn select<'a>(
    columns: &str,
    collection: Collection,
    query: &RecordQuery,
) -> QueryBuilder<'a, Postgres> {
    let date_expr = format!("{}::date", collection.date_column());

    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE TRUE",
        columns,
        collection.as_str()
    ));

    if let Some(on) = query.on {
        builder.push(format!(" AND {} = ", date_expr)).push_bind(on);
    }
    if let Some(from) = query.from {
        builder.push(format!(" AND {} >= ", date_expr)).push_bind(from);
    }
    if let Some(to) = query.to {
        builder.push(format!(" AND {} <= ", date_expr)).push_bind(to);
    }

    builder.push(order_clause(collection, query.order));
    builder
}

fn order_clause(collection: Collection, order: SortOrder) -> String {
    let date = collection.date_column();
    match order {
        SortOrder::DateDesc => format!(" ORDER BY {} DESC, created_at DESC", date),
        SortOrder::DateAsc => format!(" ORDER BY {} ASC, created_at ASC", date),
        SortOrder::CreatedDesc => " ORDER BY created_at DESC".to_string(),
        SortOrder::CreatedAsc => " ORDER BY created_at ASC".to_string(),
    }
}
