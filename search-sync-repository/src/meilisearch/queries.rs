//! Meilisearch query builders.
//!
//! This module translates predicate sets and ordering clauses into the
//! engine's filter-expression and sort-directive syntax, and assembles the
//! parameter object of a search call.

use serde_json::Value;

use search_sync_shared::{OrderClause, Predicates, SearchParams};

/// Build a filter expression from a predicate set.
///
/// The filter builder handles:
/// - Equality entries rendered as `field=value`
/// - Inclusion entries rendered as `(field=a OR field=b)`
/// - All entries joined with ` AND `, equality entries first
///
/// Booleans and numbers are written unquoted, everything else is quoted.
/// Quotes inside string values are not escaped.
///
/// Equality values use a general numeric check (integers and decimals, also
/// in numeric strings), inclusion values an integer-only check, so
/// `9.99` is unquoted in an equality entry but quoted inside an inclusion
/// group.
///
/// An empty predicate set yields an empty string.
pub fn build_filter(predicates: &Predicates) -> String {
    let equalities = predicates
        .wheres
        .iter()
        .map(|(field, value)| render_comparison(field, value, is_numeric));

    let inclusions = predicates.where_ins.iter().map(|(field, values)| {
        let alternatives: Vec<String> = values
            .iter()
            .map(|value| render_comparison(field, value, is_integer))
            .collect();
        format!("({})", alternatives.join(" OR "))
    });

    equalities.chain(inclusions).collect::<Vec<_>>().join(" AND ")
}

/// Build sort directives (`field:asc` / `field:desc`) from ordering clauses,
/// preserving their order.
pub fn build_sort(orders: &[OrderClause]) -> Vec<String> {
    orders
        .iter()
        .map(|order| format!("{}:{}", order.field, order.direction))
        .collect()
}

/// Assemble the parameter object of a search call.
///
/// The filter is omitted when the predicate set is empty, the sort when there
/// are no ordering clauses.
pub fn build_search_params(
    predicates: &Predicates,
    limit: Option<usize>,
    offset: Option<usize>,
    orders: &[OrderClause],
) -> SearchParams {
    let filter = build_filter(predicates);
    let sort = build_sort(orders);

    SearchParams {
        filter: (!filter.is_empty()).then_some(filter),
        limit,
        offset,
        sort: (!sort.is_empty()).then_some(sort),
    }
}

/// Render one `field=value` comparison, quoting unless the value is a
/// boolean or passes `bare`.
fn render_comparison(field: &str, value: &Value, bare: fn(&Value) -> bool) -> String {
    match value {
        Value::Bool(b) => format!("{}={}", field, b),
        Value::String(s) if bare(value) => format!("{}={}", field, s),
        Value::String(s) => format!("{}=\"{}\"", field, s),
        Value::Null => format!("{}=\"\"", field),
        other if bare(other) => format!("{}={}", field, other),
        other => format!("{}=\"{}\"", field, other),
    }
}

/// Integers and decimals, as numbers or numeric strings.
fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty()
                && !trimmed
                    .chars()
                    .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
                && trimmed.parse::<f64>().map(f64::is_finite).unwrap_or(false)
        }
        _ => false,
    }
}

/// Integers only, as numbers or integer strings.
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}
