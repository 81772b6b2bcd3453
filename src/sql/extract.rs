//! Best-effort extraction of a query's projected column list.
//!
//! This is text pattern matching, not SQL parsing: it takes whatever sits
//! between the first `SELECT` and the following `FROM` and splits it on
//! commas. Nested function calls with commas, subqueries in the projection
//! and string literals containing `FROM` are not handled.

use std::sync::LazyLock;

use regex::Regex;

/// Lazy match of everything between the first `SELECT` and the next `FROM`.
static PROJECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)SELECT\s+(.*?)\s+FROM").unwrap());

/// Extract the top-level projected names of `query`.
///
/// Returns `None` when the query has no `SELECT ... FROM` shape.
pub fn extract_projection(query: &str) -> Option<Vec<String>> {
    let captures = PROJECTION.captures(query)?;
    let list = captures.get(1)?.as_str();

    Some(list.split(',').map(|col| col.trim().to_string()).collect())
}
