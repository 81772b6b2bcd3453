//! Test utilities for SQL emission validation.
//!
//! Provides helpers for validating that composed SQL is syntactically correct
//! using sqlparser-rs for roundtrip validation.

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Validates that a SQL string parses as a single statement.
///
/// Composition emits no dialect-specific syntax, so the generic dialect is
/// used.
pub fn validate_sql(sql: &str) -> Result<(), String> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)
        .map_err(|e| format!("Invalid SQL: {}\nSQL: {}", e, sql))?;

    if statements.len() != 1 {
        return Err(format!(
            "Expected one statement, found {}\nSQL: {}",
            statements.len(),
            sql
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT * FROM users").unwrap();
        validate_sql("SELECT * FROM ( SELECT * FROM users ) AS u LIMIT 5").unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        let result = validate_sql("SELEC * FORM users");
        assert!(result.is_err());
    }
}
