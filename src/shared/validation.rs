use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for SQL column references used in ORDER BY clauses
    /// Lowercase identifier, optionally qualified by a table alias
    /// - Valid: "name", "p.code", "r.name", "created_at"
    /// - Invalid: "name;", "p.code DESC", "1name", "Name"
    pub static ref SQL_IDENTIFIER_REGEX: Regex =
        Regex::new(r"^[a-z_][a-z0-9_]*(\.[a-z_][a-z0-9_]*)?$").unwrap();
}
