//! Primary key resolution for a table body.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::lexer::strip_quotes;

static PRIMARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)PRIMARY\s+KEY\s*\(([^)]*)\)").expect("valid pattern"));

/// Column names listed by the first `PRIMARY KEY (...)` clause of `body`.
///
/// Later clauses are ignored. The list ends at the first `)`, so a prefix
/// length such as `` `code`(10) `` keeps the name it is attached to and drops
/// every column listed after it.
pub fn resolve_primary_key(body: &str) -> BTreeSet<String> {
    let Some(caps) = PRIMARY_KEY.captures(body) else {
        return BTreeSet::new();
    };

    caps[1]
        .split(',')
        .map(|token| strip_quotes(token.split('(').next().unwrap_or(token)))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
