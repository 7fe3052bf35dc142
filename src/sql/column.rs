//! Column line classification and extraction.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::comment_literal;
use super::lexer::leading_identifier;
use crate::ast::{ColumnDefinition, UNKNOWN_TYPE};

/// Line prefixes that mark index, constraint, comment and partition lines.
/// Matched case-sensitively against the trimmed line.
const STRUCTURAL_PREFIXES: [&str; 9] = [
    "PRIMARY KEY",
    "KEY",
    "INDEX",
    "UNIQUE",
    "CONSTRAINT",
    "FOREIGN KEY",
    "--",
    "/*",
    "PARTITION",
];

/// Leading words that can never name a column.
const RESERVED_NAMES: [&str; 7] = [
    "KEY",
    "PRIMARY",
    "INDEX",
    "UNIQUE",
    "CONSTRAINT",
    "FOREIGN",
    "CHECK",
];

static COLUMN_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w+(?:\([^)]*\))?)").expect("valid pattern"));

static COLUMN_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCOMMENT\s+'((?:[^'\\]|\\.|'')*)'").expect("valid pattern")
});

static NOT_NULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)NOT NULL").expect("valid pattern"));

/// Column definitions of `body` in declaration order.
pub fn parse_columns(body: &str, primary_key: &BTreeSet<String>) -> Vec<ColumnDefinition> {
    body.lines()
        .filter_map(|line| parse_column_line(line, primary_key))
        .collect()
}

/// Parse a single body line, or `None` if it is not a column definition.
pub fn parse_column_line(line: &str, primary_key: &BTreeSet<String>) -> Option<ColumnDefinition> {
    let line = line.trim();
    if line.is_empty() || is_structural(line) {
        return None;
    }

    let (name, rest) = leading_identifier(line)?;
    if RESERVED_NAMES.contains(&name.to_uppercase().as_str()) {
        return None;
    }

    let typ = COLUMN_TYPE
        .captures(rest)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string());

    Some(ColumnDefinition {
        is_primary_key: primary_key.contains(&name),
        is_nullable: !NOT_NULL.is_match(line),
        comment: comment_literal(&COLUMN_COMMENT, line),
        typ,
        name,
    })
}

fn is_structural(line: &str) -> bool {
    STRUCTURAL_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn column(line: &str) -> ColumnDefinition {
        parse_column_line(line, &pk(&["CLIENT_NO"])).expect("column line")
    }

    #[test]
    fn test_typical_mysql_column() {
        let col = column("  `CLIENT_NO` varchar(20) NOT NULL COMMENT 'Client number',");
        assert_eq!(col.name, "CLIENT_NO");
        assert_eq!(col.typ, "varchar(20)");
        assert_eq!(col.comment, "Client number");
        assert!(col.is_primary_key);
        assert!(!col.is_nullable);
    }

    #[test]
    fn test_decimal_with_spaced_arguments() {
        let col = column("`BALANCE` decimal(17, 2) DEFAULT NULL,");
        assert_eq!(col.typ, "decimal(17, 2)");
        assert!(col.is_nullable);
        assert!(!col.is_primary_key);
    }

    #[test]
    fn test_unquoted_name_and_lowercase_not_null() {
        let col = column("amount bigint not null default 0");
        assert_eq!(col.name, "amount");
        assert_eq!(col.typ, "bigint");
        assert!(!col.is_nullable);
        assert_eq!(col.comment, "");
    }

    #[test]
    fn test_missing_type_is_unknown() {
        let col = column("`weird` ,");
        assert_eq!(col.typ, UNKNOWN_TYPE);
    }

    #[test]
    fn test_not_null_inside_default_literal_counts() {
        let col = column("`note` varchar(20) DEFAULT 'NOT NULL'");
        assert!(!col.is_nullable);
    }

    #[test]
    fn test_comment_with_escaped_quote() {
        let col = column("`flag` char(1) COMMENT 'client''s flag'");
        assert_eq!(col.comment, "client's flag");
    }

    #[test]
    fn test_structural_lines_are_skipped() {
        let lines = [
            "PRIMARY KEY (`CLIENT_NO`)",
            "KEY `idx_a` (`a`)",
            "INDEX idx_b (b)",
            "UNIQUE KEY `uk` (`c`)",
            "CONSTRAINT `fk` FOREIGN KEY (`d`) REFERENCES `t` (`d`)",
            "FOREIGN KEY (e) REFERENCES t (e)",
            "-- comment line",
            "/* block */",
            "PARTITION p0 VALUES LESS THAN (10)",
            "",
        ];
        for line in lines {
            assert_eq!(parse_column_line(line, &pk(&[])), None, "{line}");
        }
    }

    #[test]
    fn test_lowercase_constraints_hit_reserved_guard() {
        let lines = [
            "primary key (id)",
            "unique key uk_code (code)",
            "key idx (a)",
            "constraint fk_x foreign key (x) references y (x)",
            "check (a > 0)",
            "`KEY` (a)",
        ];
        for line in lines {
            assert_eq!(parse_column_line(line, &pk(&[])), None, "{line}");
        }
    }

    #[test]
    fn test_parse_columns_preserves_order() {
        let body = "\n  `b` int,\n  `a` int,\n  KEY `i` (`a`),\n  `c` text\n";
        let names: Vec<_> = parse_columns(body, &pk(&[]))
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
