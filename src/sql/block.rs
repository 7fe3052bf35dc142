//! Splitting a dump into `CREATE TABLE` blocks and locating each table body.

use std::sync::LazyLock;

use regex::Regex;

use super::lexer::{Scanner, find_matching_paren};
use super::{SkipReason, SkippedBlock, comment_literal};

static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCREATE\s+TABLE\b").expect("valid pattern"));

static TABLE_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCOMMENT\s*=\s*'((?:[^'\\]|\\.|'')*)'").expect("valid pattern")
});

/// Longest excerpt kept for a skipped block.
const EXCERPT_LEN: usize = 60;

/// One table-definition fragment with its body located.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    pub name: String,
    pub body: &'a str,
    pub trailing: &'a str,
}

impl Block<'_> {
    /// Table-level comment from the first `COMMENT = '...'` after the body.
    pub fn comment(&self) -> String {
        comment_literal(&TABLE_COMMENT, self.trailing)
    }
}

/// Split `input` into blocks. Fragments that cannot be read are reported in `skipped`.
pub fn split_blocks<'a>(input: &'a str, skipped: &mut Vec<SkippedBlock>) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();

    // The first fragment is whatever precedes the first CREATE TABLE.
    for fragment in CREATE_TABLE.split(input).skip(1) {
        match read_block(fragment) {
            Ok(block) => blocks.push(block),
            Err(reason) => {
                let excerpt = excerpt(fragment);
                tracing::debug!(%reason, %excerpt, "skipping CREATE TABLE block");
                skipped.push(SkippedBlock { reason, excerpt });
            }
        }
    }

    blocks
}

fn read_block(fragment: &str) -> Result<Block<'_>, SkipReason> {
    let name = read_table_name(fragment).ok_or(SkipReason::MissingName)?;
    let open = fragment.find('(').ok_or(SkipReason::MissingBody)?;
    let close = find_matching_paren(fragment, open).ok_or(SkipReason::UnbalancedBody)?;

    Ok(Block {
        name,
        body: &fragment[open + 1..close],
        trailing: &fragment[close + 1..],
    })
}

/// Table name after `CREATE TABLE`, skipping `IF NOT EXISTS` and a schema qualifier.
fn read_table_name(fragment: &str) -> Option<String> {
    let mut scanner = Scanner::new(fragment);
    scanner.skip_whitespace();

    if scanner.eat_keyword("IF") {
        scanner.skip_whitespace();
        scanner.eat_keyword("NOT");
        scanner.skip_whitespace();
        scanner.eat_keyword("EXISTS");
        scanner.skip_whitespace();
    }

    let mut name = scanner.read_identifier()?;
    if scanner.eat_char('.') {
        if let Some(table) = scanner.read_identifier() {
            name = table;
        }
    }
    Some(name)
}

fn excerpt(fragment: &str) -> String {
    let line = fragment.split_whitespace().collect::<Vec<_>>().join(" ");
    match line.char_indices().nth(EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line,
    }
}
