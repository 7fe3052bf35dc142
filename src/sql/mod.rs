//! MySQL-style DDL dump to schema extraction.
//!
//! Extraction is tolerant: it is a pipeline of small scanners rather than a
//! grammar. Each `CREATE TABLE` fragment is located independently, and a
//! fragment that cannot be read is dropped with a [`SkippedBlock`]
//! diagnostic instead of failing the whole dump.

mod block;
mod column;
mod lexer;
mod primary_key;

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::ast::{ParsedSchema, TableDefinition};

pub use block::{Block, split_blocks};
pub use column::{parse_column_line, parse_columns};
pub use primary_key::resolve_primary_key;

/// Why a `CREATE TABLE` fragment produced no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    MissingName,
    MissingBody,
    UnbalancedBody,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingName => "no table name",
            Self::MissingBody => "no parenthesized body",
            Self::UnbalancedBody => "unbalanced parentheses",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    pub reason: SkipReason,
    /// Leading text of the fragment, whitespace collapsed.
    pub excerpt: String,
}

/// Result of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub schema: ParsedSchema,
    pub skipped: Vec<SkippedBlock>,
}

/// Extract every readable table definition from a dump, in dump order.
pub fn extract_schema(input: &str) -> Extraction {
    let mut skipped = Vec::new();
    let tables = split_blocks(input, &mut skipped)
        .iter()
        .map(assemble_table)
        .collect();

    Extraction {
        schema: ParsedSchema { tables },
        skipped,
    }
}

fn assemble_table(block: &Block<'_>) -> TableDefinition {
    let primary_key = resolve_primary_key(block.body);
    let mut table = TableDefinition::new(block.name.clone(), block.comment());
    table.columns = parse_columns(block.body, &primary_key);
    table
}

/// First quoted literal captured by `pattern` in `text`, with SQL escapes undone.
fn comment_literal(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .map(|caps| unescape(&caps[1]))
        .unwrap_or_default()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            _ => out.push(c),
        }
    }
    out
}
