//! Plain-text schema summary with display-width aware alignment.

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::ast::TableDefinition;
use crate::session::Session;

/// Display width in terminal cells. East Asian wide characters count as two.
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// `text` followed by enough spaces to fill `width` cells.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text_width(text));
    format!("{text}{}", " ".repeat(fill))
}

pub fn render_summary(session: &Session) -> String {
    let mut out = String::new();

    for (i, table) in session.schema().tables.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_table(&mut out, table);
    }

    let edges = session.edges();
    if !edges.is_empty() {
        out.push_str("\nrelationships:\n");
        let from_width = edges.iter().map(|e| text_width(&e.from)).max().unwrap_or(0);
        for edge in edges {
            writeln!(
                out,
                "  {} -> {} ({})",
                pad(&edge.from, from_width),
                edge.to,
                edge.column
            )
            .unwrap();
        }
    }

    for skipped in session.skipped() {
        writeln!(out, "skipped: {} [{}]", skipped.excerpt, skipped.reason).unwrap();
    }

    out
}

fn render_table(out: &mut String, table: &TableDefinition) {
    if table.comment.is_empty() {
        writeln!(out, "{}", table.name).unwrap();
    } else {
        writeln!(out, "{}  -- {}", table.name, table.comment).unwrap();
    }

    let name_width = table.columns.iter().map(|c| text_width(&c.name)).max().unwrap_or(0);
    let type_width = table.columns.iter().map(|c| text_width(&c.typ)).max().unwrap_or(0);

    for column in &table.columns {
        let flags = match (column.is_primary_key, column.is_nullable) {
            (true, _) => "PK",
            (false, false) => "NN",
            (false, true) => "  ",
        };
        let line = format!(
            "  {} {} {} {}",
            flags,
            pad(&column.name, name_width),
            pad(&column.typ, type_width),
            column.comment
        );
        writeln!(out, "{}", line.trim_end()).unwrap();
    }
}
