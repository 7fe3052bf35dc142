use std::collections::HashSet;

use serde::Serialize;

use crate::highlight::HighlightView;
use crate::relations::Relationship;
use crate::session::Session;
use crate::sql::SkippedBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    Tables,
    Pk,
    PkFk,
    #[default]
    All,
}

impl DetailLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tables" => Some(Self::Tables),
            "pk" => Some(Self::Pk),
            "pk_fk" => Some(Self::PkFk),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Renderer-facing graph document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphIR {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub skipped: Vec<SkippedBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub comment: String,
    pub columns: Vec<ColumnIR>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnIR {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub comment: String,
    pub is_pk: bool,
    /// The column triggered at least one inferred edge out of its table.
    pub is_fk: bool,
    pub is_nullable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub column: String,
}

impl From<&Relationship> for Edge {
    fn from(r: &Relationship) -> Self {
        Edge {
            from: r.from.clone(),
            to: r.to.clone(),
            column: r.column.clone(),
        }
    }
}

impl GraphIR {
    pub fn from_session(session: &Session, detail: DetailLevel) -> Self {
        let fk_columns: HashSet<(&str, &str)> = session
            .edges()
            .iter()
            .map(|r| (r.from.as_str(), r.column.as_str()))
            .collect();

        let nodes = session
            .schema()
            .tables
            .iter()
            .map(|t| {
                let columns = t
                    .columns
                    .iter()
                    .filter_map(|c| {
                        let is_pk = c.is_primary_key;
                        let is_fk = fk_columns.contains(&(t.id.as_str(), c.name.as_str()));

                        let include = match detail {
                            DetailLevel::Tables => false,
                            DetailLevel::Pk => is_pk,
                            DetailLevel::PkFk => is_pk || is_fk,
                            DetailLevel::All => true,
                        };

                        include.then(|| ColumnIR {
                            name: c.name.clone(),
                            typ: c.typ.clone(),
                            comment: c.comment.clone(),
                            is_pk,
                            is_fk,
                            is_nullable: c.is_nullable,
                        })
                    })
                    .collect();

                Node {
                    id: t.id.clone(),
                    label: t.name.clone(),
                    comment: t.comment.clone(),
                    columns,
                }
            })
            .collect();

        GraphIR {
            nodes,
            edges: session.edges().iter().map(Edge::from).collect(),
            skipped: session.skipped().to_vec(),
            highlight: None,
        }
    }

    /// Attach the session's current highlight flags.
    pub fn with_highlight(mut self, session: &Session) -> Self {
        self.highlight = Some(session.highlight_view());
        self
    }
}
