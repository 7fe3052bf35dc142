//! Selection state and the highlight/dim flags derived from it.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::ast::ParsedSchema;
use crate::relations::Relationship;

/// Order-independent shape of an edge set: its distinct `(from, to)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyFingerprint(BTreeSet<(String, String)>);

impl TopologyFingerprint {
    pub fn of(edges: &[Relationship]) -> Self {
        Self(
            edges
                .iter()
                .map(|e| (e.from.clone(), e.to.clone()))
                .collect(),
        )
    }
}

/// Undirected neighbor sets keyed by table id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyIndex {
    neighbors: HashMap<String, HashSet<String>>,
}

impl AdjacencyIndex {
    pub fn build(edges: &[Relationship]) -> Self {
        let mut neighbors: HashMap<String, HashSet<String>> = HashMap::new();
        for edge in edges {
            neighbors
                .entry(edge.from.clone())
                .or_default()
                .insert(edge.to.clone());
            neighbors
                .entry(edge.to.clone())
                .or_default()
                .insert(edge.from.clone());
        }
        Self { neighbors }
    }

    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors.get(a).is_some_and(|set| set.contains(b))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Nothing,
    Node(String),
}

impl Selection {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Nothing => None,
            Self::Node(id) => Some(id.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableHighlight {
    pub id: String,
    pub selected: bool,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeHighlight {
    pub from: String,
    pub to: String,
    pub column: String,
    pub dimmed: bool,
}

/// Per-table and per-edge flags for one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightView {
    pub selected: Option<String>,
    pub tables: Vec<TableHighlight>,
    pub edges: Vec<EdgeHighlight>,
}

/// Holds the current selection and an adjacency index memoized on edge topology.
#[derive(Debug, Default)]
pub struct HighlightEngine {
    fingerprint: Option<TopologyFingerprint>,
    adjacency: AdjacencyIndex,
    selection: Selection,
    rebuilds: usize,
}

impl HighlightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edges(edges: &[Relationship]) -> Self {
        let mut engine = Self::new();
        engine.sync_edges(edges);
        engine
    }

    /// Rebuild the adjacency index if the topology of `edges` changed.
    /// Returns whether a rebuild happened.
    pub fn sync_edges(&mut self, edges: &[Relationship]) -> bool {
        let fingerprint = TopologyFingerprint::of(edges);
        if self.fingerprint.as_ref() == Some(&fingerprint) {
            return false;
        }
        self.adjacency = AdjacencyIndex::build(edges);
        self.fingerprint = Some(fingerprint);
        self.rebuilds += 1;
        tracing::debug!(
            nodes = self.adjacency.neighbors.len(),
            rebuilds = self.rebuilds,
            "rebuilt adjacency index"
        );
        true
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Number of adjacency rebuilds so far.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selection = Selection::Node(id.into());
    }

    /// Canvas click: back to nothing selected.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::Nothing;
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.id() == Some(id)
    }

    pub fn is_table_dimmed(&self, id: &str) -> bool {
        match self.selection.id() {
            None => false,
            Some(selected) => selected != id && !self.adjacency.are_adjacent(selected, id),
        }
    }

    pub fn is_edge_dimmed(&self, from: &str, to: &str) -> bool {
        match self.selection.id() {
            None => false,
            Some(selected) => selected != from && selected != to,
        }
    }

    pub fn view(&self, schema: &ParsedSchema, edges: &[Relationship]) -> HighlightView {
        HighlightView {
            selected: self.selection.id().map(str::to_string),
            tables: schema
                .table_ids()
                .map(|id| TableHighlight {
                    id: id.to_string(),
                    selected: self.is_selected(id),
                    dimmed: self.is_table_dimmed(id),
                })
                .collect(),
            edges: edges
                .iter()
                .map(|e| EdgeHighlight {
                    from: e.from.clone(),
                    to: e.to.clone(),
                    column: e.column.clone(),
                    dimmed: self.is_edge_dimmed(&e.from, &e.to),
                })
                .collect(),
        }
    }
}
