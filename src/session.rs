//! Interactive session: one schema, its inferred edges and the current selection.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::ast::ParsedSchema;
use crate::config::InferenceConfig;
use crate::highlight::{HighlightEngine, HighlightView, Selection};
use crate::relations::{Relationship, RelationshipInferrer};
use crate::sql::{Extraction, SkippedBlock, extract_schema};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("no tables found")]
    NoTablesFound,
    #[error("failed to parse")]
    Failed,
}

/// Owns every piece of derived state. A load either replaces all of it or none of it.
pub struct Session {
    inferrer: RelationshipInferrer,
    extraction: Extraction,
    edges: Vec<Relationship>,
    highlight: HighlightEngine,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&InferenceConfig::default())
    }
}

impl Session {
    pub fn new(config: &InferenceConfig) -> Self {
        Self::with_inferrer(RelationshipInferrer::from_config(config))
    }

    pub fn with_inferrer(inferrer: RelationshipInferrer) -> Self {
        Self {
            inferrer,
            extraction: Extraction::default(),
            edges: Vec::new(),
            highlight: HighlightEngine::new(),
        }
    }

    /// Parse `input` and replace the session state with the result.
    ///
    /// On error the previously loaded schema stays in place.
    pub fn load(&mut self, input: &str) -> Result<&ParsedSchema, LoadError> {
        let inferrer = &self.inferrer;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let extraction = extract_schema(input);
            let edges = inferrer.infer(&extraction.schema);
            (extraction, edges)
        }));

        let (extraction, edges) = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                tracing::warn!(%message, "DDL extraction panicked");
                return Err(LoadError::Failed);
            }
        };

        if extraction.schema.is_empty() {
            tracing::warn!(skipped = extraction.skipped.len(), "no tables found in input");
            return Err(LoadError::NoTablesFound);
        }

        tracing::info!(
            tables = extraction.schema.len(),
            edges = edges.len(),
            skipped = extraction.skipped.len(),
            "loaded schema"
        );

        self.extraction = extraction;
        self.edges = edges;
        self.highlight.sync_edges(&self.edges);
        self.highlight.clear_selection();
        Ok(&self.extraction.schema)
    }

    pub fn schema(&self) -> &ParsedSchema {
        &self.extraction.schema
    }

    pub fn edges(&self) -> &[Relationship] {
        &self.edges
    }

    /// Blocks dropped by the last successful load.
    pub fn skipped(&self) -> &[SkippedBlock] {
        &self.extraction.skipped
    }

    pub fn highlight(&self) -> &HighlightEngine {
        &self.highlight
    }

    /// Node click. `None` is a click on empty canvas.
    pub fn select(&mut self, id: Option<&str>) {
        match id {
            Some(id) => self.highlight.select(id),
            None => self.highlight.clear_selection(),
        }
    }

    pub fn selection(&self) -> &Selection {
        self.highlight.selection()
    }

    pub fn highlight_view(&self) -> HighlightView {
        self.highlight.view(self.schema(), &self.edges)
    }
}
