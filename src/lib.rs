pub mod ast;
pub mod config;
pub mod highlight;
pub mod ir;
pub mod relations;
pub mod report;
pub mod session;
pub mod sql;

use wasm_bindgen::prelude::*;

use config::InferenceConfig;
use ir::{DetailLevel, GraphIR};
use session::Session;

pub use ast::{ColumnDefinition, ParsedSchema, TableDefinition};
pub use highlight::{HighlightEngine, Selection};
pub use relations::{Relationship, infer_relationships};
pub use session::LoadError;
pub use sql::{Extraction, extract_schema};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn parse_config(config: Option<String>) -> Result<InferenceConfig, String> {
    match config.as_deref() {
        Some(json) => InferenceConfig::from_json_str(json).map_err(|e| e.to_string()),
        None => Ok(InferenceConfig::default()),
    }
}

fn parse_detail(detail: Option<String>) -> DetailLevel {
    detail
        .as_deref()
        .and_then(DetailLevel::from_str)
        .unwrap_or_default()
}

/// Convert a DDL dump to a JSON graph document (nodes, inferred edges, skipped blocks).
#[wasm_bindgen(js_name = "ddlToGraph")]
pub fn ddl_to_graph(
    source: &str,
    config: Option<String>,
    detail: Option<String>,
) -> Result<String, String> {
    let mut session = Session::new(&parse_config(config)?);
    session.load(source).map_err(|e| e.to_string())?;

    let ir = GraphIR::from_session(&session, parse_detail(detail));
    serde_json::to_string(&ir).map_err(|e| e.to_string())
}

/// Stateful diagram handle for a renderer: load text, route clicks, read highlight flags.
#[wasm_bindgen]
pub struct DdlDiagram {
    session: Session,
}

#[wasm_bindgen]
impl DdlDiagram {
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<DdlDiagram, String> {
        Ok(Self {
            session: Session::new(&parse_config(config)?),
        })
    }

    /// Replace the diagram with `source`. Returns the table count.
    pub fn load(&mut self, source: &str) -> Result<usize, String> {
        self.session
            .load(source)
            .map(|schema| schema.len())
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "graphJson")]
    pub fn graph_json(&self, detail: Option<String>) -> Result<String, String> {
        let ir = GraphIR::from_session(&self.session, parse_detail(detail)).with_highlight(&self.session);
        serde_json::to_string(&ir).map_err(|e| e.to_string())
    }

    /// Node click; `undefined` is a click on empty canvas.
    pub fn select(&mut self, id: Option<String>) {
        self.session.select(id.as_deref());
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&mut self) {
        self.session.select(None);
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<String> {
        self.session.selection().id().map(str::to_string)
    }

    #[wasm_bindgen(js_name = "isTableDimmed")]
    pub fn is_table_dimmed(&self, id: &str) -> bool {
        self.session.highlight().is_table_dimmed(id)
    }

    #[wasm_bindgen(js_name = "isEdgeDimmed")]
    pub fn is_edge_dimmed(&self, from: &str, to: &str) -> bool {
        self.session.highlight().is_edge_dimmed(from, to)
    }

    #[wasm_bindgen(js_name = "dimmedTables")]
    pub fn dimmed_tables(&self) -> js_sys::Array {
        let highlight = self.session.highlight();
        self.session
            .schema()
            .table_ids()
            .filter(|id| highlight.is_table_dimmed(id))
            .map(JsValue::from_str)
            .collect()
    }

    #[wasm_bindgen(js_name = "highlightJson")]
    pub fn highlight_json(&self) -> Result<String, String> {
        serde_json::to_string(&self.session.highlight_view()).map_err(|e| e.to_string())
    }
}
