use serde::Serialize;

/// Type recorded for a column line whose remainder has no recognizable type token.
pub const UNKNOWN_TYPE: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedSchema {
    pub tables: Vec<TableDefinition>,
}

impl ParsedSchema {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// First table with the given id. Duplicate ids are possible; later ones are shadowed.
    pub fn table(&self, id: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            comment: comment.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub comment: String,
    pub is_primary_key: bool,
    pub is_nullable: bool,
}
