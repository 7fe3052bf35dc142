//! Name-based relationship inference.
//!
//! The extracted schema carries no foreign keys, so references are recovered
//! from naming alone: a column that shares its name with another table's
//! primary key column is taken to point at that table.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::ast::ParsedSchema;
use crate::config::{InferenceConfig, PinnedOwner};

/// Directed inferred reference from `from` to `to`, triggered by `column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub column: String,
}

/// Verdict of one ownership rule when two tables key the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The table already registered keeps the column.
    Keep,
    /// The table encountered later takes the column over.
    Replace,
    /// No opinion; ask the next rule.
    Abstain,
}

/// One tie-break rule for key ownership.
pub trait OwnershipRule {
    fn claim(&self, column: &str, incumbent: &str, challenger: &str) -> Claim;
}

impl OwnershipRule for PinnedOwner {
    fn claim(&self, column: &str, incumbent: &str, challenger: &str) -> Claim {
        if !column.eq_ignore_ascii_case(&self.column) {
            return Claim::Abstain;
        }
        if incumbent.eq_ignore_ascii_case(&self.table) {
            Claim::Keep
        } else if challenger.eq_ignore_ascii_case(&self.table) {
            Claim::Replace
        } else {
            Claim::Abstain
        }
    }
}

/// Ranked tie-break rules. When every rule abstains the first declared table wins.
#[derive(Default)]
pub struct KeyOwnershipPolicy {
    rules: Vec<Box<dyn OwnershipRule>>,
}

impl KeyOwnershipPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule ranked below the existing ones.
    pub fn with_rule(mut self, rule: impl OwnershipRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    fn should_replace(&self, column: &str, incumbent: &str, challenger: &str) -> bool {
        self.rules
            .iter()
            .map(|rule| rule.claim(column, incumbent, challenger))
            .find(|claim| *claim != Claim::Abstain)
            == Some(Claim::Replace)
    }
}

pub struct RelationshipInferrer {
    excluded: HashSet<String>,
    policy: KeyOwnershipPolicy,
}

impl Default for RelationshipInferrer {
    fn default() -> Self {
        Self::from_config(&InferenceConfig::default())
    }
}

impl RelationshipInferrer {
    pub fn new(excluded: impl IntoIterator<Item = String>, policy: KeyOwnershipPolicy) -> Self {
        Self {
            excluded: excluded
                .into_iter()
                .map(|name| name.to_ascii_uppercase())
                .collect(),
            policy,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        let policy = config
            .pinned_owners
            .iter()
            .cloned()
            .fold(KeyOwnershipPolicy::new(), |policy, pin| policy.with_rule(pin));
        Self::new(config.excluded_columns.iter().cloned(), policy)
    }

    pub fn is_excluded(&self, column: &str) -> bool {
        self.excluded.contains(&column.to_ascii_uppercase())
    }

    /// Map from key column name to the table that provides it.
    pub fn key_providers<'s>(&self, schema: &'s ParsedSchema) -> HashMap<&'s str, &'s str> {
        let mut providers: HashMap<&str, &str> = HashMap::new();

        for table in &schema.tables {
            for column in table.primary_key_columns() {
                let name = column.name.as_str();
                if self.is_excluded(name) || name.eq_ignore_ascii_case("ID") {
                    continue;
                }
                let take = match providers.get(name).copied() {
                    None => true,
                    Some(incumbent) => self.policy.should_replace(name, incumbent, &table.id),
                };
                if take {
                    providers.insert(name, table.id.as_str());
                }
            }
        }

        providers
    }

    /// Infer one edge per referencing column, in schema then column order.
    pub fn infer(&self, schema: &ParsedSchema) -> Vec<Relationship> {
        let providers = self.key_providers(schema);
        let mut relationships = Vec::new();

        for table in &schema.tables {
            for column in &table.columns {
                if self.is_excluded(&column.name) {
                    continue;
                }
                let Some(&owner) = providers.get(column.name.as_str()) else {
                    continue;
                };
                if owner == table.id {
                    continue;
                }
                relationships.push(Relationship {
                    from: table.id.clone(),
                    to: owner.to_string(),
                    column: column.name.clone(),
                });
            }
        }

        relationships
    }
}

/// Infer relationships with the built-in exclusions and ownership pins.
pub fn infer_relationships(schema: &ParsedSchema) -> Vec<Relationship> {
    RelationshipInferrer::default().infer(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::extract_schema;

    fn schema(sql: &str) -> ParsedSchema {
        extract_schema(sql).schema
    }

    fn edges(rels: &[Relationship]) -> Vec<(&str, &str, &str)> {
        rels.iter()
            .map(|r| (r.from.as_str(), r.to.as_str(), r.column.as_str()))
            .collect()
    }

    #[test]
    fn test_shared_key_name_creates_edge() {
        let s = schema(
            "CREATE TABLE t1 (\n`A` int NOT NULL,\nPRIMARY KEY (`A`)\n);\nCREATE TABLE t2 (\n`A` int\n);",
        );
        let rels = infer_relationships(&s);
        assert_eq!(edges(&rels), [("t2", "t1", "A")]);
    }

    #[test]
    fn test_excluded_key_never_links() {
        let s = schema(
            "CREATE TABLE co (\n`COMPANY` varchar(20),\nPRIMARY KEY (`COMPANY`)\n);\nCREATE TABLE t (\n`COMPANY` varchar(20),\n`company` varchar(20)\n);",
        );
        assert!(infer_relationships(&s).is_empty());
    }

    #[test]
    fn test_id_column_is_not_a_provider() {
        let s = schema(
            "CREATE TABLE a (\nid bigint,\nPRIMARY KEY (id)\n);\nCREATE TABLE b (\nId bigint\n);",
        );
        assert!(infer_relationships(&s).is_empty());
    }

    #[test]
    fn test_no_self_loops_and_no_dedup() {
        let s = schema(
            "CREATE TABLE a (\n`K` int,\n`L` int,\nPRIMARY KEY (`K`, `L`)\n);\nCREATE TABLE b (\n`K` int,\n`L` int\n);",
        );
        let rels = infer_relationships(&s);
        assert_eq!(edges(&rels), [("b", "a", "K"), ("b", "a", "L")]);
    }

    #[test]
    fn test_first_declared_table_owns_shared_key() {
        let s = schema(
            "CREATE TABLE first (\n`K` int,\nPRIMARY KEY (`K`)\n);\nCREATE TABLE second (\n`K` int,\nPRIMARY KEY (`K`)\n);",
        );
        let rels = infer_relationships(&s);
        assert_eq!(edges(&rels), [("second", "first", "K")]);
    }

    #[test]
    fn test_pinned_master_takes_over_regardless_of_order() {
        let s = schema(
            "CREATE TABLE CIF_ADDRESS (\n`CLIENT_NO` varchar(20),\nPRIMARY KEY (`CLIENT_NO`)\n);\n\
             CREATE TABLE CIF_CLIENT (\n`CLIENT_NO` varchar(20),\nPRIMARY KEY (`CLIENT_NO`)\n);\n\
             CREATE TABLE CIF_DOCUMENT (\n`CLIENT_NO` varchar(20),\nPRIMARY KEY (`CLIENT_NO`)\n);",
        );
        let rels = infer_relationships(&s);
        assert_eq!(
            edges(&rels),
            [
                ("CIF_ADDRESS", "CIF_CLIENT", "CLIENT_NO"),
                ("CIF_DOCUMENT", "CIF_CLIENT", "CLIENT_NO")
            ]
        );
    }

    #[test]
    fn test_custom_rule_ranks_below_pins() {
        struct LastWins;
        impl OwnershipRule for LastWins {
            fn claim(&self, _: &str, _: &str, _: &str) -> Claim {
                Claim::Replace
            }
        }

        let policy = KeyOwnershipPolicy::new()
            .with_rule(PinnedOwner::new("K", "a"))
            .with_rule(LastWins);
        let inferrer = RelationshipInferrer::new(Vec::new(), policy);

        let s = schema(
            "CREATE TABLE a (\n`K` int,\n`M` int,\nPRIMARY KEY (`K`, `M`)\n);\nCREATE TABLE b (\n`K` int,\n`M` int,\nPRIMARY KEY (`K`, `M`)\n);",
        );
        let providers = inferrer.key_providers(&s);
        assert_eq!(providers["K"], "a");
        assert_eq!(providers["M"], "b");
    }

    #[test]
    fn test_config_exclusions() {
        let config = InferenceConfig {
            excluded_columns: vec!["a".to_string()],
            ..InferenceConfig::empty()
        };
        let inferrer = RelationshipInferrer::from_config(&config);
        let s = schema("CREATE TABLE t1 (\n`A` int,\nPRIMARY KEY (`A`)\n);\nCREATE TABLE t2 (\n`A` int\n);");
        assert!(inferrer.infer(&s).is_empty());
        let unfiltered = RelationshipInferrer::from_config(&InferenceConfig::empty());
        assert_eq!(unfiltered.infer(&s).len(), 1);
    }
}
