use crate::constants::CHILD_OF;
use crate::normalize::Normalizer;
use crate::scheme::{CodeScheme, UNKNOWN_LEVEL};
use crate::tabular::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Canonical column order for entity files.
pub const ENTITY_COLUMNS: [&str; 6] = ["ns", "type", "id", "name", "description", "code"];

/// One classified entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardRecord {
    pub ns: String,
    pub entity_type: String,
    pub id: String,
    pub name: String,
    pub description: String,
    pub code: String,
}

impl StandardRecord {
    pub fn columns() -> Vec<String> {
        ENTITY_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    pub fn to_row(&self) -> Row {
        vec![
            ("ns".to_string(), self.ns.clone()),
            ("type".to_string(), self.entity_type.clone()),
            ("id".to_string(), self.id.clone()),
            ("name".to_string(), self.name.clone()),
            ("description".to_string(), self.description.clone()),
            ("code".to_string(), self.code.clone()),
        ]
    }

    // Natural keys transforms deduplicate on.
    pub fn code_key(&self) -> String {
        self.code.clone()
    }

    pub fn name_key(&self) -> String {
        self.name.clone()
    }

    pub fn code_name_key(&self) -> String {
        format!("{}|{}", self.code, self.name)
    }
}

/// Whether a relationship file references entities by canonical id or by
/// scheme-native code; it decides the endpoint column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointKind {
    Id,
    Code,
}

/// A directed, typed edge between two entities, optionally carrying extra
/// scalar attribute columns after `relationshipType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub from_ns: String,
    pub from_type: String,
    pub from_key: String,
    pub to_ns: String,
    pub to_type: String,
    pub to_key: String,
    pub relationship_type: String,
    pub key_kind: EndpointKind,
    pub extras: Vec<(String, String)>,
}

impl RelationshipRecord {
    pub fn by_id(
        from_ns: &str,
        from_type: &str,
        from_id: &str,
        to_ns: &str,
        to_type: &str,
        to_id: &str,
        relationship_type: &str,
    ) -> Self {
        Self::new(
            from_ns,
            from_type,
            from_id,
            to_ns,
            to_type,
            to_id,
            relationship_type,
            EndpointKind::Id,
        )
    }

    pub fn by_code(
        from_ns: &str,
        from_type: &str,
        from_code: &str,
        to_ns: &str,
        to_type: &str,
        to_code: &str,
        relationship_type: &str,
    ) -> Self {
        Self::new(
            from_ns,
            from_type,
            from_code,
            to_ns,
            to_type,
            to_code,
            relationship_type,
            EndpointKind::Code,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        from_ns: &str,
        from_type: &str,
        from_key: &str,
        to_ns: &str,
        to_type: &str,
        to_key: &str,
        relationship_type: &str,
        key_kind: EndpointKind,
    ) -> Self {
        Self {
            from_ns: from_ns.to_string(),
            from_type: from_type.to_string(),
            from_key: from_key.to_string(),
            to_ns: to_ns.to_string(),
            to_type: to_type.to_string(),
            to_key: to_key.to_string(),
            relationship_type: relationship_type.to_string(),
            key_kind,
            extras: Vec::new(),
        }
    }

    /// Append an extra attribute column (e.g. a percentage).
    pub fn with_extra(mut self, column: &str, value: &str) -> Self {
        self.extras.push((column.to_string(), value.to_string()));
        self
    }

    /// Column order for this record: the canonical relationship columns with
    /// endpoint names matching the key kind, then any extras.
    pub fn columns(&self) -> Vec<String> {
        let (from_col, to_col) = match self.key_kind {
            EndpointKind::Id => ("fromId", "toId"),
            EndpointKind::Code => ("fromCode", "toCode"),
        };
        let mut columns = vec![
            "fromNs".to_string(),
            "fromType".to_string(),
            from_col.to_string(),
            "toNs".to_string(),
            "toType".to_string(),
            to_col.to_string(),
            "relationshipType".to_string(),
        ];
        columns.extend(self.extras.iter().map(|(c, _)| c.clone()));
        columns
    }

    pub fn to_row(&self) -> Row {
        let (from_col, to_col) = match self.key_kind {
            EndpointKind::Id => ("fromId", "toId"),
            EndpointKind::Code => ("fromCode", "toCode"),
        };
        let mut row = vec![
            ("fromNs".to_string(), self.from_ns.clone()),
            ("fromType".to_string(), self.from_type.clone()),
            (from_col.to_string(), self.from_key.clone()),
            ("toNs".to_string(), self.to_ns.clone()),
            ("toType".to_string(), self.to_type.clone()),
            (to_col.to_string(), self.to_key.clone()),
            ("relationshipType".to_string(), self.relationship_type.clone()),
        ];
        row.extend(self.extras.iter().cloned());
        row
    }

    /// Natural key for edge deduplication.
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.from_key, self.relationship_type, self.to_key
        )
    }
}

/// Insert-if-absent collection keyed by a natural key, preserving insertion
/// order. Every transform deduplicates through one of these before writing.
#[derive(Debug, Default)]
pub struct KeyedSet<T> {
    seen: HashSet<String>,
    items: Vec<T>,
}

impl<T> KeyedSet<T> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Insert unless the key is already present. Returns whether the item
    /// was kept.
    pub fn insert(&mut self, key: impl Into<String>, item: T) -> bool {
        if self.seen.insert(key.into()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

/// A source row already mapped to the minimal entity shape: a scheme-native
/// code, a display name, and an optional description.
#[derive(Debug, Clone)]
pub struct CodeEntity {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// The canonical entity mapper: turn coded entries into deduplicated
/// StandardRecords (id derived from the name) plus code-keyed `child_of`
/// edges for every code whose derived parent is non-null. Codes the scheme
/// does not recognize still become entities but never hierarchy edges.
pub fn map_code_entities(
    entries: &[CodeEntity],
    ns: &str,
    entity_type: &str,
    normalizer: &Normalizer,
    scheme: &CodeScheme,
) -> (Vec<StandardRecord>, Vec<RelationshipRecord>) {
    let mut entities: KeyedSet<StandardRecord> = KeyedSet::new();
    let mut edges: KeyedSet<RelationshipRecord> = KeyedSet::new();
    let mut unrecognized = 0usize;

    for entry in entries {
        if entry.code.is_empty() {
            continue;
        }
        let record = StandardRecord {
            ns: ns.to_string(),
            entity_type: entity_type.to_string(),
            id: normalizer.normalize(&entry.name),
            name: entry.name.clone(),
            description: entry.description.clone(),
            code: entry.code.clone(),
        };
        entities.insert(record.code_key(), record);

        if scheme.level(&entry.code) == UNKNOWN_LEVEL {
            unrecognized += 1;
            continue;
        }
        if let Some(parent) = scheme.parent(&entry.code) {
            let edge = RelationshipRecord::by_code(
                ns,
                entity_type,
                &entry.code,
                ns,
                entity_type,
                &parent,
                CHILD_OF,
            );
            edges.insert(edge.key(), edge);
        }
    }

    if unrecognized > 0 {
        debug!(
            "{} {} codes did not match any {} tier; no hierarchy edges emitted for them",
            unrecognized,
            entity_type,
            scheme.name()
        );
    }

    (entities.into_vec(), edges.into_vec())
}
