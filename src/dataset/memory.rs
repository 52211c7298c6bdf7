use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{ColumnScan, Dataset, Relation, RelationScan, Value, ValueRef};
use crate::set::{EntityId, EntitySet};

/// One catalog entity with its scalar fields and relation rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl EntityRecord {
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn field(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }

    #[must_use]
    pub fn color(mut self, name: impl Into<String>) -> Self {
        self.colors.push(name.into());
        self
    }

    fn relation(&self, relation: Relation) -> &[String] {
        match relation {
            Relation::Tag => &self.tags,
            Relation::Color => &self.colors,
        }
    }
}

/// Serialized form accepted by [`MemoryDataset::from_json`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatasetDocument {
    /// Declared schema; columns only present in entity fields are added too.
    #[serde(default)]
    pub columns: Vec<String>,
    pub entities: Vec<EntityRecord>,
}

/// In-memory [`Dataset`] keyed by entity id.
#[derive(Clone, Debug, Default)]
pub struct MemoryDataset {
    columns: BTreeSet<String>,
    entities: BTreeMap<EntityId, EntityRecord>,
}

impl MemoryDataset {
    #[must_use]
    pub fn builder() -> MemoryDatasetBuilder {
        MemoryDatasetBuilder::default()
    }

    /// Loads a dataset from a JSON [`DatasetDocument`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let document: DatasetDocument = serde_json::from_str(json)?;
        Ok(Self::from(document))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    /// Resolves a result set back to the owned records, in id order.
    pub fn records<'a>(
        &'a self,
        set: &'a EntitySet,
    ) -> impl Iterator<Item = &'a EntityRecord> + 'a {
        set.iter().filter_map(move |id| self.entities.get(&id))
    }
}

impl From<DatasetDocument> for MemoryDataset {
    fn from(document: DatasetDocument) -> Self {
        document
            .entities
            .into_iter()
            .fold(
                MemoryDataset::builder().columns(document.columns),
                MemoryDatasetBuilder::entity,
            )
            .build()
    }
}

impl Dataset for MemoryDataset {
    fn universe(&self) -> EntitySet {
        self.entities.keys().copied().collect()
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    fn scan_column(&self, column: &str) -> Option<ColumnScan<'_>> {
        let column = self.columns.get(column)?.as_str();
        Some(Box::new(self.entities.values().map(move |record| {
            let value = record
                .fields
                .get(column)
                .map_or(ValueRef::Null, Value::as_ref);
            (record.id, value)
        })))
    }

    fn relation_rows(&self, relation: Relation) -> RelationScan<'_> {
        Box::new(self.entities.values().flat_map(move |record| {
            record
                .relation(relation)
                .iter()
                .map(move |name| (record.id, name.as_str()))
        }))
    }
}

/// Incremental builder for [`MemoryDataset`].
#[derive(Debug, Default)]
pub struct MemoryDatasetBuilder {
    columns: BTreeSet<String>,
    entities: BTreeMap<EntityId, EntityRecord>,
}

impl MemoryDatasetBuilder {
    /// Declares a column even if no entity carries a value for it.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(column.into());
        self
    }

    #[must_use]
    pub fn columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        columns.into_iter().fold(self, Self::column)
    }

    /// Adds an entity, replacing any previous record with the same id.
    #[must_use]
    pub fn entity(mut self, record: EntityRecord) -> Self {
        self.columns.extend(record.fields.keys().cloned());
        self.entities.insert(record.id, record);
        self
    }

    #[must_use]
    pub fn build(self) -> MemoryDataset {
        MemoryDataset {
            columns: self.columns,
            entities: self.entities,
        }
    }
}
