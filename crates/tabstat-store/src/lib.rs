//! Process-wide dataset store with derived-dataset lineage
//!
//! Uploaded tables live under opaque identifiers; cleaning and transform
//! operations produce new identifiers derived from existing ones so analyses
//! can chain (clean, remove outliers, scale, test) without ever mutating a
//! stored table.
//!
//! Records are immutable once inserted and handed out as [`Arc`] snapshots,
//! so a reader can never observe a table mid-write; the map itself is a
//! concurrent hash map, which keeps inserts atomic per entry while distinct
//! identifiers are read freely in parallel.
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Cell, Column, Table};
//! use tabstat_store::DatasetStore;
//!
//! let store = DatasetStore::new();
//! let table = Table::new(vec![Column::new("x", vec![Cell::Number(1.0)])]).unwrap();
//! let id = store.put(table.clone());
//!
//! let derived = store.derive(&id, "scaled_standard", table).unwrap();
//! let record = store.get(&derived).unwrap();
//! assert_eq!(record.lineage.as_ref().unwrap().sequence, 1);
//! ```

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tabstat_core::{Error, Result, Table};
use tracing::debug;
use uuid::Uuid;

/// Opaque identifier for a stored dataset
///
/// Identifiers are generated, never derived from user input, and never
/// reused for a different table within the store's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DatasetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How a derived dataset came to be
///
/// The identifier itself stays opaque; traceability lives here. Sequence
/// numbers start at 1 and increase each time the same operation is applied
/// to the same parent, so repeated operations never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    /// Identifier of the dataset this one was derived from
    pub parent: DatasetId,
    /// Tag of the operation that produced this dataset
    pub operation: String,
    /// 1-based count of this (parent, operation) application
    pub sequence: u64,
}

impl Lineage {
    /// Human-debuggable rendering: `parent/operation#sequence`
    pub fn label(&self) -> String {
        format!("{}/{}#{}", self.parent, self.operation, self.sequence)
    }
}

/// A stored table snapshot
///
/// Records are never updated in place; an operation that "cleans" data
/// always produces a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub id: DatasetId,
    pub table: Table,
    /// Absent for originally uploaded tables
    pub lineage: Option<Lineage>,
}

/// Mapping from opaque identifiers to immutable table snapshots
///
/// Created at service start; grows until [`DatasetStore::clear`] is called.
/// There is no per-record deletion.
#[derive(Debug, Default)]
pub struct DatasetStore {
    records: DashMap<DatasetId, Arc<DatasetRecord>>,
    sequences: DashMap<(DatasetId, String), u64>,
}

impl DatasetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly ingested table under a new identifier
    pub fn put(&self, table: Table) -> DatasetId {
        let id = DatasetId::generate();
        debug!(id = %id, rows = table.n_rows(), cols = table.n_cols(), "storing dataset");
        self.records.insert(
            id.clone(),
            Arc::new(DatasetRecord {
                id: id.clone(),
                table,
                lineage: None,
            }),
        );
        id
    }

    /// Fetch a record snapshot by identifier
    pub fn get(&self, id: &DatasetId) -> Result<Arc<DatasetRecord>> {
        self.records
            .get(id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| Error::DatasetNotFound(id.to_string()))
    }

    /// Store `table` as a dataset derived from `parent`
    ///
    /// Fails when the parent is absent. The derived table need not share
    /// shape with the parent.
    pub fn derive(&self, parent: &DatasetId, operation: &str, table: Table) -> Result<DatasetId> {
        if !self.records.contains_key(parent) {
            return Err(Error::DatasetNotFound(parent.to_string()));
        }
        let sequence = {
            let mut entry = self
                .sequences
                .entry((parent.clone(), operation.to_string()))
                .or_insert(0);
            *entry += 1;
            *entry
        };
        let lineage = Lineage {
            parent: parent.clone(),
            operation: operation.to_string(),
            sequence,
        };
        let id = DatasetId::generate();
        debug!(id = %id, lineage = %lineage.label(), "storing derived dataset");
        self.records.insert(
            id.clone(),
            Arc::new(DatasetRecord {
                id: id.clone(),
                table,
                lineage: Some(lineage),
            }),
        );
        Ok(id)
    }

    /// Whether the store holds the given identifier
    pub fn contains(&self, id: &DatasetId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Administrative reset: drop every record and all sequence counters
    pub fn clear(&self) {
        debug!(dropped = self.records.len(), "clearing dataset store");
        self.records.clear();
        self.sequences.clear();
    }
}
