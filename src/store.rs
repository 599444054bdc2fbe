use anyhow::Result;
use serde_json::{Map, Value, json};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error, warn};

use crate::controller::ViewState;
use crate::error::SnapshotError;
use crate::filter::{FilterCategory, FilterState};
use crate::sort::{SortDirection, SortField, SortState};

/// Storage key the view-state snapshot lives under.
pub const SNAPSHOT_KEY: &str = "jobFilters";

/// Durable string key/value storage for the client session.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Saves and restores the view state. Never fails: problems are logged and
/// the caller gets defaults.
pub struct Persistence<S> {
    store: S,
}

impl<S: SnapshotStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self, state: &ViewState) {
        let blob = encode_snapshot(state);
        match self.store.write(SNAPSHOT_KEY, &blob) {
            Ok(()) => debug!(bytes = blob.len(), "saved view state"),
            Err(e) => error!("Failed to save view state: {:#}", e),
        }
    }

    /// `None` when nothing was ever saved. Corrupt or unreadable snapshots
    /// come back as the default state.
    pub fn load(&self) -> Option<ViewState> {
        let blob = match self.store.read(SNAPSHOT_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read view state, using defaults: {:#}", e);
                return Some(ViewState::default());
            }
        };

        match decode_snapshot(&blob) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Error loading filters from storage, using defaults: {}", e);
                Some(ViewState::default())
            }
        }
    }
}

pub fn encode_snapshot(state: &ViewState) -> String {
    json!({
        "filters": state.filters,
        "sort": state.sort,
    })
    .to_string()
}

/// Parses a snapshot, merging whatever is usable with defaults field by field.
/// Only a blob that isn't a JSON object at all is an error.
pub fn decode_snapshot(blob: &str) -> Result<ViewState, SnapshotError> {
    let root: Value = serde_json::from_str(blob)?;
    let Value::Object(root) = root else {
        return Err(SnapshotError::NotAnObject);
    };

    let filters = match root.get("filters") {
        Some(Value::Object(map)) => decode_filters(map),
        Some(Value::Null) | None => FilterState::default(),
        Some(other) => {
            warn!("ignoring snapshot filters of unexpected shape: {}", other);
            FilterState::default()
        }
    };

    let sort = match root.get("sort") {
        Some(Value::Object(map)) => decode_sort(map),
        Some(Value::Null) | None => SortState::default(),
        Some(other) => {
            warn!("ignoring snapshot sort of unexpected shape: {}", other);
            SortState::default()
        }
    };

    Ok(ViewState { filters, sort })
}

fn decode_filters(map: &Map<String, Value>) -> FilterState {
    let mut filters = FilterState::default();
    for category in FilterCategory::ALL {
        *filters.tokens_mut(category) = decode_tokens(category, map.get(category.as_str()));
    }
    filters
}

fn decode_tokens(category: FilterCategory, value: Option<&Value>) -> BTreeSet<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    warn!(
                        category = category.as_str(),
                        "dropping non-string filter token {}", other
                    );
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => BTreeSet::new(),
        Some(other) => {
            warn!(
                category = category.as_str(),
                "ignoring filter tokens of unexpected shape: {}", other
            );
            BTreeSet::new()
        }
    }
}

fn decode_sort(map: &Map<String, Value>) -> SortState {
    let field = match map.get("field") {
        Some(Value::String(name)) => {
            let field = SortField::parse(name);
            if field.is_none() {
                warn!("unknown sort field {:?} in snapshot, sorting disabled", name);
            }
            field
        }
        _ => None,
    };

    let direction = map
        .get("direction")
        .and_then(Value::as_str)
        .and_then(SortDirection::parse)
        .unwrap_or_default();

    SortState { field, direction }
}
