//! Reference maps and hydration.
//!
//! A reference map is built from one sibling collection (categories, units,
//! vendors) for a single screen load and passed explicitly into hydration.
//! Nothing here is cached beyond the lifetime of the map itself.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;
use tracing::warn;

use crate::{
    Entity, EntityKind,
    envelope,
    error::RequestError,
    fields::{self, Candidates},
};

/// A selectable reference: the id the payload carries and the name shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefOption {
    pub id: i64,
    pub name: String,
}

fn id_candidates(kind: EntityKind) -> Candidates {
    match kind {
        EntityKind::Category => &["id", "category_id"],
        EntityKind::Unit => &["id", "unit_id"],
        EntityKind::Vendor => &["id", "vendor_id"],
        EntityKind::Item => &["id", "item_id"],
        EntityKind::Warehouse => &["id", "warehouse_id"],
    }
}

fn name_candidates(kind: EntityKind) -> Candidates {
    match kind {
        EntityKind::Category => &["category_name", "name", "group"],
        EntityKind::Unit => &["code", "name", "unit_name"],
        EntityKind::Vendor => &["name", "vendor_name"],
        EntityKind::Item => &["name", "item_name"],
        EntityKind::Warehouse => &["name", "warehouse_name"],
    }
}

/// Stringified id to display name for one reference collection, plus the
/// same entries in server order for selection lists.
#[derive(Clone, Debug, Default)]
pub struct ReferenceMap {
    options: Vec<RefOption>,
    by_id: HashMap<String, usize>,
}

impl ReferenceMap {
    /// Builds the map from raw reference records. Records without a finite
    /// id or a non-empty name are skipped; on duplicate ids the first wins.
    pub fn build(kind: EntityKind, raw: &[Value]) -> Self {
        let mut map = Self::default();
        for record in raw {
            let id = fields::id(record, id_candidates(kind));
            let name = fields::non_empty_text(record, name_candidates(kind));
            let (Some(id), Some(name)) = (id, name) else {
                continue;
            };
            let key = id.to_string();
            if map.by_id.contains_key(&key) {
                continue;
            }
            map.by_id.insert(key, map.options.len());
            map.options.push(RefOption { id, name });
        }
        map
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.by_id
            .get(&id.to_string())
            .and_then(|index| self.options.get(*index))
            .map(|option| option.name.as_str())
    }

    pub fn options(&self) -> &[RefOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Reference maps keyed by the kind they describe.
#[derive(Clone, Debug, Default)]
pub struct ReferenceMaps {
    maps: BTreeMap<EntityKind, ReferenceMap>,
}

impl ReferenceMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: EntityKind, map: ReferenceMap) {
        self.maps.insert(kind, map);
    }

    pub fn get(&self, kind: EntityKind) -> Option<&ReferenceMap> {
        self.maps.get(&kind)
    }

    /// Builds maps from joined reference fetches. A failed fetch leaves its
    /// kind without a map, so rows of that kind simply stay unhydrated.
    pub fn from_fetches(fetches: Vec<(EntityKind, Result<Value, RequestError>)>) -> Self {
        let mut maps = Self::new();
        for (kind, fetched) in fetches {
            match fetched {
                Ok(body) => maps.insert(kind, ReferenceMap::build(kind, envelope::records(&body))),
                Err(RequestError::Cancelled) => {}
                Err(err) => warn!(%kind, error = %err, "reference fetch failed; names stay unresolved"),
            }
        }
        maps
    }
}

/// Fills every foreign-key name the row is missing. Names already present
/// are never replaced.
pub fn hydrate<E: Entity>(row: &mut E, refs: &ReferenceMaps) {
    for (kind, key) in row.references_mut() {
        if key.name.is_some() {
            continue;
        }
        let Some(id) = key.id else { continue };
        if let Some(name) = refs.get(kind).and_then(|map| map.name(id)) {
            key.name = Some(name.to_string());
        }
    }
}

/// Unwraps, normalizes and hydrates a list response into canonical rows.
///
/// Records without a usable id are dropped. When two records share an id the
/// first one is kept.
pub fn reconcile<E: Entity>(body: &Value, refs: &ReferenceMaps) -> Vec<E> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for raw in envelope::records(body) {
        let Some(mut row) = E::normalize(raw) else {
            warn!(kind = %E::KIND, "dropping record without a usable id");
            continue;
        };
        if !seen.insert(row.id()) {
            warn!(kind = %E::KIND, id = row.id(), "dropping duplicate record");
            continue;
        }
        hydrate(&mut row, refs);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_present_pair_wins_and_order_is_kept() {
        let raw = [
            json!({ "id": 2, "code": "KG", "name": "kilogram" }),
            json!({ "unit_id": "1", "unit_name": "each" }),
            json!({ "id": 2, "code": "G" }),
        ];
        let map = ReferenceMap::build(EntityKind::Unit, &raw);
        assert_eq!(map.name(2), Some("KG"));
        assert_eq!(map.name(1), Some("each"));
        let ids: Vec<i64> = map.options().iter().map(|option| option.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn records_without_id_or_name_are_not_options() {
        let raw = [
            json!({ "name": "orphan" }),
            json!({ "id": "x", "name": "bad id" }),
            json!({ "id": 3, "name": "   " }),
            json!({ "vendor_id": 4, "vendor_name": "Acme" }),
        ];
        let map = ReferenceMap::build(EntityKind::Vendor, &raw);
        assert_eq!(map.len(), 1);
        assert_eq!(map.name(4), Some("Acme"));
    }

    #[test]
    fn failed_reference_fetch_degrades_to_no_map() {
        let maps = ReferenceMaps::from_fetches(vec![
            (EntityKind::Category, Ok(json!({ "data": [{ "id": 1, "category_name": "beef" }] }))),
            (
                EntityKind::Vendor,
                Err(RequestError::Transport("connection refused".into())),
            ),
        ]);
        assert_eq!(maps.get(EntityKind::Category).and_then(|map| map.name(1)), Some("beef"));
        assert!(maps.get(EntityKind::Vendor).is_none());
    }
}
