//! The canonical in-memory list behind one screen.
//!
//! Rows change only in response to a confirmed server outcome: a settled load,
//! or a create, edit or delete the server accepted. A failed operation leaves
//! the rows exactly as they were.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    Editable, Entity,
    error::RequestError,
    lifecycle::{Lifecycle, Ticket},
    references::{ReferenceMaps, hydrate},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub struct ListController<E: Entity> {
    rows: Vec<E>,
    lifecycle: Lifecycle,
    loaded: bool,
}

impl<E: Entity> Default for ListController<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            lifecycle: Lifecycle::new(),
            loaded: false,
        }
    }
}

impl<E: Entity> ListController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        if self.lifecycle.is_loading() {
            LoadState::Loading
        } else if let Some(error) = self.lifecycle.error() {
            LoadState::Failed(error.to_string())
        } else if self.loaded {
            LoadState::Ready
        } else {
            LoadState::Idle
        }
    }

    /// Enters `Loading`; any earlier load still in flight is superseded.
    pub fn begin_load(&mut self) -> Ticket {
        self.lifecycle.start()
    }

    /// Commits a load outcome. Returns `false` when the outcome was stale or
    /// cancelled and nothing changed. On failure the previous rows stay.
    pub fn finish_load(&mut self, ticket: Ticket, outcome: Result<Vec<E>, RequestError>) -> bool {
        match self.lifecycle.settle(ticket, outcome) {
            None => false,
            Some(Ok(rows)) => {
                debug!(kind = %E::KIND, rows = rows.len(), "list loaded");
                self.rows = rows;
                self.loaded = true;
                true
            }
            Some(Err(_)) => true,
        }
    }

    pub fn cancel(&mut self) {
        self.lifecycle.cancel();
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.lifecycle.is_current(ticket)
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn find(&self, id: i64) -> Option<&E> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Appends a confirmed row. A row that already has the id is replaced in
    /// place instead.
    pub fn confirm_create(&mut self, row: E) {
        match self.rows.iter_mut().find(|existing| existing.id() == row.id()) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Removes a row the server confirmed deleted.
    pub fn confirm_delete(&mut self, id: i64) -> Option<E> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        Some(self.rows.remove(index))
    }
}

impl<E: Editable> ListController<E> {
    /// Patches only the fields `update` targets on row `id`. Returns `false`
    /// when no row has that id.
    pub fn confirm_edit(&mut self, id: i64, update: &E::Update) -> bool {
        match self.rows.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                row.apply_update(update);
                true
            }
            None => false,
        }
    }
}

/// Reads a single record out of a write response: the body itself, or an
/// object under `data`.
fn echo_record<E: Entity>(body: Option<&Value>) -> Option<E> {
    let body = body?;
    E::normalize(body).or_else(|| body.get("data").and_then(E::normalize))
}

/// The record object a write response carries, if any: the body itself, or an
/// object under `data`.
fn echo_object<E: Entity>(body: Option<&Value>) -> Option<&Map<String, Value>> {
    let body = body?;
    [Some(body), body.get("data")]
        .into_iter()
        .flatten()
        .find(|candidate| E::normalize(candidate).is_some())?
        .as_object()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// The row to append after a confirmed create.
///
/// A returned record is laid over the submitted payload, each echoed field
/// winning only when it is not blank, so a reply carrying just an id still
/// yields the submitted values. Without a record the row is synthesized from
/// the payload, taking its id from the `Location` header or, failing that,
/// from the payload itself. Without any id the create cannot be placed in the
/// list and is reported as a malformed response.
pub fn created_row<E: Entity>(
    body: Option<&Value>,
    location_id: Option<i64>,
    payload: &E::Create,
    refs: &ReferenceMaps,
) -> Result<E, RequestError> {
    let mut row = match echo_object::<E>(body) {
        Some(echo) => {
            let mut merged = match serde_json::to_value(payload) {
                Ok(Value::Object(fields)) => fields,
                _ => Map::new(),
            };
            for (key, value) in echo {
                if !is_blank(value) {
                    merged.insert(key.clone(), value.clone());
                }
            }
            E::normalize(&Value::Object(merged)).ok_or_else(|| {
                RequestError::Malformed(format!("created {} could not be read", E::KIND))
            })?
        }
        None => {
            let id = location_id.or_else(|| E::payload_id(payload)).ok_or_else(|| {
                RequestError::Malformed(format!("created {} has no identifier", E::KIND))
            })?;
            E::synthesize(payload, id)
        }
    };
    hydrate(&mut row, refs);
    Ok(row)
}

/// The update to patch in after a confirmed edit: the server's values for the
/// targeted fields when it echoed the record, the submitted ones otherwise.
pub fn edited_update<E: Editable>(body: Option<&Value>, update: &E::Update) -> E::Update {
    match echo_record::<E>(body) {
        Some(echo) => E::echoed(update, &echo),
        None => update.clone(),
    }
}

#[cfg(test)]
mod tests {
    use api_types::{
        item::ItemCreate,
        unit::{UnitCreate, UnitUpdate},
    };
    use serde_json::json;

    use super::*;
    use crate::{EntityKind, ForeignKey, ItemRow, UnitRow, references::ReferenceMap};

    fn unit(id: i64, code: &str, name: &str) -> UnitRow {
        UnitRow {
            unit_id: id,
            code: code.to_string(),
            name: name.to_string(),
            is_active: true,
        }
    }

    fn loaded(rows: Vec<UnitRow>) -> ListController<UnitRow> {
        let mut list = ListController::new();
        let ticket = list.begin_load();
        assert!(list.finish_load(ticket, Ok(rows)));
        list
    }

    #[test]
    fn state_follows_the_load() {
        let mut list = ListController::<UnitRow>::new();
        assert_eq!(list.state(), LoadState::Idle);
        let ticket = list.begin_load();
        assert_eq!(list.state(), LoadState::Loading);
        list.finish_load(ticket, Ok(vec![unit(1, "EA", "each")]));
        assert_eq!(list.state(), LoadState::Ready);

        let ticket = list.begin_load();
        list.finish_load(ticket, Err(RequestError::Http { status: 500, message: "boom".into() }));
        assert_eq!(list.state(), LoadState::Failed("boom".to_string()));
        assert_eq!(list.rows(), &[unit(1, "EA", "each")]);
    }

    #[test]
    fn delete_of_unknown_id_changes_nothing() {
        let mut list = loaded(vec![unit(1, "EA", "each")]);
        assert_eq!(list.confirm_delete(9), None);
        assert_eq!(list.confirm_delete(1), Some(unit(1, "EA", "each")));
        assert!(list.rows().is_empty());
    }

    #[test]
    fn edit_patches_only_targeted_fields() {
        let mut list = loaded(vec![unit(1, "EA", "each"), unit(2, "KG", "kilogram")]);
        let update = UnitUpdate {
            code: None,
            name: Some("kilo".to_string()),
        };
        assert!(list.confirm_edit(2, &update));
        assert_eq!(list.find(2), Some(&unit(2, "KG", "kilo")));
        assert_eq!(list.find(1), Some(&unit(1, "EA", "each")));
        assert!(!list.confirm_edit(3, &update));
    }

    #[test]
    fn created_row_prefers_returned_record() {
        let payload = UnitCreate {
            code: "BOX".to_string(),
            name: "box".to_string(),
        };
        let body = json!({ "unit_id": 5, "code": "BOX", "name": "Box" });
        let row: UnitRow =
            created_row(Some(&body), None, &payload, &ReferenceMaps::new()).unwrap();
        assert_eq!(row, unit(5, "BOX", "Box"));
    }

    #[test]
    fn partial_echo_keeps_the_submitted_values() {
        let payload = UnitCreate {
            code: "BOX".to_string(),
            name: "box".to_string(),
        };
        let refs = ReferenceMaps::new();

        let body = json!({ "message": "created", "id": 42 });
        let row: UnitRow = created_row(Some(&body), None, &payload, &refs).unwrap();
        assert_eq!(row, unit(42, "BOX", "box"));

        let body = json!({ "data": { "unit_id": 43, "code": "", "name": null } });
        let row: UnitRow = created_row(Some(&body), Some(99), &payload, &refs).unwrap();
        assert_eq!(row, unit(43, "BOX", "box"));
    }

    #[test]
    fn empty_body_synthesizes_from_location_or_fails() {
        let payload = UnitCreate {
            code: "BOX".to_string(),
            name: "box".to_string(),
        };
        let refs = ReferenceMaps::new();
        let row: UnitRow = created_row(None, Some(8), &payload, &refs).unwrap();
        assert_eq!(row, unit(8, "BOX", "box"));

        let err = created_row::<UnitRow>(None, None, &payload, &refs).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn synthesized_item_is_hydrated_from_the_selection_maps() {
        let payload = ItemCreate {
            item_id: "77".to_string(),
            name: "Tofu".to_string(),
            category_id: 1,
            vendor_id: 2,
            unit_id: 3,
            unit_price: 1200,
            expiry_date: None,
        };
        let mut refs = ReferenceMaps::new();
        refs.insert(
            EntityKind::Unit,
            ReferenceMap::build(EntityKind::Unit, &[json!({ "id": 3, "code": "EA" })]),
        );
        let row: ItemRow = created_row(None, None, &payload, &refs).unwrap();
        assert_eq!(row.id, 77);
        assert_eq!(row.unit, ForeignKey::new(Some(3), Some("EA".into())));
        assert_eq!(row.vendor, ForeignKey::new(Some(2), None));
    }

    #[test]
    fn edited_update_reads_wrapped_echo() {
        let update = UnitUpdate {
            code: Some("kg".to_string()),
            name: None,
        };
        let body = json!({ "data": { "unit_id": 2, "code": "KG", "name": "kilogram" } });
        let echoed = edited_update::<UnitRow>(Some(&body), &update);
        assert_eq!(echoed.code.as_deref(), Some("KG"));
        assert_eq!(echoed.name, None);
        assert_eq!(edited_update::<UnitRow>(None, &update), update);
    }
}
