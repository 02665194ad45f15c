use api_types::warehouse::{WarehouseCreate, WarehouseUpdate};
use serde::Serialize;
use serde_json::Value;

use crate::{
    Editable, Entity, EntityKind,
    error::ValidationError,
    fields::{self, Candidates},
    forms::WarehouseForm,
};

struct Columns {
    id: Candidates,
    name: Candidates,
    location: Candidates,
    created_at: Candidates,
}

const COLUMNS: Columns = Columns {
    id: &["warehouse_id", "id"],
    name: &["name", "warehouse_name"],
    location: &["location", "address"],
    created_at: &["created_at", "createdAt"],
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WarehouseRow {
    pub warehouse_id: i64,
    pub name: String,
    pub location: String,
    /// Server timestamp as sent; formatted only for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl WarehouseRow {
    pub fn created_label(&self) -> String {
        self.created_at
            .as_deref()
            .map(fields::display_timestamp)
            .unwrap_or_default()
    }
}

impl Entity for WarehouseRow {
    const KIND: EntityKind = EntityKind::Warehouse;
    type Create = WarehouseCreate;
    type Form = WarehouseForm;

    fn normalize(raw: &Value) -> Option<Self> {
        Some(Self {
            warehouse_id: fields::id(raw, COLUMNS.id)?,
            name: fields::text(raw, COLUMNS.name).unwrap_or_default(),
            location: fields::text(raw, COLUMNS.location).unwrap_or_default(),
            created_at: fields::non_empty_text(raw, COLUMNS.created_at),
        })
    }

    fn id(&self) -> i64 {
        self.warehouse_id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn build_create(form: &WarehouseForm) -> Result<WarehouseCreate, ValidationError> {
        form.to_create()
    }

    fn synthesize(payload: &WarehouseCreate, id: i64) -> Self {
        Self {
            warehouse_id: id,
            name: payload.name.clone(),
            location: payload.location.clone(),
            created_at: None,
        }
    }
}

impl Editable for WarehouseRow {
    type Update = WarehouseUpdate;

    fn edit_form(&self) -> WarehouseForm {
        WarehouseForm {
            name: self.name.clone(),
            location: self.location.clone(),
        }
    }

    fn build_update(form: &WarehouseForm) -> Result<WarehouseUpdate, ValidationError> {
        form.to_update()
    }

    fn apply_update(&mut self, update: &WarehouseUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(location) = &update.location {
            self.location = location.clone();
        }
    }

    fn echoed(update: &WarehouseUpdate, echo: &Self) -> WarehouseUpdate {
        let prefer = |echo: &str, sent: &String| {
            if echo.is_empty() {
                sent.clone()
            } else {
                echo.to_string()
            }
        };
        WarehouseUpdate {
            name: update.name.as_ref().map(|sent| prefer(&echo.name, sent)),
            location: update
                .location
                .as_ref()
                .map(|sent| prefer(&echo.location, sent)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn created_at_is_shown_to_the_minute() {
        let raw = json!({
            "warehouse_id": 2,
            "name": "Main",
            "location": "Busan",
            "created_at": "2025-09-01T08:30:59.000Z",
        });
        let row = WarehouseRow::normalize(&raw).unwrap();
        assert_eq!(row.created_label(), "2025-09-01 08:30");
        assert_eq!(row.created_at.as_deref(), Some("2025-09-01T08:30:59.000Z"));
    }

    #[test]
    fn location_only_update_keeps_name_and_timestamp() {
        let mut row = WarehouseRow {
            warehouse_id: 2,
            name: "Main".to_string(),
            location: "Busan".to_string(),
            created_at: Some("2025-09-01".to_string()),
        };
        row.apply_update(&WarehouseUpdate {
            name: None,
            location: Some("Incheon".to_string()),
        });
        assert_eq!(row.name, "Main");
        assert_eq!(row.location, "Incheon");
        assert_eq!(row.created_at.as_deref(), Some("2025-09-01"));
    }
}
