use api_types::unit::{UnitCreate, UnitUpdate};
use serde::Serialize;
use serde_json::Value;

use crate::{
    Editable, Entity, EntityKind,
    error::ValidationError,
    fields::{self, Candidates},
    forms::UnitForm,
};

struct Columns {
    id: Candidates,
    code: Candidates,
    name: Candidates,
    active: Candidates,
}

const COLUMNS: Columns = Columns {
    id: &["unit_id", "id"],
    code: &["code", "unit_code"],
    name: &["name", "unit_name"],
    active: &["is_active", "active"],
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitRow {
    pub unit_id: i64,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

impl Entity for UnitRow {
    const KIND: EntityKind = EntityKind::Unit;
    type Create = UnitCreate;
    type Form = UnitForm;

    fn normalize(raw: &Value) -> Option<Self> {
        Some(Self {
            unit_id: fields::id(raw, COLUMNS.id)?,
            code: fields::text(raw, COLUMNS.code).unwrap_or_default(),
            name: fields::text(raw, COLUMNS.name).unwrap_or_default(),
            is_active: fields::flag(raw, COLUMNS.active).unwrap_or(true),
        })
    }

    fn id(&self) -> i64 {
        self.unit_id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn build_create(form: &UnitForm) -> Result<UnitCreate, ValidationError> {
        form.to_create()
    }

    fn synthesize(payload: &UnitCreate, id: i64) -> Self {
        Self {
            unit_id: id,
            code: payload.code.clone(),
            name: payload.name.clone(),
            is_active: true,
        }
    }
}

impl Editable for UnitRow {
    type Update = UnitUpdate;

    fn edit_form(&self) -> UnitForm {
        UnitForm {
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }

    fn build_update(form: &UnitForm) -> Result<UnitUpdate, ValidationError> {
        form.to_update()
    }

    fn apply_update(&mut self, update: &UnitUpdate) {
        if let Some(code) = &update.code {
            self.code = code.clone();
        }
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
    }

    fn echoed(update: &UnitUpdate, echo: &Self) -> UnitUpdate {
        UnitUpdate {
            code: update.code.as_ref().map(|sent| prefer(&echo.code, sent)),
            name: update.name.as_ref().map(|sent| prefer(&echo.name, sent)),
        }
    }
}

fn prefer(echo: &str, sent: &str) -> String {
    if echo.is_empty() { sent } else { echo }.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unit_accepts_alternate_field_names() {
        let raw = json!({ "id": 3, "unit_code": "KG", "unit_name": "kilogram" });
        let row = UnitRow::normalize(&raw).unwrap();
        assert_eq!(row.unit_id, 3);
        assert_eq!(row.code, "KG");
        assert_eq!(row.name, "kilogram");
        assert!(row.is_active);
    }

    #[test]
    fn apply_update_leaves_absent_fields() {
        let mut row = UnitRow {
            unit_id: 1,
            code: "EA".to_string(),
            name: "each".to_string(),
            is_active: false,
        };
        row.apply_update(&UnitUpdate {
            code: None,
            name: Some("piece".to_string()),
        });
        assert_eq!(row.code, "EA");
        assert_eq!(row.name, "piece");
        assert!(!row.is_active);
    }
}
