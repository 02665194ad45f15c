use api_types::item::ItemCreate;
use serde::Serialize;
use serde_json::Value;

use crate::{
    Entity, EntityKind, ForeignKey,
    error::ValidationError,
    fields::{self, Candidates},
    forms::ItemForm,
};

/// Id and name paths for one embedded reference.
struct Reference {
    id: Candidates,
    name: Candidates,
}

impl Reference {
    fn read(&self, raw: &Value) -> ForeignKey {
        ForeignKey::new(
            fields::id(raw, self.id),
            fields::non_empty_text(raw, self.name),
        )
    }
}

struct Columns {
    id: Candidates,
    code: Candidates,
    name: Candidates,
    category: Reference,
    unit: Reference,
    vendor: Reference,
    unit_price: Candidates,
    expiry_date: Candidates,
    active: Candidates,
}

const COLUMNS: Columns = Columns {
    id: &["id", "item_id"],
    code: &["item_code", "item_id"],
    name: &["name", "item_name"],
    category: Reference {
        id: &["category_id", "category.id", "category.category_id"],
        name: &["category_name", "category.category_name", "category.name"],
    },
    unit: Reference {
        id: &["unit_id", "unit.id", "unit.unit_id"],
        name: &["unit_name", "unit.code", "unit.name", "unit"],
    },
    vendor: Reference {
        id: &["vendor_id", "vendor.id", "vendor.vendor_id"],
        name: &["vendor_name", "vendor.name", "vendor.vendor_name"],
    },
    unit_price: &["unit_price", "price"],
    expiry_date: &["expiry_date", "expiration_date"],
    active: &["is_active", "active"],
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub id: i64,
    /// Operator-facing item code, when it differs from the numeric id.
    #[serde(rename = "item_code", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    pub category: ForeignKey,
    pub unit: ForeignKey,
    pub vendor: ForeignKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<i64>,
    /// Always `YYYY-MM-DD` when the server sent a parseable date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    pub is_active: bool,
}

impl Entity for ItemRow {
    const KIND: EntityKind = EntityKind::Item;
    type Create = ItemCreate;
    type Form = ItemForm;

    fn normalize(raw: &Value) -> Option<Self> {
        Some(Self {
            id: fields::id(raw, COLUMNS.id)?,
            code: fields::non_empty_text(raw, COLUMNS.code),
            name: fields::text(raw, COLUMNS.name).unwrap_or_default(),
            category: COLUMNS.category.read(raw),
            unit: COLUMNS.unit.read(raw),
            vendor: COLUMNS.vendor.read(raw),
            unit_price: fields::id(raw, COLUMNS.unit_price).filter(|price| *price >= 0),
            expiry_date: fields::non_empty_text(raw, COLUMNS.expiry_date)
                .map(|date| fields::display_date(&date)),
            is_active: fields::flag(raw, COLUMNS.active).unwrap_or(true),
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn references_mut(&mut self) -> Vec<(EntityKind, &mut ForeignKey)> {
        vec![
            (EntityKind::Category, &mut self.category),
            (EntityKind::Unit, &mut self.unit),
            (EntityKind::Vendor, &mut self.vendor),
        ]
    }

    fn build_create(form: &ItemForm) -> Result<ItemCreate, ValidationError> {
        form.to_create()
    }

    fn payload_id(payload: &ItemCreate) -> Option<i64> {
        fields::parse_integer(&payload.item_id)
    }

    fn synthesize(payload: &ItemCreate, id: i64) -> Self {
        Self {
            id,
            code: Some(payload.item_id.clone()),
            name: payload.name.clone(),
            category: ForeignKey::new(Some(payload.category_id), None),
            unit: ForeignKey::new(Some(payload.unit_id), None),
            vendor: ForeignKey::new(Some(payload.vendor_id), None),
            unit_price: Some(payload.unit_price),
            expiry_date: payload.expiry_date.clone(),
            is_active: true,
        }
    }
}
