//! The entity descriptor the reconciliation engine is parameterized by.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::{error::ValidationError, forms::FormModel};

/// The five kinds of record the console manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Item,
    Category,
    Unit,
    Vendor,
    Warehouse,
}

impl EntityKind {
    /// Collection path segment under the API root.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Item => "items",
            Self::Category => "category",
            Self::Unit => "units",
            Self::Vendor => "vendors",
            Self::Warehouse => "warehouses",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Category => "category",
            Self::Unit => "unit",
            Self::Vendor => "vendor",
            Self::Warehouse => "warehouse",
        }
    }

    pub fn supports_edit(self) -> bool {
        matches!(self, Self::Category | Self::Unit | Self::Warehouse)
    }

    pub fn supports_delete(self) -> bool {
        matches!(self, Self::Category | Self::Unit | Self::Warehouse)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A foreign key on a canonical row: the referenced id and, once known, the
/// referenced record's display name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ForeignKey {
    pub fn new(id: Option<i64>, name: Option<String>) -> Self {
        Self { id, name }
    }

    /// Resolved name, else the bare id, else an empty string.
    pub fn label(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// A canonical row kind together with everything the engine needs to load,
/// create and display it.
pub trait Entity: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Creation payload.
    type Create: Serialize + Clone + fmt::Debug + Send + Sync + 'static;
    /// Raw form fields for the creation (and, where supported, edit) form.
    type Form: FormModel;

    /// Maps one raw record onto the canonical shape. `None` when the record
    /// carries no usable identifier.
    fn normalize(raw: &Value) -> Option<Self>;

    fn id(&self) -> i64;

    /// Name the operator recognizes the row by (and retypes to delete it).
    fn display_name(&self) -> &str;

    /// Foreign keys eligible for hydration, with the kind they reference.
    fn references_mut(&mut self) -> Vec<(EntityKind, &mut ForeignKey)> {
        Vec::new()
    }

    /// Validates the form and builds the creation payload.
    fn build_create(form: &Self::Form) -> Result<Self::Create, ValidationError>;

    /// Identifier carried by the creation payload itself, if any.
    fn payload_id(_payload: &Self::Create) -> Option<i64> {
        None
    }

    /// Row echoing a confirmed create whose response had no body.
    fn synthesize(payload: &Self::Create, id: i64) -> Self;
}

/// Kinds that can be edited in place.
pub trait Editable: Entity {
    type Update: Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    /// Form pre-filled from the row.
    fn edit_form(&self) -> Self::Form;

    fn build_update(form: &Self::Form) -> Result<Self::Update, ValidationError>;

    /// Writes the fields present in `update`, leaving every other field alone.
    fn apply_update(&mut self, update: &Self::Update);

    /// The server's values for exactly the fields `update` targets.
    fn echoed(update: &Self::Update, echo: &Self) -> Self::Update;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_label_falls_back_to_id() {
        assert_eq!(ForeignKey::new(Some(3), Some("KG".into())).label(), "KG");
        assert_eq!(ForeignKey::new(Some(3), None).label(), "3");
        assert_eq!(ForeignKey::default().label(), "");
    }

    #[test]
    fn only_full_crud_kinds_support_edit_and_delete() {
        assert!(EntityKind::Warehouse.supports_edit());
        assert!(EntityKind::Unit.supports_delete());
        assert!(!EntityKind::Vendor.supports_edit());
        assert!(!EntityKind::Item.supports_delete());
    }
}
