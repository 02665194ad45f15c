use api_types::vendor::VendorCreate;
use serde::Serialize;
use serde_json::Value;

use crate::{
    Entity, EntityKind,
    error::ValidationError,
    fields::{self, Candidates},
    forms::VendorForm,
};

struct Columns {
    id: Candidates,
    name: Candidates,
    manager: Candidates,
    contact: Candidates,
    address: Candidates,
    active: Candidates,
}

const COLUMNS: Columns = Columns {
    id: &["vendor_id", "id"],
    name: &["name", "vendor_name"],
    manager: &["manager", "contact_name"],
    contact: &["contact", "contact_email", "phone"],
    address: &["address", "address_road"],
    active: &["is_active", "active"],
};

/// Vendors are create-only; the optional columns stay absent rather than
/// blank so the table can tell "not recorded" from an empty entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VendorRow {
    pub vendor_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub is_active: bool,
}

impl Entity for VendorRow {
    const KIND: EntityKind = EntityKind::Vendor;
    type Create = VendorCreate;
    type Form = VendorForm;

    fn normalize(raw: &Value) -> Option<Self> {
        Some(Self {
            vendor_id: fields::id(raw, COLUMNS.id)?,
            name: fields::text(raw, COLUMNS.name).unwrap_or_default(),
            manager: fields::non_empty_text(raw, COLUMNS.manager),
            contact: fields::non_empty_text(raw, COLUMNS.contact),
            address: fields::non_empty_text(raw, COLUMNS.address),
            is_active: fields::flag(raw, COLUMNS.active).unwrap_or(true),
        })
    }

    fn id(&self) -> i64 {
        self.vendor_id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn build_create(form: &VendorForm) -> Result<VendorCreate, ValidationError> {
        form.to_create()
    }

    fn synthesize(payload: &VendorCreate, id: i64) -> Self {
        let present = |text: &str| (!text.is_empty()).then(|| text.to_string());
        Self {
            vendor_id: id,
            name: payload.name.clone(),
            manager: present(&payload.manager),
            contact: present(&payload.contact),
            address: present(&payload.address),
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn vendor_reads_legacy_contact_columns() {
        let raw = json!({
            "id": 12,
            "vendor_name": "Han River Foods",
            "contact_name": "Kim",
            "contact_email": "kim@example.com",
            "address_road": "1 Hangang-daero",
        });
        let row = VendorRow::normalize(&raw).unwrap();
        assert_eq!(row.vendor_id, 12);
        assert_eq!(row.name, "Han River Foods");
        assert_eq!(row.manager.as_deref(), Some("Kim"));
        assert_eq!(row.contact.as_deref(), Some("kim@example.com"));
        assert_eq!(row.address.as_deref(), Some("1 Hangang-daero"));
    }

    #[test]
    fn blank_optional_columns_are_absent() {
        let raw = json!({ "vendor_id": 1, "name": "Acme", "manager": "  ", "contact": null });
        let row = VendorRow::normalize(&raw).unwrap();
        assert_eq!(row.manager, None);
        assert_eq!(row.contact, None);
        assert_eq!(row.address, None);
    }
}
