//! Raw form state and its validation into strictly typed payloads.
//!
//! Forms hold exactly what the operator typed or picked. Building a payload
//! runs two ordered passes: every required field must be non-empty after
//! trimming, then numbers, dates and selections must parse. A payload only
//! exists once both passes succeed, and building never mutates the form.

use std::fmt;

use api_types::{
    category::{CategoryCreate, CategoryGroup, CategoryUpdate},
    item::ItemCreate,
    unit::{UnitCreate, UnitUpdate},
    vendor::VendorCreate,
    warehouse::{WarehouseCreate, WarehouseUpdate},
};
use chrono::NaiveDate;

use crate::{EntityKind, error::ValidationError, fields};

/// How a form field is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    /// Whole number typed as text.
    Number,
    /// `YYYY-MM-DD` typed as text.
    Date,
    /// One of [`CategoryGroup::ALL`].
    Group,
    /// An id picked from the reference collection of that kind.
    Reference(EntityKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub input: FieldInput,
}

const fn field(label: &'static str, input: FieldInput) -> FieldSpec {
    FieldSpec { label, input }
}

/// Positional access to a form's raw values, ordered like `FIELDS`.
pub trait FormModel: Clone + Default + fmt::Debug + Send + 'static {
    const FIELDS: &'static [FieldSpec];

    fn values(&self) -> Vec<&str>;

    fn value_mut(&mut self, index: usize) -> Option<&mut String>;
}

fn require(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Missing(missing))
    }
}

fn selection(label: &'static str, raw: &str) -> Result<i64, ValidationError> {
    fields::parse_integer(raw).ok_or(ValidationError::InvalidSelection(label))
}

fn price(label: &'static str, raw: &str) -> Result<i64, ValidationError> {
    fields::parse_integer(raw)
        .filter(|value| *value >= 0)
        .ok_or(ValidationError::InvalidPrice(label))
}

fn optional_date(label: &'static str, raw: &str) -> Result<Option<String>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| Some(date.format("%Y-%m-%d").to_string()))
        .map_err(|_| ValidationError::InvalidDate(label))
}

fn group(raw: &str) -> Result<CategoryGroup, ValidationError> {
    CategoryGroup::parse(raw.trim()).ok_or(ValidationError::InvalidSelection("group"))
}

fn trimmed(raw: &str) -> String {
    raw.trim().to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub group: String,
    pub category_name: String,
}

impl CategoryForm {
    pub fn to_create(&self) -> Result<CategoryCreate, ValidationError> {
        require(&[
            ("group", self.group.as_str()),
            ("category name", self.category_name.as_str()),
        ])?;
        Ok(CategoryCreate {
            group: group(&self.group)?,
            category_name: trimmed(&self.category_name),
        })
    }

    pub fn to_update(&self) -> Result<CategoryUpdate, ValidationError> {
        let create = self.to_create()?;
        Ok(CategoryUpdate {
            group: Some(create.group),
            category_name: Some(create.category_name),
        })
    }
}

impl FormModel for CategoryForm {
    const FIELDS: &'static [FieldSpec] = &[
        field("group", FieldInput::Group),
        field("category name", FieldInput::Text),
    ];

    fn values(&self) -> Vec<&str> {
        vec![self.group.as_str(), self.category_name.as_str()]
    }

    fn value_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.group),
            1 => Some(&mut self.category_name),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitForm {
    pub code: String,
    pub name: String,
}

impl UnitForm {
    pub fn to_create(&self) -> Result<UnitCreate, ValidationError> {
        require(&[("code", self.code.as_str()), ("name", self.name.as_str())])?;
        Ok(UnitCreate {
            code: trimmed(&self.code),
            name: trimmed(&self.name),
        })
    }

    pub fn to_update(&self) -> Result<UnitUpdate, ValidationError> {
        let create = self.to_create()?;
        Ok(UnitUpdate {
            code: Some(create.code),
            name: Some(create.name),
        })
    }
}

impl FormModel for UnitForm {
    const FIELDS: &'static [FieldSpec] = &[
        field("code", FieldInput::Text),
        field("name", FieldInput::Text),
    ];

    fn values(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }

    fn value_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.code),
            1 => Some(&mut self.name),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VendorForm {
    pub name: String,
    pub manager: String,
    pub contact: String,
    pub address_road: String,
    pub address_detail: String,
}

impl VendorForm {
    pub fn to_create(&self) -> Result<VendorCreate, ValidationError> {
        require(&[
            ("name", self.name.as_str()),
            ("manager", self.manager.as_str()),
            ("contact", self.contact.as_str()),
            ("road address", self.address_road.as_str()),
        ])?;
        let address = [self.address_road.trim(), self.address_detail.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(VendorCreate {
            name: trimmed(&self.name),
            manager: trimmed(&self.manager),
            contact: trimmed(&self.contact),
            address,
        })
    }
}

impl FormModel for VendorForm {
    const FIELDS: &'static [FieldSpec] = &[
        field("name", FieldInput::Text),
        field("manager", FieldInput::Text),
        field("contact", FieldInput::Text),
        field("road address", FieldInput::Text),
        field("address detail", FieldInput::Text),
    ];

    fn values(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.manager.as_str(),
            self.contact.as_str(),
            self.address_road.as_str(),
            self.address_detail.as_str(),
        ]
    }

    fn value_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.manager),
            2 => Some(&mut self.contact),
            3 => Some(&mut self.address_road),
            4 => Some(&mut self.address_detail),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub item_id: String,
    pub name: String,
    pub category_id: String,
    pub unit_id: String,
    pub vendor_id: String,
    pub unit_price: String,
    pub expiry_date: String,
}

impl ItemForm {
    pub fn to_create(&self) -> Result<ItemCreate, ValidationError> {
        require(&[
            ("item code", self.item_id.as_str()),
            ("name", self.name.as_str()),
            ("category", self.category_id.as_str()),
            ("unit", self.unit_id.as_str()),
            ("vendor", self.vendor_id.as_str()),
            ("unit price", self.unit_price.as_str()),
        ])?;

        let category_id = selection("category", self.category_id.as_str())?;
        let unit_id = selection("unit", self.unit_id.as_str())?;
        let vendor_id = selection("vendor", self.vendor_id.as_str())?;
        let unit_price = price("unit price", self.unit_price.as_str())?;
        let expiry_date = optional_date("expiry date", self.expiry_date.as_str())?;

        Ok(ItemCreate {
            item_id: trimmed(&self.item_id),
            name: trimmed(&self.name),
            category_id,
            vendor_id,
            unit_id,
            unit_price,
            expiry_date,
        })
    }
}

impl FormModel for ItemForm {
    const FIELDS: &'static [FieldSpec] = &[
        field("item code", FieldInput::Text),
        field("name", FieldInput::Text),
        field("category", FieldInput::Reference(EntityKind::Category)),
        field("unit", FieldInput::Reference(EntityKind::Unit)),
        field("vendor", FieldInput::Reference(EntityKind::Vendor)),
        field("unit price", FieldInput::Number),
        field("expiry date", FieldInput::Date),
    ];

    fn values(&self) -> Vec<&str> {
        vec![
            self.item_id.as_str(),
            self.name.as_str(),
            self.category_id.as_str(),
            self.unit_id.as_str(),
            self.vendor_id.as_str(),
            self.unit_price.as_str(),
            self.expiry_date.as_str(),
        ]
    }

    fn value_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.item_id),
            1 => Some(&mut self.name),
            2 => Some(&mut self.category_id),
            3 => Some(&mut self.unit_id),
            4 => Some(&mut self.vendor_id),
            5 => Some(&mut self.unit_price),
            6 => Some(&mut self.expiry_date),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarehouseForm {
    pub name: String,
    pub location: String,
}

impl WarehouseForm {
    pub fn to_create(&self) -> Result<WarehouseCreate, ValidationError> {
        require(&[
            ("name", self.name.as_str()),
            ("location", self.location.as_str()),
        ])?;
        Ok(WarehouseCreate {
            name: trimmed(&self.name),
            location: trimmed(&self.location),
        })
    }

    pub fn to_update(&self) -> Result<WarehouseUpdate, ValidationError> {
        let create = self.to_create()?;
        Ok(WarehouseUpdate {
            name: Some(create.name),
            location: Some(create.location),
        })
    }
}

impl FormModel for WarehouseForm {
    const FIELDS: &'static [FieldSpec] = &[
        field("name", FieldInput::Text),
        field("location", FieldInput::Text),
    ];

    fn values(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.location.as_str()]
    }

    fn value_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.location),
            _ => None,
        }
    }
}
