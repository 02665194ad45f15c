//! Client-side reconciliation for the inventory console.
//!
//! Raw responses go through [`envelope::records`], one normalizer per
//! [`EntityKind`], and [`references::hydrate`] before a [`ListController`]
//! stores them. Forms are validated into typed payloads before any request is
//! made, and the list is only patched from confirmed server outcomes.

pub use categories::CategoryRow;
pub use entity::{Editable, Entity, EntityKind, ForeignKey};
pub use error::{RequestError, ValidationError};
pub use gate::{DeleteGate, GateTarget};
pub use items::ItemRow;
pub use lifecycle::{Lifecycle, Ticket, error_message};
pub use list::{ListController, LoadState, created_row, edited_update};
pub use references::{RefOption, ReferenceMap, ReferenceMaps, hydrate, reconcile};
pub use units::UnitRow;
pub use vendors::VendorRow;
pub use warehouses::WarehouseRow;

pub mod envelope;
pub mod fields;
pub mod forms;
pub mod references;

mod categories;
mod entity;
mod error;
mod gate;
mod items;
mod lifecycle;
mod list;
mod units;
mod vendors;
mod warehouses;
