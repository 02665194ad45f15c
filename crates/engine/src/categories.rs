use api_types::category::{CategoryCreate, CategoryGroup, CategoryUpdate};
use serde::Serialize;
use serde_json::Value;

use crate::{
    Editable, Entity, EntityKind,
    error::ValidationError,
    fields::{self, Candidates},
    forms::CategoryForm,
};

/// Source paths for each canonical category field.
struct Columns {
    id: Candidates,
    group: Candidates,
    name: Candidates,
    active: Candidates,
}

const COLUMNS: Columns = Columns {
    id: &["category_id", "id"],
    group: &["group", "major_category"],
    name: &["category_name", "name"],
    active: &["is_active", "active"],
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub category_id: i64,
    /// Kept as sent; only submissions are restricted to known groups.
    pub group: String,
    pub category_name: String,
    pub is_active: bool,
}

impl Entity for CategoryRow {
    const KIND: EntityKind = EntityKind::Category;
    type Create = CategoryCreate;
    type Form = CategoryForm;

    fn normalize(raw: &Value) -> Option<Self> {
        Some(Self {
            category_id: fields::id(raw, COLUMNS.id)?,
            group: fields::text(raw, COLUMNS.group).unwrap_or_default(),
            category_name: fields::text(raw, COLUMNS.name).unwrap_or_default(),
            is_active: fields::flag(raw, COLUMNS.active).unwrap_or(true),
        })
    }

    fn id(&self) -> i64 {
        self.category_id
    }

    fn display_name(&self) -> &str {
        &self.category_name
    }

    fn build_create(form: &CategoryForm) -> Result<CategoryCreate, ValidationError> {
        form.to_create()
    }

    fn synthesize(payload: &CategoryCreate, id: i64) -> Self {
        Self {
            category_id: id,
            group: payload.group.as_str().to_string(),
            category_name: payload.category_name.clone(),
            is_active: true,
        }
    }
}

impl Editable for CategoryRow {
    type Update = CategoryUpdate;

    fn edit_form(&self) -> CategoryForm {
        CategoryForm {
            group: self.group.clone(),
            category_name: self.category_name.clone(),
        }
    }

    fn build_update(form: &CategoryForm) -> Result<CategoryUpdate, ValidationError> {
        form.to_update()
    }

    fn apply_update(&mut self, update: &CategoryUpdate) {
        if let Some(group) = update.group {
            self.group = group.as_str().to_string();
        }
        if let Some(name) = &update.category_name {
            self.category_name = name.clone();
        }
    }

    fn echoed(update: &CategoryUpdate, echo: &Self) -> CategoryUpdate {
        CategoryUpdate {
            group: update
                .group
                .map(|sent| CategoryGroup::parse(&echo.group).unwrap_or(sent)),
            category_name: update.category_name.as_ref().map(|sent| {
                if echo.category_name.is_empty() {
                    sent.clone()
                } else {
                    echo.category_name.clone()
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_active_defaults_to_true() {
        let raw = json!({ "id": 1, "group": "MEAT", "category_name": "beef", "is_active": null });
        assert_eq!(
            CategoryRow::normalize(&raw),
            Some(CategoryRow {
                category_id: 1,
                group: "MEAT".to_string(),
                category_name: "beef".to_string(),
                is_active: true,
            })
        );
    }

    #[test]
    fn text_fields_are_trimmed_and_explicit_false_is_kept() {
        let raw = json!({ "category_id": "7", "group": " SAUCE ", "category_name": " soy ", "is_active": false });
        let row = CategoryRow::normalize(&raw).unwrap();
        assert_eq!(row.category_id, 7);
        assert_eq!(row.group, "SAUCE");
        assert_eq!(row.category_name, "soy");
        assert!(!row.is_active);
    }

    #[test]
    fn record_without_id_is_rejected() {
        assert_eq!(CategoryRow::normalize(&json!({ "category_name": "beef" })), None);
        assert_eq!(
            CategoryRow::normalize(&json!({ "category_id": "beef" })),
            None
        );
    }

    #[test]
    fn echo_overrides_only_targeted_fields() {
        let update = CategoryUpdate {
            group: None,
            category_name: Some("pork".to_string()),
        };
        let echo = CategoryRow {
            category_id: 1,
            group: "SEAFOOD".to_string(),
            category_name: "Pork".to_string(),
            is_active: true,
        };
        let echoed = CategoryRow::echoed(&update, &echo);
        assert_eq!(echoed.group, None);
        assert_eq!(echoed.category_name.as_deref(), Some("Pork"));
    }
}
