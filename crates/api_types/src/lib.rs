use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the inventory backend.
///
/// `message` is usually a single string or, for validation failures, a list of
/// strings (one per rejected constraint). Other JSON values are tolerated and
/// shown as their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: Option<ErrorMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Many(Vec<Value>),
    One(Value),
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

impl ErrorMessage {
    /// Flattens the message into one line; lists are joined with `", "` and
    /// null entries are skipped.
    pub fn joined(&self) -> String {
        match self {
            Self::One(message) => message_text(message).unwrap_or_default(),
            Self::Many(messages) => messages
                .iter()
                .filter_map(message_text)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub mod category {
    use super::*;

    /// Major group a category belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum CategoryGroup {
        Meat,
        Seafood,
        Noodles,
        Vegetables,
        Dairy,
        Eggs,
        Processed,
        Sauce,
        BrothSoup,
    }

    impl CategoryGroup {
        pub const ALL: [CategoryGroup; 9] = [
            Self::Meat,
            Self::Seafood,
            Self::Noodles,
            Self::Vegetables,
            Self::Dairy,
            Self::Eggs,
            Self::Processed,
            Self::Sauce,
            Self::BrothSoup,
        ];

        /// Returns the wire code (`"BROTH_SOUP"`, ...).
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Meat => "MEAT",
                Self::Seafood => "SEAFOOD",
                Self::Noodles => "NOODLES",
                Self::Vegetables => "VEGETABLES",
                Self::Dairy => "DAIRY",
                Self::Eggs => "EGGS",
                Self::Processed => "PROCESSED",
                Self::Sauce => "SAUCE",
                Self::BrothSoup => "BROTH_SOUP",
            }
        }

        /// Parses a wire code. Matching is exact (codes are upper case).
        pub fn parse(code: &str) -> Option<Self> {
            Self::ALL.into_iter().find(|group| group.as_str() == code)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub group: CategoryGroup,
        pub category_name: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub group: Option<CategoryGroup>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category_name: Option<String>,
    }
}

pub mod unit {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UnitCreate {
        /// Short code shown in item tables (`"KG"`, `"EA"`).
        pub code: String,
        pub name: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UnitUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
    }
}

pub mod vendor {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct VendorCreate {
        pub name: String,
        /// Contact person.
        pub manager: String,
        /// Phone number or e-mail.
        pub contact: String,
        /// Road address and detail joined into one line.
        pub address: String,
    }
}

pub mod item {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemCreate {
        /// Operator-entered item code.
        pub item_id: String,
        pub name: String,
        pub category_id: i64,
        pub vendor_id: i64,
        pub unit_id: i64,
        /// Whole currency units, never negative.
        pub unit_price: i64,
        /// `YYYY-MM-DD`, sent exactly as entered (trimmed).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub expiry_date: Option<String>,
    }
}

pub mod warehouse {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WarehouseCreate {
        pub name: String,
        pub location: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WarehouseUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub location: Option<String>,
    }
}
