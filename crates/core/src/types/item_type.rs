//! Menu item categories.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ItemType`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid item type: {0}")]
pub struct ItemTypeError(pub String);

/// Category of a purchasable menu item.
///
/// Each category has its own catalog, so an item is only identified by the
/// pair `(ItemId, ItemType)`. Records written before drinks and desserts
/// existed carry no type at all; those are pizzas, hence the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Pizza,
    Drink,
    Dessert,
}

impl ItemType {
    /// All item types, in menu order.
    pub const ALL: [Self; 3] = [Self::Pizza, Self::Drink, Self::Dessert];

    /// Wire name used in storage and order payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pizza => "pizza",
            Self::Drink => "drink",
            Self::Dessert => "dessert",
        }
    }

    /// Emoji shown next to the item in cart listings.
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Pizza => "🍕",
            Self::Drink => "🥤",
            Self::Dessert => "🍰",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = ItemTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pizza" => Ok(Self::Pizza),
            "drink" => Ok(Self::Drink),
            "dessert" => Ok(Self::Dessert),
            _ => Err(ItemTypeError(s.to_owned())),
        }
    }
}
