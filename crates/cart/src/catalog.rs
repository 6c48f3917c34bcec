//! Menu catalogs and price lookup.
//!
//! The host hands the cart a read-only catalog, either as one list per item
//! type or as a combined list with a `type` discriminator. Menu pages that
//! ship no catalog data can instead describe their item cards (the
//! `data-pid`/`data-price`/`data-name` attributes), from which a catalog is
//! inferred.

use std::path::Path;
use std::str::FromStr;

use kopernik_core::{ItemId, ItemType, Price};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::Error;

// =============================================================================
// Catalog Entries
// =============================================================================

/// Authoritative name and price of a purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(deserialize_with = "deserialize_loose_id")]
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    /// Only meaningful in a combined catalog; typed lists imply the type.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_lenient_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_type: Option<ItemType>,
}

impl CatalogEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, price: Price, item_type: ItemType) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            item_type: Some(item_type),
        }
    }
}

/// Hosts render ids as either numbers or numeric strings.
fn deserialize_loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ItemId, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let id = match &value {
        serde_json::Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    id.map(ItemId::new)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid catalog id: {value}")))
}

/// Unknown type names are treated as untyped rather than failing the catalog.
fn deserialize_lenient_type<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ItemType>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

// =============================================================================
// CatalogProvider
// =============================================================================

/// Source of catalog entries injected into the cart.
pub trait CatalogProvider {
    /// The dedicated list for `item_type`, if the host supplied one.
    fn typed(&self, item_type: ItemType) -> Option<&[CatalogEntry]>;

    /// The combined list of all item types, if the host supplied one.
    fn combined(&self) -> Option<&[CatalogEntry]>;
}

impl<T: CatalogProvider + ?Sized> CatalogProvider for &T {
    fn typed(&self, item_type: ItemType) -> Option<&[CatalogEntry]> {
        (**self).typed(item_type)
    }

    fn combined(&self) -> Option<&[CatalogEntry]> {
        (**self).combined()
    }
}

impl<T: CatalogProvider + ?Sized> CatalogProvider for std::sync::Arc<T> {
    fn typed(&self, item_type: ItemType) -> Option<&[CatalogEntry]> {
        (**self).typed(item_type)
    }

    fn combined(&self) -> Option<&[CatalogEntry]> {
        (**self).combined()
    }
}

/// Resolve the catalog entry for an item.
///
/// A typed list, when present, is authoritative for its type. Otherwise the
/// combined list is searched, restricted to entries of `item_type`.
/// `None` means unresolved: callers price the item at zero and display
/// [`fallback_name`].
pub fn price_lookup<C: CatalogProvider + ?Sized>(
    catalog: &C,
    item_id: ItemId,
    item_type: ItemType,
) -> Option<&CatalogEntry> {
    if let Some(entries) = catalog.typed(item_type) {
        return entries.iter().find(|entry| entry.id == item_id);
    }

    catalog
        .combined()?
        .iter()
        .filter(|entry| entry.item_type == Some(item_type))
        .find(|entry| entry.id == item_id)
}

/// Display name for an item the catalog cannot resolve, e.g. `"pizza 99"`.
#[must_use]
pub fn fallback_name(item_id: ItemId, item_type: ItemType) -> String {
    format!("{item_type} {item_id}")
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog data as supplied by the host page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostCatalog {
    #[serde(default)]
    pub pizzas: Option<Vec<CatalogEntry>>,
    #[serde(default)]
    pub drinks: Option<Vec<CatalogEntry>>,
    #[serde(default)]
    pub desserts: Option<Vec<CatalogEntry>>,
    #[serde(default)]
    pub all_items: Option<Vec<CatalogEntry>>,
    /// Item cards present on the page.
    #[serde(default)]
    pub cards: Vec<ItemCard>,
}

/// In-memory [`CatalogProvider`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pizzas: Option<Vec<CatalogEntry>>,
    drinks: Option<Vec<CatalogEntry>>,
    desserts: Option<Vec<CatalogEntry>>,
    all_items: Option<Vec<CatalogEntry>>,
}

impl Catalog {
    /// A catalog that resolves nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A catalog made of a single combined list.
    #[must_use]
    pub fn combined_from(entries: Vec<CatalogEntry>) -> Self {
        Self {
            all_items: Some(entries),
            ..Self::default()
        }
    }

    /// Set the dedicated list for `item_type`.
    #[must_use]
    pub fn with_typed(mut self, item_type: ItemType, entries: Vec<CatalogEntry>) -> Self {
        *self.slot(item_type) = Some(entries);
        self
    }

    /// Build a catalog from host data.
    ///
    /// Server-supplied lists are kept; entries inferred from item cards are
    /// merged on top, replacing server entries with the same id.
    #[must_use]
    pub fn from_host(host: HostCatalog) -> Self {
        let mut catalog = Self {
            pizzas: host.pizzas,
            drinks: host.drinks,
            desserts: host.desserts,
            all_items: host.all_items,
        };

        if !host.cards.is_empty() {
            debug!(cards = host.cards.len(), "inferring catalog entries from item cards");
        }

        for card in &host.cards {
            match card.to_entry() {
                Some((item_type, entry)) => catalog.upsert(item_type, entry),
                None => debug!(pid = ?card.pid, "skipping item card without a usable id"),
            }
        }

        catalog
    }

    /// Parse host catalog JSON and build a catalog from it.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid host catalog document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<HostCatalog>(json).map(Self::from_host)
    }

    /// Read a host catalog JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid host
    /// catalog document.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json).map_err(|source| Error::CatalogFormat {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "catalog loaded");
        Ok(catalog)
    }

    fn slot(&mut self, item_type: ItemType) -> &mut Option<Vec<CatalogEntry>> {
        match item_type {
            ItemType::Pizza => &mut self.pizzas,
            ItemType::Drink => &mut self.drinks,
            ItemType::Dessert => &mut self.desserts,
        }
    }

    fn upsert(&mut self, item_type: ItemType, entry: CatalogEntry) {
        let entries = self.slot(item_type).get_or_insert_with(Vec::new);
        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }
}

impl CatalogProvider for Catalog {
    fn typed(&self, item_type: ItemType) -> Option<&[CatalogEntry]> {
        match item_type {
            ItemType::Pizza => self.pizzas.as_deref(),
            ItemType::Drink => self.drinks.as_deref(),
            ItemType::Dessert => self.desserts.as_deref(),
        }
    }

    fn combined(&self) -> Option<&[CatalogEntry]> {
        self.all_items.as_deref()
    }
}

// =============================================================================
// Item Cards
// =============================================================================

/// Data attributes of an item card on a menu page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemCard {
    #[serde(default, alias = "data-pid")]
    pub pid: Option<String>,
    #[serde(default, alias = "data-price")]
    pub price: Option<String>,
    #[serde(default, alias = "data-name")]
    pub name: Option<String>,
    #[serde(default, rename = "type", alias = "data-type")]
    pub item_type: Option<String>,
}

impl ItemCard {
    /// Infer a catalog entry from the card.
    ///
    /// A missing name falls back to e.g. `"Pizza 3"`; a non-numeric price
    /// becomes zero. Cards without a usable id yield `None`.
    #[must_use]
    pub fn to_entry(&self) -> Option<(ItemType, CatalogEntry)> {
        let (item_id, item_type) =
            parse_item_ref(self.pid.as_deref()?, self.item_type.as_deref())?;

        let price = self
            .price
            .as_deref()
            .and_then(|p| Decimal::from_str(p.trim()).ok())
            .map_or(Price::ZERO, Price::new);

        let name = self
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("{} {item_id}", capitalize(item_type.as_str())));

        Some((item_type, CatalogEntry::new(item_id, name, price, item_type)))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Resolve an add-to-cart item reference.
///
/// `reference` is either a bare id (`"7"`) or `"<type>-<id>"`
/// (`"drink-2"`). A non-empty `type_attr` overrides the type embedded in the
/// reference; with neither, the item is a pizza. Ids are read like a
/// leading-integer parse, so `"12abc"` is 12. Unknown types and references
/// without a leading integer yield `None`.
#[must_use]
pub fn parse_item_ref(reference: &str, type_attr: Option<&str>) -> Option<(ItemId, ItemType)> {
    let (embedded_type, id_part) = match reference.split_once('-') {
        Some((item_type, rest)) => (Some(item_type), rest),
        None => (None, reference),
    };

    let item_id = parse_int_prefix(id_part)?;
    let item_type = match type_attr.filter(|t| !t.is_empty()).or(embedded_type) {
        Some(name) => name.parse::<ItemType>().ok()?,
        None => ItemType::default(),
    };

    Some((ItemId::new(item_id), item_type))
}

/// Parse the leading integer of `s`, ignoring leading whitespace and any
/// trailing garbage.
fn parse_int_prefix(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let number = digits.get(..end).filter(|d| !d.is_empty())?;
    format!("{sign}{number}").parse().ok()
}
