use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::consts::{COIN_TYPE, WIDGET_MODULE, WIDGET_STRUCT};

/// Identifier of an on-chain object (package, marketplace, widget, listing...).
///
/// Kept opaque: the string is passed to the chain exactly as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Account address of a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiAddress(String);

impl SuiAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SuiAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The deployed package and the shared marketplace object a session works against.
///
/// Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceRef {
    pub package_id: ObjectId,
    pub marketplace_id: ObjectId,
}

impl MarketplaceRef {
    pub fn new(package_id: ObjectId, marketplace_id: ObjectId) -> Self {
        Self {
            package_id,
            marketplace_id,
        }
    }

    /// Fully qualified Move function target, e.g. `0xP::widget::mint`.
    pub fn target(&self, module: &str, function: &str) -> String {
        format!("{}::{}::{}", self.package_id, module, function)
    }

    /// Type tag of the widget struct published by the package.
    pub fn widget_type(&self) -> String {
        format!("{}::{}::{}", self.package_id, WIDGET_MODULE, WIDGET_STRUCT)
    }

    /// Coin type the marketplace is priced in.
    pub fn coin_type(&self) -> &'static str {
        COIN_TYPE
    }
}

/// One active listing, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub listing_id: ObjectId,
    pub ask_price: String,
    pub owner: String,
    pub widget: String,
}

impl ListingRow {
    /// Display lines in the order the dashboard shows them.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("listingId: {}", self.listing_id),
            format!("askPrice: {}", self.ask_price),
            format!("owner: {}", self.owner),
            format!("widget: {}", self.widget),
        ]
    }
}

/// Shorten an identifier to `0x1234...abcd` for narrow columns.
pub fn format_short_hex(hex: &str) -> String {
    if hex.is_ascii() && hex.len() > 12 {
        format!("{}...{}", &hex[..6], &hex[hex.len() - 4..])
    } else {
        hex.to_string()
    }
}
