use crate::types::{MarketplaceRef, ObjectId};

pub const GATE_ALERT: &str = "Please enter your PackageID and MarketplaceID";

/// The ID-entry screen shown before the dashboard unlocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdEntry {
    pub package_id: String,
    pub marketplace_id: String,
}

impl IdEntry {
    pub fn new(package_id: impl Into<String>, marketplace_id: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            marketplace_id: marketplace_id.into(),
        }
    }

    /// The marketplace reference, once both IDs are non-blank.
    pub fn submit(&self) -> Option<MarketplaceRef> {
        let package_id = self.package_id.trim();
        let marketplace_id = self.marketplace_id.trim();
        if package_id.is_empty() || marketplace_id.is_empty() {
            return None;
        }
        Some(MarketplaceRef::new(
            ObjectId::from(package_id),
            ObjectId::from(marketplace_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ids_stay_locked() {
        assert!(IdEntry::default().submit().is_none());
        assert!(IdEntry::new("0xP", "").submit().is_none());
        assert!(IdEntry::new("", "0xM").submit().is_none());
        assert!(IdEntry::new("  ", "\t").submit().is_none());
    }

    #[test]
    fn test_both_ids_unlock() {
        let market = IdEntry::new(" 0xP ", "0xM").submit().unwrap();
        assert_eq!(market.package_id.as_str(), "0xP");
        assert_eq!(market.marketplace_id.as_str(), "0xM");
    }
}
