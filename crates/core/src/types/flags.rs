//! Process-wide feature flags.
//!
//! The document is read once at startup (see the storefront's `flags`
//! module). Keys use the camelCase names of the JSON document; missing keys
//! default to `false` and unknown keys are ignored so the file can be rolled
//! out ahead of the binary.

use serde::{Deserialize, Serialize};

/// Boolean switches that gate alternate renderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    /// Replace the partitioned catalog with the new-UI placeholder.
    #[serde(rename = "isProductsNewUIEnabled")]
    pub is_products_new_ui_enabled: bool,
}

impl FeatureFlags {
    /// Parse a flags document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the document is not an object of booleans.
    pub fn from_json(document: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_flag() {
        let flags = FeatureFlags::from_json(r#"{"isProductsNewUIEnabled": true}"#).unwrap();
        assert!(flags.is_products_new_ui_enabled);
    }

    #[test]
    fn test_missing_keys_default_to_false() {
        let flags = FeatureFlags::from_json("{}").unwrap();
        assert_eq!(flags, FeatureFlags::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let flags =
            FeatureFlags::from_json(r#"{"isCheckoutEnabled": true, "isProductsNewUIEnabled": false}"#)
                .unwrap();
        assert!(!flags.is_products_new_ui_enabled);
    }

    #[test]
    fn test_rejects_non_boolean() {
        assert!(FeatureFlags::from_json(r#"{"isProductsNewUIEnabled": "yes"}"#).is_err());
        assert!(FeatureFlags::from_json("true").is_err());
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let json = serde_json::to_string(&FeatureFlags {
            is_products_new_ui_enabled: true,
        })
        .unwrap();
        assert_eq!(json, r#"{"isProductsNewUIEnabled":true}"#);
    }
}
