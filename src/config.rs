use serde::{Deserialize, Serialize};

/// Sizing hints for a [`Registry`](crate::Registry).
///
/// Neither value is a limit; they only pre-allocate storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Number of poset slots reserved up front.
    pub slot_capacity: usize,

    /// Number of elements each new poset reserves room for.
    pub element_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            slot_capacity: 8,
            element_capacity: 0,
        }
    }
}

impl RegistryConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has unknown fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = RegistryConfig::from_json(r#"{ "element_capacity": 32 }"#).unwrap();
        assert_eq!(
            config,
            RegistryConfig {
                slot_capacity: 8,
                element_capacity: 32
            }
        );
        assert_eq!(RegistryConfig::from_json("{}").unwrap(), RegistryConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(RegistryConfig::from_json(r#"{ "max_posets": 3 }"#).is_err());
    }
}
