use serde::Serialize;

use crate::{error::InvariantViolation, poset::Poset};

/// Read-only export of one poset: its elements, Hasse edges, incomparable
/// pairs and one linear extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PosetSnapshot {
    /// Element names in insertion order
    pub elements: Vec<String>,
    /// Covering pairs `(lesser, greater)`
    pub covers: Vec<(String, String)>,
    pub incomparable: Vec<(String, String)>,
    /// A total order compatible with the relation
    pub order: Vec<String>,
}

impl PosetSnapshot {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn owned_pairs(pairs: Vec<(&str, &str)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(a, b)| (a.to_owned(), b.to_owned()))
        .collect()
}

impl Poset {
    /// Captures the current order.
    ///
    /// # Errors
    ///
    /// Fails only if the stored relation is corrupt; see
    /// [`Poset::linear_extension`].
    pub fn snapshot(&self) -> Result<PosetSnapshot, InvariantViolation> {
        Ok(PosetSnapshot {
            elements: self.names().map(str::to_owned).collect(),
            covers: owned_pairs(self.covers()),
            incomparable: owned_pairs(self.incomparable_pairs()),
            order: self
                .linear_extension()?
                .into_iter()
                .map(str::to_owned)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn snapshot_serializes_the_hasse_diagram() {
        let poset = Poset::from_chains(&[vec!["a", "b"], vec!["a", "c"]]).unwrap();
        let snapshot = poset.snapshot().unwrap();
        assert_eq!(snapshot.order[0], "a");

        let value: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["elements"], json!(["a", "b", "c"]));
        assert_eq!(value["covers"], json!([["a", "b"], ["a", "c"]]));
        assert_eq!(value["incomparable"], json!([["b", "c"]]));
    }

    #[test]
    fn empty_poset_snapshot() {
        let snapshot = Poset::new().snapshot().unwrap();
        assert!(snapshot.elements.is_empty());
        assert!(snapshot.order.is_empty());
    }
}
