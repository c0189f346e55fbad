//! Household persons that pay for and own receipt items.

use serde::{Deserialize, Serialize};

/// A person known to the tracker.
///
/// `payer` marks people who can appear as a receipt's payer; `owner`
/// marks people items can be split between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Server-assigned id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Can be selected as a receipt payer.
    pub payer: bool,
    /// Can be selected as an item owner.
    pub owner: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_shape() {
        let person: Person = serde_json::from_str(
            r#"{"id": 1, "name": "Alice", "payer": true, "owner": true}"#,
        )
        .unwrap();
        assert_eq!(person.name, "Alice");
        assert!(person.payer);
    }
}
