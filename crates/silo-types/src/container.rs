use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a container: the BLAKE3 hash of its canonical description.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId([u8; 32]);

hash_identifier!(ContainerId);

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.short_hex())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_via_from_str() {
        let id = ContainerId::from_hash([9u8; 32]);
        let parsed: ContainerId = id.to_hex().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn debug_is_short() {
        let id = ContainerId::from_hash([0xff; 32]);
        assert_eq!(format!("{id:?}"), "ContainerId(ffffffff)");
    }
}
