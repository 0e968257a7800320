use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::container::ContainerId;
use crate::error::TypeError;
use crate::object::ObjectId;

/// Location of an object: the container it lives in plus its own id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub container: ContainerId,
    pub object: ObjectId,
}

impl Address {
    pub fn new(container: ContainerId, object: ObjectId) -> Self {
        Self { container, object }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Address({}/{})",
            self.container.short_hex(),
            self.object.short_hex()
        )
    }
}

/// `<container-hex>/<object-hex>`
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.object)
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cid, oid) = s
            .split_once('/')
            .ok_or_else(|| TypeError::InvalidAddress(format!("missing '/' in {s:?}")))?;
        Ok(Self {
            container: ContainerId::from_hex(cid)?,
            object: ObjectId::from_hex(oid)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address::new(ContainerId::from_hash([1; 32]), ObjectId::from_hash([2; 32]))
    }

    #[test]
    fn display_parse_roundtrip() {
        let a = addr();
        let parsed: Address = a.to_string().parse().unwrap();
        assert_eq!(parsed, a);
    }

    #[test]
    fn parse_without_separator_fails() {
        let err = "deadbeef".parse::<Address>().unwrap_err();
        assert!(matches!(err, TypeError::InvalidAddress(_)));
    }

    #[test]
    fn parse_with_bad_object_fails() {
        let s = format!("{}/xyz", ContainerId::from_hash([1; 32]));
        assert!(s.parse::<Address>().is_err());
    }
}
