use serde::{Deserialize, Serialize};

use crate::object::Header;

/// Reserved search key matching the hex-encoded owner id.
pub const KEY_OWNER_ID: &str = "$Object:ownerID";
/// Reserved search key matching the object type name.
pub const KEY_OBJECT_TYPE: &str = "$Object:objectType";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOp {
    StringEqual,
    StringNotEqual,
    NotPresent,
    CommonPrefix,
}

/// One condition of a search query. A query matches when all filters do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub key: String,
    pub op: MatchOp,
    pub value: String,
}

impl SearchFilter {
    pub fn new(key: impl Into<String>, op: MatchOp, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equal(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, MatchOp::StringEqual, value)
    }

    pub fn matches(&self, header: &Header) -> bool {
        let found = header_value(header, &self.key);
        match self.op {
            MatchOp::StringEqual => found.as_deref() == Some(self.value.as_str()),
            MatchOp::StringNotEqual => matches!(found, Some(v) if v != self.value),
            MatchOp::NotPresent => found.is_none(),
            MatchOp::CommonPrefix => matches!(found, Some(v) if v.starts_with(&self.value)),
        }
    }
}

/// Whether `header` satisfies every filter. An empty list matches all.
pub fn matches_all(filters: &[SearchFilter], header: &Header) -> bool {
    filters.iter().all(|f| f.matches(header))
}

fn header_value(header: &Header, key: &str) -> Option<String> {
    match key {
        KEY_OWNER_ID => Some(header.owner.to_hex()),
        KEY_OBJECT_TYPE => Some(header.object_type.name().to_string()),
        _ => header.attribute(key).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Attribute, ObjectType};
    use silo_types::{ContainerId, OwnerId};

    fn header() -> Header {
        let mut h = Header::new(ContainerId::from_hash([1; 32]), OwnerId::from_public_key(&[2; 32]));
        h.attributes.push(Attribute::new("FileName", "report-2024.pdf"));
        h
    }

    #[test]
    fn equal_and_not_equal() {
        let h = header();
        assert!(SearchFilter::equal("FileName", "report-2024.pdf").matches(&h));
        assert!(!SearchFilter::equal("FileName", "other").matches(&h));
        assert!(SearchFilter::new("FileName", MatchOp::StringNotEqual, "other").matches(&h));
        assert!(!SearchFilter::new("Missing", MatchOp::StringNotEqual, "x").matches(&h));
    }

    #[test]
    fn not_present_and_prefix() {
        let h = header();
        assert!(SearchFilter::new("Missing", MatchOp::NotPresent, "").matches(&h));
        assert!(!SearchFilter::new("FileName", MatchOp::NotPresent, "").matches(&h));
        assert!(SearchFilter::new("FileName", MatchOp::CommonPrefix, "report-").matches(&h));
        assert!(!SearchFilter::new("FileName", MatchOp::CommonPrefix, "invoice").matches(&h));
    }

    #[test]
    fn reserved_keys() {
        let mut h = header();
        assert!(SearchFilter::equal(KEY_OWNER_ID, h.owner.to_hex()).matches(&h));
        assert!(SearchFilter::equal(KEY_OBJECT_TYPE, "Regular").matches(&h));
        h.object_type = ObjectType::Tombstone;
        assert!(SearchFilter::equal(KEY_OBJECT_TYPE, "Tombstone").matches(&h));
    }

    #[test]
    fn empty_filter_list_matches() {
        assert!(matches_all(&[], &header()));
    }
}
