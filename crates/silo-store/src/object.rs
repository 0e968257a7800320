use serde::{Deserialize, Serialize};
use silo_crypto::{ContentHasher, Signature, SignatureError, SigningKey, VerifyingKey};
use silo_types::{
    Address, Checksum, ContainerId, Epoch, ObjectId, OwnerId, SessionToken,
};

use crate::error::StoreResult;

/// Header format version accepted by this node.
pub const CURRENT_VERSION: u32 = 1;

/// The kind of object stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    /// Opaque user payload.
    #[default]
    Regular,
    /// Payload is an encoded [`Tombstone`] naming objects to remove.
    Tombstone,
}

impl ObjectType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Tombstone => "Tombstone",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// User-defined key/value attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Object metadata. The object id is derived from this structure alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    pub container: ContainerId,
    pub owner: OwnerId,
    pub creation_epoch: Epoch,
    /// Declared payload length in bytes.
    pub payload_size: u64,
    pub payload_checksum: Option<Checksum>,
    pub homomorphic_hash: Option<Checksum>,
    pub object_type: ObjectType,
    /// Session token stamped by the node when it signs on the owner's behalf.
    pub session: Option<SessionToken>,
    pub attributes: Vec<Attribute>,
}

impl Header {
    /// A header for `container` owned by `owner` with every other field
    /// empty.
    pub fn new(container: ContainerId, owner: OwnerId) -> Self {
        Self {
            version: CURRENT_VERSION,
            container,
            owner,
            creation_epoch: Epoch::ZERO,
            payload_size: 0,
            payload_checksum: None,
            homomorphic_hash: None,
            object_type: ObjectType::Regular,
            session: None,
            attributes: Vec::new(),
        }
    }

    /// Canonical encoding used for identity.
    pub fn canonical_bytes(&self) -> StoreResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Content-derived object id.
    pub fn compute_id(&self) -> StoreResult<ObjectId> {
        Ok(ContentHasher::HEADER.object_id(&self.canonical_bytes()?))
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Signature over the object id bytes together with the signer's public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSignature {
    pub key: [u8; 32],
    pub signature: Signature,
}

impl ObjectSignature {
    pub fn sign(key: &SigningKey, id: &ObjectId) -> Self {
        Self {
            key: key.verifying_key().as_bytes(),
            signature: key.sign_object_id(id),
        }
    }

    pub fn verify(&self, id: &ObjectId) -> Result<(), SignatureError> {
        VerifyingKey::from_bytes(self.key)?.verify_object_id(id, &self.signature)
    }

    /// Owner identity bound to the signing key.
    pub fn signer(&self) -> OwnerId {
        OwnerId::from_public_key(&self.key)
    }
}

/// A complete object: identity, header, optional signature and payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub header: Header,
    pub signature: Option<ObjectSignature>,
    pub payload: Vec<u8>,
}

impl Object {
    /// Unsigned object with a null id, as sent for server-side signing.
    pub fn unsigned(header: Header, payload: Vec<u8>) -> Self {
        Self {
            id: ObjectId::null(),
            header,
            signature: None,
            payload,
        }
    }

    /// Compute the id of `header` and sign it with `key`.
    pub fn signed(header: Header, payload: Vec<u8>, key: &SigningKey) -> StoreResult<Self> {
        let id = header.compute_id()?;
        Ok(Self {
            id,
            signature: Some(ObjectSignature::sign(key, &id)),
            header,
            payload,
        })
    }

    pub fn address(&self) -> Address {
        Address::new(self.header.container, self.id)
    }

    /// Header, id and signature without the payload.
    pub fn header_view(&self) -> HeaderView {
        HeaderView {
            id: self.id,
            header: self.header.clone(),
            signature: self.signature.clone(),
        }
    }
}

/// Payload-free view of a stored object, returned by `head`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderView {
    pub id: ObjectId,
    pub header: Header,
    pub signature: Option<ObjectSignature>,
}

/// Payload of a tombstone object: the members it removes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tombstone {
    pub members: Vec<ObjectId>,
    pub expires_at: Epoch,
}

impl Tombstone {
    pub fn new(members: Vec<ObjectId>, expires_at: Epoch) -> Self {
        Self {
            members,
            expires_at,
        }
    }

    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> StoreResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
