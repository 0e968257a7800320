use serde::{Deserialize, Serialize};
use silo_container::Container;
use silo_store::{HeaderView, Object, SearchFilter};
use silo_types::{Address, ContainerId, Epoch, ObjectId, OwnerId, Range, SessionToken};

pub const PROTOCOL_VERSION: u32 = 1;
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Streamed messages
// ---------------------------------------------------------------------------

/// One part of a client-streaming put.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutRequest {
    /// Session token from the request envelope, for delegated signing.
    pub session: Option<SessionToken>,
    pub part: PutPart,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PutPart {
    /// Id, header and signature; `payload` carries an optional first chunk.
    Init(Object),
    Chunk(Vec<u8>),
}

impl PutRequest {
    pub fn init(object: Object, session: Option<SessionToken>) -> Self {
        Self {
            session,
            part: PutPart::Init(object),
        }
    }

    pub fn chunk(data: Vec<u8>) -> Self {
        Self {
            session: None,
            part: PutPart::Chunk(data),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResponse {
    pub id: ObjectId,
}

/// One part of a streamed get response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GetPart {
    Init(HeaderView),
    Chunk(Vec<u8>),
}

/// Every message that travels inside a framed stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiloMessage {
    Put(PutRequest),
    PutResponse(PutResponse),
    Get(GetPart),
    RangeChunk(Vec<u8>),
    Error(ErrorResponse),
}

impl SiloMessage {
    pub fn type_tag(&self) -> u8 {
        match self {
            Self::Put(_) => 1,
            Self::PutResponse(_) => 2,
            Self::Get(_) => 3,
            Self::RangeChunk(_) => 4,
            Self::Error(_) => 255,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Put(_) => "Put",
            Self::PutResponse(_) => "PutResponse",
            Self::Get(_) => "Get",
            Self::RangeChunk(_) => "RangeChunk",
            Self::Error(_) => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// Unary messages
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
    pub address: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRangeRequest {
    pub address: Address,
    pub range: Range,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRequest {
    pub address: Address,
    /// Return the stored header even if the object was removed.
    #[serde(default)]
    pub raw: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub container: ContainerId,
    #[serde(default)]
    pub filters: Vec<SearchFilter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub ids: Vec<ObjectId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeHashRequest {
    pub address: Address,
    /// Checksum algorithm tag (1 = Tillich–Zémor, 2 = SHA-256).
    pub checksum: u32,
    #[serde(default)]
    pub salt: Vec<u8>,
    pub ranges: Vec<Range>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeHashResponse {
    pub hashes: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub owner: OwnerId,
    pub expires_at: Epoch,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub token: SessionToken,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutContainerRequest {
    pub container: Container,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutContainerResponse {
    pub id: ContainerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListContainersResponse {
    pub ids: Vec<ContainerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochResponse {
    pub epoch: Epoch,
}

/// Terminal error of any call. `code` names the error kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
