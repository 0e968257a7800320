/// HTTP endpoint paths of the node.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
    pub const OBJECT_PUT: &str = "/v1/object/put";
    pub const OBJECT_GET: &str = "/v1/object/get";
    pub const OBJECT_RANGE: &str = "/v1/object/range";
    pub const OBJECT_HEAD: &str = "/v1/object/head";
    pub const OBJECT_SEARCH: &str = "/v1/object/search";
    pub const OBJECT_RANGE_HASH: &str = "/v1/object/range-hash";
    pub const SESSION_CREATE: &str = "/v1/session/create";
    pub const CONTAINER: &str = "/v1/container";
    pub const CONTAINER_BY_ID: &str = "/v1/container/:id";
    pub const CONTAINERS_BY_OWNER: &str = "/v1/container/owner/:owner";
    pub const EPOCH: &str = "/v1/epoch";
    pub const EPOCH_TICK: &str = "/v1/epoch/tick";
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

/// Node information returned by `/v1/info`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NodeInfo {
    pub version: String,
    pub epoch: u64,
    pub storage_backend: String,
    pub max_payload_size: u64,
    pub chunk_size: usize,
    pub homomorphic_hashing: bool,
}
