//! Wire protocol for the silo object node.
//!
//! Streamed calls (put, get, get-range) exchange length-prefixed frames
//! encoded by [`WireCodec`]; unary calls exchange the request and response
//! structs in [`message`] as JSON bodies.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use codec::WireCodec;
pub use endpoint::{endpoints, HealthResponse, NodeInfo};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    CreateSessionRequest, CreateSessionResponse, EpochResponse, ErrorResponse, GetPart,
    GetRangeRequest, GetRequest, HeadRequest, ListContainersResponse, PutContainerRequest,
    PutContainerResponse, PutPart, PutRequest, PutResponse, RangeHashRequest, RangeHashResponse,
    SearchRequest, SearchResponse, SiloMessage, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};
