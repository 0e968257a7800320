use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use bytes::BytesMut;
use futures::StreamExt;
use silo_container::{Container, ContainerSource};
use silo_protocol::{
    CreateSessionRequest, CreateSessionResponse, EpochResponse, GetRangeRequest, GetRequest,
    HeadRequest, HealthResponse, ListContainersResponse, NodeInfo, ProtocolError, PutContainerRequest,
    PutContainerResponse, PutPart, PutRequest, PutResponse, RangeHashRequest, RangeHashResponse,
    SearchRequest, SearchResponse, SiloMessage, WireCodec,
};
use silo_store::HeaderView;
use silo_types::{ContainerId, EpochSource, OwnerId};
use tracing::{debug, info};

use crate::error::{ServerError, ServerResult};
use crate::node::Node;
use crate::stream::framed_response;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn info_handler(State(node): State<Node>) -> Json<NodeInfo> {
    let object = node.objects.config();
    Json(NodeInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        epoch: node.network.current_epoch().value(),
        storage_backend: node.config.storage.backend.name().into(),
        max_payload_size: object.max_payload_size,
        chunk_size: object.chunk_size,
        homomorphic_hashing: object.homomorphic_hashing,
    })
}

pub async fn epoch_handler(State(node): State<Node>) -> Json<EpochResponse> {
    Json(EpochResponse {
        epoch: node.network.current_epoch(),
    })
}

/// Advance the local epoch and drop sessions that expired with it.
pub async fn epoch_tick_handler(State(node): State<Node>) -> ServerResult<Json<EpochResponse>> {
    let epoch = node.network.tick();
    let pruned = node.sessions.prune(epoch)?;
    info!(%epoch, pruned, "epoch advanced");
    Ok(Json(EpochResponse { epoch }))
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

/// Client-streaming put. The body is a sequence of `Put` frames: the
/// header part first, then payload chunks.
pub async fn put_handler(State(node): State<Node>, body: Body) -> ServerResult<Json<PutResponse>> {
    let mut stream = node.objects.put();
    let mut buf = BytesMut::new();
    let mut data = body.into_data_stream();

    while let Some(piece) = data.next().await {
        let piece = piece.map_err(|e| ServerError::BadRequest(format!("request body: {e}")))?;
        buf.extend_from_slice(&piece);
        while let Some(msg) = WireCodec::decode_from(&mut buf)? {
            match msg {
                SiloMessage::Put(PutRequest {
                    session,
                    part: PutPart::Init(object),
                }) => stream.init(object, session)?,
                SiloMessage::Put(PutRequest {
                    part: PutPart::Chunk(chunk),
                    ..
                }) => stream.chunk(&chunk)?,
                other => {
                    return Err(ProtocolError::UnexpectedMessage {
                        expected: "Put",
                        got: other.type_name(),
                    }
                    .into())
                }
            }
        }
    }
    if !buf.is_empty() {
        return Err(ProtocolError::FramingError(format!(
            "{} trailing bytes after last frame",
            buf.len()
        ))
        .into());
    }

    let id = stream.close()?;
    Ok(Json(PutResponse { id }))
}

/// Server-streaming get: a header frame, then payload chunk frames.
pub async fn get_handler(State(node): State<Node>, Json(req): Json<GetRequest>) -> Response {
    let service = node.objects.clone();
    framed_response(move |mut sink| async move { service.get(&req.address, &mut sink).await })
        .await
}

pub async fn range_handler(State(node): State<Node>, Json(req): Json<GetRangeRequest>) -> Response {
    let service = node.objects.clone();
    framed_response(move |mut sink| async move {
        service.get_range(&req.address, req.range, &mut sink).await
    })
    .await
}

pub async fn head_handler(
    State(node): State<Node>,
    Json(req): Json<HeadRequest>,
) -> ServerResult<Json<HeaderView>> {
    Ok(Json(node.objects.head(&req.address, req.raw)?))
}

pub async fn search_handler(
    State(node): State<Node>,
    Json(req): Json<SearchRequest>,
) -> ServerResult<Json<SearchResponse>> {
    let ids = node.objects.search(&req.container, &req.filters)?;
    debug!(container = %req.container, hits = ids.len(), "search");
    Ok(Json(SearchResponse { ids }))
}

pub async fn range_hash_handler(
    State(node): State<Node>,
    Json(req): Json<RangeHashRequest>,
) -> ServerResult<Json<RangeHashResponse>> {
    let hashes = node
        .objects
        .range_hash(&req.address, req.checksum, &req.salt, &req.ranges)?;
    Ok(Json(RangeHashResponse { hashes }))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub async fn create_session_handler(
    State(node): State<Node>,
    Json(req): Json<CreateSessionRequest>,
) -> ServerResult<Json<CreateSessionResponse>> {
    let token = node.sessions.create(req.owner, req.expires_at)?;
    info!(session = %token.id, owner = %req.owner.short_id(), expires_at = %req.expires_at, "session created");
    Ok(Json(CreateSessionResponse { token }))
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

pub async fn put_container_handler(
    State(node): State<Node>,
    Json(req): Json<PutContainerRequest>,
) -> ServerResult<Json<PutContainerResponse>> {
    let id = node.containers.put(req.container)?;
    Ok(Json(PutContainerResponse { id }))
}

pub async fn get_container_handler(
    State(node): State<Node>,
    Path(id): Path<String>,
) -> ServerResult<Json<Container>> {
    let id = parse_container_id(&id)?;
    node.containers
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("container {id}")))
}

pub async fn delete_container_handler(
    State(node): State<Node>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let id = parse_container_id(&id)?;
    if node.containers.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::NotFound(format!("container {id}")))
    }
}

pub async fn list_containers_handler(
    State(node): State<Node>,
    Path(owner): Path<String>,
) -> ServerResult<Json<ListContainersResponse>> {
    let owner = OwnerId::from_hex(&owner).map_err(|e| ServerError::BadRequest(e.to_string()))?;
    let ids = node.containers.list(&owner)?;
    Ok(Json(ListContainersResponse { ids }))
}

fn parse_container_id(s: &str) -> ServerResult<ContainerId> {
    ContainerId::from_hex(s).map_err(|e| ServerError::BadRequest(e.to_string()))
}
