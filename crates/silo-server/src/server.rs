use tokio::net::TcpListener;
use tracing::info;

use crate::config::NodeConfig;
use crate::error::{ServerError, ServerResult};
use crate::node::Node;
use crate::router::build_router;

/// Silo object node server.
pub struct SiloServer {
    node: Node,
}

impl SiloServer {
    pub fn new(config: NodeConfig) -> ServerResult<Self> {
        Ok(Self {
            node: Node::new(config)?,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.node.config
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.node.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.node.config.server.bind_addr;
        let app = build_router(self.node);
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "silo node listening");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
