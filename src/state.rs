use std::sync::Arc;

use crate::config::Config;
use crate::graph::{GraphClient, GraphError};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub graph: GraphClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, GraphError> {
        let graph = GraphClient::new(&config.graph)?;
        Ok(Self { config, graph })
    }
}
