use std::sync::Arc;
use nyaa_core::{Authenticator, BrowseEngine, CommentService, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    engine: BrowseEngine,
    comments: CommentService,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        engine: BrowseEngine,
        comments: CommentService,
    ) -> Self {
        Self {
            config,
            authenticator,
            engine,
            comments,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn engine(&self) -> &BrowseEngine {
        &self.engine
    }

    pub fn comments(&self) -> &CommentService {
        &self.comments
    }
}
