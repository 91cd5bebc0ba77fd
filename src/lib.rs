use std::sync::Arc;

use auth::{SessionIssuer, UserDirectory};
use config::Config;
use error::StartupError;
use vortex::VortexClient;

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod utils;
pub mod vortex;

/// Everything a handler can reach. Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<UserDirectory>,
    pub sessions: Arc<SessionIssuer>,
    pub vortex: Arc<VortexClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let directory = UserDirectory::seeded(config.bcrypt_cost)?;
        let sessions = SessionIssuer::from_config(&config);
        let vortex = VortexClient::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            directory: Arc::new(directory),
            sessions: Arc::new(sessions),
            vortex: Arc::new(vortex),
        })
    }
}
