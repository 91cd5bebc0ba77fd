mod handler;

pub use handler::{HealthResponse, health, index};
