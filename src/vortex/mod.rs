//! Pass-through access to the Vortex invitations service.

mod client;
mod model;

pub use client::{UpstreamError, VortexClient};
pub use model::{InvitationTarget, JwtPayload};
