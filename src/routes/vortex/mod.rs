mod handler;
mod model;

pub use handler::{
    accept_invitations, generate_jwt, get_invitation, invitations_by_group,
    invitations_by_target, reinvite, revoke_invitation,
};
pub use model::{
    AcceptInvitationsRequest, InvitationsResponse, JwtRequest, JwtResponse, TargetQuery,
};
