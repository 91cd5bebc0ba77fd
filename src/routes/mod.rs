pub mod auth;
pub mod demo;
pub mod site;
pub mod vortex;
