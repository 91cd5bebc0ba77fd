mod handler;

pub use handler::{ProtectedResponse, UsersResponse, protected, users};
