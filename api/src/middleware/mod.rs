pub mod auth;
pub mod cors;

pub use auth::{AuthContext, SessionGate};
pub use cors::create_cors;
