pub mod auth;
pub mod response;

pub use auth::{token_gate, BearerToken};
pub use response::RemoteReply;
