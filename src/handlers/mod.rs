// handlers/mod.rs - Route handlers
//
// Public:    POST /signin, POST /signout (no expiry check)
// Protected: /users, /flightLogs (token_gate middleware runs first, so every
//            handler below receives a BearerToken that has not expired)

pub mod flight_logs;
pub mod session;
pub mod users;

pub use flight_logs::*;
pub use session::*;
pub use users::*;
