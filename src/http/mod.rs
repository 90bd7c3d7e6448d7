//! HTTP API
//!
//! REST endpoints for recorder control and memo CRUD, used by browser front
//! ends and by operators poking the service with curl.

pub mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
