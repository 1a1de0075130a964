//! Network Module
//!
//! HTTP adapter over the store.
//!
//! ## Routes
//! | Method | Path         | Command         | Success body            |
//! |--------|--------------|-----------------|-------------------------|
//! | GET    | `/`          | none            | `{"key":"value"}`       |
//! | GET    | `/key/{key}` | `Get`           | raw value               |
//! | POST   | `/key/{key}` | `Set` (body)    | `{"status":"success"}`  |
//! | DELETE | `/key/{key}` | `Delete`        | `{"status":"success"}`  |
//!
//! Any failure is `500` with `{"error": <message>}`.

mod handlers;
mod server;

pub use handlers::{router, ApiError, JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
pub use server::Server;
