//! HTTP middleware: sessions, CORS, request IDs.

mod cors;
mod request_id;
mod session;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
