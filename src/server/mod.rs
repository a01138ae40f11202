//! HTTP server layer for Pass Forge.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                      POST /api/pass                             │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────┐ │
//! │  │        handlers          │  │           routes             │ │
//! │  │ (method gate, responses) │  │ (CORS, tracing, body limit)  │ │
//! │  └──────────────────────────┘  └──────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, method_not_allowed, pass_handler, AppState, ErrorResponse, HealthResponse,
    PassResponse, GENERIC_FAILURE_MESSAGE, INVALID_REQUEST_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE,
};
pub use routes::{create_router, RouterConfig, DEFAULT_BODY_LIMIT, PASS_ROUTE};
