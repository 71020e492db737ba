//! Static-data HTTP API used as the `ShopBridge` demo backend.
//!
//! Every route returns a hardcoded payload. Query parameters are accepted (and type-checked by
//! the query extractor) but never used to filter anything; `user_id` is echoed into the cart.

pub mod config;
pub mod models;
pub mod routes;

pub use routes::{router, serve};
