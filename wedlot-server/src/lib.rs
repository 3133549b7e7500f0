//! Axum HTTP API for the wedding lottery.
//!
//! Handlers are thin wrappers over the stores in `wedlot-core` and the
//! draw engine in `wedlot-draw`. Storage and speech are wired once in
//! [`bootstrap`].

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use state::{AppState, ServerContext};
