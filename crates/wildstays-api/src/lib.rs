pub mod auth;
pub mod convert;
pub mod error;
pub mod extract;
pub mod images;
pub mod listings;
pub mod middleware;
pub mod reservations;
pub mod routes;
pub mod state;
pub mod storage;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner};
