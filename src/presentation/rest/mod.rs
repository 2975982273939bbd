//! REST surface: public market endpoints plus the admin routes.

mod admin_handlers;
mod dto;
mod error;
mod handlers;
mod router;

pub use dto::*;
pub use error::ApiError;
pub use router::{AppState, create_router};
