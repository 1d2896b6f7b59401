pub mod router;
pub mod types;
pub mod handlers {
    pub mod cart;
    pub mod common;
    pub mod health;
    pub mod products;
}

pub use handlers::common::ApiError;
pub use router::{create_router, ApiDoc};
pub use types::AppState;
