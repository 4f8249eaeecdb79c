pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use api::create_router;
pub use services::PnlAggregator;
