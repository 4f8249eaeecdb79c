pub mod error;
pub mod hyperliquid;

pub use error::*;
pub use hyperliquid::*;
