pub mod pnl;
pub mod spline;
pub mod spot_meta;

pub use pnl::*;
pub use spline::*;
pub use spot_meta::*;
