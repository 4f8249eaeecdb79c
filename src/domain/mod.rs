pub mod curve;
pub mod fill;

pub use curve::*;
pub use fill::*;
