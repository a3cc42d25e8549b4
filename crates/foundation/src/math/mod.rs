pub mod precision;
pub mod spherical;
pub mod vec;

pub use precision::*;
pub use spherical::*;
pub use vec::*;
