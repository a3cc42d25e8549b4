pub mod arena;
pub mod bounds;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use arena::*;
pub use bounds::*;
