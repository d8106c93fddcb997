//! kh-core: shared foundation for kirchhoff.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for buses and grid elements)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{KhError, KhResult};
pub use ids::*;
pub use numeric::*;
