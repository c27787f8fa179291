/*!
 * Core Module
 * Fundamental descriptor types, limits, allocation and error handling
 */

pub mod errors;
pub mod id;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use id::RecyclingAllocator;
pub use limits::*;
pub use types::*;
