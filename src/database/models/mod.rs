mod macros;
pub mod range;
pub mod squad;

// Re-export all models for easy importing
pub use range::*;
pub use squad::*;
