pub mod preprocessing;
pub mod masking;
pub mod extraction;
pub mod simplification;
pub mod filter;

pub use preprocessing::*;
pub use masking::*;
pub use extraction::*;
pub use simplification::*;
pub use filter::*;
