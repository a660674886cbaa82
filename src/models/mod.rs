pub mod filter;
pub mod record;
pub mod sort;

pub use filter::*;
pub use record::*;
pub use sort::*;
