pub mod mxl;
pub mod strip;

mod writer;

pub use mxl::*;
pub use strip::*;
