pub mod omr;

pub use omr::*;
