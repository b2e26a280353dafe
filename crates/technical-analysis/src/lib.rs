pub mod chart;
pub mod indicators;


pub use chart::*;
pub use indicators::*;
