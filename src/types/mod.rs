pub mod bar;
pub mod pattern;

pub use bar::*;
pub use pattern::*;
