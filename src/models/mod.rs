pub mod panel;
pub mod product;

pub use panel::*;
pub use product::*;
