//! Runtime harness to execute modules and keep them alive

mod heart;
mod module;

pub use heart::*;
pub use module::*;
