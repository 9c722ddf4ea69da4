//! Domain specific structures, implementations, and logic

mod function;
mod invocation;
mod subscription;

pub use function::*;
pub use invocation::*;
pub use subscription::*;
