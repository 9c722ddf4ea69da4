mod consumer;
mod refresh;

pub use consumer::*;
pub use refresh::*;
