//! Implementations of traits from this module using third-party crates

pub mod kafka;

#[cfg(test)]
pub(crate) mod mock;
