//! This library crate contains everything required to bridge Kafka topics to gateway functions.
//!
//! Submodules have been introduced to split responsibilities. Each module has a specific focus
//! and they together form a chain of dependencies from the low-level [`library`], over the connector
//! [`domain`] types, through the executable [`harness`], up to the runnable [`module`] and its jobs.

#![deny(missing_docs)]

pub mod constants;
pub mod domain;
pub mod harness;
pub mod library;
pub mod module;
