//! Structures to consume partitioned message streams in a distributed system
//!
//! Messages are consumed from a log-like data structure split into partitions. A group of
//! consumers shares the partitions of the subscribed topics and every processed message has
//! to be acknowledged so that a restarted consumer resumes where its predecessor left off.
//! For more details, consult the [`event`] module.

pub mod event;
pub mod implementation;
