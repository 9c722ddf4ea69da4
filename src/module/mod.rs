//! Runnable modules bundling multiple jobs and providing a unified configuration

pub mod options;

pub mod connector;
