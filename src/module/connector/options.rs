use crate::library::helpers::parse_duration;
use crate::module::options::{BrokerOptions, GatewayOptions};
use std::str::FromStr;
use std::time::Duration;
use structopt::StructOpt;

/// Options for the connector module
#[derive(Debug, StructOpt)]
pub struct Options {
    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub broker: BrokerOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub gateway: GatewayOptions,

    /// Interval in which the topic map is rebuilt from the function registry
    #[structopt(long, env = "rebuild_interval", default_value = "3s", parse(try_from_str = parse_duration))]
    pub rebuild_interval: Duration,

    /// Behaviour when the function registry can not be queried
    ///
    /// Either `exit` to terminate the process or `keep-stale` to continue routing with the last known topic map
    #[structopt(long, env = "registry_failure", default_value = "exit", value_name = "policy")]
    pub registry_failure: RegistryFailurePolicy,

    /// Whether the subscribers of a message are invoked one after another or all at once
    ///
    /// Either `sequential` or `concurrent`
    #[structopt(long, env = "dispatch_mode", default_value = "sequential", value_name = "mode")]
    pub dispatch_mode: DispatchMode,
}

/// Reaction to a failed registry query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFailurePolicy {
    /// Terminate the process
    Exit,
    /// Log the failure and keep the previous topic map
    KeepStale,
}

impl FromStr for RegistryFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exit" => Ok(Self::Exit),
            "keep-stale" => Ok(Self::KeepStale),
            other => Err(format!("unknown registry failure policy '{}'", other)),
        }
    }
}

/// Order in which the subscribers of a single message are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One invocation after another
    Sequential,
    /// All invocations at once, the message is acknowledged once all of them completed
    Concurrent,
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(format!("unknown dispatch mode '{}'", other)),
        }
    }
}
