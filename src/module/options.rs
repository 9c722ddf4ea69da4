//! Various options usable by modules
//!
//! The structs in this module allow other modules to flatten them into
//! their own options struct. This allows for a unified yet non-cluttered
//! option set.

use crate::constants::DEFAULT_BROKER_PORT;
use crate::library::helpers::{parse_duration, split_list, with_default_port};
use std::time::Duration;
use structopt::StructOpt;

/// Options for connecting to the broker cluster
#[derive(Debug, StructOpt)]
pub struct BrokerOptions {
    /// Comma separated list of broker hosts, port 9092 is assumed if omitted
    #[structopt(
        long = "broker-host",
        env = "broker_host",
        default_value = "kafka",
        value_name = "hosts"
    )]
    pub host: String,

    /// Comma separated list of topics to consume
    #[structopt(long, env = "topics", value_name = "topics")]
    pub topics: Option<String>,

    /// Delay between two connection attempts while the brokers are unreachable
    #[structopt(long, env = "connect_retry_interval", default_value = "1s", parse(try_from_str = parse_duration))]
    pub connect_retry_interval: Duration,

    /// Time a single connection attempt waits for the cluster metadata
    #[structopt(long, env = "connect_timeout", default_value = "5s", parse(try_from_str = parse_duration))]
    pub connect_timeout: Duration,
}

impl BrokerOptions {
    /// Broker addresses including their ports
    pub fn bootstrap_servers(&self) -> Vec<String> {
        split_list(&self.host)
            .iter()
            .map(|host| with_default_port(host, DEFAULT_BROKER_PORT))
            .collect()
    }

    /// Topics to consume, empty if none have been configured
    pub fn topics(&self) -> Vec<String> {
        self.topics.as_deref().map(split_list).unwrap_or_default()
    }
}

/// Options for communicating with the function gateway
#[derive(Debug, StructOpt)]
pub struct GatewayOptions {
    /// Base URL of the gateway
    #[structopt(
        long = "gateway-url",
        env = "gateway_url",
        default_value = "http://gateway:8080",
        value_name = "url"
    )]
    pub url: String,

    /// Maximum duration of a single function invocation
    #[structopt(long, env = "upstream_timeout", default_value = "30s", parse(try_from_str = parse_duration))]
    pub upstream_timeout: Duration,

    /// Include function responses in the log output
    #[structopt(long, env = "print_response", default_value = "false", parse(try_from_str = parse_flag), value_name = "bool")]
    pub print_response: bool,
}

/// Accepts `true`/`1` and `false`/`0`
fn parse_flag(src: &str) -> Result<bool, String> {
    match src.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        other => Err(format!("expected true or false, got '{}'", other)),
    }
}
