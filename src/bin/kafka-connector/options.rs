use std::str::FromStr;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    about = "Invokes gateway functions for messages published on Kafka topics.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct MainOptions {
    /// Log level, scopable to different modules
    ///
    /// Levels: trace, debug, info, warn, error
    #[structopt(
        short,
        long,
        default_value = "info,hyper=warn,rdkafka=warn",
        env = "RUST_LOG",
        value_name = "level"
    )]
    pub log: String,

    /// Log output format
    ///
    /// Formats: text, compact, json
    #[structopt(long, env, default_value = "text", value_name = "format")]
    pub log_format: LogFormat,

    /// Enable status reporting server which can be used for readiness checks
    #[structopt(long, env, value_name = "port")]
    pub status_server: Option<u16>,

    #[structopt(flatten)]
    pub connector: kafka_connector::module::connector::Options,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Text,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}
