use anyhow::{bail, Result};
use kafka_connector::harness::ModuleRunner;
use kafka_connector::module::connector::{Connector, Options};
use options::{LogFormat, MainOptions};
use structopt::StructOpt;
use tracing::info;

mod options;

#[tokio::main]
async fn main() -> Result<()> {
    let (options, runner) = init();

    let reason = runner.run(Connector::new(options)).await;

    if reason.is_failure() {
        bail!(reason);
    }

    Ok(())
}

fn init() -> (Options, ModuleRunner) {
    let options = MainOptions::from_args();

    let formatter = tracing_subscriber::fmt().with_env_filter(options.log);

    match options.log_format {
        LogFormat::Text => formatter.init(),
        LogFormat::Compact => formatter.compact().init(),
        LogFormat::Json => formatter.json().init(),
    };

    let runner = match options.status_server {
        Some(port) => ModuleRunner::new_with_status_server(port),
        None => ModuleRunner::default(),
    };

    info!("kafka-connector {}", env!("CARGO_PKG_VERSION"));

    (options.connector, runner)
}
