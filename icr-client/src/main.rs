use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use icr::{ClientConfig, LoopbackIcrServer, ServiceTestClient};

/// Exercises the ICR server: set the finger count, load an object, compute ICRs.
#[derive(Debug, Parser)]
#[command(author, version, about = "ICR server test client")]
struct Args {
    /// Number of fingers of the grasp.
    no_fingers: u64,

    /// Path of the Wavefront *.obj file to load.
    path_obj: PathBuf,

    /// Optional TOML client configuration (object name, center points).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name the object is loaded under. Overrides the configuration.
    #[arg(long)]
    name: Option<String>,
}

fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load client config from {:?}", path))?,
        None => ClientConfig::default(),
    };
    if let Some(name) = &args.name {
        config.object_name = name.clone();
    }
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            log::info!("usage: $ icr_client <no_fingers> <path_obj>");
            return ExitCode::from(1);
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{:#}", e);
            return ExitCode::from(1);
        }
    };

    let client = ServiceTestClient::new(LoopbackIcrServer::new(), config);
    let report = client.run(args.no_fingers, args.path_obj);
    log::info!(
        "add_fingers: {:?}, load_object: {:?}, compute_icr: {:?}",
        report.add_fingers,
        report.load_object,
        report.compute_icr
    );

    ExitCode::SUCCESS
}
