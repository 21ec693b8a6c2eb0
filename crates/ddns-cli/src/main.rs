// # ddns - one-shot DDNS updater
//
// Thin integration layer: all DNS and IP logic lives in ddns-core and the
// provider/source crates. This binary is responsible for:
// 1. Parsing the command line (flags win over `DDNS_*` variables)
// 2. Initializing logging from the verbosity
// 3. Building the HTTP client, IP source, provider and prompt
// 4. Running the engine once, printing each result as it is produced
//
// ## Example
//
// ```bash
// ddns -D cloudflare -T ~/.secrets/cloudflare.ini -d example.com:home.example.com list
// ddns -Y -D cloudflare -T "$CF_TOKEN" -d home.example.com update
// ```

mod cli;
mod logging;
mod prompt;
mod report;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use ddns_core::{
    DdnsConfig, DdnsEngine, DnsProvider, FixedIpSource, HttpRequester, IpSource,
    ProviderRegistry, ReqwestRequester, RunReport,
};
use ddns_ip_http::HttpIpSource;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::cli::{Cli, VERBOSE_ENV};
use crate::prompt::StdinConfirm;
use crate::report::StdoutSink;

/// Process exit codes
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Run completed (skipped zone misses included)
    Success = 0,
    /// Usage, dependency, discovery, verification or record failure
    Failure = 1,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => DdnsExitCode::Success,
                _ => DdnsExitCode::Failure,
            };
            let _ = e.print();
            return code.into();
        }
    };

    let verbosity = logging::effective_verbosity(cli.verbose, env::var(VERBOSE_ENV).ok().as_deref());
    if let Err(e) = logging::init(verbosity) {
        eprintln!("{:#}", e);
        return DdnsExitCode::Failure.into();
    }

    let config = cli.into_config();
    debug!("Configuration: {:?}", config);

    if let Err(e) = config.validate() {
        error!("{}", e);
        print_usage();
        return DdnsExitCode::Failure.into();
    }

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{:#}", e);
            return DdnsExitCode::Failure.into();
        }
    };

    match runtime.block_on(run(config)) {
        Ok(report) => {
            info!(
                "{} finished: {} record(s), {} updated, {} without zone",
                report.command,
                report.records.len(),
                report.updated_count(),
                report.zone_miss_count()
            );
            DdnsExitCode::Success.into()
        }
        Err(e) => {
            error!("{}", e);
            if e.is_usage() {
                print_usage();
            }
            DdnsExitCode::Failure.into()
        }
    }
}

fn print_usage() {
    eprintln!("{}", Cli::command().render_usage());
}

/// Single-threaded runtime; every request is awaited in sequence
fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}

/// Wire the components together and run the engine once
async fn run(config: DdnsConfig) -> ddns_core::Result<RunReport> {
    let http: Arc<dyn HttpRequester> = Arc::new(ReqwestRequester::new()?);

    let registry = ProviderRegistry::new();
    ddns_provider_cloudflare::register(&registry);

    let provider: Option<Box<dyn DnsProvider>> = match config.provider.type_name() {
        Some(name) => Some(registry.create_provider(name, Arc::clone(&http))?),
        None => None,
    };

    let ip_source: Box<dyn IpSource> = match config.ip.forced {
        Some(ref address) => Box::new(FixedIpSource::new(address.clone())),
        None => Box::new(HttpIpSource::from_config(&config.ip, http)),
    };
    debug!("IP source: {}", ip_source.source_name());

    let engine = DdnsEngine::new(ip_source, provider, Box::new(StdinConfirm), config)?
        .with_sink(Box::new(StdoutSink));
    engine.run().await
}
