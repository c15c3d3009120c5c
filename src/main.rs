use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use melt::Config;
use melt_core::SystemClock;
use melt_otlp::DumpFormat;

/// Synthesize telemetry for a document of entities and send it as OTLP
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The document to export; reads stdin when omitted or `-`
    file: Option<PathBuf>,

    /// Encode payloads without sending them
    #[arg(long)]
    dry_run: bool,

    /// Print each payload before it's sent
    #[arg(long)]
    dump: bool,

    /// The format to dump payloads in: auto, human, text, json, yaml, or hex
    #[arg(long, requires = "dump")]
    output: Option<DumpFormat>,

    /// The base URL of the ingestion API
    #[arg(long, env = "MELT_ENDPOINT")]
    endpoint: Option<String>,

    /// A bearer token to authenticate requests with
    #[arg(long, env = "MELT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// An extra request header as `KEY=VALUE`; may be repeated
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// A timeout in seconds for each request
    #[arg(long)]
    timeout: Option<u64>,

    /// Compress request bodies with gzip
    #[arg(long)]
    gzip: bool,

    /// Stop at the first signal that fails to export
    #[arg(long)]
    fail_fast: bool,

    /// Synthesize this many data points for each metric without any
    #[arg(long, value_name = "N")]
    synthesize: Option<usize>,

    /// The minimum level of diagnostics to print; defaults to `error` with `--dump`, otherwise `info`
    #[arg(long, value_parser = parse_level)]
    log_level: Option<emit::Level>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            file: cli.file,
            dry_run: cli.dry_run,
            dump: cli.dump,
            output: cli.output,
            endpoint: cli.endpoint,
            token: cli.token,
            headers: cli.headers,
            timeout: cli.timeout.map(Duration::from_secs),
            gzip: cli.gzip,
            fail_fast: cli.fail_fast,
            synthesize: cli.synthesize,
        }
    }
}

fn parse_header(header: &str) -> Result<(String, String), melt::Error> {
    melt::parse_header(header)
}

fn parse_level(level: &str) -> Result<emit::Level, String> {
    level
        .parse()
        .map_err(|_| format!("`{level}` isn't a level; expected debug, info, warn, or error"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .unwrap_or_else(|| melt::default_log_level(cli.dump));

    let rt = emit::setup()
        .emit_to(emit_term::stdout())
        .emit_when(emit::level::min_filter(level))
        .init();

    let code = match run(cli.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            emit::error!("export failed: {err}", #[emit::as_error] err);

            ExitCode::FAILURE
        }
    };

    rt.blocking_flush(Duration::from_secs(5));

    code
}

fn run(config: Config) -> Result<(), melt::Error> {
    config.validate()?;

    let data = config.read_document()?;

    let reports = melt::run_blocking(&config, data, SystemClock)?;

    for report in reports {
        emit::debug!("exported {report}", #[emit::as_display] report);
    }

    Ok(())
}
