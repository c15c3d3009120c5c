/*!
Synthesize mock telemetry for a document of entities and send it to an ingestion API.

This crate drives the `melt` command-line tool. A run loads a [`FsocData`] document, fills in any metric data points it's missing, and then exports metrics, logs, and traces through [`melt_otlp`].
*/

use std::io::Read;

use melt_core::{Clock, FsocData, Synthesizer};
use melt_otlp::ExportReport;

mod config;
mod error;

pub use self::{
    config::{parse_header, Config},
    error::{Error, ErrorKind},
};

/**
Load a document from YAML.
*/
pub fn load(reader: impl Read) -> Result<FsocData, Error> {
    Ok(FsocData::from_reader(reader)?)
}

/**
The minimum level of diagnostics to print when none is given.

Diagnostics share stdout with dumped payloads, so only errors are printed while dumping.
*/
pub fn default_log_level(dump: bool) -> emit::Level {
    if dump {
        emit::Level::Error
    } else {
        emit::Level::Info
    }
}

/**
Run an export for a loaded document.

Points are synthesized for metrics without any if the configuration asks for them. Each signal is then exported in turn.
*/
pub async fn run(
    config: &Config,
    mut data: FsocData,
    clock: impl Clock,
) -> Result<Vec<ExportReport>, Error> {
    config.validate()?;

    let now = clock.now();

    if let Some(points) = config.synthesize {
        let filled = Synthesizer::new()
            .points(points)
            .fill(&mut data, now, &mut rand::thread_rng())?;

        emit::debug!("synthesized {points} points for {filled} metrics", points, filled);
    }

    let exporter = config.exporter()?;

    let result = exporter.export_all(&data, now).await;

    for (metric, value) in exporter.metrics().sample() {
        emit::debug!("{metric}: {value}", metric, value);
    }

    let reports = result?;

    for report in &reports {
        if !report.encode_report().is_empty() {
            emit::warn!(
                "{report} dropped {dropped} unsupported items",
                #[emit::as_display]
                report,
                dropped: report.encode_report().unsupported().len(),
            );
        }
    }

    Ok(reports)
}

/**
Run an export on a new single-threaded runtime, blocking until it completes.
*/
pub fn run_blocking(
    config: &Config,
    data: FsocData,
    clock: impl Clock,
) -> Result<Vec<ExportReport>, Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::new(ErrorKind::Export, "failed to start the async runtime", e))?;

    runtime.block_on(run(config, data, clock))
}
