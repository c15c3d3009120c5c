use std::{fmt, sync::Arc};

use melt_core::{Entity, FsocData, Timestamp};
use termcolor::{BufferWriter, ColorChoice};

use crate::{
    client::{Transport, TransportBuilder},
    data::{EncodeReport, EncodedPayload, ExportRequest},
    dump::{self, DumpFormat},
    internal_metrics::{ExporterMetrics, InternalMetrics},
    Error, Signal,
};

/**
Encodes entities into export requests and sends, dumps, or discards them.
*/
pub struct Exporter {
    transport: Option<Transport>,
    dump: Option<DumpFormat>,
    dry_run: bool,
    fail_fast: bool,
    output: BufferWriter,
    metrics: Arc<InternalMetrics>,
}

/**
A builder for an [`Exporter`].
*/
pub struct ExporterBuilder {
    transport: Option<TransportBuilder>,
    dump: Option<DumpFormat>,
    dry_run: bool,
    fail_fast: bool,
    color: ColorChoice,
}

/**
The outcome of exporting a single signal.
*/
#[derive(Debug)]
pub struct ExportReport {
    signal: Signal,
    resources: usize,
    payload_len: usize,
    sent: bool,
    encode: EncodeReport,
}

impl ExportReport {
    pub fn signal(&self) -> Signal {
        self.signal
    }

    /**
    The number of entities that contributed a resource block.
    */
    pub fn resources(&self) -> usize {
        self.resources
    }

    /**
    The size of the protobuf request body in bytes.
    */
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /**
    Whether the request was sent and accepted.

    This is `false` in dry-run mode, or when there was nothing to send.
    */
    pub fn sent(&self) -> bool {
        self.sent
    }

    /**
    Items that were dropped while encoding.
    */
    pub fn encode_report(&self) -> &EncodeReport {
        &self.encode
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} resources, {} bytes)",
            self.signal, self.resources, self.payload_len
        )
    }
}

impl Default for ExporterBuilder {
    fn default() -> Self {
        ExporterBuilder::new()
    }
}

impl ExporterBuilder {
    pub fn new() -> Self {
        ExporterBuilder {
            transport: None,
            dump: None,
            dry_run: false,
            fail_fast: false,
            color: ColorChoice::Auto,
        }
    }

    /**
    Send requests using the given transport.
    */
    pub fn transport(mut self, transport: TransportBuilder) -> Self {
        self.transport = Some(transport);
        self
    }

    /**
    Write each request to stdout in the given format before it's sent.
    */
    pub fn dump(mut self, format: DumpFormat) -> Self {
        self.dump = Some(format);
        self
    }

    /**
    Encode requests, but don't send them.
    */
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /**
    Stop [`Exporter::export_all`] at the first signal that fails.

    By default every signal is attempted and the failures are combined.
    */
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /**
    Whether dumped output uses colour.
    */
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn build(self) -> Result<Exporter, Error> {
        let metrics = Arc::new(InternalMetrics::default());

        let transport = match self.transport {
            Some(transport) if !self.dry_run => Some(transport.build(metrics.clone())?),
            Some(_) => None,
            None if self.dry_run => None,
            None => {
                return Err(Error::configuration(
                    "an endpoint is required unless running in dry-run mode",
                ))
            }
        };

        Ok(Exporter {
            transport,
            dump: self.dump,
            dry_run: self.dry_run,
            fail_fast: self.fail_fast,
            output: BufferWriter::stdout(self.color),
            metrics,
        })
    }
}

impl Exporter {
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::new()
    }

    /**
    Export a single signal from a set of entities.

    Entities without any items for the signal are skipped. If no entity has any, nothing is sent.
    */
    pub async fn export(
        &self,
        signal: Signal,
        entities: &[Entity],
        now: Timestamp,
    ) -> Result<ExportReport, Error> {
        let mut encode = EncodeReport::default();

        let request = ExportRequest::encode(signal, entities, now, &mut encode, &self.metrics);
        let resources = request.len();

        for err in encode.unsupported() {
            emit::warn!(
                "dropped an unsupported {signal} item: {err}",
                #[emit::as_display]
                signal,
                #[emit::as_display]
                err,
            );
        }

        if let Some(format) = self.dump {
            let mut buf = self.output.buffer();

            dump::render(&mut buf, signal, &request, format)?;

            self.output
                .print(&buf)
                .map_err(|e| Error::encode("failed to write dump output", e))?;

            self.metrics.payload_dumped.increment();
        }

        let payload = EncodedPayload::encode(&request);
        let payload_len = payload.len();

        let mut report = ExportReport {
            signal,
            resources,
            payload_len,
            sent: false,
            encode,
        };

        if resources == 0 {
            emit::debug!("no {signal} to export", #[emit::as_display] signal);

            return Ok(report);
        }

        if self.dry_run {
            self.metrics.payload_dry_run.increment();

            emit::info!(
                "dry run: not sending {signal} ({resources} resources, {payload_len} bytes)",
                #[emit::as_display]
                signal,
                resources,
                payload_len,
            );

            return Ok(report);
        }

        let Some(ref transport) = self.transport else {
            return Err(Error::configuration(
                "an endpoint is required unless running in dry-run mode",
            ));
        };

        transport.send(signal, payload).await.map_err(|err| {
            emit::warn!(
                "failed to send {signal} to {endpoint}: {err}",
                #[emit::as_display]
                signal,
                endpoint: transport.endpoint(),
                #[emit::as_display]
                err,
            );

            err
        })?;

        emit::info!(
            "sent {signal} ({resources} resources, {payload_len} bytes) to {endpoint}",
            #[emit::as_display]
            signal,
            resources,
            payload_len,
            endpoint: transport.endpoint(),
        );

        report.sent = true;

        Ok(report)
    }

    /**
    Export metrics, then logs and events, then traces from a document.

    Unless the exporter was built with [`ExporterBuilder::fail_fast`], a failure doesn't stop the remaining signals from being attempted.
    */
    pub async fn export_all(
        &self,
        data: &FsocData,
        now: Timestamp,
    ) -> Result<Vec<ExportReport>, Error> {
        let mut reports = Vec::new();
        let mut errors = Vec::new();

        for signal in Signal::ALL {
            match self.export(signal, data.entities(), now).await {
                Ok(report) => reports.push(report),
                Err(err) if self.fail_fast => return Err(err),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            Ok(reports)
        } else {
            Err(Error::aggregate(errors))
        }
    }

    /**
    Counters describing the exporter's own activity.
    */
    pub fn metrics(&self) -> ExporterMetrics {
        ExporterMetrics {
            metrics: self.metrics.clone(),
        }
    }
}
