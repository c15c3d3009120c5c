/*!
Render export requests for diagnostics instead of, or as well as, sending them.
*/

use std::{
    fmt,
    io::{IsTerminal, Write},
    str::FromStr,
};

use melt_core::{Entity, Timestamp};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    data::{EncodeReport, EncodedPayload, ExportRequest},
    internal_metrics::InternalMetrics,
    Error, Signal,
};

/**
The format to render a dumped payload in.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DumpFormat {
    /**
    [`DumpFormat::Human`] when stdout is a terminal, otherwise [`DumpFormat::Json`].
    */
    #[default]
    Auto,
    /**
    One colourised line per resource block.
    */
    Human,
    /**
    The whole request on a single line.
    */
    Text,
    /**
    The request in its OTLP/JSON shape.
    */
    Json,
    /**
    The same structure as [`DumpFormat::Json`], as YAML.
    */
    Yaml,
    /**
    Lowercase hex of the protobuf request body.
    */
    Hex,
}

impl DumpFormat {
    /**
    Pick a concrete format for [`DumpFormat::Auto`].
    */
    pub fn resolve(self) -> DumpFormat {
        match self {
            DumpFormat::Auto if std::io::stdout().is_terminal() => DumpFormat::Human,
            DumpFormat::Auto => DumpFormat::Json,
            format => format,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DumpFormat::Auto => "auto",
            DumpFormat::Human => "human",
            DumpFormat::Text => "text",
            DumpFormat::Json => "json",
            DumpFormat::Yaml => "yaml",
            DumpFormat::Hex => "hex",
        }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DumpFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(DumpFormat::Auto),
            "human" => Ok(DumpFormat::Human),
            "text" => Ok(DumpFormat::Text),
            "json" => Ok(DumpFormat::Json),
            "yaml" | "yml" => Ok(DumpFormat::Yaml),
            "hex" => Ok(DumpFormat::Hex),
            _ => Err(Error::configuration(format_args!(
                "{s:?} is not an output format; expected one of auto, human, text, json, yaml, hex"
            ))),
        }
    }
}

/**
Render the export request for `signal` without sending it.

The result never contains colour codes. Unsupported metrics are dropped from the rendering.
*/
pub fn dump(
    signal: Signal,
    entities: &[Entity],
    format: DumpFormat,
    now: Timestamp,
) -> Result<String, Error> {
    let request = ExportRequest::encode(
        signal,
        entities,
        now,
        &mut EncodeReport::default(),
        &InternalMetrics::default(),
    );

    let mut buf = Buffer::no_color();

    render(&mut buf, signal, &request, format)?;

    String::from_utf8(buf.into_inner()).map_err(|e| Error::encode("dump output is not UTF-8", e))
}

/**
Render an encoded request into `buf`.
*/
pub(crate) fn render(
    buf: &mut Buffer,
    signal: Signal,
    request: &ExportRequest,
    format: DumpFormat,
) -> Result<(), Error> {
    match format.resolve() {
        DumpFormat::Hex => {
            let payload = EncodedPayload::encode(request);

            writeln!(buf, "{}", hex::encode(payload.to_vec()))
                .map_err(|e| Error::encode("failed to write hex", e))?;
        }
        DumpFormat::Json => {
            let json = to_json(request)?;

            writeln!(buf, "{json}").map_err(|e| Error::encode("failed to write JSON", e))?;
        }
        DumpFormat::Yaml => {
            // Same field names and shapes as the JSON rendering
            let json = to_json(request)?;

            let value: serde_yaml::Value = serde_yaml::from_str(&json)
                .map_err(|e| Error::encode("failed to render YAML", e))?;

            let yaml = serde_yaml::to_string(&value)
                .map_err(|e| Error::encode("failed to render YAML", e))?;

            write!(buf, "{yaml}").map_err(|e| Error::encode("failed to write YAML", e))?;
        }
        DumpFormat::Text => {
            write_line(buf, request)?;
        }
        DumpFormat::Human | DumpFormat::Auto => match request {
            ExportRequest::Metrics(request) => {
                for block in &request.resource_metrics {
                    write_human(buf, signal, block)?;
                }
            }
            ExportRequest::Logs(request) => {
                for block in &request.resource_logs {
                    write_human(buf, signal, block)?;
                }
            }
            ExportRequest::Traces(request) => {
                for block in &request.resource_spans {
                    write_human(buf, signal, block)?;
                }
            }
        },
    }

    Ok(())
}

fn to_json(request: &ExportRequest) -> Result<String, Error> {
    sval_json::stream_to_string(request).map_err(|e| Error::encode("failed to render JSON", e))
}

fn write_human(buf: &mut Buffer, signal: Signal, block: &impl sval::Value) -> Result<(), Error> {
    write_fg(buf, signal, KIND);
    write_plain(buf, " ");

    write_line(buf, block)
}

fn write_line(buf: &mut Buffer, value: &impl sval::Value) -> Result<(), Error> {
    sval_fmt::stream_to_token_write(&mut Writer { buf: &mut *buf }, value)
        .map_err(|e| Error::encode("failed to render text", e))?;

    writeln!(buf).map_err(|e| Error::encode("failed to write text", e))
}

struct Writer<'a> {
    buf: &'a mut Buffer,
}

impl<'a> sval_fmt::TokenWrite for Writer<'a> {
    fn write_text_quote(&mut self) -> fmt::Result {
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> fmt::Result {
        self.write(text, TEXT);

        Ok(())
    }

    fn write_number<N: fmt::Display>(&mut self, num: N) -> fmt::Result {
        self.write(num, NUMBER);

        Ok(())
    }

    fn write_atom<A: fmt::Display>(&mut self, atom: A) -> fmt::Result {
        self.write(atom, ATOM);

        Ok(())
    }

    fn write_ident(&mut self, ident: &str) -> fmt::Result {
        self.write(ident, IDENT);

        Ok(())
    }

    fn write_field(&mut self, field: &str) -> fmt::Result {
        self.write(field, FIELD);

        Ok(())
    }
}

impl<'a> fmt::Write for Writer<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write!(&mut self.buf, "{}", s).map_err(|_| fmt::Error)
    }
}

impl<'a> Writer<'a> {
    fn write(&mut self, v: impl fmt::Display, color: Color) {
        write_fg(&mut *self.buf, v, color);
    }
}

const KIND: Color = Color::Ansi256(174);

const TEXT: Color = Color::Ansi256(69);
const NUMBER: Color = Color::Ansi256(135);
const ATOM: Color = Color::Ansi256(168);
const IDENT: Color = Color::Ansi256(170);
const FIELD: Color = Color::Ansi256(174);

fn write_fg(buf: &mut Buffer, v: impl fmt::Display, color: Color) {
    let _ = buf.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = write!(buf, "{}", v);
    let _ = buf.reset();
}

fn write_plain(buf: &mut Buffer, v: impl fmt::Display) {
    let _ = write!(buf, "{}", v);
}

#[cfg(test)]
mod tests {
    use melt_core::{Log, Metric, Span, ValueType};

    use super::*;

    fn entities() -> Vec<Entity> {
        vec![
            Entity::new("geometry:square")
                .with_attribute("name", "ABCD")
                .with_metric(
                    Metric::gauge("geometry:sides", "{sides}", ValueType::Long)
                        .with_data_point(1_000, 2_000, 4.0),
                )
                .with_log(Log::new("square created").with_timestamp(1_500))
                .with_span(Span::new("trace-1", "span-1", "resize").with_times(1_000, 2_000)),
            Entity::new("geometry:triangle")
                .with_attribute("name", "ABC")
                .with_metric(
                    Metric::gauge("geometry:sides", "{sides}", ValueType::Long)
                        .with_data_point(1_000, 2_000, 3.0),
                ),
        ]
    }

    fn now() -> Timestamp {
        Timestamp::from_unix_nanos(2_000)
    }

    #[test]
    fn parse_format() {
        for (input, expected) in [
            ("auto", DumpFormat::Auto),
            ("HUMAN", DumpFormat::Human),
            ("text", DumpFormat::Text),
            ("json", DumpFormat::Json),
            ("yml", DumpFormat::Yaml),
            ("hex", DumpFormat::Hex),
        ] {
            assert_eq!(expected, input.parse::<DumpFormat>().unwrap());
        }

        assert_eq!(
            crate::ErrorKind::Configuration,
            "xml".parse::<DumpFormat>().unwrap_err().kind()
        );
    }

    #[test]
    fn dump_json() {
        let json = dump(Signal::Metrics, &entities(), DumpFormat::Json, now()).unwrap();

        assert!(json.starts_with("{\"resourceMetrics\":["), "{json}");
        assert!(json.contains("\"name\":\"geometry:sides\""), "{json}");
        assert!(json.contains("\"startTimeUnixNano\":1000"), "{json}");
        assert!(json.contains("\"asInt\":4"), "{json}");
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn dump_json_traces_uses_text_ids() {
        let json = dump(Signal::Traces, &entities(), DumpFormat::Json, now()).unwrap();

        assert!(json.contains("\"traceId\":\"trace-1\""), "{json}");
        assert!(json.contains("\"spanId\":\"span-1\""), "{json}");
    }

    #[test]
    fn dump_yaml_logs() {
        let yaml = dump(Signal::Logs, &entities(), DumpFormat::Yaml, now()).unwrap();

        assert!(yaml.starts_with("resourceLogs:"), "{yaml}");
        assert!(yaml.contains("square created"), "{yaml}");
        assert!(yaml.contains("timeUnixNano: 1500"), "{yaml}");
    }

    #[test]
    fn dump_yaml_metrics() {
        let yaml = dump(Signal::Metrics, &entities(), DumpFormat::Yaml, now()).unwrap();

        assert!(yaml.starts_with("resourceMetrics:"), "{yaml}");
        assert!(yaml.contains("geometry:sides"), "{yaml}");
        assert!(yaml.contains("startTimeUnixNano: 1000"), "{yaml}");
        assert!(yaml.contains("asInt: 4"), "{yaml}");
        assert!(yaml.contains("asInt: 3"), "{yaml}");
    }

    #[test]
    fn dump_yaml_traces() {
        let yaml = dump(Signal::Traces, &entities(), DumpFormat::Yaml, now()).unwrap();

        assert!(yaml.starts_with("resourceSpans:"), "{yaml}");
        assert!(yaml.contains("traceId: trace-1"), "{yaml}");
        assert!(yaml.contains("spanId: span-1"), "{yaml}");
        assert!(yaml.contains("name: resize"), "{yaml}");
    }

    #[test]
    fn dump_yaml_matches_json() {
        for signal in Signal::ALL {
            let json = dump(signal, &entities(), DumpFormat::Json, now()).unwrap();
            let yaml = dump(signal, &entities(), DumpFormat::Yaml, now()).unwrap();

            assert_eq!(
                serde_yaml::from_str::<serde_yaml::Value>(&json).unwrap(),
                serde_yaml::from_str::<serde_yaml::Value>(&yaml).unwrap(),
            );
        }
    }

    #[test]
    fn dump_hex_is_the_protobuf_body() {
        let hex = dump(Signal::Metrics, &entities(), DumpFormat::Hex, now()).unwrap();

        let entities = entities();
        let request = ExportRequest::encode(
            Signal::Metrics,
            &entities,
            now(),
            &mut EncodeReport::default(),
            &InternalMetrics::default(),
        );

        assert_eq!(
            format!("{}\n", hex::encode(EncodedPayload::encode(&request).to_vec())),
            hex
        );
        assert!(hex.trim_end().chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn dump_human_is_one_line_per_resource_block() {
        let human = dump(Signal::Metrics, &entities(), DumpFormat::Human, now()).unwrap();

        let lines = human.lines().collect::<Vec<_>>();

        assert_eq!(2, lines.len(), "{human}");
        assert!(lines[0].starts_with("metrics "), "{human}");
        assert!(lines[0].contains("ABCD"), "{human}");
        assert!(lines[1].contains("ABC"), "{human}");
        assert!(!human.contains('\u{1b}'), "{human:?}");
    }

    #[test]
    fn dump_text_is_a_single_line() {
        let text = dump(Signal::Metrics, &entities(), DumpFormat::Text, now()).unwrap();

        assert_eq!(1, text.lines().count(), "{text}");
        assert!(text.contains("geometry:sides"), "{text}");
    }

    #[test]
    fn dump_of_empty_signal() {
        let entities = [Entity::new("geometry:point")];

        let json = dump(Signal::Traces, &entities, DumpFormat::Json, now()).unwrap();
        assert_eq!("{\"resourceSpans\":[]}\n", json);

        let human = dump(Signal::Traces, &entities, DumpFormat::Human, now()).unwrap();
        assert_eq!("", human);
    }
}
