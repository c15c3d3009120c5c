use std::{
    fs::File,
    io,
    path::PathBuf,
    time::Duration,
};

use melt_core::FsocData;
use melt_otlp::{DumpFormat, Exporter, TransportBuilder};

use crate::{Error, ErrorKind};

/**
Everything needed to run an export, as collected from the command line.
*/
#[derive(Debug, Clone, Default)]
pub struct Config {
    /**
    The document to read. `None` or `-` reads from stdin.
    */
    pub file: Option<PathBuf>,
    pub dry_run: bool,
    pub dump: bool,
    /**
    The format to dump in. Only valid along with `dump`.
    */
    pub output: Option<DumpFormat>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub gzip: bool,
    pub fail_fast: bool,
    /**
    Synthesize this many data points for each metric that has none.
    */
    pub synthesize: Option<usize>,
}

impl Config {
    /**
    Check the configuration describes a runnable export.

    This is done before the document is read.
    */
    pub fn validate(&self) -> Result<(), Error> {
        if self.output.is_some() && !self.dump {
            return Err(Error::configuration(
                "an output format was given without also dumping payloads",
            ));
        }

        if self.endpoint().is_none() && !self.dry_run {
            return Err(Error::configuration(
                "an endpoint is required unless running in dry-run mode",
            ));
        }

        if matches!(self.timeout, Some(timeout) if timeout.is_zero()) {
            return Err(Error::configuration("the timeout must be greater than zero"));
        }

        Ok(())
    }

    /**
    The endpoint to send to, ignoring blank values.
    */
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }

    /**
    Read the configured document from its file or stdin.
    */
    pub fn read_document(&self) -> Result<FsocData, Error> {
        match self.file {
            Some(ref path) if path.as_os_str() != "-" => {
                let file = File::open(path).map_err(|e| {
                    Error::new(
                        ErrorKind::Document,
                        format!("failed to open {}", path.display()),
                        e,
                    )
                })?;

                crate::load(file)
            }
            _ => crate::load(io::stdin().lock()),
        }
    }

    /**
    Build an exporter from this configuration.
    */
    pub fn exporter(&self) -> Result<Exporter, Error> {
        let mut builder = Exporter::builder()
            .dry_run(self.dry_run)
            .fail_fast(self.fail_fast);

        if self.dump {
            builder = builder.dump(self.output.unwrap_or_default());
        }

        if let Some(endpoint) = self.endpoint() {
            let mut transport = TransportBuilder::new(endpoint)
                .headers(self.headers.iter().cloned())
                .gzip(self.gzip);

            if let Some(ref token) = self.token {
                transport = transport.token(token);
            }

            if let Some(timeout) = self.timeout {
                transport = transport.timeout(timeout);
            }

            builder = builder.transport(transport);
        }

        Ok(builder.build()?)
    }
}

/**
Parse a `KEY=VALUE` pair for an extra request header.
*/
pub fn parse_header(header: &str) -> Result<(String, String), Error> {
    match header.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(Error::configuration(format!(
            "expected a header as `KEY=VALUE`, got `{header}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config() -> Config {
        Config {
            endpoint: Some("http://localhost:4318".into()),
            ..Default::default()
        }
    }

    #[test]
    fn validate_ok() {
        config().validate().unwrap();

        Config {
            dry_run: true,
            ..Default::default()
        }
        .validate()
        .unwrap();

        Config {
            dump: true,
            output: Some(DumpFormat::Yaml),
            ..config()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn validate_output_without_dump() {
        let err = Config {
            output: Some(DumpFormat::Json),
            ..config()
        }
        .validate()
        .unwrap_err();

        assert_eq!(ErrorKind::Configuration, err.kind());
    }

    #[test]
    fn validate_missing_endpoint() {
        for endpoint in [None, Some(""), Some("  ")] {
            let err = Config {
                endpoint: endpoint.map(Into::into),
                ..Default::default()
            }
            .validate()
            .unwrap_err();

            assert_eq!(ErrorKind::Configuration, err.kind());
        }
    }

    #[test]
    fn validate_zero_timeout() {
        let err = Config {
            timeout: Some(Duration::ZERO),
            ..config()
        }
        .validate()
        .unwrap_err();

        assert_eq!(ErrorKind::Configuration, err.kind());
    }

    #[test]
    fn exporter_invalid_endpoint_is_configuration_error() {
        let err = Config {
            endpoint: Some("not a url".into()),
            ..Default::default()
        }
        .exporter()
        .err()
        .unwrap();

        assert_eq!(ErrorKind::Configuration, err.kind());
    }

    #[test]
    fn exporter_dry_run_without_endpoint() {
        Config {
            dry_run: true,
            dump: true,
            ..Default::default()
        }
        .exporter()
        .unwrap();
    }

    #[test]
    fn parse_header_pairs() {
        assert_eq!(
            ("x-tenant".to_owned(), "a=b".to_owned()),
            parse_header("x-tenant=a=b").unwrap()
        );
        assert_eq!(("k".to_owned(), String::new()), parse_header("k=").unwrap());

        assert!(parse_header("novalue").is_err());
        assert!(parse_header("=value").is_err());
    }

    #[test]
    fn read_document_from_file() {
        let path = std::env::temp_dir().join(format!("melt-config-{}.yaml", std::process::id()));

        File::create(&path)
            .and_then(|mut file| file.write_all(b"melt:\n  - typename: geometry:square\n"))
            .unwrap();

        let data = Config {
            file: Some(path.clone()),
            ..config()
        }
        .read_document();

        let _ = std::fs::remove_file(&path);

        assert_eq!("geometry:square", data.unwrap().entities()[0].type_name);
    }

    #[test]
    fn read_document_missing_file() {
        let err = Config {
            file: Some("/definitely/not/a/melt/document.yaml".into()),
            ..config()
        }
        .read_document()
        .unwrap_err();

        assert_eq!(ErrorKind::Document, err.kind());
    }
}
