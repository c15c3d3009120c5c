use std::{borrow::Cow, error, fmt};

/**
The broad category of an [`Error`].
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /**
    The command line or environment doesn't describe a runnable export.
    */
    Configuration,
    /**
    The document couldn't be read or parsed.
    */
    Document,
    /**
    A signal couldn't be encoded or sent.
    */
    Export,
}

/**
An error encountered while running an export.
*/
pub struct Error {
    kind: ErrorKind,
    msg: Cow<'static, str>,
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

impl Error {
    pub(crate) fn configuration(msg: impl Into<Cow<'static, str>>) -> Self {
        Error {
            kind: ErrorKind::Configuration,
            msg: msg.into(),
            source: None,
        }
    }

    pub(crate) fn new(
        kind: ErrorKind,
        msg: impl Into<Cow<'static, str>>,
        source: impl error::Error + Send + Sync + 'static,
    ) -> Self {
        Error {
            kind,
            msg: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<melt_core::Error> for Error {
    fn from(err: melt_core::Error) -> Self {
        Error::new(ErrorKind::Document, "failed to load document", err)
    }
}

impl From<melt_otlp::Error> for Error {
    fn from(err: melt_otlp::Error) -> Self {
        match err.kind() {
            melt_otlp::ErrorKind::Configuration => {
                Error::new(ErrorKind::Configuration, "invalid exporter configuration", err)
            }
            _ => Error::new(ErrorKind::Export, "failed to export", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn error::Error + 'static))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("msg", &self.msg)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(ref source) => write!(f, "{}: {}", self.msg, source),
            None => f.write_str(&self.msg),
        }
    }
}
