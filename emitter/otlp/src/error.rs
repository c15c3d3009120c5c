use std::{error, fmt};

/**
The broad category of an [`Error`].
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /**
    A metric used a content or value type the encoder doesn't support.
    */
    UnsupportedSignalType,
    /**
    A request couldn't be sent, or the endpoint didn't accept it.
    */
    Transport,
    /**
    The exporter was configured with an invalid combination of options.
    */
    Configuration,
    /**
    A payload couldn't be rendered.
    */
    Encode,
}

/**
An error encountered while encoding or exporting telemetry.
*/
pub struct Error {
    kind: ErrorKind,
    msg: String,
    status: Option<u16>,
    source: Option<Box<dyn error::Error + Send + Sync>>,
    related: Vec<Error>,
}

impl Error {
    pub(crate) fn msg(kind: ErrorKind, msg: impl fmt::Display) -> Self {
        Error {
            kind,
            msg: msg.to_string(),
            status: None,
            source: None,
            related: Vec::new(),
        }
    }

    pub(crate) fn new(
        kind: ErrorKind,
        msg: impl fmt::Display,
        e: impl error::Error + Send + Sync + 'static,
    ) -> Self {
        Error {
            source: Some(Box::new(e)),
            ..Error::msg(kind, msg)
        }
    }

    pub(crate) fn unsupported(msg: impl fmt::Display) -> Self {
        Error::msg(ErrorKind::UnsupportedSignalType, msg)
    }

    pub(crate) fn transport(msg: impl fmt::Display, e: impl error::Error + Send + Sync + 'static) -> Self {
        Error::new(ErrorKind::Transport, msg, e)
    }

    pub(crate) fn status(status: u16, body: impl fmt::Display) -> Self {
        Error {
            status: Some(status),
            ..Error::msg(
                ErrorKind::Transport,
                format_args!("the endpoint responded with {status}: {body}"),
            )
        }
    }

    pub(crate) fn configuration(msg: impl fmt::Display) -> Self {
        Error::msg(ErrorKind::Configuration, msg)
    }

    pub(crate) fn encode(msg: impl fmt::Display, e: impl error::Error + Send + Sync + 'static) -> Self {
        Error::new(ErrorKind::Encode, msg, e)
    }

    /**
    Combine a set of failures into one.

    The combined error takes the kind and status of the first failure.
    */
    pub(crate) fn aggregate(mut errors: Vec<Error>) -> Self {
        if errors.len() == 1 {
            return errors.remove(0);
        }

        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");

        Error {
            kind: errors.first().map(|e| e.kind).unwrap_or(ErrorKind::Transport),
            status: errors.first().and_then(|e| e.status),
            related: errors,
            ..Error::msg(ErrorKind::Transport, format_args!("multiple exports failed: {msg}"))
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /**
    The HTTP status code returned by the endpoint, if it responded.
    */
    pub fn http_status(&self) -> Option<u16> {
        self.status
    }

    /**
    The individual failures combined into this one.
    */
    pub fn related(&self) -> &[Error] {
        &self.related
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
            .field("status", &self.status)
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
