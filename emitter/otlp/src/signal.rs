use std::{fmt, str::FromStr};

use crate::Error;

/**
A kind of telemetry that can be exported.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Metrics,
    Logs,
    /**
    Events are logs with a type. They share the logs encoder and path.
    */
    Events,
    Traces,
}

impl Signal {
    /**
    The kinds exported for a whole document, in the order they're sent.

    Events are included in [`Signal::Logs`].
    */
    pub const ALL: [Signal; 3] = [Signal::Metrics, Signal::Logs, Signal::Traces];

    /**
    The path under the endpoint that requests for this signal are sent to.
    */
    pub fn path(&self) -> &'static str {
        match self {
            Signal::Metrics => "metrics",
            Signal::Logs | Signal::Events => "logs",
            Signal::Traces => "trace",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Metrics => "metrics",
            Signal::Logs => "logs",
            Signal::Events => "events",
            Signal::Traces => "traces",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metrics" | "metric" => Ok(Signal::Metrics),
            "logs" | "log" => Ok(Signal::Logs),
            "events" | "event" => Ok(Signal::Events),
            "traces" | "trace" | "spans" | "span" => Ok(Signal::Traces),
            _ => Err(Error::configuration(format_args!(
                "{s:?} is not a signal; expected one of metrics, logs, events, traces"
            ))),
        }
    }
}
