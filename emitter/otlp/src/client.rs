use std::{sync::Arc, time::Duration};

use crate::{data::EncodedPayload, internal_metrics::InternalMetrics, Error, Signal};

use self::http::HttpConnection;

mod http;

#[cfg(test)]
pub(crate) mod test_server;

/**
Sends encoded payloads to an ingestion endpoint over HTTP.
*/
pub struct Transport {
    http: HttpConnection,
}

impl Transport {
    /**
    The base URL requests are sent under.
    */
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }

    /**
    Send a payload for a signal to `<endpoint>/<path>`.

    No retries are made. Any response other than `200` is a [`crate::ErrorKind::Transport`] error.
    */
    pub async fn send(&self, signal: Signal, payload: EncodedPayload) -> Result<(), Error> {
        self.http.send(signal.path(), payload).await
    }
}

/**
A builder for a [`Transport`].
*/
#[derive(Debug, Clone)]
pub struct TransportBuilder {
    endpoint: String,
    token: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    gzip: bool,
}

impl TransportBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        TransportBuilder {
            endpoint: endpoint.into(),
            token: None,
            headers: Vec::new(),
            timeout: None,
            gzip: false,
        }
    }

    /**
    Authenticate requests with a bearer token.
    */
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /**
    Add a header to every request.
    */
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn headers<K: Into<String>, V: Into<String>>(
        mut self,
        headers: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));

        self
    }

    /**
    Bound each request, including connecting, by a timeout.

    By default there's no timeout.
    */
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /**
    Compress request bodies using gzip.

    This is off by default, and requires the `gzip` Cargo feature.
    */
    pub fn gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub(crate) fn build(self, metrics: Arc<InternalMetrics>) -> Result<Transport, Error> {
        #[cfg(not(feature = "gzip"))]
        if self.gzip {
            return Err(Error::configuration(
                "gzip compression requires the `gzip` Cargo feature",
            ));
        }

        let mut headers = Vec::with_capacity(self.headers.len() + 1);

        if let Some(token) = self.token {
            headers.push(("authorization".to_owned(), format!("Bearer {token}")));
        }

        headers.extend(self.headers);

        Ok(Transport {
            http: HttpConnection::new(metrics, self.endpoint, headers, self.gzip, self.timeout)?,
        })
    }
}
