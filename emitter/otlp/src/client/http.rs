use std::{
    fmt,
    future::Future,
    io::Cursor,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{self, Context, Poll},
    time::Duration,
};

use bytes::Buf;
use hyper::{
    body::{self, Body, Frame, SizeHint},
    client::conn::http1,
    Method, Request, Uri,
};
use sval_protobuf::buf::ProtoBufCursor;

use crate::{data::EncodedPayload, internal_metrics::InternalMetrics, Error};

const CONTENT_TYPE_PROTOBUF: &str = "application/x-protobuf";

const USER_AGENT: &str = concat!("melt/", env!("CARGO_PKG_VERSION"));

const MAX_ERROR_BODY: usize = 256;

async fn connect(metrics: &InternalMetrics, uri: &HttpUri) -> Result<HttpSender, Error> {
    let io = tokio::net::TcpStream::connect((uri.host(), uri.port()))
        .await
        .map_err(|e| {
            metrics.transport_conn_failed.increment();

            Error::transport(format_args!("failed to connect to {uri}"), e)
        })?;

    metrics.transport_conn_established.increment();

    emit::debug!("connected to {uri}", #[emit::as_display] uri);

    if uri.is_https() {
        #[cfg(feature = "tls")]
        {
            let io = tls_handshake(metrics, io, uri).await?;

            http1_handshake(metrics, io).await
        }
        #[cfg(not(feature = "tls"))]
        {
            Err(Error::configuration(
                "https support requires the `tls` Cargo feature",
            ))
        }
    } else {
        http1_handshake(metrics, io).await
    }
}

#[cfg(feature = "tls")]
async fn tls_handshake(
    metrics: &InternalMetrics,
    io: tokio::net::TcpStream,
    uri: &HttpUri,
) -> Result<tokio_rustls::client::TlsStream<tokio::net::TcpStream>, Error> {
    use tokio_rustls::{rustls, TlsConnector};

    let domain = uri.host().to_owned().try_into().map_err(|e| {
        metrics.transport_conn_tls_failed.increment();

        Error::transport(format_args!("could not extract a DNS name from {uri}"), e)
    })?;

    let tls = {
        let mut root_store = rustls::RootCertStore::empty();

        for cert in rustls_native_certs::load_native_certs().map_err(|e| {
            metrics.transport_conn_tls_failed.increment();

            Error::transport("failed to load native certificates", e)
        })? {
            let _ = root_store.add(cert);
        }

        Arc::new(
            rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth(),
        )
    };

    let conn = TlsConnector::from(tls);

    let io = conn.connect(domain, io).await.map_err(|e| {
        metrics.transport_conn_tls_failed.increment();

        Error::transport("failed to connect TLS stream", e)
    })?;

    metrics.transport_conn_tls_handshake.increment();

    Ok(io)
}

async fn http1_handshake(
    metrics: &InternalMetrics,
    io: impl tokio::io::AsyncRead + tokio::io::AsyncWrite + Send + Sync + Unpin + 'static,
) -> Result<HttpSender, Error> {
    let (sender, conn) = http1::handshake(HttpIo(io)).await.map_err(|e| {
        metrics.transport_conn_failed.increment();

        Error::transport("failed to perform HTTP1 handshake", e)
    })?;

    tokio::task::spawn(async move {
        let _ = conn.await;
    });

    Ok(HttpSender(sender))
}

/**
A connection to a single endpoint that POSTs encoded payloads to paths under it.

The underlying connection is reused between requests until it fails or is closed by the remote side.
*/
pub(crate) struct HttpConnection {
    base: String,
    uri: HttpUri,
    headers: Vec<(String, String)>,
    gzip: bool,
    timeout: Option<Duration>,
    sender: Mutex<Option<HttpSender>>,
    metrics: Arc<InternalMetrics>,
}

impl HttpConnection {
    pub fn new(
        metrics: Arc<InternalMetrics>,
        endpoint: impl AsRef<str>,
        headers: impl Into<Vec<(String, String)>>,
        gzip: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let base = endpoint.as_ref().trim_end_matches('/').to_owned();

        let uri = HttpUri::parse(&base)?;

        Ok(HttpConnection {
            base,
            uri,
            headers: headers.into(),
            gzip,
            timeout,
            sender: Mutex::new(None),
            metrics,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.base
    }

    fn poison(&self) -> Option<HttpSender> {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .filter(|sender| !sender.0.is_closed())
    }

    fn unpoison(&self, sender: HttpSender) {
        *self.sender.lock().unwrap_or_else(|e| e.into_inner()) = Some(sender);
    }

    /**
    POST a payload to `<endpoint>/<path>`.

    Only a `200` response is considered successful.
    */
    pub async fn send(&self, path: &str, payload: EncodedPayload) -> Result<(), Error> {
        let send = async {
            let mut sender = match self.poison() {
                Some(sender) => sender,
                None => connect(&self.metrics, &self.uri).await?,
            };

            let res = self.send_request(&mut sender, path, payload).await?;

            let status = res.status();
            let body = res.read_to_vec().await?;

            self.unpoison(sender);

            Ok::<_, Error>((status, body))
        };

        let (status, body) = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, send).await.map_err(|e| {
                self.metrics.transport_request_failed.increment();

                Error::transport(format_args!("request to {}/{path} timed out", self.base), e)
            })??,
            None => send.await?,
        };

        if status != 200 {
            self.metrics.transport_request_failed.increment();

            let body = String::from_utf8_lossy(&body[..body.len().min(MAX_ERROR_BODY)]).into_owned();

            return Err(Error::status(status, body));
        }

        self.metrics.transport_request_sent.increment();

        Ok(())
    }

    async fn send_request(
        &self,
        sender: &mut HttpSender,
        path: &str,
        payload: EncodedPayload,
    ) -> Result<HttpResponse, Error> {
        // Requests use origin-form targets; the authority goes in `host`
        let uri: Uri = format!(
            "{}/{}",
            self.uri.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
        .parse()
        .map_err(|e| {
            Error::new(
                crate::ErrorKind::Configuration,
                format_args!("failed to build a request target for {path}"),
                e,
            )
        })?;

        let body = HttpBody::raw(payload);

        #[cfg(feature = "gzip")]
        let body = if self.gzip {
            self.metrics.transport_request_compress_gzip.increment();

            body.gzip()?
        } else {
            body
        };

        let mut req = Request::builder()
            .uri(uri)
            .method(Method::POST)
            .header("host", self.uri.authority())
            .header("content-length", body.content_length)
            .header("content-type", CONTENT_TYPE_PROTOBUF)
            .header("accept", CONTENT_TYPE_PROTOBUF)
            .header("user-agent", USER_AGENT);

        if let Some(content_encoding) = body.content_encoding {
            req = req.header("content-encoding", content_encoding);
        }

        for (k, v) in &self.headers {
            req = req.header(&**k, &**v);
        }

        let req = req.body(body).map_err(|e| {
            self.metrics.transport_request_failed.increment();

            Error::transport("failed to build HTTP request", e)
        })?;

        sender.send_request(&self.metrics, req).await
    }
}

struct HttpSender(http1::SendRequest<HttpBody>);

impl HttpSender {
    async fn send_request(
        &mut self,
        metrics: &InternalMetrics,
        req: Request<HttpBody>,
    ) -> Result<HttpResponse, Error> {
        let res = async {
            self.0.ready().await?;
            self.0.send_request(req).await
        }
        .await
        .map_err(|e| {
            metrics.transport_request_failed.increment();

            Error::transport("failed to send HTTP request", e)
        })?;

        Ok(HttpResponse { res })
    }
}

struct HttpUri {
    uri: Uri,
    host: String,
    port: u16,
    authority: String,
    https: bool,
}

impl fmt::Display for HttpUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uri, f)
    }
}

impl HttpUri {
    fn parse(url: &str) -> Result<Self, Error> {
        let uri: Uri = url.parse().map_err(|e| {
            Error::new(
                crate::ErrorKind::Configuration,
                format_args!("failed to parse {url}"),
                e,
            )
        })?;

        let https = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            _ => {
                return Err(Error::configuration(format_args!(
                    "{url} must use the http or https scheme"
                )))
            }
        };

        let (Some(host), Some(authority)) = (uri.host(), uri.authority()) else {
            return Err(Error::configuration(format_args!("{url} is missing a host")));
        };

        Ok(HttpUri {
            host: host.trim_start_matches('[').trim_end_matches(']').to_owned(),
            port: uri.port_u16().unwrap_or(if https { 443 } else { 80 }),
            authority: authority.as_str().to_owned(),
            https,
            uri,
        })
    }

    fn is_https(&self) -> bool {
        self.https
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn authority(&self) -> &str {
        &self.authority
    }

    fn path(&self) -> &str {
        self.uri.path()
    }

    fn port(&self) -> u16 {
        self.port
    }
}

struct HttpBody {
    payload: HttpBodyPayload,
    content_length: usize,
    content_encoding: Option<&'static str>,
}

enum HttpBodyPayload {
    Raw(Option<ProtoBufCursor>),
    #[cfg(feature = "gzip")]
    Gzip(Option<Cursor<Box<[u8]>>>),
}

enum HttpBodyData {
    Payload(ProtoBufCursor),
    #[cfg(feature = "gzip")]
    Gzip(Cursor<Box<[u8]>>),
}

impl Buf for HttpBodyData {
    fn remaining(&self) -> usize {
        match self {
            HttpBodyData::Payload(buf) => buf.remaining(),
            #[cfg(feature = "gzip")]
            HttpBodyData::Gzip(buf) => buf.remaining(),
        }
    }

    fn chunk(&self) -> &[u8] {
        match self {
            HttpBodyData::Payload(buf) => buf.chunk(),
            #[cfg(feature = "gzip")]
            HttpBodyData::Gzip(buf) => buf.chunk(),
        }
    }

    fn advance(&mut self, cnt: usize) {
        match self {
            HttpBodyData::Payload(buf) => buf.advance(cnt),
            #[cfg(feature = "gzip")]
            HttpBodyData::Gzip(buf) => buf.advance(cnt),
        }
    }
}

impl HttpBody {
    fn raw(payload: EncodedPayload) -> Self {
        let payload = HttpBodyPayload::Raw(Some(payload.into_cursor()));

        HttpBody {
            content_encoding: None,
            content_length: payload.remaining(),
            payload,
        }
    }

    #[cfg(feature = "gzip")]
    fn gzip(mut self) -> Result<Self, Error> {
        use std::io::Write;

        let mut enc = flate2::write::GzEncoder::new(
            Vec::with_capacity(self.payload.remaining()),
            flate2::Compression::fast(),
        );

        while let Some(mut data) = self.payload.next_chunk() {
            loop {
                let chunk = data.chunk();
                if chunk.is_empty() {
                    break;
                }

                enc.write_all(chunk)
                    .map_err(|e| Error::encode("failed to compress a chunk of bytes", e))?;
                let read = chunk.len();
                data.advance(read);
            }
        }

        let buf = enc
            .finish()
            .map_err(|e| Error::encode("failed to finalize compression", e))?;

        let payload = HttpBodyPayload::Gzip(Some(Cursor::new(buf.into_boxed_slice())));

        Ok(HttpBody {
            content_encoding: Some("gzip"),
            content_length: payload.remaining(),
            payload,
        })
    }
}

impl HttpBodyPayload {
    fn next_chunk(&mut self) -> Option<HttpBodyData> {
        match self {
            HttpBodyPayload::Raw(ref mut payload) => payload.take().map(HttpBodyData::Payload),
            #[cfg(feature = "gzip")]
            HttpBodyPayload::Gzip(ref mut payload) => payload.take().map(HttpBodyData::Gzip),
        }
    }

    fn remaining(&self) -> usize {
        match self {
            HttpBodyPayload::Raw(ref payload) => payload
                .as_ref()
                .map(|payload| payload.remaining())
                .unwrap_or(0),
            #[cfg(feature = "gzip")]
            HttpBodyPayload::Gzip(ref payload) => payload
                .as_ref()
                .map(|payload| payload.remaining())
                .unwrap_or(0),
        }
    }
}

impl Body for HttpBody {
    type Data = HttpBodyData;

    type Error = std::convert::Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if let Some(buf) = self.get_mut().payload.next_chunk() {
            Poll::Ready(Some(Ok(Frame::data(buf))))
        } else {
            Poll::Ready(None)
        }
    }

    fn is_end_stream(&self) -> bool {
        match self.payload {
            HttpBodyPayload::Raw(None) => true,
            HttpBodyPayload::Raw(_) => false,
            #[cfg(feature = "gzip")]
            HttpBodyPayload::Gzip(None) => true,
            #[cfg(feature = "gzip")]
            HttpBodyPayload::Gzip(_) => false,
        }
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.payload.remaining() as u64)
    }
}

struct HttpResponse {
    res: hyper::Response<body::Incoming>,
}

impl HttpResponse {
    fn status(&self) -> u16 {
        self.res.status().as_u16()
    }

    async fn read_to_vec(mut self) -> Result<Vec<u8>, Error> {
        struct BufNext<'a>(&'a mut body::Incoming, &'a mut Vec<u8>);

        impl<'a> Future for BufNext<'a> {
            type Output = Result<bool, Error>;

            fn poll(
                mut self: Pin<&mut Self>,
                ctx: &mut task::Context<'_>,
            ) -> task::Poll<Self::Output> {
                match Pin::new(&mut self.0).poll_frame(ctx) {
                    Poll::Ready(Some(Ok(frame))) => {
                        if let Some(frame) = frame.data_ref() {
                            self.1.extend_from_slice(frame);
                        }

                        Poll::Ready(Ok(true))
                    }
                    Poll::Ready(None) => Poll::Ready(Ok(false)),
                    Poll::Ready(Some(Err(e))) => Poll::Ready(Err(Error::transport(
                        "failed to read HTTP response body",
                        e,
                    ))),
                    Poll::Pending => Poll::Pending,
                }
            }
        }

        let frame = self.res.body_mut();
        let mut body = Vec::new();

        while BufNext(frame, &mut body).await? {}

        Ok(body)
    }
}

struct HttpIo<T>(T);

impl<T: tokio::io::AsyncRead> hyper::rt::Read for HttpIo<T> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        mut buf: hyper::rt::ReadBufCursor<'_>,
    ) -> Poll<Result<(), std::io::Error>> {
        let io = unsafe { self.map_unchecked_mut(|io| &mut io.0) };

        let mut read_buf = tokio::io::ReadBuf::uninit(unsafe { buf.as_mut() });

        match tokio::io::AsyncRead::poll_read(io, cx, &mut read_buf) {
            Poll::Ready(Ok(())) => {
                let read = read_buf.filled().len();
                unsafe { buf.advance(read) };

                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: tokio::io::AsyncWrite> hyper::rt::Write for HttpIo<T> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, std::io::Error>> {
        let io = unsafe { self.map_unchecked_mut(|io| &mut io.0) };

        tokio::io::AsyncWrite::poll_write(io, cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), std::io::Error>> {
        let io = unsafe { self.map_unchecked_mut(|io| &mut io.0) };

        tokio::io::AsyncWrite::poll_flush(io, cx)
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), std::io::Error>> {
        let io = unsafe { self.map_unchecked_mut(|io| &mut io.0) };

        tokio::io::AsyncWrite::poll_shutdown(io, cx)
    }
}
