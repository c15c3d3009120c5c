use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

/**
A request received by a [`TestServer`].
*/
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| &**v)
    }
}

#[derive(Clone)]
struct Response {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

/**
A minimal HTTP/1.1 server that records requests and replies with a fixed response.

Connections are kept alive, so several requests can arrive on the same connection.
*/
pub(crate) struct TestServer {
    url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    response: Arc<Mutex<Response>>,
}

impl TestServer {
    pub async fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let requests = Arc::new(Mutex::new(Vec::new()));
        let response = Arc::new(Mutex::new(Response {
            status,
            body: String::new(),
            delay: None,
        }));

        tokio::spawn({
            let requests = requests.clone();
            let response = response.clone();

            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    tokio::spawn(serve(stream, requests.clone(), response.clone()));
                }
            }
        });

        TestServer {
            url,
            requests,
            response,
        }
    }

    /**
    A URL that nothing is listening on.
    */
    pub async fn unused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        drop(listener);

        url
    }

    pub fn with_body(self, body: impl Into<String>) -> Self {
        self.response.lock().unwrap().body = body.into();
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.response.lock().unwrap().delay = Some(delay);
        self
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(
    mut stream: TcpStream,
    requests: Arc<Mutex<Vec<Recorded>>>,
    response: Arc<Mutex<Response>>,
) {
    let mut buf = Vec::new();

    loop {
        let Some(req) = read_request(&mut stream, &mut buf).await else {
            return;
        };

        requests.lock().unwrap().push(req);

        let response = response.lock().unwrap().clone();

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        let head = format!(
            "HTTP/1.1 {} Test\r\ncontent-length: {}\r\ncontent-type: text/plain\r\n\r\n",
            response.status,
            response.body.len()
        );

        if stream.write_all(head.as_bytes()).await.is_err()
            || stream.write_all(response.body.as_bytes()).await.is_err()
        {
            return;
        }
    }
}

async fn read_request(stream: &mut TcpStream, buf: &mut Vec<u8>) -> Option<Recorded> {
    let head_end = loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break end;
        }

        let mut chunk = [0; 1024];
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }

        buf.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8(buf[..head_end].to_vec()).ok()?;
    let mut lines = head.split("\r\n");

    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_owned();
    let path = request_line.next()?.to_owned();

    let headers = lines
        .filter_map(|line| {
            let (k, v) = line.split_once(':')?;

            Some((k.trim().to_owned(), v.trim().to_owned()))
        })
        .collect::<Vec<_>>();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = head_end + 4;

    while buf.len() < body_start + content_length {
        let mut chunk = [0; 1024];
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }

        buf.extend_from_slice(&chunk[..read]);
    }

    let body = buf[body_start..body_start + content_length].to_vec();
    buf.drain(..body_start + content_length);

    Some(Recorded {
        method,
        path,
        headers,
        body,
    })
}
