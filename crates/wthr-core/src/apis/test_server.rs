//! Local HTTP endpoints for exercising the real clients.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Answers exactly one request with a canned response.
pub struct OneShotServer {
    pub url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// `status` is a status line tail such as `200 OK`.
    pub fn respond(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let url = format!("http://{}/", listener.local_addr().expect("local address"));
        let response = format!(
            "HTTP/1.1 {status}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            loop {
                let mut header = String::new();
                let read = reader.read_line(&mut header).expect("read header");
                if read == 0 || header == "\r\n" {
                    break;
                }
            }

            reader
                .get_mut()
                .write_all(response.as_bytes())
                .expect("write response");
            request_line
        });

        Self { url, handle }
    }

    /// Request line of the request that was served, e.g. `GET /geo/1.0/direct?... HTTP/1.1`.
    pub fn request_line(self) -> String {
        self.handle.join().expect("server thread")
    }
}

/// Base url of a local port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{addr}/")
}
