use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::multipart::{Form, Part};

use super::{Outcome, ServiceStatus, SubmitError, Transport, parse_body, server_error_message};
use crate::config::AppConfig;
use crate::data::request::UploadRequest;

/// Blocking HTTP client for the processing service.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, e: reqwest::Error) -> SubmitError {
        if e.is_connect() {
            SubmitError::Transport(format!("Could not connect to {}", self.base_url))
        } else if e.is_timeout() {
            SubmitError::Transport(format!(
                "Request timed out after {}s",
                self.timeout_secs
            ))
        } else {
            SubmitError::Transport(e.to_string())
        }
    }

    fn form(request: &UploadRequest) -> Form {
        let file = Part::bytes(request.file.bytes.clone()).file_name(request.file.name.clone());
        request
            .form_fields()
            .into_iter()
            .fold(Form::new().part("file", file), |form, (key, value)| {
                form.text(key, value.to_string())
            })
    }
}

impl Transport for HttpTransport {
    fn submit(&self, request: &UploadRequest) -> Outcome {
        let url = format!("{}/process", self.base_url);

        let response = self
            .client
            .post(&url)
            .multipart(Self::form(request))
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(SubmitError::Server {
                status: status.as_u16(),
                message: server_error_message(&body),
            });
        }

        Ok(parse_body(&body))
    }

    fn status(&self) -> Result<ServiceStatus, SubmitError> {
        let url = format!("{}/", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SubmitError::Server {
                status: status.as_u16(),
                message: server_error_message(&body),
            });
        }

        response
            .json()
            .map_err(|e| SubmitError::Transport(format!("Unexpected status payload: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use serde_json::json;

    use crate::data::model::TabFile;
    use crate::data::request;

    /// Accepts one connection, answers it with `status` and `body`, and hands
    /// back the raw request text.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&String::from_utf8_lossy(&received)) {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8_lossy(&received).into_owned()
        });
        (url, handle)
    }

    fn request_complete(text: &str) -> bool {
        match text.split_once("boundary=") {
            Some((_, rest)) => rest
                .split("\r\n")
                .next()
                .is_some_and(|b| text.contains(&format!("--{b}--"))),
            None => text.contains("\r\n\r\n"),
        }
    }

    /// Talks to `url` directly, ignoring any proxy set in the environment.
    fn transport(url: String) -> HttpTransport {
        HttpTransport {
            base_url: url,
            client: reqwest::blocking::Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap(),
            timeout_secs: 10,
        }
    }

    fn scan_request() -> UploadRequest {
        request::build(TabFile::new("scan.tab", b"END\n".to_vec()), 3).unwrap()
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let config = AppConfig {
            api_url: "http://localhost:8000/".into(),
            ..AppConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000");
    }

    #[test]
    fn upload_sends_file_and_preset_fields() {
        let (url, server) = serve_once("200 OK", r#"{"spectrum":[],"conclusion":"ok"}"#);
        let request = scan_request();

        let raw = transport(url).submit(&request).unwrap();
        assert_eq!(raw, json!({ "spectrum": [], "conclusion": "ok" }));

        let received = server.join().unwrap();
        assert!(received.starts_with("POST /process "), "{received}");
        assert!(received.contains(r#"name="file"; filename="scan.tab""#), "{received}");
        for (key, value) in request.form_fields() {
            let part = format!("name=\"{key}\"\r\n\r\n{value}\r\n");
            assert!(received.contains(&part), "missing {key}: {received}");
        }
    }

    #[test]
    fn error_status_maps_to_server_error() {
        let (url, server) = serve_once("400 Bad Request", r#"{"error":"boom"}"#);

        let err = transport(url).submit(&scan_request()).unwrap_err();
        assert_eq!(
            err,
            SubmitError::Server {
                status: 400,
                message: Some("boom".into()),
            }
        );
        assert_eq!(err.user_message(), "boom");
        server.join().unwrap();
    }

    #[test]
    fn error_status_without_body_keeps_status_code() {
        let (url, server) = serve_once("502 Bad Gateway", "");

        let err = transport(url).submit(&scan_request()).unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status code 502");
        server.join().unwrap();
    }

    #[test]
    fn status_reads_service_banner() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"message":"Rosetta Spectrum Analyzer API","status":"running","openai_configured":true}"#,
        );

        let status = transport(url).status().unwrap();
        assert_eq!(status.status, "running");
        assert!(status.openai_configured);
        assert!(server.join().unwrap().starts_with("GET / "));
    }
}
