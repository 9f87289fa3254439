//! `Transport` backed by a blocking ureq agent.
//!
//! A new agent is built for every transfer, so no connection outlives the
//! call that opened it. Response headers are replayed through the header
//! callback as raw lines once ureq has parsed them.

use std::time::Duration;

use log::debug;
use ureq::http;
use ureq::{Agent, SendBody};

use crate::error::{OptionRejected, TransportFailure};
use crate::transport::{Completed, OptionKey, Transfer, TransferOptions, Transport};

#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }

    fn agent(options: &TransferOptions) -> Agent {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true);
        if let Some(ms) = options.int(OptionKey::TimeoutMs) {
            config = config.timeout_global(Some(Duration::from_millis(ms)));
        }
        if let Some(ms) = options.int(OptionKey::ConnectTimeoutMs) {
            config = config.timeout_connect(Some(Duration::from_millis(ms)));
        }
        if options.bool(OptionKey::FollowLocation) == Some(false) {
            config = config.max_redirects(0);
        } else if let Some(max) = options.int(OptionKey::MaxRedirects) {
            config = config.max_redirects(u32::try_from(max).unwrap_or(u32::MAX));
        }
        config.build().new_agent()
    }
}

impl Transport for UreqTransport {
    fn apply(&self, _url: &str, options: &TransferOptions) -> Result<(), OptionRejected> {
        options.validate()?;
        if options.bool(OptionKey::ReturnTransfer) == Some(false) {
            return Err(OptionRejected {
                key: OptionKey::ReturnTransfer,
                reason: "the response body is always returned".to_string(),
            });
        }
        if options.bool(OptionKey::Header) == Some(true) {
            return Err(OptionRejected {
                key: OptionKey::Header,
                reason: "headers cannot be inlined into the body".to_string(),
            });
        }
        if let Some(method) = options.text(OptionKey::CustomRequest) {
            if http::Method::from_bytes(method.as_bytes()).is_err() {
                return Err(OptionRejected {
                    key: OptionKey::CustomRequest,
                    reason: format!("`{method}` is not a valid method token"),
                });
            }
        }
        Ok(())
    }

    fn execute(&self, transfer: Transfer<'_>) -> Result<Completed, TransportFailure> {
        let Transfer {
            url,
            options,
            upload,
            on_header,
        } = transfer;
        let agent = Self::agent(options);

        let method = options.text(OptionKey::CustomRequest).unwrap_or("GET");
        let mut builder = http::Request::builder().method(method).uri(url);
        for line in options.lines(OptionKey::HttpHeader).unwrap_or_default() {
            if let Some((name, value)) = line.split_once(':') {
                builder = builder.header(name.trim(), value.trim());
            }
        }
        if let Some(cookie) = options.text(OptionKey::Cookie) {
            builder = builder.header("Cookie", cookie);
        }
        if let Some(agent_name) = options.text(OptionKey::UserAgent) {
            builder = builder.header("User-Agent", agent_name);
        }

        let streaming = options.bool(OptionKey::Upload) == Some(true);
        let result = match (upload, options.bytes(OptionKey::PostFields)) {
            (Some(reader), _) if streaming => {
                let declared = builder
                    .headers_ref()
                    .is_some_and(|h| h.contains_key(http::header::CONTENT_LENGTH));
                if let (Some(size), false) = (options.int(OptionKey::InFileSize), declared) {
                    builder = builder.header(http::header::CONTENT_LENGTH, size);
                }
                let request = builder.body(SendBody::from_reader(reader)).map_err(build_failure)?;
                agent.run(request)
            }
            (_, Some(bytes)) if !bytes.is_empty() => {
                let request = builder.body(bytes.to_vec()).map_err(build_failure)?;
                agent.run(request)
            }
            _ => {
                let request = builder.body(()).map_err(build_failure)?;
                agent.run(request)
            }
        };

        let mut response = result.map_err(|err| TransportFailure {
            status: None,
            message: err.to_string(),
        })?;
        let status = response.status().as_u16();
        debug!("{url} -> {status}");

        on_header(&format!("{:?} {}\r\n", response.version(), response.status()));
        for (name, value) in response.headers() {
            match value.to_str() {
                Ok(value) => {
                    on_header(&format!("{name}: {value}\r\n"));
                }
                Err(_) => debug!("skipping non-text header {name}"),
            }
        }
        on_header("\r\n");

        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|err| TransportFailure {
                status: Some(status),
                message: err.to_string(),
            })?;

        Ok(Completed { status, body })
    }
}

fn build_failure(err: http::Error) -> TransportFailure {
    TransportFailure {
        status: None,
        message: err.to_string(),
    }
}
