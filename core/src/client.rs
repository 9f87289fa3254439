//! Translates `Request` values into transfer options and runs them through a
//! `Transport`.
//!
//! # Design
//! `TransferClient` holds the transport and a default option map. Both are
//! read-only after construction, so `send` takes `&self` and builds a fresh
//! `TransferOptions` for every call. Options derived from the request always
//! win; defaults only fill keys the request left unset.

use std::io::Read;

use log::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{Request, RequestBody, Response};
use crate::transport::{OptionKey, OptionValue, Transfer, TransferOptions, Transport};

/// Synchronous client that delegates each request to a `Transport`.
#[derive(Debug, Clone)]
pub struct TransferClient<T> {
    transport: T,
    defaults: TransferOptions,
}

impl<T: Transport> TransferClient<T> {
    /// Client with the built-in defaults: body returned to the caller,
    /// response headers kept out of the body.
    pub fn new(transport: T) -> Self {
        let mut defaults = TransferOptions::new();
        defaults.set(OptionKey::ReturnTransfer, OptionValue::Bool(true));
        defaults.set(OptionKey::Header, OptionValue::Bool(false));
        Self {
            transport,
            defaults,
        }
    }

    /// Client with the built-in defaults overlaid by `config.defaults`.
    pub fn with_config(transport: T, config: &ClientConfig) -> Self {
        let mut client = Self::new(transport);
        for (key, value) in config.defaults.iter() {
            client.defaults.set(key, value.clone());
        }
        client
    }

    /// Add or replace a default option.
    pub fn with_option(mut self, key: OptionKey, value: OptionValue) -> Self {
        self.defaults.set(key, value);
        self
    }

    pub fn defaults(&self) -> &TransferOptions {
        &self.defaults
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and return the populated response.
    ///
    /// Any status the remote side returns, 4xx and 5xx included, is a
    /// successful send. Errors mean the options were refused or the transfer
    /// itself broke.
    pub fn send(&self, request: Request) -> Result<Response, ClientError> {
        let Request {
            method,
            uri,
            headers,
            cookies,
            body,
        } = request;
        debug!("sending {method} {uri}");

        let mut options = TransferOptions::new();
        options.set(OptionKey::CustomRequest, OptionValue::Text(method.to_string()));

        let mut upload: Option<Box<dyn Read + Send>> = None;
        match body {
            RequestBody::Stream(reader) => {
                options.set(OptionKey::Upload, OptionValue::Bool(true));
                if let Some(length) = content_length(&headers) {
                    options.set(OptionKey::InFileSize, OptionValue::Int(length));
                }
                upload = Some(reader);
            }
            RequestBody::Buffer(bytes) => {
                options.set(OptionKey::PostFields, OptionValue::Bytes(bytes));
            }
        }

        if !headers.is_empty() {
            let lines = headers
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect();
            options.set(OptionKey::HttpHeader, OptionValue::Lines(lines));
        }

        if !cookies.is_empty() {
            options.set(OptionKey::Cookie, OptionValue::Text(cookie_string(&cookies)));
        }

        options.fill_from(&self.defaults);
        for (key, value) in options.iter() {
            trace!("option {key} = {value:?}");
        }

        self.transport
            .apply(&uri, &options)
            .map_err(|source| ClientError::ClientConfigurationError {
                uri: uri.clone(),
                source,
            })?;

        let mut response = Response::new();
        let outcome = {
            let mut on_header = |line: &str| response.parse_header_line(line);
            self.transport.execute(Transfer {
                url: &uri,
                options: &options,
                upload: upload.as_mut().map(|r| r.as_mut() as &mut dyn Read),
                on_header: &mut on_header,
            })
        };

        let completed = outcome.map_err(|failure| ClientError::TransferError {
            uri: uri.clone(),
            status: failure.status,
            message: failure.message,
        })?;
        debug!("{uri} answered {}", completed.status);

        response.status = completed.status;
        response.body = completed.body;
        Ok(response)
    }
}

fn content_length(headers: &[(String, String)]) -> Option<u64> {
    let (_, raw) = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))?;
    match raw.trim().parse() {
        Ok(length) => Some(length),
        Err(_) => {
            warn!("ignoring unparseable Content-Length {raw:?}");
            None
        }
    }
}

/// `name=value` pairs, url-encoded, joined by `; `.
fn cookie_string(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
