//! Terminal interaction helpers and a pluggable synchronous HTTP client.
//!
//! # Overview
//! - `cli`: `--name[=value]` option scanning, colored output, blocking
//!   read/wait prompts over injectable streams.
//! - `client`: `TransferClient` turns a `Request` into one `TransferOptions`
//!   map, hands it to a `Transport`, and fills a `Response` from the result.
//!
//! # Design
//! - The two halves are independent; they share only the error and config
//!   modules.
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   stock engine; tests substitute their own.
//! - Config types are serde-deserializable so defaults can live in JSON.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod ureq_transport;

pub use cli::{parse_options, Cli, OptionMap, Prompt};
pub use client::TransferClient;
pub use config::{CliConfig, ClientConfig, Config};
pub use error::{CliError, ClientError, ColorLayer, ConfigError, OptionRejected, TransportFailure};
pub use http::{HttpMethod, Request, RequestBody, Response};
pub use transport::{Completed, OptionKey, OptionValue, Transfer, TransferOptions, Transport};
pub use ureq_transport::UreqTransport;
