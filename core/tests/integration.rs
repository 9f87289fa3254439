//! Round trips through `UreqTransport` against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background runtime, then
//! drives `TransferClient<UreqTransport>` over real HTTP and checks both the
//! populated `Response` and what the server says it received.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::OnceLock;

use courier_core::{
    ClientError, HttpMethod, OptionKey, OptionValue, Request, TransferClient, UreqTransport,
};
use mock_server::Echo;

fn server() -> SocketAddr {
    static ADDR: OnceLock<SocketAddr> = OnceLock::new();
    *ADDR.get_or_init(|| {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });
        addr
    })
}

fn url(path: &str) -> String {
    format!("http://{}{path}", server())
}

fn client() -> TransferClient<UreqTransport> {
    TransferClient::new(UreqTransport::new())
}

fn echo_of(body: &[u8]) -> Echo {
    serde_json::from_slice(body).unwrap()
}

#[test]
fn get_echo_fills_status_headers_and_body() {
    let response = client().send(Request::get(&url("/echo"))).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.header_values("set-cookie"), vec!["first=1", "second=2"]);

    let echo = echo_of(&response.body);
    assert_eq!(echo.method, "GET");
    assert_eq!(response.header("x-request-id"), Some(echo.id.to_string().as_str()));
}

#[test]
fn put_with_in_memory_body() {
    let request = Request::new(HttpMethod::Put, &url("/echo"))
        .with_header("Content-Type", "text/plain")
        .with_body("hello courier");
    let response = client().send(request).unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.body, "hello courier");
    assert_eq!(echo.headers["content-type"], "text/plain");
}

#[test]
fn extension_method_is_sent_verbatim() {
    let request = Request::new(HttpMethod::Custom("PURGE".to_string()), &url("/echo"));
    let response = client().send(request).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(echo_of(&response.body).method, "PURGE");
}

#[test]
fn patch_and_options_round_trip() {
    let request = Request::new(HttpMethod::Patch, &url("/echo")).with_body("delta");
    let echo = echo_of(&client().send(request).unwrap().body);
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.body, "delta");

    let request = Request::new(HttpMethod::Options, &url("/echo"));
    let echo = echo_of(&client().send(request).unwrap().body);
    assert_eq!(echo.method, "OPTIONS");
}

#[test]
fn head_returns_headers_without_body() {
    let response = client()
        .send(Request::new(HttpMethod::Head, &url("/echo")))
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
    assert!(response.header("x-request-id").is_some());
    assert_eq!(response.header_values("set-cookie").len(), 2);
}

#[test]
fn streamed_upload_with_declared_length() {
    let data = vec![b'z'; 1024];
    let request = Request::new(HttpMethod::Put, &url("/echo"))
        .with_header("Content-Length", "1024")
        .with_stream(Cursor::new(data));
    let response = client().send(request).unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(echo.body_len, 1024);
    assert_eq!(echo.headers["content-length"], "1024");
}

#[test]
fn streamed_upload_without_length() {
    let request = Request::new(HttpMethod::Post, &url("/echo"))
        .with_stream(Cursor::new(b"chunked body".to_vec()));
    let response = client().send(request).unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(echo.body, "chunked body");
    assert!(!echo.headers.contains_key("content-length"));
}

#[test]
fn cookies_reach_the_server() {
    let request = Request::get(&url("/echo"))
        .with_cookie("session", "abc")
        .with_cookie("theme", "dark mode");
    let response = client().send(request).unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(echo.headers["cookie"], "session=abc; theme=dark%20mode");
}

#[test]
fn error_status_is_a_response_not_an_error() {
    let response = client().send(Request::get(&url("/status/503"))).unwrap();

    assert_eq!(response.status, 503);
    assert_eq!(response.body_text(), "status 503");
    assert!(!response.is_success());
}

#[test]
fn user_agent_default_is_applied() {
    let client = client().with_option(
        OptionKey::UserAgent,
        OptionValue::Text("courier-test/1".to_string()),
    );
    let response = client.send(Request::get(&url("/echo"))).unwrap();

    assert_eq!(echo_of(&response.body).headers["user-agent"], "courier-test/1");
}

#[test]
fn request_headers_replace_default_header_lines() {
    let client = client().with_option(
        OptionKey::HttpHeader,
        OptionValue::Lines(vec!["X-Default: yes".to_string()]),
    );
    let request = Request::get(&url("/echo")).with_header("X-Call", "1");
    let response = client.send(request).unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(echo.headers["x-call"], "1");
    assert!(!echo.headers.contains_key("x-default"));
}

#[test]
fn redirects_are_followed_by_default() {
    let response = client().send(Request::get(&url("/redirect"))).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(echo_of(&response.body).method, "GET");
}

#[test]
fn refused_connection_is_a_transfer_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let target = format!("http://{addr}/gone");

    let err = client().send(Request::get(&target)).unwrap_err();
    match err {
        ClientError::TransferError { ref uri, .. } => assert_eq!(uri, &target),
        other => panic!("expected a transfer error, got {other}"),
    }
    assert!(err.to_string().contains(&target));
}

#[test]
fn rejected_option_never_reaches_the_network() {
    let client = client().with_option(OptionKey::Header, OptionValue::Bool(true));
    let err = client.send(Request::get(&url("/echo"))).unwrap_err();

    assert!(matches!(
        err,
        ClientError::ClientConfigurationError { ref source, .. } if source.key == OptionKey::Header
    ));
}
