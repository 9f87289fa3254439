use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, Method, StatusCode},
    response::Redirect,
    routing::{any, get},
    Json, Router,
};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

/// What `/echo` saw of a request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub id: Uuid,
    pub method: String,
    /// Lower-cased header names; repeated headers joined with `, `.
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub body_len: usize,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/redirect", get(redirect))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> (HeaderMap, Json<Echo>) {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        seen.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let echo = Echo {
        id: Uuid::new_v4(),
        method: method.to_string(),
        headers: seen,
        body: String::from_utf8_lossy(&body).into_owned(),
        body_len: body.len(),
    };
    debug!("echo {} {} bytes", echo.method, echo.body_len);

    let mut reply = HeaderMap::new();
    reply.append(SET_COOKIE, HeaderValue::from_static("first=1"));
    reply.append(SET_COOKIE, HeaderValue::from_static("second=2"));
    if let Ok(id) = HeaderValue::from_str(&echo.id.to_string()) {
        reply.insert("x-request-id", id);
    }
    (reply, Json(echo))
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")),
        Err(_) => (StatusCode::BAD_REQUEST, format!("no such status {code}")),
    }
}

async fn redirect() -> Redirect {
    Redirect::temporary("/echo")
}
