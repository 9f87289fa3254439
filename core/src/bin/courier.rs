//! Send one HTTP request described by command-line options.
//!
//!     courier --url=http://localhost:3000/echo --method=PUT --data=hello
//!     courier --url=... --data=@payload.bin --confirm --countdown=3
//!
//! Prompts for the URL when `--url` is missing. `RUST_LOG=debug` shows the
//! transfer options.

use std::fs::File;
use std::process::ExitCode;

use anyhow::{bail, Context};
use log::error;

use courier_core::{cli, Cli, Config, HttpMethod, Prompt, Request, TransferClient, UreqTransport};

const OPTIONS: [&str; 9] = [
    "url",
    "method",
    "data",
    "header",
    "cookie",
    "confirm",
    "countdown",
    "config",
    "no-color",
];

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("courier: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let opts = cli::options(&OPTIONS);
    let value = |name: &str| opts.get(name).cloned().flatten();

    let mut config = match value("config") {
        Some(path) => Config::load(&path).with_context(|| format!("loading {path}"))?,
        None => Config::default(),
    };
    if opts.contains_key("no-color") {
        config.cli.ansi = false;
    }
    let mut term = Cli::stdio(config.cli.clone());

    let url = match value("url") {
        Some(url) => url,
        None => term.read(&Prompt::ask("URL"))?,
    };
    let method: HttpMethod = value("method").as_deref().unwrap_or("GET").parse()?;
    let mut request = Request::new(method, &url);

    if let Some(header) = value("header") {
        let Some((name, value)) = header.split_once(':') else {
            bail!("--header must look like `Name: value`");
        };
        request = request.with_header(name.trim(), value.trim());
    }
    if let Some(cookie) = value("cookie") {
        let Some((name, value)) = cookie.split_once('=') else {
            bail!("--cookie must look like `name=value`");
        };
        request = request.with_cookie(name, value);
    }
    if let Some(data) = value("data") {
        request = match data.strip_prefix('@') {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("opening {path}"))?;
                let length = file.metadata()?.len();
                request
                    .with_header("Content-Length", &length.to_string())
                    .with_stream(file)
            }
            None => request.with_body(data),
        };
    }

    if opts.contains_key("confirm") {
        let question = format!("Send {} {url}?", request.method);
        if term.read(&Prompt::choose(&question, &["y", "n"]))? == "n" {
            term.write("Aborted.")?;
            return Ok(ExitCode::SUCCESS);
        }
    }
    if let Some(seconds) = value("countdown") {
        let seconds: u64 = seconds.parse().context("--countdown expects whole seconds")?;
        term.wait(seconds, true)?;
    }

    let client = TransferClient::with_config(UreqTransport::new(), &config.client);
    let response = client.send(request)?;

    let status_color = match response.status {
        200..=299 => "green",
        300..=399 => "yellow",
        _ => "red",
    };
    term.write_styled(format!("HTTP {}", response.status), Some(status_color), None)?;
    for (name, value) in &response.headers {
        term.write(format!("{name}: {value}"))?;
    }
    term.write("")?;
    term.write(response.body_text())?;

    Ok(if response.status >= 400 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
