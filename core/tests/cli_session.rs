//! Scripted operator sessions driven through the public `Cli` API.

use std::io::Cursor;

use courier_core::cli::EOL;
use courier_core::{Cli, CliConfig, CliError, Prompt};

fn scripted(input: &str, ansi: bool) -> Cli<Cursor<Vec<u8>>, Vec<u8>> {
    let config = CliConfig {
        ansi,
        tick_ms: 0,
        ..CliConfig::default()
    };
    Cli::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), config)
}

#[test]
fn questionnaire_session() {
    let mut cli = scripted("Ada\nmaybe\nyes\n", true);

    let name = cli.read(&Prompt::ask("Name")).unwrap();
    let ready = cli.read(&Prompt::choose("Ready", &["yes", "no"])).unwrap();
    cli.write_styled(format!("Welcome, {name}"), Some("light_green"), Some("black"))
        .unwrap();
    cli.wait(2, true).unwrap();

    assert_eq!(ready, "yes");
    let out = String::from_utf8(cli.into_output()).unwrap();
    let expected = [
        "Name: ".to_string(),
        "Ready [ yes, no ]: ".to_string(),
        format!("This is not a valid option. Please try again.{EOL}{EOL}"),
        "Ready [ yes, no ]: ".to_string(),
        format!("\x1b[1;32m\x1b[40mWelcome, Ada\x1b[0m{EOL}"),
        format!("2... 1... {EOL}"),
    ]
    .concat();
    assert_eq!(out, expected);
}

#[test]
fn plain_terminal_skips_escape_codes() {
    let mut cli = scripted("", false);
    cli.write_styled("done", Some("red"), None).unwrap();
    assert_eq!(String::from_utf8(cli.into_output()).unwrap(), format!("done{EOL}"));
}

#[test]
fn invalid_color_writes_nothing() {
    let mut cli = scripted("", true);
    let err = cli.write_styled("done", Some("octarine"), None).unwrap_err();
    assert!(matches!(err, CliError::InvalidColorName { .. }));
    assert!(cli.into_output().is_empty());
}

#[test]
fn closed_input_ends_a_restricted_prompt() {
    let mut cli = scripted("x\nz\n", true);
    let err = cli.read(&Prompt::only(&["a"])).unwrap_err();
    assert!(matches!(err, CliError::InputClosed));
}
