//! ANSI SGR palettes.

use crate::error::{CliError, ColorLayer};

pub const RESET: &str = "\x1b[0m";

pub const FOREGROUND_COLORS: [(&str, &str); 16] = [
    ("black", "0;30"),
    ("dark_gray", "1;30"),
    ("blue", "0;34"),
    ("light_blue", "1;34"),
    ("green", "0;32"),
    ("light_green", "1;32"),
    ("cyan", "0;36"),
    ("light_cyan", "1;36"),
    ("red", "0;31"),
    ("light_red", "1;31"),
    ("purple", "0;35"),
    ("light_purple", "1;35"),
    ("brown", "0;33"),
    ("yellow", "1;33"),
    ("light_gray", "0;37"),
    ("white", "1;37"),
];

pub const BACKGROUND_COLORS: [(&str, &str); 8] = [
    ("black", "40"),
    ("red", "41"),
    ("green", "42"),
    ("yellow", "43"),
    ("blue", "44"),
    ("magenta", "45"),
    ("cyan", "46"),
    ("light_gray", "47"),
];

fn lookup(layer: ColorLayer, name: &str) -> Result<&'static str, CliError> {
    let table: &[(&str, &str)] = match layer {
        ColorLayer::Foreground => &FOREGROUND_COLORS,
        ColorLayer::Background => &BACKGROUND_COLORS,
    };
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
        .ok_or_else(|| CliError::InvalidColorName {
            layer,
            name: name.to_string(),
        })
}

/// Wrap `text` in SGR codes for `foreground` and optional `background`.
pub fn color(text: &str, foreground: &str, background: Option<&str>) -> Result<String, CliError> {
    let fg = lookup(ColorLayer::Foreground, foreground)?;
    let bg = background
        .map(|name| lookup(ColorLayer::Background, name))
        .transpose()?;

    let mut out = format!("\x1b[{fg}m");
    if let Some(bg) = bg {
        out.push_str(&format!("\x1b[{bg}m"));
    }
    out.push_str(text);
    out.push_str(RESET);
    Ok(out)
}
