//! `--name[=value]` option scanning.

use std::collections::HashMap;

/// Recognized options found on the command line. `None` marks a bare flag.
pub type OptionMap = HashMap<String, Option<String>>;

/// Collect the options in `names` from `args`.
///
/// `args[0]` is the program path and is always skipped. Tokens without a
/// leading `--` are positional and ignored, as are unrecognized names. A
/// name seen twice keeps its last value. An `=` directly after the prefix
/// does not split, so `--=x` is the bare flag `=x`.
pub fn parse_options<I, S>(args: I, names: &[&str]) -> OptionMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = OptionMap::new();
    for arg in args.into_iter().skip(1) {
        let Some(opt) = arg.as_ref().strip_prefix("--") else {
            continue;
        };
        let (name, value) = match opt.find('=') {
            Some(pos) if pos > 0 => (&opt[..pos], Some(opt[pos + 1..].to_string())),
            _ => (opt, None),
        };
        if names.contains(&name) {
            values.insert(name.to_string(), value);
        }
    }
    values
}
