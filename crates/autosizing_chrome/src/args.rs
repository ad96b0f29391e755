//! Command line parsing for `autosizing_probe`.

use anyhow::{Result, anyhow, bail};
use std::path::PathBuf;

/// What the probe should inspect.
#[derive(Clone, Debug, PartialEq)]
pub enum ProbeArgs {
    /// Load a URL or path in headless Chrome. `frame` selects a child frame
    /// by index instead of the main frame.
    Live { target: String, frame: Option<usize> },
    /// Parse an HTML file and evaluate it with the given top window widths.
    Static {
        path: PathBuf,
        inner_width: f64,
        outer_width: f64,
    },
}

pub const USAGE: &str = "usage: autosizing_probe <url-or-path> [--frame=<index>]\n       \
     autosizing_probe --static <path> --inner-width <px> --outer-width <px>";

/// Splits `--key=value` or `--key value` into the key and its value.
fn take_value<I>(arg: &str, key: &str, rest: &mut I) -> Result<Option<String>>
where
    I: Iterator<Item = String>,
{
    if let Some(value) = arg
        .strip_prefix(key)
        .and_then(|tail| tail.strip_prefix('='))
    {
        return Ok(Some(value.to_owned()));
    }
    if arg == key {
        return rest
            .next()
            .map(Some)
            .ok_or_else(|| anyhow!("{key} expects a value"));
    }
    Ok(None)
}

fn parse_width(value: &str, key: &str) -> Result<f64> {
    let width = value
        .parse::<f64>()
        .map_err(|err| anyhow!("{key}: invalid width {value:?}: {err}"))?;
    if !width.is_finite() || width <= 0.0 {
        bail!("{key}: width must be a positive number, got {value}");
    }
    Ok(width)
}

impl ProbeArgs {
    /// Parses arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid or missing argument.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut static_path = None;
        let mut inner_width = None;
        let mut outer_width = None;
        let mut frame = None;
        let mut target = None;

        while let Some(arg) = args.next() {
            if let Some(value) = take_value(&arg, "--static", &mut args)? {
                static_path = Some(PathBuf::from(value));
            } else if let Some(value) = take_value(&arg, "--inner-width", &mut args)? {
                inner_width = Some(parse_width(&value, "--inner-width")?);
            } else if let Some(value) = take_value(&arg, "--outer-width", &mut args)? {
                outer_width = Some(parse_width(&value, "--outer-width")?);
            } else if let Some(value) = take_value(&arg, "--frame", &mut args)? {
                frame = Some(
                    value
                        .parse::<usize>()
                        .map_err(|err| anyhow!("--frame: invalid index {value:?}: {err}"))?,
                );
            } else if arg.starts_with("--") {
                bail!("unknown option {arg}");
            } else if target.replace(arg).is_some() {
                bail!("only one target may be given");
            }
        }

        if let Some(path) = static_path {
            if target.is_some() || frame.is_some() {
                bail!("--static cannot be combined with a live target");
            }
            let inner_width =
                inner_width.ok_or_else(|| anyhow!("--static requires --inner-width"))?;
            let outer_width =
                outer_width.ok_or_else(|| anyhow!("--static requires --outer-width"))?;
            return Ok(Self::Static {
                path,
                inner_width,
                outer_width,
            });
        }
        if inner_width.is_some() || outer_width.is_some() {
            bail!("--inner-width and --outer-width only apply to --static");
        }
        let target = target.ok_or_else(|| anyhow!("missing target"))?;
        Ok(Self::Live { target, frame })
    }
}
