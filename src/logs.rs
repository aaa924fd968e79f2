use std::env;
use std::io::{self, IsTerminal};

use anyhow::{bail, Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Init the global logger. The level argument comes from the command line and
/// can be overridden with the `MERCH_LOG` environment variable.
pub fn init(level: &str) -> Result<()> {
    let level = match env::var("MERCH_LOG") {
        Ok(s) => parse_level(&s)?,
        Err(_) => parse_level(level)?,
    };

    let stderr = io::stderr();
    let is_terminal = stderr.is_terminal();

    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .debug(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            if is_terminal {
                out.finish(format_args!(
                    "{} [{}] {}",
                    humantime::format_rfc3339_millis(std::time::SystemTime::now()),
                    colors.color(record.level()),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "{} [{}] {}",
                    humantime::format_rfc3339_millis(std::time::SystemTime::now()),
                    record.level(),
                    message
                ))
            }
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context("init logger")?;

    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    let level = match level {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        _ => bail!("unknown log level '{}'", level),
    };
    Ok(level)
}
