//! Default logging setup for seghash binaries
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

use std::{io::Write, sync::Mutex, time::Instant};

/// Environment variable holding the log filter, `info` if unset.
pub const LOG_ENV: &str = "SEGHASH_LOG";

/// Environment variable selecting whether log output is styled.
pub const LOG_STYLE_ENV: &str = "SEGHASH_LOG_STYLE";

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

fn builder() -> env_logger::Builder {
    let start_time = Instant::now();
    let last_target = Mutex::new(String::new());

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(LOG_ENV, "info")
            .write_style(LOG_STYLE_ENV),
    );
    builder.format(move |buf, record| {
        let timestamp = start_time.elapsed();
        let target = record.target();

        // A poisoned lock only means another thread panicked mid-format.
        let mut last_target = last_target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if target != *last_target {
            last_target.clear();
            last_target.push_str(target);

            writeln!(
                buf,
                "{} {}",
                format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
                format_args!("{style}{target}{style:#}", style = TARGET_STYLE)
            )?;
        }
        writeln!(
            buf,
            "{} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!(
                "{style}{level:5}{style:#}",
                level = record.level(),
                style = buf.default_level_style(record.level()),
            ),
            record.args(),
        )
    });
    builder
}

/// Perform the default logging setup used by seghash binaries
///
/// Log records are prefixed with the time elapsed since this call. A line naming the log target
/// is printed whenever it differs from the previous record's target.
pub fn setup() {
    builder().init();
}

/// Like [`setup`], but does nothing if a logger is already installed.
///
/// Useful in tests, where several test functions may try to set up logging.
pub fn try_setup() -> bool {
    builder().try_init().is_ok()
}
