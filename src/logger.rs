use std::fs::{self, File};

use anyhow::{bail, Context};
use time::{format_description::parse, OffsetDateTime, UtcOffset};
use tracing::Level;
use tracing_subscriber::{
    fmt::{time::OffsetTime, writer::BoxMakeWriter},
    FmtSubscriber,
};

/// Installs a global subscriber writing every event to a timestamped file in the working
/// directory.
///
/// Fails if a global subscriber is already set or the file cannot be created. No file is left
/// behind on failure.
pub fn init_logger() -> anyhow::Result<()> {
    if tracing::dispatcher::has_been_set() {
        bail!("a global tracing subscriber is already set, consider disabling logs");
    }

    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(
        local_offset,
        parse("[year]-[month]-[day] [hour]:[minute]:[second]")
            .context("invalid timestamp format")?,
    );
    let file_name = log_file_name()?;
    let file = File::create(&file_name)
        .with_context(|| format!("could not create log file '{file_name}'"))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(BoxMakeWriter::new(file))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        // lost a race with another subscriber
        let _ = fs::remove_file(&file_name);
        return Err(e).context("could not set global default tracing subscriber");
    }
    Ok(())
}

fn log_file_name() -> anyhow::Result<String> {
    let format = parse("[year]-[month]-[day]_[hour]:[minute]:[second]_arena_log.txt")
        .context("invalid log file name format")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).context("could not format log file name")
}
