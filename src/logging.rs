//! Log subscriber setup.
//!
//! Events go to an optional append-mode log file and, when a [`LogMirror`] is
//! supplied, to an in-process channel the UI drains into its log pane.

use std::fs::OpenOptions;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::EnvConfig;
use crate::error::Error;

/// Writer factory forwarding each formatted log line to a channel.
///
/// Sends never block and are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct LogMirror {
    sender: Sender<String>,
}

impl LogMirror {
    pub fn channel() -> (Self, Receiver<String>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl<'a> MakeWriter<'a> for LogMirror {
    type Writer = MirrorWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MirrorWriter {
            sender: self.sender.clone(),
        }
    }
}

pub struct MirrorWriter {
    sender: Sender<String>,
}

impl io::Write for MirrorWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.is_empty() {
            let _ = self.sender.send(line.to_string());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps the non-blocking file writer alive. Dropping it flushes pending lines.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

fn default_filter(config: &EnvConfig) -> &'static str {
    if config.debug {
        "chatterm=debug"
    } else {
        "chatterm=info"
    }
}

/// Builds the layered subscriber without installing it.
pub fn build_subscriber(
    config: &EnvConfig,
    mirror: Option<LogMirror>,
) -> Result<(impl tracing::Subscriber + Send + Sync + 'static, LogGuard), Error> {
    let default_filter = default_filter(config);
    // use RUST_LOG env var, defaulting based on debug flag.
    let env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, file_guard) = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::io("opening log file", path, source))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false)
                .with_filter(env_filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let mirror_layer = mirror.map(|mirror| {
        tracing_subscriber::fmt::layer()
            .with_writer(mirror)
            .with_target(false)
            .with_ansi(false)
            .without_time()
            .with_filter(env_filter())
    });

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(mirror_layer);
    Ok((subscriber, LogGuard { _file: file_guard }))
}

/// Installs the global subscriber. Fails if one is already set.
pub fn init_logging(config: &EnvConfig, mirror: Option<LogMirror>) -> Result<LogGuard, Error> {
    let (subscriber, guard) = build_subscriber(config, mirror)?;
    subscriber
        .try_init()
        .map_err(|error| Error::LoggerInit(error.to_string()))?;
    Ok(guard)
}
