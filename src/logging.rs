use crate::config::LoggingSettings;
use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn parse_level(level: &str) -> Level {
    Level::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", level);
        Level::INFO
    })
}

pub fn init_logging(settings: &LoggingSettings) {
    let level_filter = LevelFilter::from_level(parse_level(&settings.level));
    let stdout_layer = tracing_subscriber::fmt::layer().with_writer(io::stdout);

    match &settings.file {
        Some(path) => {
            let writer = CappedLog::new(PathBuf::from(path), settings.max_file_bytes);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone());
            tracing_subscriber::registry()
                .with(stdout_layer.with_filter(level_filter))
                .with(file_layer.with_filter(level_filter))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(stdout_layer.with_filter(level_filter))
                .init();
        }
    }
}

/// Append-only log file that, once it reaches `max_len`, is cut down to its newest half.
#[derive(Clone, Debug)]
pub struct CappedLog {
    path: PathBuf,
    max_len: u64,
    lock: Arc<Mutex<()>>,
}

impl CappedLog {
    pub fn new(path: PathBuf, max_len: u64) -> Self {
        Self {
            path,
            max_len,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn keep_tail(&self) -> io::Result<()> {
        let len = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if len < self.max_len {
            return Ok(());
        }

        let keep = self.max_len / 2;
        let mut tail = Vec::new();
        let mut file = OpenOptions::new().read(true).open(&self.path)?;
        file.seek(SeekFrom::Start(len.saturating_sub(keep)))?;
        file.read_to_end(&mut tail)?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(&tail)
    }
}

impl Write for CappedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // a poisoned guard only protects file ordering, keep logging
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.keep_tail()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
