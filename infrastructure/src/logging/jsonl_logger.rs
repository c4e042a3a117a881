//! JSONL transcript writer for fetch events.
//!
//! Every [`FetchEvent`] becomes one line: the event payload merged with a
//! `type`, a `seq` counter and a millisecond `timestamp`.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tally_application::{FetchEvent, FetchLogger};
use tracing::warn;

struct Inner {
    writer: BufWriter<File>,
    seq: u64,
}

/// Appends fetch events to a file, one JSON object per line.
pub struct JsonlFetchLogger {
    inner: Mutex<Inner>,
    path: PathBuf,
}

impl JsonlFetchLogger {
    /// Open (truncating) the transcript at `path`, creating parent
    /// directories as needed. Returns `None` and warns if that fails.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create event log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: FetchEvent, seq: u64) -> Value {
        let mut map = match event.payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".into(), other);
                map
            }
        };
        map.insert("type".into(), Value::String(event.event_type.into()));
        map.insert("seq".into(), Value::from(seq));
        map.insert(
            "timestamp".into(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        Value::Object(map)
    }
}

impl FetchLogger for JsonlFetchLogger {
    fn log(&self, event: FetchEvent) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };

        let record = Self::record(event, inner.seq);
        inner.seq += 1;

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        // Flushed per line so a killed process still leaves a readable file
        if writeln!(inner.writer, "{line}").and_then(|_| inner.writer.flush()).is_err() {
            warn!("Failed to write event log {}", self.path.display());
        }
    }
}

impl Drop for JsonlFetchLogger {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = inner.writer.flush();
        }
    }
}
