use crate::record::{CsvRow, NormalizedRecord};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered JSONL writer: one compact object per line, UTF-8, non-ASCII kept as-is.
pub struct JsonlSink {
    path: PathBuf,
    w: Option<BufWriter<File>>,
    lines: u64,
}

impl JsonlSink {
    pub fn create(path: &Path, buf_bytes: usize) -> Result<Self> {
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self { path: path.to_path_buf(), w: Some(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f)), lines: 0 })
    }

    #[inline]
    pub fn write_line(&mut self, s: &str) -> Result<()> {
        if let Some(w) = &mut self.w {
            w.write_all(s.as_bytes())?;
            w.write_all(b"\n")?;
            self.lines += 1;
        }
        Ok(())
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn finish(mut self) -> Result<u64> {
        if let Some(mut w) = self.w.take() {
            w.flush().with_context(|| format!("flush {}", self.path.display()))?;
        }
        Ok(self.lines)
    }
}

/// CSV rows held in memory and written as one table when the run ends.
pub struct CsvTable {
    path: PathBuf,
    rows: Vec<CsvRow>,
}

impl CsvTable {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf(), rows: Vec::new() }
    }

    pub fn push(&mut self, row: CsvRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write header plus all rows. The header is written even with no rows.
    pub fn write(self) -> Result<u64> {
        let mut w = csv::Writer::from_path(&self.path).with_context(|| format!("create {}", self.path.display()))?;
        if self.rows.is_empty() {
            w.write_record(CSV_HEADER)?;
        }
        for row in &self.rows {
            w.serialize(row)?;
        }
        w.flush().with_context(|| format!("flush {}", self.path.display()))?;
        Ok(self.rows.len() as u64)
    }
}

/// Column order of the CSV export; matches `CsvRow`.
pub const CSV_HEADER: [&str; 8] =
    ["id", "title", "selftext", "top_comments", "score", "num_comments", "created_utc", "permalink"];

/// Line and row counts after both sinks are closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkSummary {
    pub jsonl_lines: u64,
    pub csv_rows: u64,
}

/// Both projections of the record stream. Every accepted record goes to both,
/// so the JSONL line count and the CSV row count always agree.
pub struct RecordSinks {
    jsonl: JsonlSink,
    table: CsvTable,
}

impl RecordSinks {
    pub fn create(jsonl_path: &Path, csv_path: &Path, write_buf: usize) -> Result<Self> {
        Ok(Self { jsonl: JsonlSink::create(jsonl_path, write_buf)?, table: CsvTable::new(csv_path) })
    }

    pub fn write(&mut self, rec: &NormalizedRecord) -> Result<()> {
        // Serialize first so a failure leaves neither sink touched.
        let line = serde_json::to_string(rec).with_context(|| format!("serialize submission {}", rec.id))?;
        self.jsonl.write_line(&line)?;
        self.table.push(CsvRow::from(rec));
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.jsonl.lines()
    }

    pub fn finish(self) -> Result<SinkSummary> {
        let jsonl_lines = self.jsonl.finish()?;
        let csv_rows = self.table.write()?;
        Ok(SinkSummary { jsonl_lines, csv_rows })
    }
}
