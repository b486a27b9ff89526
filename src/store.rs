//! Append-only JSONL store for run traces and memory records.
//!
//! Writes are serialized by the single run loop; there is no cross-process
//! locking. Sharing one `.lcs/` between processes would need a file lock or
//! a single-writer process in front of it.

use lcs_agents::MemorySource;
use lcs_core::{Error, MemoryRecord, Result, TraceRecord};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const LCS_DIR: &str = ".lcs";
const TRACE_FILE: &str = "trace.jsonl";
const MEMORY_FILE: &str = "memory.jsonl";

pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Store rooted at `base` (the directory holding `.lcs/`).
    pub fn new(base: &Path) -> Self {
        Self {
            dir: base.join(LCS_DIR),
        }
    }

    fn append_line(&self, file: &str, line: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(file))?;
        writeln!(f, "{line}")?;
        Ok(())
    }

    fn read_lines(&self, file: &str) -> Result<Vec<String>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(raw
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(String::from)
            .collect())
    }

    // ── Trace ───────────────────────────────────────────────────

    pub fn append_trace(&self, record: &TraceRecord) -> Result<()> {
        self.append_line(TRACE_FILE, &serde_json::to_string(record)?)
    }

    /// The last persisted trace. An absent or empty log is a defined
    /// `None`, not an error.
    pub fn last_trace(&self) -> Result<Option<TraceRecord>> {
        let lines = self.read_lines(TRACE_FILE)?;
        match lines.last() {
            Some(line) => {
                let record = serde_json::from_str(line)
                    .map_err(|e| Error::Internal(format!("corrupt trace record: {e}")))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    // ── Memory ──────────────────────────────────────────────────

    pub fn append_memory(&self, record: &MemoryRecord) -> Result<()> {
        self.append_line(MEMORY_FILE, &serde_json::to_string(record)?)
    }

    /// All records for `key`, in chronological (append) order.
    pub fn get_memory(&self, key: &str) -> Result<Vec<MemoryRecord>> {
        let mut records = Vec::new();
        for line in self.read_lines(MEMORY_FILE)? {
            let record: MemoryRecord = serde_json::from_str(&line)
                .map_err(|e| Error::Internal(format!("corrupt memory record: {e}")))?;
            if record.key == key {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// The last `limit` records, in chronological order.
    pub fn recent_memory(&self, limit: usize) -> Result<Vec<MemoryRecord>> {
        let lines = self.read_lines(MEMORY_FILE)?;
        let start = lines.len().saturating_sub(limit);
        lines[start..]
            .iter()
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| Error::Internal(format!("corrupt memory record: {e}")))
            })
            .collect()
    }
}

impl MemorySource for Store {
    fn recent(&self, limit: usize) -> Vec<MemoryRecord> {
        // Unreadable memory degrades to no context rather than failing the run.
        self.recent_memory(limit).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read memory, running without context");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcs_core::{route, SynthesisOutput};

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        (dir, store)
    }

    fn canned_trace(run_id_text: &str) -> TraceRecord {
        let pkt = route(run_id_text);
        TraceRecord {
            out: SynthesisOutput {
                context: "ctx".into(),
                consensus: vec![],
                next_steps: vec![],
                summary: "test summary".into(),
                source: lcs_core::Source::Heuristic,
            },
            results: vec![],
            ts: pkt.ts,
            pkt,
        }
    }

    #[test]
    fn writes_and_reads_memory_by_key() {
        let (_dir, store) = test_store();

        store
            .append_memory(&MemoryRecord::new("fact", "test-key", "test-value"))
            .unwrap();
        let records = store.get_memory("test-key").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, "fact");
        assert_eq!(records[0].value, "test-value");
    }

    #[test]
    fn appends_preserve_order_and_filter_by_key() {
        let (_dir, store) = test_store();

        store.append_memory(&MemoryRecord::new("note", "multi", "first")).unwrap();
        store.append_memory(&MemoryRecord::new("note", "multi", "second")).unwrap();
        store.append_memory(&MemoryRecord::new("note", "other", "unrelated")).unwrap();

        let records = store.get_memory("multi").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, "first");
        assert_eq!(records[1].value, "second");
    }

    #[test]
    fn recent_memory_returns_last_n_chronologically() {
        let (_dir, store) = test_store();
        for i in 0..5 {
            store
                .append_memory(&MemoryRecord::new("note", "k", format!("v{i}")))
                .unwrap();
        }

        let recent = store.recent_memory(3).unwrap();
        let values: Vec<&str> = recent.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["v2", "v3", "v4"]);
    }

    #[test]
    fn trace_roundtrips_and_last_wins() {
        let (_dir, store) = test_store();

        store.append_trace(&canned_trace("first run")).unwrap();
        store.append_trace(&canned_trace("second run")).unwrap();

        let last = store.last_trace().unwrap().unwrap();
        assert_eq!(last.pkt.user_text, "second run");
        assert_eq!(last.out.summary, "test summary");
    }

    #[test]
    fn missing_logs_are_empty_not_errors() {
        let (_dir, store) = test_store();
        assert!(store.last_trace().unwrap().is_none());
        assert!(store.get_memory("anything").unwrap().is_empty());
        assert!(store.recent_memory(10).unwrap().is_empty());
    }
}
