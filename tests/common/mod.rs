#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fintrack::render::ChartRenderer;
use fintrack::reporting::Report;
use serde_json::Value;
use tempfile::TempDir;

/// Renderer that keeps every report it is handed.
#[derive(Default)]
pub struct RecordingRenderer {
    reports: Mutex<Vec<Report>>,
}

impl RecordingRenderer {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.reports.lock().expect("renderer lock").len()
    }

    pub fn last(&self) -> Option<Report> {
        self.reports.lock().expect("renderer lock").last().cloned()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, report: &Report) {
        self.reports.lock().expect("renderer lock").push(report.clone());
    }
}

/// Writes `value` as `<name>` inside `dir` and returns its path.
pub fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).expect("serialize fixture"))
        .expect("write fixture");
    path
}
