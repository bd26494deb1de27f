//! Helpers shared by the unit tests of this crate

use std::sync::Mutex;
use galaxy_3d_render::galaxy3d::debug::{DebugReport, RenderingDebugger};

/// Debugger capturing every report for inspection
#[derive(Default)]
pub(crate) struct CaptureDebugger {
    reports: Mutex<Vec<DebugReport>>,
}

impl CaptureDebugger {
    pub fn reports(&self) -> Vec<DebugReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl RenderingDebugger for CaptureDebugger {
    fn post_report(&self, report: &DebugReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}
