// src/report.rs
// =============================================================================
// Run milestones and the final summary.
//
// The crawler emits three milestones through StatusReporter:
//   1. run started   (base URL, destination)
//   2. page finished (page number, record count)
//   3. run finished  (the CrawlReport)
//
// How they're shown is up to the reporter. ConsoleReporter prints them to
// stdout; tests plug in a reporter that just records them.
// =============================================================================

use serde::Serialize;
use std::path::Path;

// Why pagination stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The next listing page answered with a redirect
    Redirected { to: String },
    /// The next listing page could not be fetched
    FetchFailed { error: String },
    /// The listing page loaded but produced no records
    EmptyPage { page: u32 },
}

// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Pages whose records were written
    pub pages: u32,
    pub records: usize,
    pub skipped_products: usize,
    #[serde(flatten)]
    pub stop_reason: StopReason,
}

pub trait StatusReporter: Send + Sync {
    fn run_started(&self, base_url: &str, destination: &Path);
    fn page_completed(&self, page_number: u32, record_count: usize);
    fn run_finished(&self, report: &CrawlReport);
}

// Prints milestones as they happen
//
// `quiet` silences everything (used with --json so stdout only carries the
// JSON document).
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl StatusReporter for ConsoleReporter {
    fn run_started(&self, base_url: &str, destination: &Path) {
        if self.quiet {
            return;
        }
        println!("🔍 Crawling category: {}", base_url);
        println!("💾 Writing to: {}", destination.display());
    }

    fn page_completed(&self, page_number: u32, record_count: usize) {
        if self.quiet {
            return;
        }
        println!("   📄 Page {}: {} record(s) written", page_number, record_count);
    }

    fn run_finished(&self, report: &CrawlReport) {
        if self.quiet {
            return;
        }
        println!("✅ Finished after {} page(s)", report.pages);
    }
}

pub fn describe_stop(reason: &StopReason) -> String {
    match reason {
        StopReason::Redirected { to } => format!("listing redirected to {}", to),
        StopReason::FetchFailed { error } => format!("listing fetch failed ({})", error),
        StopReason::EmptyPage { page } => format!("page {} had no products", page),
    }
}
