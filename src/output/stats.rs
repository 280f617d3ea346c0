//! Crawl statistics for one or more column reports

use crate::crawler::ColumnReport;
use crate::state::CrawlState;

/// Totals across a set of column crawls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    pub columns: usize,
    pub columns_done: usize,
    pub columns_aborted: usize,
    pub articles_saved: usize,
    pub articles_failed: usize,
    pub delays: usize,
}

impl CrawlStatistics {
    /// Aggregates `reports`
    pub fn from_reports(reports: &[ColumnReport]) -> Self {
        let mut stats = Self {
            columns: reports.len(),
            ..Self::default()
        };

        for report in reports {
            match report.state {
                CrawlState::Done => stats.columns_done += 1,
                CrawlState::Aborted => stats.columns_aborted += 1,
                _ => {}
            }
            stats.articles_saved += report.saved.len();
            stats.articles_failed += report.failed.len();
            stats.delays += report.delays;
        }

        stats
    }

    /// Share of attempted articles that were saved, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.articles_saved + self.articles_failed;
        if attempted == 0 {
            0.0
        } else {
            (self.articles_saved as f64 / attempted as f64) * 100.0
        }
    }
}

/// Prints per-column results and totals to stdout
pub fn print_statistics(reports: &[ColumnReport]) {
    println!("=== Crawl Statistics ===\n");

    for report in reports {
        println!(
            "  {} [{}]: {} saved, {} failed",
            report.column,
            report.state,
            report.saved.len(),
            report.failed.len()
        );
        for failure in &report.failed {
            println!("    - {}: {}", failure.url, failure.reason);
        }
    }
    println!();

    let stats = CrawlStatistics::from_reports(reports);
    println!(
        "Columns: {} ({} done, {} aborted)",
        stats.columns, stats.columns_done, stats.columns_aborted
    );
    println!(
        "Success Rate: {:.1}% ({} / {} articles saved)",
        stats.success_rate(),
        stats.articles_saved,
        stats.articles_saved + stats.articles_failed
    );
}
