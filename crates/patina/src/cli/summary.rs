//! Human-readable run summary.

use patina_core::report::format_elapsed;
use patina_core::BatchOutcome;

/// Print a formatted summary table after a batch run.
pub fn print_summary(outcome: &BatchOutcome) {
    let report = &outcome.report;
    let failed = report.total_failed();
    let skipped = outcome.skipped.len();

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Aged:         {:>8}", report.total_processed);
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    if skipped > 0 {
        eprintln!("    Skipped:      {:>8}", skipped);
    }
    eprintln!("  ------------------------------------");
    for worker in &report.workers {
        eprintln!(
            "    Worker {:<4}  {:>6}  {:>8}s",
            worker.worker_id,
            worker.processed,
            format_elapsed(worker.elapsed)
        );
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>8}s", format_elapsed(report.total_elapsed));
    eprintln!("    Report:       {}", outcome.report_path.display());
    eprintln!("  ====================================");
}
