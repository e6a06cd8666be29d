//! Completion report printing
//!
//! The summary block printed after all workers have terminated.

use crate::crawler::CrawlReport;

/// Prints the crawl summary to stdout
///
/// # Arguments
///
/// * `report` - The statistics to display
pub fn print_report(report: &CrawlReport) {
    println!("========== Crawl Summary ==========");
    println!("Workers used      : {}", report.workers);
    println!(
        "Pages crawled     : {} / {}",
        report.pages_crawled, report.max_pages
    );
    println!(
        "Elapsed (sec)     : {:.2}",
        report.elapsed.as_secs_f64()
    );

    if !report.summaries.is_empty() {
        println!();
        for summary in &report.summaries {
            println!(
                "  worker {:<3} {} pages, {} failed fetches, {} duplicates, {} links enqueued",
                summary.worker_id,
                summary.pages_crawled,
                summary.fetch_failures,
                summary.duplicates_skipped,
                summary.links_enqueued
            );
        }
    }

    println!("===================================");
}
