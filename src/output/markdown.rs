//! Markdown summary generation
//!
//! Renders a [`CrawlSummary`] as a human-readable report: run metadata,
//! visit counts per navigation stage, the discovered faculties with the
//! route that led to each one, and the expected faculties that were missed.

use crate::output::{CrawlSummary, OutputResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary to disk
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# UI Faculty Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", summary.run_id));
    md.push_str(&format!("- **Base URL**: {}\n", summary.base_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds ({:.2} minutes)\n",
        summary.duration_seconds,
        summary.duration_seconds / 60.0
    ));
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    if let Some(termination) = &summary.termination {
        md.push_str(&format!("- **Stopped Because**: {}\n", termination));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Crawled**: {}\n", summary.pages_crawled));
    if let Some(visited) = summary.visited_count {
        md.push_str(&format!("- **URLs Visited**: {}\n", visited));
    }
    md.push_str(&format!(
        "- **Faculties Found**: {}\n",
        summary.faculties.len()
    ));
    md.push_str(&format!(
        "- **Expected Coverage**: {:.1}% of {}\n\n",
        summary.coverage(),
        summary.expected_count
    ));

    if !summary.stage_histogram.is_empty() {
        md.push_str("## Navigation Stage Breakdown\n\n");
        md.push_str("| Stage | Visits |\n");
        md.push_str("|-------|--------|\n");
        for (stage, count) in &summary.stage_histogram {
            md.push_str(&format!("| {} | {} |\n", stage, count));
        }
        md.push('\n');
    }

    if !summary.faculties.is_empty() {
        md.push_str("## Discovered Faculties\n\n");
        md.push_str("| # | Name | Type | Programs | Departments | URL |\n");
        md.push_str("|---|------|------|----------|-------------|-----|\n");
        for (i, faculty) in summary.faculties.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                i + 1,
                faculty.name,
                faculty.faculty_type,
                faculty.program_count,
                faculty.department_count,
                faculty.url
            ));
        }
        md.push('\n');

        md.push_str("## Discovery Paths\n\n");
        for faculty in &summary.faculties {
            md.push_str(&format!("- **{}**: {}\n", faculty.name, faculty.path));
        }
        md.push('\n');
    }

    if !summary.missing_faculties.is_empty() {
        md.push_str("## Missing Faculties\n\n");
        md.push_str(&format!(
            "Not found: {}\n\n",
            summary.missing_faculties.len()
        ));
        for name in &summary.missing_faculties {
            md.push_str(&format!("- {}\n", name));
        }
        md.push('\n');
    }

    md
}
