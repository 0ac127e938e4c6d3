//! Table and JSON rendering of command results.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use octo_core::commands::LatestRelease;
use octo_core::promotion::{
    PromotionObserver, PromotionReport, PromotionRequest, PromotionSummary,
};
use octo_core::types::{Named, Release};

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Announces the project count once selection is done, then writes
/// `[i/n] <project>` to stderr as each project starts.
pub struct StderrProgress {
    format: OutputFormat,
    space: String,
    selection: Option<String>,
}

impl StderrProgress {
    pub fn new(format: OutputFormat, request: &PromotionRequest) -> Self {
        Self {
            format,
            space: request.space.clone(),
            selection: request.filter.describe(),
        }
    }
}

impl PromotionObserver for StderrProgress {
    fn on_start(&mut self, total: usize) {
        if matches!(self.format, OutputFormat::Table) {
            println!("{}", found_line(total, self.selection.as_deref(), &self.space));
        }
    }

    fn on_project(&mut self, index: usize, total: usize, project_name: &str) {
        eprintln!("[{}/{}] {}", index + 1, total, project_name);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `Id: Name` per line.
pub fn print_named<T: Named + Serialize>(items: &[T], empty: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{empty}");
            }
            for item in items {
                println!("{}: {}", item.id(), item.name());
            }
            Ok(())
        }
    }
}

pub fn print_releases(releases: &[Release], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(releases),
        OutputFormat::Table => {
            if releases.is_empty() {
                println!("No releases found");
            }
            for release in releases {
                println!("{}: {}", release.id, release.version);
            }
            Ok(())
        }
    }
}

pub fn print_latest_release(latest: &LatestRelease, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "project": latest.project.name,
            "environment": latest.environment.name,
            "release": latest.release,
        })),
        OutputFormat::Table => {
            match &latest.release {
                Some(release) => println!("{}: {}", release.id, release.version),
                None => println!(
                    "No releases found in {} environment",
                    latest.environment.name
                ),
            }
            Ok(())
        }
    }
}

pub fn print_report(report: &PromotionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            print_report_table(report);
            Ok(())
        }
    }
}

fn print_report_table(report: &PromotionReport) {
    if report.outcomes.is_empty() {
        println!("No projects to process");
        return;
    }

    let headers = [
        "Project".to_string(),
        format!("{} Version", report.source_environment),
        format!("{} Version", report.target_environment),
        "Action".to_string(),
    ];
    let rows: Vec<[String; 4]> = report
        .outcomes
        .iter()
        .map(|o| {
            [
                o.project_name.clone(),
                o.source_version.as_deref().unwrap_or("N/A").to_string(),
                o.target_version.as_deref().unwrap_or("N/A").to_string(),
                o.action_label(),
            ]
        })
        .collect();

    let widths = column_widths(&headers, &rows);

    println!();
    print_row(&headers, &widths);
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * 2));
    for row in &rows {
        print_row(row, &widths);
    }

    println!();
    println!("{}", summary_line(&report.summary, report.dry_run));
}

fn found_line(count: usize, selection: Option<&str>, space: &str) -> String {
    match selection {
        Some(selection) => format!("Found {count} projects {selection}"),
        None => format!("Found {count} projects in space '{space}'"),
    }
}

/// Widest cell per column, counted in characters.
fn column_widths(headers: &[String; 4], rows: &[[String; 4]]) -> [usize; 4] {
    let mut widths = headers.clone().map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn print_row(cells: &[String; 4], widths: &[usize; 4]) {
    println!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
}

fn summary_line(summary: &PromotionSummary, dry_run: bool) -> String {
    if dry_run {
        format!(
            "Summary: {} would be deployed, {} already deployed, {} skipped, {} failed",
            summary.would_deploy, summary.already_deployed, summary.skipped, summary.failed
        )
    } else {
        format!(
            "Summary: {} deployed, {} already deployed, {} skipped, {} failed",
            summary.deployed, summary.already_deployed, summary.skipped, summary.failed
        )
    }
}
