// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::demos::DemoScene;
use crate::io::{FrameRecord, PieceSummary};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    fn rule() {
        println!("{}", "━".repeat(72).bright_black());
    }

    /// List the built-in scenes
    pub fn report_demos(demos: &[DemoScene]) {
        println!("{}", "Available scenes:".bold());
        let width = demos.iter().map(|d| d.name.len()).max().unwrap_or(0);
        for demo in demos {
            let name = format!("{:<width$}", demo.name, width = width);
            println!("  {}  {}", name.cyan(), demo.description.bright_black());
        }
    }

    /// Summarize a finished render
    pub fn report_render(scene: &str, files: &[PathBuf], duration: Duration) {
        println!();
        Self::rule();
        println!("{} {}", "Scene:".bold(), scene.cyan());
        Self::rule();

        if files.is_empty() {
            println!(
                "  {}",
                "No files written (enable --vtk-export or --vtk-time-series)".yellow()
            );
        }
        for file in files {
            println!("  {} {}", "wrote".bright_black(), file.display());
        }
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        Self::rule();
    }

    /// Print a PolyData summary
    pub fn report_polydata(path: &Path, summary: &PieceSummary) {
        Self::rule();
        println!("{} {}", "PolyData:".bold(), path.display().to_string().cyan());
        Self::rule();
        Self::print_count("Points", summary.points);
        Self::print_count("Lines", summary.lines);
        Self::print_count("Polygons", summary.polys);
        if !summary.point_arrays.is_empty() {
            println!(
                "  {} {}",
                "Point data:".bright_black(),
                summary.point_arrays.join(", ")
            );
        }
    }

    /// Print the frames of a collection manifest
    pub fn report_collection(path: &Path, records: &[FrameRecord]) {
        Self::rule();
        println!("{} {}", "Collection:".bold(), path.display().to_string().cyan());
        Self::rule();
        Self::print_count("Frames", records.len());
        if let (Some(first), Some(last)) = (records.first(), records.last()) {
            println!(
                "  {} {:.3}s .. {:.3}s",
                "Time span:".bright_black(),
                first.time,
                last.time
            );
        }
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().cyan()
        );
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(Reporter::format_duration(Duration::from_micros(500)), "500µs");
        assert_eq!(Reporter::format_duration(Duration::from_millis(5)), "5.00ms");
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
