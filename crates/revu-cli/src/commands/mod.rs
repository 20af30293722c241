// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations

pub mod analyze;
pub mod chat;
pub mod health;
pub mod ingest;

use revu_core::analysis::RunReport;
use revu_domain_types::AnalysisOutcome;

/// Print a finished batch report, one section per requested kind.
pub fn print_report(report: &RunReport) {
    for (kind, outcome) in report.outcomes.iter() {
        println!();
        println!("=== {} ===", kind.display_name());
        match outcome {
            AnalysisOutcome::Success {
                result_text,
                execution_time_seconds,
                model_used,
            } => {
                println!("{}", result_text);
                println!("({} in {:.1}s)", model_used, execution_time_seconds);
            }
            AnalysisOutcome::Error { message } => println!("failed: {}", message),
            AnalysisOutcome::Skipped => println!("skipped (batch cancelled)"),
        }
    }
    println!();
    println!("Batch {}.", report.status);
}
