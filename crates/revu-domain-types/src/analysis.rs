// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis vocabulary
//!
//! [`AnalysisKind`] enumerates the backend's analysis capabilities. Each
//! kind carries a static [`KindDescriptor`] naming its endpoint, the
//! backend field that holds the human-readable result, and the label the
//! project-analysis endpoint expects. The mapping is a total match over
//! the enum, so an unmapped kind is unrepresentable.

use serde::{Deserialize, Serialize};

/// One selectable analysis capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    BugDetection,
    Optimization,
    Explanation,
    TestGeneration,
    EdgeCaseDetection,
}

/// Static per-kind routing and normalization data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDescriptor {
    /// Endpoint path for single-file analysis.
    pub endpoint: &'static str,
    /// Backend response field holding the result text.
    pub result_field: &'static str,
    /// `analysis_type` label for the project-analysis endpoint.
    pub project_label: &'static str,
    /// Human-readable name for progress reporting.
    pub display_name: &'static str,
}

impl AnalysisKind {
    /// All kinds, in the order the original platform lists them.
    pub const ALL: [AnalysisKind; 5] = [
        AnalysisKind::BugDetection,
        AnalysisKind::Optimization,
        AnalysisKind::Explanation,
        AnalysisKind::TestGeneration,
        AnalysisKind::EdgeCaseDetection,
    ];

    /// The static descriptor for this kind.
    pub fn descriptor(self) -> KindDescriptor {
        match self {
            AnalysisKind::BugDetection => KindDescriptor {
                endpoint: "/api/v1/analyze/bugs",
                result_field: "result",
                project_label: "bugs",
                display_name: "Bug Detection",
            },
            AnalysisKind::Optimization => KindDescriptor {
                endpoint: "/api/v1/analyze/optimize",
                result_field: "optimized_code",
                project_label: "optimize",
                display_name: "Code Optimization",
            },
            AnalysisKind::Explanation => KindDescriptor {
                endpoint: "/api/v1/analyze/explaincode",
                result_field: "explanation",
                project_label: "explain",
                display_name: "Code Explanation",
            },
            AnalysisKind::TestGeneration => KindDescriptor {
                endpoint: "/api/v1/analyze/unittest",
                result_field: "unit_tests",
                project_label: "tests",
                display_name: "Unit Test Generation",
            },
            AnalysisKind::EdgeCaseDetection => KindDescriptor {
                endpoint: "/api/v1/analyze/edgecase",
                result_field: "edge_case_analysis",
                project_label: "edge-cases",
                display_name: "Edge Case Detection",
            },
        }
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bugs" | "bug-detection" => Ok(AnalysisKind::BugDetection),
            "optimize" | "optimization" => Ok(AnalysisKind::Optimization),
            "explain" | "explanation" => Ok(AnalysisKind::Explanation),
            "tests" | "test-generation" => Ok(AnalysisKind::TestGeneration),
            "edge-cases" | "edge-case-detection" => Ok(AnalysisKind::EdgeCaseDetection),
            _ => Err(format!(
                "Unknown analysis kind: {}. Use bugs, optimize, explain, tests or edge-cases",
                s
            )),
        }
    }
}

/// The per-kind result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Success {
        result_text: String,
        execution_time_seconds: f64,
        model_used: String,
    },
    Error {
        message: String,
    },
    /// Recorded for kinds that were requested but not reached because the
    /// batch was cancelled.
    Skipped,
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_endpoint_and_label() {
        let mut endpoints: Vec<&str> = AnalysisKind::ALL
            .iter()
            .map(|k| k.descriptor().endpoint)
            .collect();
        endpoints.sort_unstable();
        endpoints.dedup();
        assert_eq!(endpoints.len(), AnalysisKind::ALL.len());

        let mut labels: Vec<&str> = AnalysisKind::ALL
            .iter()
            .map(|k| k.descriptor().project_label)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), AnalysisKind::ALL.len());
    }

    #[test]
    fn result_fields_match_the_backend_naming() {
        assert_eq!(AnalysisKind::BugDetection.descriptor().result_field, "result");
        assert_eq!(
            AnalysisKind::Explanation.descriptor().result_field,
            "explanation"
        );
        assert_eq!(
            AnalysisKind::Optimization.descriptor().result_field,
            "optimized_code"
        );
        assert_eq!(
            AnalysisKind::TestGeneration.descriptor().result_field,
            "unit_tests"
        );
        assert_eq!(
            AnalysisKind::EdgeCaseDetection.descriptor().result_field,
            "edge_case_analysis"
        );
    }

    #[test]
    fn kinds_parse_from_cli_labels() {
        assert_eq!(
            "edge-cases".parse::<AnalysisKind>().unwrap(),
            AnalysisKind::EdgeCaseDetection
        );
        assert!("lint".parse::<AnalysisKind>().is_err());
    }
}
