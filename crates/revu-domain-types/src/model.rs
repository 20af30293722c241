// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI model selection

use serde::{Deserialize, Serialize};

/// The backend models available for analysis and chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelChoice {
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "o3-mini")]
    O3Mini,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 3] =
        [ModelChoice::Gpt4o, ModelChoice::Gpt35Turbo, ModelChoice::O3Mini];

    /// The wire identifier sent as `model_choice`.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelChoice::Gpt4o => "gpt-4o",
            ModelChoice::Gpt35Turbo => "gpt-3.5-turbo",
            ModelChoice::O3Mini => "o3-mini",
        }
    }

    /// Short human-readable description for selection UIs.
    pub fn description(self) -> &'static str {
        match self {
            ModelChoice::Gpt4o => "GPT-4o (Fastest & Smartest)",
            ModelChoice::Gpt35Turbo => "GPT-3.5 Turbo (Cheaper & Fast)",
            ModelChoice::O3Mini => "O3-Mini (Reasoning Model)",
        }
    }
}

impl std::fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpt-4o" => Ok(ModelChoice::Gpt4o),
            "gpt-3.5-turbo" => Ok(ModelChoice::Gpt35Turbo),
            "o3-mini" => Ok(ModelChoice::O3Mini),
            _ => Err(format!(
                "Unknown model: {}. Use gpt-4o, gpt-3.5-turbo or o3-mini",
                s
            )),
        }
    }
}
