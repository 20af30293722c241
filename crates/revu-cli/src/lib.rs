// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line client for the Revu code review platform
//!
//! One invocation is one workspace: the selected artifact is ingested,
//! analyzed or chatted about, and the results are printed. All backend
//! traffic goes through [`revu_client::RestGateway`].

pub use clap::Parser;

use clap::Subcommand;
use revu_domain_types::ModelChoice;
use revu_logging::CliLoggingArgs;
use url::Url;

pub mod commands;

use commands::{
    analyze::AnalyzeArgs, chat::ChatArgs, health::HealthArgs, ingest::RepoCommands,
    ingest::UploadArgs,
};

#[derive(Debug, Parser)]
#[command(name = "revu", about = "AI-assisted code review from the command line")]
pub struct Cli {
    /// Base URL of the Revu backend service
    #[arg(long, env = "REVU_SERVER_URL", default_value = "http://localhost:8000/")]
    pub server_url: Url,

    /// Model used for analysis and chat
    #[arg(long, env = "REVU_MODEL")]
    pub model: Option<ModelChoice>,

    #[command(flatten)]
    pub logging: CliLoggingArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check backend availability
    Health(HealthArgs),
    /// List the available models
    Models,
    /// Run analysis kinds against a source file
    Analyze(AnalyzeArgs),
    /// Ask a question about a source file
    Chat(ChatArgs),
    /// Register a ZIP project archive with the backend
    Upload(UploadArgs),
    /// Validate and fetch remote repositories
    Repo {
        #[command(subcommand)]
        subcommand: RepoCommands,
    },
}

/// Print the model catalog.
pub fn print_models(selected: ModelChoice) {
    for model in ModelChoice::ALL {
        let marker = if model == selected { "*" } else { " " };
        println!("{} {:<14} {}", marker, model.as_str(), model.description());
    }
}
