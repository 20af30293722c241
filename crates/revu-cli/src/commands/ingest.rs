// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};

use revu_client_api::Gateway;
use revu_core::analysis::{AnalysisRunner, AnalysisSelection};
use revu_core::ingest::{ArchiveIngestor, RepoIngestor};
use revu_domain_types::{AnalysisKind, Artifact, ModelChoice};

use super::print_report;

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// ZIP archive to register as a project
    pub archive: PathBuf,
}

impl UploadArgs {
    pub async fn run(self, gateway: &dyn Gateway) -> Result<()> {
        let artifact = ArchiveIngestor.ingest(gateway, &self.archive).await?;
        print_artifact(&artifact);
        Ok(())
    }
}

#[derive(Debug, Subcommand)]
pub enum RepoCommands {
    /// Check that a GitHub repository exists and is public
    Validate {
        /// Repository URL (https://github.com/<owner>/<repo>)
        url: String,
    },
    /// Validate a repository, download it, and optionally analyze one file
    Fetch {
        /// Repository URL (https://github.com/<owner>/<repo>)
        url: String,

        /// File to analyze after the download, by its listed index
        #[arg(long)]
        file_index: Option<usize>,

        /// Analysis kinds to run against the selected file
        #[arg(long, value_delimiter = ',')]
        kinds: Vec<AnalysisKind>,
    },
}

impl RepoCommands {
    pub async fn run(self, gateway: Arc<dyn Gateway>, model: ModelChoice) -> Result<()> {
        match self {
            RepoCommands::Validate { url } => {
                let mut ingestor = RepoIngestor::new();
                let validation = ingestor.validate(&*gateway, &url).await?;
                if validation.valid {
                    println!("{} is reachable", url);
                    if let Some(name) = &validation.name {
                        println!("  name: {}", name);
                    }
                    if let Some(language) = &validation.language {
                        println!("  language: {}", language);
                    }
                    if let Some(description) = &validation.description {
                        println!("  description: {}", description);
                    }
                } else {
                    println!(
                        "{} failed validation: {}",
                        url,
                        validation.error.as_deref().unwrap_or("unknown reason")
                    );
                }
                Ok(())
            }
            RepoCommands::Fetch { url, file_index, kinds } => {
                let mut ingestor = RepoIngestor::new();
                let validation = ingestor.validate(&*gateway, &url).await?;
                if !validation.valid {
                    anyhow::bail!(
                        "{} failed validation: {}",
                        url,
                        validation.error.as_deref().unwrap_or("unknown reason")
                    );
                }

                let artifact = ingestor.download(&*gateway, &url).await?;
                print_artifact(&artifact);

                if let Some(index) = file_index {
                    let selection = if kinds.is_empty() {
                        AnalysisSelection::all()
                    } else {
                        AnalysisSelection::new(kinds)?
                    };
                    let report = AnalysisRunner::new(gateway)
                        .run(&artifact, &selection, model, Some(index))
                        .await?;
                    print_report(&report);
                }
                Ok(())
            }
        }
    }
}

fn print_artifact(artifact: &Artifact) {
    println!(
        "Registered {} ({} files)",
        artifact.display_name(),
        artifact.files().len()
    );
    for file in artifact.files() {
        println!("  [{}] {} ({} bytes)", file.index, file.path, file.size);
    }
}
