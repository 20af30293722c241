// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio::sync::mpsc;
use tracing::debug;

use revu_client_api::Gateway;
use revu_core::analysis::{
    AnalysisEvent, AnalysisRunner, AnalysisSelection, CancelToken,
};
use revu_core::ingest::SingleFileIngestor;
use revu_domain_types::{AnalysisKind, ModelChoice};

use super::print_report;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Source file to analyze
    pub file: PathBuf,

    /// Analysis kinds to run, in order (bugs, optimize, explain, tests,
    /// edge-cases). All of them when omitted.
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<AnalysisKind>,
}

impl AnalyzeArgs {
    pub async fn run(self, gateway: Arc<dyn Gateway>, model: ModelChoice) -> Result<()> {
        let artifact = SingleFileIngestor::default().ingest(&self.file).await?;
        let selection = if self.kinds.is_empty() {
            AnalysisSelection::all()
        } else {
            AnalysisSelection::new(self.kinds)?
        };

        // Ctrl-C stops the batch between kinds; finished outcomes are kept.
        let cancel = CancelToken::new();
        let sigint_token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received; cancelling batch");
                sigint_token.cancel();
            }
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    AnalysisEvent::Started { kind, fraction, .. } => {
                        println!("[{:>3.0}%] {}...", fraction * 100.0, kind.display_name());
                    }
                    AnalysisEvent::Finished { kind, fraction, success, .. } => {
                        let verdict = if success { "done" } else { "failed" };
                        println!(
                            "[{:>3.0}%] {} {}",
                            fraction * 100.0,
                            kind.display_name(),
                            verdict
                        );
                    }
                    AnalysisEvent::BatchComplete { .. } => {}
                }
            }
        });

        let runner = AnalysisRunner::new(gateway);
        let report = runner
            .run_with_events(&artifact, &selection, model, None, Some(&tx), Some(&cancel))
            .await?;
        drop(tx);
        let _ = printer.await;

        print_report(&report);
        Ok(())
    }
}
