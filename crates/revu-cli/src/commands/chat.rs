// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use revu_client_api::Gateway;
use revu_core::chat::{suggestions, ChatSession};
use revu_core::ingest::SingleFileIngestor;
use revu_domain_types::{ConversationScope, ModelChoice};

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Source file the question is about
    pub file: PathBuf,

    /// The question. Prints scope-appropriate suggestions when omitted.
    pub question: Option<String>,
}

impl ChatArgs {
    pub async fn run(self, gateway: &dyn Gateway, model: ModelChoice) -> Result<()> {
        let artifact = Arc::new(SingleFileIngestor::default().ingest(&self.file).await?);
        let scope = ConversationScope::EntireProject;

        let Some(question) = self.question else {
            println!("Things you could ask about {}:", artifact.display_name());
            for suggestion in suggestions(&artifact, scope) {
                println!("  - {}", suggestion);
            }
            return Ok(());
        };

        let session = ChatSession::new(artifact, model);
        let turn = session.ask(gateway, &question, scope).await?;
        println!("{}", turn.answer);
        Ok(())
    }
}
