// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use clap::Args;
use revu_client_api::Gateway;

#[derive(Debug, Args)]
pub struct HealthArgs {}

impl HealthArgs {
    pub async fn run(self, gateway: &dyn Gateway) -> Result<()> {
        let health = gateway.health().await?;
        println!("Backend status: {}", health.status);
        for (key, value) in &health.details {
            println!("  {}: {}", key, value);
        }
        Ok(())
    }
}
