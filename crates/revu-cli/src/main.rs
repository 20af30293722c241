// Copyright 2025 Revu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use anyhow::Result;
use revu_cli::{print_models, Cli, Commands, Parser};
use revu_client::RestGateway;
use revu_client_api::Gateway;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.init("revu")?;

    let gateway: Arc<dyn Gateway> = Arc::new(RestGateway::new(cli.server_url.clone()));
    let model = cli.model.unwrap_or_default();

    match cli.command {
        Commands::Health(args) => args.run(&*gateway).await,
        Commands::Models => {
            print_models(model);
            Ok(())
        }
        Commands::Analyze(args) => args.run(gateway, model).await,
        Commands::Chat(args) => args.run(&*gateway, model).await,
        Commands::Upload(args) => args.run(&*gateway).await,
        Commands::Repo { subcommand } => subcommand.run(gateway, model).await,
    }
}
