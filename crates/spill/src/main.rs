//! `spill` - clipboard broadcast relay CLI
//!
//! This binary runs either half of the relay: the clipboard monitor or the
//! collector server, plus configuration helpers.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use spill::cli::{Cli, Command, ConfigCommand};
use spill::{init_logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Monitor(cmd) => {
            cmd.apply(&mut config);
            config.validate().context("validating configuration")?;
            spill::monitor::run(&config).await?;
        }
        Command::Serve(cmd) => {
            cmd.apply(&mut config);
            config.validate().context("validating configuration")?;
            spill::server::run(&config).await?;
        }
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }

    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Monitor]");
                println!("  Server URL:       {}", config.monitor.server_url);
                println!("  User id:          {}", config.monitor.user_id);
                println!("  Poll interval:    {} ms", config.monitor.poll_interval_ms);
                println!("  Error backoff:    {} ms", config.monitor.error_backoff_ms);
                println!(
                    "  Request timeout:  {} s",
                    config.monitor.request_timeout_secs
                );
                println!("  Force polling:    {}", config.monitor.force_polling);
                println!();
                println!("[Server]");
                println!("  Listen:           {}:{}", config.server.host, config.server.port);
                println!("  Log directory:    {}", config.server.log_dir.display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
