//! Config command - Manage the stored API key and generation settings.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{info, warn};

use forge_llm::{Credential, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

use super::{CliContext, CliError};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Store an API key (an empty value clears it)
    #[command(name = "set-key")]
    SetKey {
        /// The key to store
        key: String,
    },

    /// Remove the stored API key
    #[command(name = "clear-key")]
    ClearKey,

    /// Override the model used for generation
    #[command(name = "set-model")]
    SetModel {
        /// Model identifier, e.g. gemini-2.5-flash-preview-09-2025
        model: String,
    },

    /// Override the per-request timeout
    #[command(name = "set-timeout")]
    SetTimeout {
        /// Seconds to wait for the generation service
        seconds: u64,
    },

    /// Show the effective settings
    Show,
}

pub async fn execute(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let store = &ctx.store;

    match args.command {
        ConfigCommand::SetKey { key } => {
            store.set_api_key(&key).context("Failed to save settings")?;
            match Credential::new(key) {
                Some(credential) => {
                    if !credential.has_accepted_shape() {
                        warn!("Stored key does not look like a Gemini API key; builds will be refused");
                    }
                    println!("✅ API key saved ({})", credential.masked());
                }
                None => println!("✅ API key cleared"),
            }
        }
        ConfigCommand::ClearKey => {
            store.clear_api_key().context("Failed to save settings")?;
            println!("✅ API key cleared");
        }
        ConfigCommand::SetModel { model } => {
            let model = model.trim().to_string();
            if model.is_empty() {
                return Err(CliError::InvalidArgument("model cannot be empty".into()).into());
            }
            let mut settings = store.load().context("Failed to load settings")?;
            settings.model = Some(model.clone());
            store.save(&settings).context("Failed to save settings")?;
            println!("✅ Model set to {}", model);
        }
        ConfigCommand::SetTimeout { seconds } => {
            if seconds == 0 {
                return Err(CliError::InvalidArgument("timeout must be at least 1 second".into()).into());
            }
            let mut settings = store.load().context("Failed to load settings")?;
            settings.timeout_secs = Some(seconds);
            store.save(&settings).context("Failed to save settings")?;
            println!("✅ Timeout set to {}s", seconds);
        }
        ConfigCommand::Show => {
            let settings = store.load().context("Failed to load settings")?;
            info!("Reading settings from {}", store.path().display());

            let key = match ctx.credential(&settings) {
                Some(c) if c.has_accepted_shape() => c.masked(),
                Some(c) => format!("{} (unrecognized format)", c.masked()),
                None => "(not set)".to_string(),
            };

            println!("📁 Settings: {}", store.path().display());
            println!("   API key: {}", key);
            println!(
                "   Model:   {}",
                settings.model.as_deref().unwrap_or(DEFAULT_MODEL)
            );
            println!(
                "   Timeout: {}s",
                settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(command: ConfigCommand) -> ConfigArgs {
        ConfigArgs { command }
    }

    #[tokio::test]
    async fn test_set_and_clear_key() {
        let dir = tempdir().unwrap();
        let ctx = CliContext::new(dir.path().to_path_buf(), None, true);

        execute(args(ConfigCommand::SetKey { key: "AIzaSyStored".into() }), &ctx)
            .await
            .unwrap();
        let settings = ctx.store.load().unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("AIzaSyStored"));

        execute(args(ConfigCommand::ClearKey), &ctx).await.unwrap();
        assert!(ctx.store.load().unwrap().api_key.is_none());
    }

    #[tokio::test]
    async fn test_empty_key_clears() {
        let dir = tempdir().unwrap();
        let ctx = CliContext::new(dir.path().to_path_buf(), None, true);
        ctx.store.set_api_key("AIzaSyStored").unwrap();

        execute(args(ConfigCommand::SetKey { key: "".into() }), &ctx)
            .await
            .unwrap();
        assert!(ctx.store.load().unwrap().api_key.is_none());
    }

    #[tokio::test]
    async fn test_model_and_timeout_overrides() {
        let dir = tempdir().unwrap();
        let ctx = CliContext::new(dir.path().to_path_buf(), None, true);

        execute(args(ConfigCommand::SetModel { model: "gemini-test".into() }), &ctx)
            .await
            .unwrap();
        execute(args(ConfigCommand::SetTimeout { seconds: 10 }), &ctx)
            .await
            .unwrap();

        let config = ctx.store.load().unwrap().generation_config();
        assert_eq!(config.model, "gemini-test");
        assert_eq!(config.timeout_secs, 10);

        assert!(execute(args(ConfigCommand::SetTimeout { seconds: 0 }), &ctx)
            .await
            .is_err());
    }
}
