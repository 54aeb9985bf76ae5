//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let shown = redacted(&ctx.config);
    if ctx.output.is_json() {
        ctx.output.json(&shown);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[provider]");
    ctx.output
        .kv("url", shown.provider.url.as_deref().unwrap_or("(not set)"));
    ctx.output.kv(
        "anon_key",
        shown.provider.anon_key.as_deref().unwrap_or("(not set)"),
    );
    ctx.output.kv(
        "service_key",
        shown.provider.service_key.as_deref().unwrap_or("(not set)"),
    );
    ctx.output
        .kv("timeout_secs", &shown.provider.timeout_secs.to_string());

    ctx.output.info("[shipping]");
    ctx.output.kv(
        "free_shipping_threshold",
        &shown.shipping.free_shipping_threshold,
    );
    ctx.output.kv("flat_fee", &shown.shipping.flat_fee);
    ctx.output.kv("currency", &shown.shipping.currency);

    ctx.output.info("[catalog]");
    ctx.output.kv("page_size", &shown.catalog.page_size.to_string());

    ctx.output.info("[logging]");
    ctx.output.kv("level", &shown.logging.level.to_string());
    ctx.output.kv("format", &format!("{:?}", shown.logging.format).to_lowercase());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("pixel.toml");

    if config_path.exists() && !force {
        if ctx.output.is_json() {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            ctx.output.warn("Kept the existing config");
            return Ok(());
        }
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.check();

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

/// Copy of the config with keys masked down to their last four characters.
fn redacted(config: &CliConfig) -> CliConfig {
    let mut shown = config.clone();
    shown.provider.anon_key = shown.provider.anon_key.as_deref().map(mask);
    shown.provider.service_key = shown.provider.service_key.as_deref().map(mask);
    shown
}

fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
