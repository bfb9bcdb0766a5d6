//! Configuration management commands.

use std::collections::HashSet;
use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, DashConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    let currency = config.pricing.currency;

    ctx.output.info("[gateway]");
    ctx.output.kv("base_url", &config.gateway.base_url);
    ctx.output.kv("timeout_ms", &config.gateway.timeout_ms.to_string());
    ctx.output
        .kv("connect_timeout_ms", &config.gateway.connect_timeout_ms.to_string());

    ctx.output.info("[pricing]");
    ctx.output.kv("currency", currency.code());
    ctx.output
        .kv("platform_fee", &format!("{:?}", config.pricing.platform_fee));
    ctx.output.kv(
        "default_delivery_option",
        config.pricing.default_delivery_option.as_str(),
    );

    ctx.output.info("[store]");
    ctx.output.kv("namespace", &config.store.namespace);
    ctx.output
        .kv("serialize_mutations", &config.store.serialize_mutations.to_string());
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());

    ctx.output.info("Delivery options:");
    for option in &config.delivery_options {
        let availability = if option.is_available { "" } else { " (unavailable)" };
        ctx.output.list_item(&format!(
            "{} {} {}{}",
            option.id,
            option.name,
            option.price.display(currency),
            availability
        ));
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(&ctx.config);

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

/// Errors and warnings of a configuration.
fn check(config: &DashConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let base_url = &config.gateway.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(format!("gateway.base_url '{}' must be an http(s) URL", base_url));
    }
    if config.gateway.timeout_ms == 0 {
        errors.push("gateway.timeout_ms must be positive".to_string());
    }
    if config.gateway.connect_timeout_ms > config.gateway.timeout_ms {
        warnings.push("gateway.connect_timeout_ms exceeds gateway.timeout_ms".to_string());
    }

    if config.delivery_options.is_empty() {
        errors.push("delivery_options must not be empty".to_string());
    }
    let mut seen = HashSet::new();
    for (i, option) in config.delivery_options.iter().enumerate() {
        if !seen.insert(&option.id) {
            errors.push(format!("delivery_options[{}].id '{}' is duplicated", i, option.id));
        }
        if option.price.is_negative() {
            errors.push(format!("delivery_options[{}].price must not be negative", i));
        }
    }
    if !config.delivery_options.is_empty()
        && !config
            .delivery_options
            .iter()
            .any(|o| o.id == config.pricing.default_delivery_option)
    {
        warnings.push(format!(
            "pricing.default_delivery_option '{}' is not in delivery_options; the first option is used",
            config.pricing.default_delivery_option
        ));
    }

    if config.store.namespace.is_empty() {
        errors.push("store.namespace must not be empty".to_string());
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_commerce::DeliveryOptionId;

    #[test]
    fn test_default_config_is_clean() {
        let (errors, warnings) = check(&DashConfig::default());
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_check_reports_problems() {
        let mut config = DashConfig::default();
        config.gateway.base_url = "localhost".to_string();
        config.delivery_options.push(config.delivery_options[0].clone());
        config.pricing.default_delivery_option = DeliveryOptionId::new("drone");

        let (errors, warnings) = check(&config);
        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 1);
    }
}
