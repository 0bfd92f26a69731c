use gnocco_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(config_path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        iterative = config.resolver.iterative,
        root_hints = %config.resolver.root_hints,
        max_jobs = config.handler.max_jobs,
        "Configuration loaded"
    );

    Ok(config)
}
