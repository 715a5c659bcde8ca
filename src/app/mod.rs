pub mod commands;
pub mod render;

use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// 解析配置、載入圖譜、執行子命令，回傳要輸出的文字
pub async fn run(cli: &CliConfig) -> Result<String> {
    match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = TomlConfig::from_file(path)?;
            config.apply_cli_overrides(cli);
            config.validate()?;
            cli.command.validate()?;
            let monitor = config.monitoring_enabled();
            run_with(&config, cli, monitor).await
        }
        None => {
            cli.validate()?;
            run_with(cli, cli, cli.monitor).await
        }
    }
}

async fn run_with<C: ConfigProvider + Clone>(
    config: &C,
    cli: &CliConfig,
    monitor: bool,
) -> Result<String> {
    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }
    let graph = commands::load_graph(config, monitor).await?;
    let output = commands::execute(config, &cli.command, &graph).await?;
    render::render(&output, cli.format)
}
