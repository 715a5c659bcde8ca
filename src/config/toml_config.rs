use super::{DEFAULT_EDGES_FILE, DEFAULT_NODES_FILE, DEFAULT_OUTPUT_PATH};
use crate::core::ConfigProvider;
use crate::domain::model::AnalysisSettings;
use crate::utils::error::{KgError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub data: DataConfig,
    pub analysis: Option<AnalysisConfig>,
    pub output: Option<OutputConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub dir: String,
    pub nodes_file: Option<String>,
    pub edges_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub top_entities: Option<usize>,
    pub pagerank_top: Option<usize>,
    pub high_confidence_threshold: Option<f64>,
    pub pagerank_alpha: Option<f64>,
    pub pagerank_max_iter: Option<usize>,
    pub pagerank_tol: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(KgError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| KgError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NASA_KG_DATA})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 命令列明確給定的值覆蓋檔案設定
    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &super::CliConfig) {
        if let Some(dir) = &cli.data_dir {
            self.data.dir = dir.clone();
        }
        if let Some(nodes_file) = &cli.nodes_file {
            self.data.nodes_file = Some(nodes_file.clone());
        }
        if let Some(edges_file) = &cli.edges_file {
            self.data.edges_file = Some(edges_file.clone());
        }
        if let Some(path) = &cli.output_path {
            self.output = Some(OutputConfig { path: path.clone() });
        }
        if cli.monitor {
            self.monitoring = Some(MonitoringConfig { enabled: true });
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_location("data.dir", &self.data.dir)?;
        validation::validate_csv_file_name("data.nodes_file", self.nodes_file())?;
        validation::validate_csv_file_name("data.edges_file", self.edges_file())?;
        validation::validate_path("output.path", self.output_path())?;

        // ${VAR} 沒被替換代表環境變數缺失
        if self.data.dir.contains("${") {
            return Err(KgError::MissingConfigError {
                field: format!("environment variable in data.dir ({})", self.data.dir),
            });
        }

        let analysis = self.analysis();
        validation::validate_positive_number("analysis.top_entities", analysis.top_entities, 1)?;
        validation::validate_positive_number("analysis.pagerank_top", analysis.pagerank_top, 1)?;
        validation::validate_positive_number(
            "analysis.pagerank_max_iter",
            analysis.pagerank_max_iter,
            1,
        )?;
        validation::validate_range(
            "analysis.high_confidence_threshold",
            analysis.high_confidence_threshold,
            0.0,
            1.0e9,
        )?;
        validation::validate_range("analysis.pagerank_alpha", analysis.pagerank_alpha, 0.0, 1.0)?;
        validation::validate_range("analysis.pagerank_tol", analysis.pagerank_tol, 1.0e-15, 1.0)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.data.dir
    }

    fn nodes_file(&self) -> &str {
        self.data.nodes_file.as_deref().unwrap_or(DEFAULT_NODES_FILE)
    }

    fn edges_file(&self) -> &str {
        self.data.edges_file.as_deref().unwrap_or(DEFAULT_EDGES_FILE)
    }

    fn output_path(&self) -> &str {
        self.output
            .as_ref()
            .map(|o| o.path.as_str())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn analysis(&self) -> AnalysisSettings {
        let defaults = AnalysisSettings::default();
        let Some(cfg) = &self.analysis else {
            return defaults;
        };
        AnalysisSettings {
            top_entities: cfg.top_entities.unwrap_or(defaults.top_entities),
            pagerank_top: cfg.pagerank_top.unwrap_or(defaults.pagerank_top),
            high_confidence_threshold: cfg
                .high_confidence_threshold
                .unwrap_or(defaults.high_confidence_threshold),
            pagerank_alpha: cfg.pagerank_alpha.unwrap_or(defaults.pagerank_alpha),
            pagerank_max_iter: cfg.pagerank_max_iter.unwrap_or(defaults.pagerank_max_iter),
            pagerank_tol: cfg.pagerank_tol.unwrap_or(defaults.pagerank_tol),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
