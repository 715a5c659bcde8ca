use crate::core::Storage;
use crate::utils::error::{KgError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 從 http(s) 基底網址讀取資料表，只讀
#[derive(Debug, Clone)]
pub struct HttpStorage {
    base_url: Url,
    client: Client,
}

impl HttpStorage {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// timeout 為單一請求的上限
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        // 補上結尾斜線，join 才會接在目錄之後
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| KgError::InvalidConfigValueError {
            field: "data_dir".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        Ok(Self {
            base_url,
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| KgError::InvalidConfigValueError {
                field: "data file".to_string(),
                value: path.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Storage for HttpStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(path)?;
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("HTTP response status: {}", status);

        if !status.is_success() {
            return Err(KgError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn write_file(&self, path: &str, _data: &[u8]) -> Result<()> {
        Err(KgError::ConfigError {
            message: format!("cannot write {} to a remote data source", path),
        })
    }
}
