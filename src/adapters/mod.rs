// Adapters layer: concrete storage backends for the data tables.

pub mod http;

use crate::config::cli::LocalStorage;
use crate::core::Storage;
use crate::utils::error::Result;
use crate::utils::validation::is_remote_location;
use self::http::HttpStorage;

/// 依資料位置選擇本地或 HTTP 存儲
#[derive(Debug, Clone)]
pub enum DataStorage {
    Local(LocalStorage),
    Http(HttpStorage),
}

impl DataStorage {
    pub fn for_location(location: &str) -> Result<Self> {
        if is_remote_location(location) {
            Ok(Self::Http(HttpStorage::new(location.trim())?))
        } else {
            Ok(Self::Local(LocalStorage::new(location.to_string())))
        }
    }
}

impl Storage for DataStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        match self {
            Self::Local(storage) => storage.read_file(path).await,
            Self::Http(storage) => storage.read_file(path).await,
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        match self {
            Self::Local(storage) => storage.write_file(path, data).await,
            Self::Http(storage) => storage.write_file(path, data).await,
        }
    }
}
