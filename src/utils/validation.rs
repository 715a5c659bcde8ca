use crate::utils::error::{KgError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 判斷位置字串是否為 http(s) 網址
pub fn is_remote_location(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(KgError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 資料目錄可以是本地路徑或 http(s) 網址
pub fn validate_location(field_name: &str, location: &str) -> Result<()> {
    if is_remote_location(location) {
        validate_url(field_name, location)
    } else {
        validate_path(field_name, location)
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_csv_file_name(field_name: &str, file: &str) -> Result<()> {
    validate_path(field_name, file)?;

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(()),
        Some(ext) => Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!("Unsupported file extension: {}. Allowed extensions: csv", ext),
        }),
        None => Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 不滿足任何比較，也要擋下
    if !(value >= min && value <= max) {
        return Err(KgError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("data.dir", "https://example.com/kg").is_ok());
        assert!(validate_url("data.dir", "http://example.com").is_ok());
        assert!(validate_url("data.dir", "").is_err());
        assert!(validate_url("data.dir", "invalid-url").is_err());
        assert!(validate_url("data.dir", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_location() {
        assert!(validate_location("data.dir", "./data").is_ok());
        assert!(validate_location("data.dir", "https://data.nasa.gov/kg").is_ok());
        assert!(validate_location("data.dir", "https://").is_err());
        assert!(validate_location("data.dir", "").is_err());
    }

    #[test]
    fn test_validate_csv_file_name() {
        assert!(validate_csv_file_name("data.nodes_file", "nasa_nodes.csv").is_ok());
        assert!(validate_csv_file_name("data.nodes_file", "NODES.CSV").is_ok());
        assert!(validate_csv_file_name("data.nodes_file", "nodes.graphml").is_err());
        assert!(validate_csv_file_name("data.nodes_file", "nodes").is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("threshold", 2.0, 0.0, 10.0).is_ok());
        assert!(validate_range("threshold", -1.0, 0.0, 10.0).is_err());
        assert!(validate_range("threshold", f64::NAN, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("top_entities", 5, 1).is_ok());
        assert!(validate_positive_number("top_entities", 0, 1).is_err());
    }
}
