//! Runtime settings.
//!
//! Layering, later wins: built-in defaults, an optional TOML file, then
//! environment variables. The static gene/drug tables are not configurable;
//! see [`crate::catalog`].

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{PgxError, Result};

/// Remote text-generation endpoint used for narrative explanations
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    /// Without a key the template explanation is always used
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            temperature: 0.4,
            max_tokens: 300,
        }
    }
}

impl LlmSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Input file limits
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Limits {
    pub max_vcf_size_mb: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_vcf_size_mb: 50,
            allowed_extensions: vec![".vcf".to_string(), ".vcf.gz".to_string()],
        }
    }
}

impl Limits {
    pub fn max_vcf_size_bytes(&self) -> u64 {
        self.max_vcf_size_mb * 1024 * 1024
    }

    /// Reject files by name and size before they reach the reader
    pub fn validate_file(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if !self
            .allowed_extensions
            .iter()
            .any(|ext| name.ends_with(&ext.to_lowercase()))
        {
            return Err(PgxError::file_validation(format!(
                "unsupported file type '{}'; allowed: {}",
                name,
                self.allowed_extensions.join(", ")
            )));
        }

        let size = fs::metadata(path)?.len();
        if size == 0 {
            return Err(PgxError::file_validation("VCF file is empty"));
        }
        if size > self.max_vcf_size_bytes() {
            return Err(PgxError::file_validation(format!(
                "VCF file exceeds maximum allowed size of {} MB",
                self.max_vcf_size_mb
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub limits: Limits,
}

impl Settings {
    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            PgxError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PgxError::config(e.to_string()))
    }

    /// Override from environment-style lookups. Takes a lookup function so
    /// tests need not touch the real environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(timeout) = lookup("LLM_TIMEOUT_SECONDS") {
            self.llm.timeout_secs = parse_env("LLM_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Some(size) = lookup("MAX_VCF_SIZE_MB") {
            self.limits.max_vcf_size_mb = parse_env("MAX_VCF_SIZE_MB", &size)?;
        }
        debug!(
            "Settings: model={} base_url={} api_key_set={}",
            self.llm.model,
            self.llm.base_url,
            self.llm.has_api_key()
        );
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PgxError::config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.llm.timeout_secs, 30);
        assert!(!settings.llm.has_api_key());
        assert_eq!(settings.limits.max_vcf_size_bytes(), 50 * 1024 * 1024);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [llm]
            model = "local-model"

            [limits]
            max_vcf_size_mb = 5
            "#,
        )
        .unwrap();
        assert_eq!(settings.llm.model, "local-model");
        assert_eq!(settings.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.limits.max_vcf_size_mb, 5);
        assert_eq!(settings.limits.allowed_extensions.len(), 2);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(
            Settings::from_toml("[llm\nmodel="),
            Err(PgxError::Config { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_TIMEOUT_SECONDS", "5"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert!(settings.llm.has_api_key());
        assert_eq!(settings.llm.timeout_secs, 5);

        let result = settings.apply_env(|key| (key == "MAX_VCF_SIZE_MB").then(|| "lots".to_string()));
        assert!(matches!(result, Err(PgxError::Config { .. })));
    }

    #[test]
    fn test_validate_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let limits = Limits::default();

        let good = dir.path().join("patient.vcf");
        writeln!(std::fs::File::create(&good)?, "##fileformat=VCFv4.2")?;
        limits.validate_file(&good)?;

        let wrong_ext = dir.path().join("patient.txt");
        writeln!(std::fs::File::create(&wrong_ext)?, "##fileformat=VCFv4.2")?;
        assert!(matches!(
            limits.validate_file(&wrong_ext),
            Err(PgxError::FileValidation { .. })
        ));

        let empty = dir.path().join("empty.vcf");
        std::fs::File::create(&empty)?;
        assert!(matches!(
            limits.validate_file(&empty),
            Err(PgxError::FileValidation { .. })
        ));
        Ok(())
    }
}
