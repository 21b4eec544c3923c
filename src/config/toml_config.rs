use crate::utils::error::{Result, TarotError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_seconds: 60,
        }
    }
}

impl OpenAiConfig {
    /// The configured key, or `OPENAI_API_KEY` when the file leaves it unset
    /// or holds an unresolved `${...}` placeholder.
    pub fn resolved_api_key(&self) -> Result<String> {
        match &self.api_key {
            Some(key) if !key.trim().is_empty() && !key.starts_with("${") => Ok(key.clone()),
            _ => std::env::var(API_KEY_ENV).map_err(|_| TarotError::MissingConfigError {
                field: format!("openai.api_key (or {})", API_KEY_ENV),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between highlighting a card and committing it.
    pub confirm_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            confirm_delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
    pub verbose: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TarotError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TarotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("openai.base_url", &self.openai.base_url)?;
        validation::validate_non_empty_string("openai.model", &self.openai.model)?;
        validation::validate_positive_number("openai.max_tokens", self.openai.max_tokens as usize, 1)?;
        validation::validate_range("openai.temperature", self.openai.temperature, 0.0, 2.0)?;
        validation::validate_positive_number(
            "openai.timeout_seconds",
            self.openai.timeout_seconds as usize,
            1,
        )?;
        validation::validate_path("storage.path", &self.storage.path)?;
        validation::validate_range("session.confirm_delay_ms", self.session.confirm_delay_ms, 0, 10_000)?;
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.max_tokens, 1000);
        assert_eq!(config.storage.path, "./data");
        assert_eq!(config.session.confirm_delay_ms, 200);
        assert!(!config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_content = r#"
[openai]
base_url = "http://localhost:9000/v1"
temperature = 0.3

[storage]
path = "/var/lib/sol-tarot"

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.openai.base_url, "http://localhost:9000/v1");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert!((config.openai.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.storage.path, "/var/lib/sol-tarot");
        assert!(config.logging.json);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SOL_TAROT_TEST_MODEL", "gpt-4o");

        let toml_content = r#"
[openai]
model = "${SOL_TAROT_TEST_MODEL}"
api_key = "${SOL_TAROT_TEST_UNSET_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(
            config.openai.api_key.as_deref(),
            Some("${SOL_TAROT_TEST_UNSET_KEY}")
        );

        std::env::remove_var("SOL_TAROT_TEST_MODEL");
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = TomlConfig::from_toml_str("[openai]\napi_key = \"sk-test\"\n").unwrap();
        assert_eq!(config.openai.resolved_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[openai]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[openai]\ntemperature = 3.5\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[storage]\npath = \"\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[openai\nmodel = 1").unwrap_err();
        assert!(matches!(err, TarotError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[session]\nconfirm_delay_ms = 0\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.session.confirm_delay_ms, 0);
    }
}
