use serde::{Deserialize, Serialize};
use std::io::ErrorKind;

pub trait ConfigSerializer<TConfig> {
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

pub trait ConfigContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, String>;
}

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Default)]
pub struct YamlConfigSerializer;

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to deserialize config: {}", e))
    }
}

pub struct FileContentConfigProvider {
    file_path: String,
}

impl FileContentConfigProvider {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self { file_path: file_path.into() }
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(self.file_path.as_str()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Failed to read config file {}: {}", self.file_path, err)),
        }
    }
}

/// In-memory provider, used when the config text does not come from disk.
pub struct StaticContentConfigProvider {
    content: Option<String>,
}

impl StaticContentConfigProvider {
    pub fn new(content: Option<String>) -> Self {
        Self { content }
    }
}

impl ConfigContentProvider for StaticContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        Ok(self.content.clone())
    }
}

pub struct ConfigManager<TConfigContentProvider, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
}

impl ConfigManager<FileContentConfigProvider, YamlConfigSerializer> {
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self::new(FileContentConfigProvider::new(file_path), YamlConfigSerializer)
    }
}

impl<TConfigContentProvider, TConfigSerializer> ConfigManager<TConfigContentProvider, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config_serializer,
            config_content_provider,
        }
    }

    /// Missing content yields `TConfig::default()`; present content must parse
    /// and validate.
    pub fn load<TConfig>(&self) -> Result<TConfig, String>
    where
        TConfig: for<'de> Deserialize<'de> + Serialize + Validate + Default,
        TConfigSerializer: ConfigSerializer<TConfig>,
    {
        let Some(content) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config: TConfig = self.config_serializer.deserialize(&content)?;
        config.validate().map_err(|e| format!("Config validation error: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct TestConfig {
        name: String,
        limit: u32,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                limit: 10,
            }
        }
    }

    impl Validate for TestConfig {
        fn validate(&self) -> Result<(), String> {
            if self.limit == 0 {
                return Err("limit must be positive".to_string());
            }
            Ok(())
        }
    }

    fn manager(content: Option<&str>) -> ConfigManager<StaticContentConfigProvider> {
        ConfigManager::new(
            StaticContentConfigProvider::new(content.map(str::to_string)),
            YamlConfigSerializer,
        )
    }

    #[test]
    fn test_missing_content_gives_default() {
        let config: TestConfig = manager(None).load().unwrap();

        assert_eq!(config, TestConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: TestConfig = manager(Some("limit: 3\n")).load().unwrap();

        assert_eq!(config.limit, 3);
        assert_eq!(config.name, "default");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result: Result<TestConfig, String> = manager(Some("limit: 0\n")).load();

        assert!(result.unwrap_err().contains("limit must be positive"));
    }

    #[test]
    fn test_unparsable_yaml_is_rejected() {
        let result: Result<TestConfig, String> = manager(Some("limit: [oops")).load();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_gives_default() {
        let config: TestConfig = ConfigManager::from_yaml_file("/nonexistent/omo/config.yaml")
            .load()
            .unwrap();

        assert_eq!(config, TestConfig::default());
    }
}
