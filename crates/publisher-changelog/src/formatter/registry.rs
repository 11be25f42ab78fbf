//! Formatter registry

use std::sync::Arc;

use publisher_core::config::{ChangelogConfig, ChangelogFormat};

use super::{ChangelogFormatter, MarkdownFormatter, TextFormatter};

/// Registry of available changelog formatters
pub struct FormatterRegistry {
    formatters: Vec<Arc<dyn ChangelogFormatter>>,
}

impl FormatterRegistry {
    /// Create a registry with both built-in formatters
    pub fn new(config: &ChangelogConfig) -> Self {
        Self {
            formatters: vec![
                Arc::new(MarkdownFormatter::new(config)),
                Arc::new(TextFormatter::new(config)),
            ],
        }
    }

    /// Get the formatter writing a format
    pub fn get(&self, format: ChangelogFormat) -> Option<Arc<dyn ChangelogFormatter>> {
        self.formatters
            .iter()
            .find(|f| f.format() == format)
            .cloned()
    }

    /// Get formatter by name
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn ChangelogFormatter>> {
        self.formatters.iter().find(|f| f.name() == name).cloned()
    }

    /// Formatter for the configured format
    pub fn for_format(config: &ChangelogConfig) -> Arc<dyn ChangelogFormatter> {
        match config.format {
            ChangelogFormat::Markdown => Arc::new(MarkdownFormatter::new(config)),
            ChangelogFormat::Text => Arc::new(TextFormatter::new(config)),
        }
    }

    /// Names of all registered formatters
    pub fn names(&self) -> Vec<&'static str> {
        self.formatters.iter().map(|f| f.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_both_formats() {
        let registry = FormatterRegistry::new(&ChangelogConfig::default());
        assert_eq!(registry.names(), vec!["markdown", "text"]);
        assert_eq!(
            registry.get(ChangelogFormat::Text).unwrap().name(),
            "text"
        );
        assert!(registry.by_name("html").is_none());
    }

    #[test]
    fn test_for_format_follows_config() {
        let mut config = ChangelogConfig::default();
        assert_eq!(FormatterRegistry::for_format(&config).name(), "markdown");
        config.format = ChangelogFormat::Text;
        assert_eq!(
            FormatterRegistry::for_format(&config).format(),
            ChangelogFormat::Text
        );
    }
}
