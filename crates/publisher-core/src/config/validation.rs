//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::{Config, MIN_LINE_LEN};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_versioning(config)?;
    validate_changelog(config)?;
    validate_notes(config)?;
    debug!("configuration validation passed");
    Ok(())
}

/// Validate the settings a full release run needs on top of [`validate_config`]
pub fn validate_for_release(config: &Config) -> Result<()> {
    validate_config(config)?;

    if config.repo.as_deref().map_or(true, |r| r.trim().is_empty()) {
        return Err(ConfigError::MissingField("repo".to_string()).into());
    }
    if config.repo_type.is_none() {
        return Err(ConfigError::MissingField("repo_type".to_string()).into());
    }

    Ok(())
}

fn validate_versioning(config: &Config) -> Result<()> {
    let valid_systems = ["auto", "semver", "incremental", "manual", ".net"];
    if !valid_systems.contains(&config.versioning.system.as_str()) {
        return Err(ConfigError::InvalidValue {
            field: "versioning.system".to_string(),
            message: format!("must be one of: {}", valid_systems.join(", ")),
        }
        .into());
    }

    if !config.versioning.tag_format.contains("{version}") {
        return Err(ConfigError::InvalidValue {
            field: "versioning.tag_format".to_string(),
            message: "must contain {version} placeholder".to_string(),
        }
        .into());
    }

    if let Some(id) = &config.versioning.prerelease_id {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::InvalidValue {
                field: "versioning.prerelease_id".to_string(),
                message: "must be a non-empty alphanumeric identifier".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    if config.changelog.file.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.file".to_string(),
            message: "changelog file path cannot be empty".to_string(),
        }
        .into());
    }

    if config.changelog.history_file.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.history_file".to_string(),
            message: "history file path cannot be empty".to_string(),
        }
        .into());
    }

    if config.changelog.line_len < MIN_LINE_LEN {
        return Err(ConfigError::InvalidValue {
            field: "changelog.line_len".to_string(),
            message: format!("must be at least {}", MIN_LINE_LEN),
        }
        .into());
    }

    for (i, entry) in config.changelog.commit_msg_map.iter().enumerate() {
        if entry.commit_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("changelog.commit_msg_map[{}].type", i),
                message: "type cannot be empty".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_notes(config: &Config) -> Result<()> {
    for (i, href) in config.notes.hrefs.iter().enumerate() {
        let Some((label, link)) = href.split_once('|') else {
            return Err(ConfigError::InvalidValue {
                field: format!("notes.hrefs[{}]", i),
                message: "must be in 'label|url' form".to_string(),
            }
            .into());
        };
        if label.trim().is_empty() || url::Url::parse(link.trim()).is_err() {
            return Err(ConfigError::InvalidValue {
                field: format!("notes.hrefs[{}]", i),
                message: format!("'{}' is not a valid label|url pair", href),
            }
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CommitTypeEntry;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_system() {
        let mut config = Config::default();
        config.versioning.system = "calendar".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_tag_format() {
        let mut config = Config::default();
        config.versioning.tag_format = "no-placeholder".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_changelog_path() {
        let mut config = Config::default();
        config.changelog.file = PathBuf::new();
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.code(), 102);
    }

    #[test]
    fn test_validate_empty_map_type() {
        let mut config = Config::default();
        config.changelog.commit_msg_map.push(CommitTypeEntry {
            commit_type: " ".to_string(),
            format_text: "Nothing".to_string(),
            version_bump: "none".to_string(),
            include: true,
            icon_cls: None,
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_hrefs() {
        let mut config = Config::default();
        config.notes.hrefs = vec!["Docs|https://docs.example.com".to_string()];
        assert!(validate_config(&config).is_ok());

        config.notes.hrefs = vec!["just a label".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_release_requires_repo() {
        let mut config = Config::default();
        let err = validate_for_release(&config).unwrap_err();
        assert_eq!(err.code(), 103);

        config.repo = Some("https://github.com/example/app".to_string());
        assert!(validate_for_release(&config).is_ok());

        config.repo_type = None;
        assert!(validate_for_release(&config).is_err());
    }
}
