//! Default configuration values

use super::types::Config;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = ".publishrc.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = ".publishrc.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".publishrc.yml",
        "publisher.toml",
        "publisher.yaml",
    ]
}

/// Serialize the default configuration as TOML
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# publisher configuration

# project_name = "my-app"
repo = ""
repo_type = "git"

[versioning]
# auto | semver | incremental | manual | .net
system = "auto"
tag_format = "v{version}"
# prerelease_id = "beta"
patch_on_undetermined = false

[git]
remote = "origin"
push_tags = false
tag_message = "chore(release): {version}"

[changelog]
# markdown | text
format = "markdown"
file = "CHANGELOG.md"
history_file = "history.txt"
version_text = "Version"
line_len = 80

# [[changelog.commit_msg_map]]
# type = "ui"
# formatText = "User Interface"
# versionBump = "patch"
# include = true

[tasks]
changelog_print = false
changelog_view = false
dry_run = false

[notes]
# dist_release_path = "\\\\server\\share\\releases"
# npm_registry = "https://registry.npmjs.org"
# mantisbt_url = "https://mantis.example.com"
hrefs = []
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.changelog.line_len, 80);
        assert_eq!(config.versioning.tag_format, "v{version}");
    }

    #[test]
    fn test_default_config_round_trips() {
        let rendered = default_config_toml();
        let config: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(config.changelog.version_text, "Version");
    }
}
