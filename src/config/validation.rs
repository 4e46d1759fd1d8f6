use crate::action::SearchKind;
use crate::config::types::{
    ActionConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig,
};
use crate::output::ReportFormat;
use crate::state::MaxDepth;
use crate::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    if let Some(filter) = &config.filter {
        validate_filter(filter)?;
    }
    validate_action_config(&config.action)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let start = Url::parse(config.start_address.trim()).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid start_address '{}': {}",
            config.start_address, e
        ))
    })?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "start_address '{}' must use http or https",
            config.start_address
        )));
    }

    if start.host().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start_address '{}' has no host",
            config.start_address
        )));
    }

    MaxDepth::try_from(config.max_depth).map_err(|e| ConfigError::Validation(e.to_string()))?;

    if config.max_workers < 1 || config.max_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 64, got {}",
            config.max_workers
        )));
    }

    if config.fetch_timeout < 1 || config.fetch_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout must be between 1 and 300 seconds, got {}",
            config.fetch_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the anchor attribute filter
fn validate_filter(filter: &BTreeMap<String, Vec<String>>) -> Result<(), ConfigError> {
    for name in filter.keys() {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "filter attribute names cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates the extraction action
fn validate_action_config(config: &ActionConfig) -> Result<(), ConfigError> {
    if config.term.is_empty() {
        return Err(ConfigError::Validation(
            "action term cannot be empty".to_string(),
        ));
    }

    if config.kind == SearchKind::Pattern {
        regex::Regex::new(&config.term).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid pattern '{}': {}", config.term, e))
        })?;
    }

    for tag in &config.tags {
        if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "tag '{}' must contain only ASCII letters, digits and hyphens",
                tag
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(report_path) = &config.report_path {
        if ReportFormat::from_path(Path::new(report_path)).is_none() {
            return Err(ConfigError::Validation(format!(
                "report_path '{}' must end in .json or .store",
                report_path
            )));
        }
    }

    if let Some(summary_path) = &config.summary_path {
        if summary_path.is_empty() {
            return Err(ConfigError::Validation(
                "summary_path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                start_address: "https://a.example/".to_string(),
                max_depth: 2,
                max_workers: 8,
                fetch_timeout: 10,
            },
            user_agent: UserAgentConfig {
                crawler_name: "TestCrawler".to_string(),
                crawler_version: "1.0".to_string(),
            },
            filter: None,
            action: ActionConfig {
                kind: SearchKind::Word,
                term: "rust".to_string(),
                case_sensitive: false,
                tags: vec![],
            },
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_valid_config()).is_ok());
    }

    #[test]
    fn test_invalid_start_address() {
        let mut config = create_valid_config();
        config.crawler.start_address = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_start_address() {
        let mut config = create_valid_config();
        config.crawler.start_address = "ftp://a.example/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_depth_below_sentinel() {
        let mut config = create_valid_config();
        config.crawler.max_depth = -2;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.max_depth = -1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_max_workers() {
        let mut config = create_valid_config();
        config.crawler.max_workers = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_workers = 65;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_fetch_timeout() {
        let mut config = create_valid_config();
        config.crawler.fetch_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_crawler_name() {
        let mut config = create_valid_config();
        config.user_agent.crawler_name = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_crawler_name_chars() {
        let mut config = create_valid_config();
        config.user_agent.crawler_name = "Test Crawler!".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_filter_attribute() {
        let mut config = create_valid_config();
        let mut filter = BTreeMap::new();
        filter.insert(" ".to_string(), vec!["x".to_string()]);
        config.filter = Some(filter);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_term() {
        let mut config = create_valid_config();
        config.action.term = String::new();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_pattern() {
        let mut config = create_valid_config();
        config.action.kind = SearchKind::Pattern;
        config.action.term = "([a-z]".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_word_term_not_compiled_as_pattern() {
        let mut config = create_valid_config();
        config.action.term = "([a-z]".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_tag() {
        let mut config = create_valid_config();
        config.action.tags = vec!["div.main".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_report_path_extension() {
        let mut config = create_valid_config();
        config.output.report_path = Some("report.txt".to_string());
        assert!(validate(&config).is_err());

        config.output.report_path = Some("report.store".to_string());
        assert!(validate(&config).is_ok());
    }
}
