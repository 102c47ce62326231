use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use formcheck_core::error::CoreError;
use formcheck_core::form::FormStructure;
use formcheck_core::rules::RuleBook;

use crate::error::{AppError, AppResult};
use crate::navigation::ScrollOffset;

/// Timing of the scroll-then-focus choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationConfig {
    pub scroll_duration: Duration,
    pub scroll_offset: ScrollOffset,
    /// Measured from the start of the scroll.
    pub focus_delay: Duration,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_duration: Duration::from_millis(200),
            scroll_offset: ScrollOffset { x: 0, y: -100 },
            focus_delay: Duration::from_millis(300),
        }
    }
}

impl NavigationConfig {
    /// Focus must not be scheduled before the scroll has finished.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.focus_delay < self.scroll_duration {
            tracing::error!(
                focus_delay_ms = self.focus_delay.as_millis() as u64,
                scroll_duration_ms = self.scroll_duration.as_millis() as u64,
                "Focus delay shorter than scroll duration",
            );
            return Err(CoreError::Configuration(format!(
                "FOCUS_DELAY_MS ({}) must not be shorter than SCROLL_DURATION_MS ({})",
                self.focus_delay.as_millis(),
                self.scroll_duration.as_millis()
            )));
        }
        Ok(())
    }
}

/// Application configuration loaded from environment variables.
///
/// All fields have defaults suitable for running from the repository root.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub form_definition_path: PathBuf,
    /// `None` selects [`RuleBook::builtin`].
    pub rule_groups_path: Option<PathBuf>,
    pub data_root: PathBuf,
    /// Record to load, relative to `data_root`.
    pub record_path: String,
    pub navigation: NavigationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default             |
    /// |------------------------|---------------------|
    /// | `FORM_DEFINITION_PATH` | `config/form.json`  |
    /// | `RULE_GROUPS_PATH`     | *(built-in groups)* |
    /// | `DATA_ROOT`            | `data`              |
    /// | `RECORD_PATH`          | `customer.json`     |
    /// | `SCROLL_DURATION_MS`   | `200`               |
    /// | `SCROLL_OFFSET_Y`      | `-100`              |
    /// | `FOCUS_DELAY_MS`       | `300`               |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = NavigationConfig::default();

        let form_definition_path: PathBuf = lookup("FORM_DEFINITION_PATH")
            .unwrap_or_else(|| "config/form.json".into())
            .into();
        let rule_groups_path = lookup("RULE_GROUPS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let data_root: PathBuf = lookup("DATA_ROOT").unwrap_or_else(|| "data".into()).into();
        let record_path = lookup("RECORD_PATH").unwrap_or_else(|| "customer.json".into());

        let scroll_ms: u64 = parse_var(&lookup, "SCROLL_DURATION_MS")?
            .unwrap_or(defaults.scroll_duration.as_millis() as u64);
        let offset_y: i32 =
            parse_var(&lookup, "SCROLL_OFFSET_Y")?.unwrap_or(defaults.scroll_offset.y);
        let focus_ms: u64 = parse_var(&lookup, "FOCUS_DELAY_MS")?
            .unwrap_or(defaults.focus_delay.as_millis() as u64);

        let navigation = NavigationConfig {
            scroll_duration: Duration::from_millis(scroll_ms),
            scroll_offset: ScrollOffset { x: 0, y: offset_y },
            focus_delay: Duration::from_millis(focus_ms),
        };
        navigation.validate()?;

        Ok(Self {
            form_definition_path,
            rule_groups_path,
            data_root,
            record_path,
            navigation,
        })
    }

    pub async fn load_rule_book(&self) -> AppResult<RuleBook> {
        let Some(path) = &self.rule_groups_path else {
            tracing::info!("Using built-in rule groups");
            return Ok(RuleBook::builtin());
        };
        let json = read_file(path).await?;
        let rules = RuleBook::from_json(&json)?;
        tracing::info!(path = %path.display(), groups = rules.len(), "Rule groups loaded");
        Ok(rules)
    }

    pub async fn load_form(&self, rules: &RuleBook) -> AppResult<FormStructure> {
        let json = read_file(&self.form_definition_path).await?;
        Ok(FormStructure::from_json(&json, rules)?)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, CoreError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Configuration(format!("{name} must be a number, got '{raw}'"))),
    }
}

async fn read_file(path: &Path) -> AppResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AppError::Io {
            path: path.display().to_string(),
            source,
        })
}
