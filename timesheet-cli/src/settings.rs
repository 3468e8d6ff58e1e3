use std::path::{Path, PathBuf};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use time::{Date, UtcOffset};
use timesheet_core::{
    MonthError, RowComments, TargetMonth, TimesheetConfig, DEFAULT_DATE_FORMAT,
    DEFAULT_REVIEW_PLACEHOLDER,
};

const DEFAULT_CONFIG_PATH: &str = "config/base.toml";

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub git: GitSettings,
    #[serde(default)]
    pub github: GithubSettings,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ReportSettings {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub target_hours: f64,
    /// Maximum deviation from `target_hours`, in either direction.
    pub variation: f64,
    pub date_format: String,
    pub commit_comment: String,
    pub review_comment: String,
    pub review_placeholder: String,
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        let comments = RowComments::default();
        Self {
            year: None,
            month: None,
            target_hours: 160.0,
            variation: 8.0,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            commit_comment: comments.commit,
            review_comment: comments.review,
            review_placeholder: DEFAULT_REVIEW_PLACEHOLDER.to_string(),
            output_dir: PathBuf::from("."),
            file_prefix: "timesheet".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GitSettings {
    /// Author names (or emails, see `match_email`) counted as the user's commits.
    pub authors: Vec<String>,
    pub skip_merges: bool,
    pub projects: Vec<ProjectSettings>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            authors: Vec::new(),
            skip_merges: true,
            projects: Vec::new(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ProjectSettings {
    pub name: String,
    pub path: PathBuf,
    /// Match authors by email instead of name.
    #[serde(default)]
    pub match_email: bool,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GithubSettings {
    pub api_url: String,
    pub token: Option<String>,
    /// Login whose reviews are reported.
    pub reviewer: Option<String>,
    /// `owner/name` entries.
    pub repositories: Vec<String>,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_url: github::DEFAULT_API_URL.to_string(),
            token: None,
            reviewer: None,
            repositories: Vec::new(),
        }
    }
}

impl GithubSettings {
    pub fn is_enabled(&self) -> bool {
        self.reviewer.is_some() && !self.repositories.is_empty()
    }
}

impl Settings {
    /// Picks the month to report. Flags win over the settings file; without a
    /// month the previous calendar month is used.
    pub fn resolve_month(
        &self,
        year: Option<i32>,
        month: Option<u8>,
        today: Date,
    ) -> Result<TargetMonth, MonthError> {
        match (year.or(self.report.year), month.or(self.report.month)) {
            (Some(year), Some(month)) => TargetMonth::new(year, month),
            (None, Some(month)) => TargetMonth::new(today.year(), month),
            (_, None) => TargetMonth::containing(today)?.previous(),
        }
    }

    pub fn timesheet_config(&self, month: TargetMonth, offset: Option<UtcOffset>) -> TimesheetConfig {
        TimesheetConfig {
            month,
            allowed_authors: self.git.authors.iter().cloned().collect(),
            reviewer: self.github.reviewer.clone(),
            target_hours: self.report.target_hours,
            variation: self.report.variation,
            comments: RowComments {
                commit: self.report.commit_comment.clone(),
                review: self.report.review_comment.clone(),
            },
            review_placeholder: self.report.review_placeholder.clone(),
            offset,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let report = &self.report;
        if !report.target_hours.is_finite() || report.target_hours <= 0.0 {
            return Err(ConfigError::Message(format!(
                "report.target_hours must be positive, got {}",
                report.target_hours
            )));
        }
        if !(report.variation >= 0.0 && report.variation < report.target_hours) {
            return Err(ConfigError::Message(format!(
                "report.variation must be at least 0 and below report.target_hours ({}), got {}",
                report.target_hours, report.variation
            )));
        }
        if self.github.reviewer.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(ConfigError::Message(
                "github.reviewer must not be blank, leave it out to skip reviews".to_string(),
            ));
        }
        if let Some(project) = self.git.projects.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::Message(format!(
                "git project at {} has no name",
                project.path.display()
            )));
        }

        Ok(())
    }
}

/// Settings file (explicit or `config/base.toml`), then `TIMESHEET_*`
/// environment variables, e.g. `TIMESHEET_GITHUB__TOKEN`.
pub fn read_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path),
        None => config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
    };

    load(
        config::Config::builder()
            .add_source(file)
            .add_source(environment()),
    )
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("TIMESHEET")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("git.authors")
        .with_list_parse_key("github.repositories")
        .try_parsing(true)
}

fn load(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use config::{File, FileFormat};
    use time::macros::date;

    use super::*;

    const TOML: &str = r#"
        [report]
        target_hours = 150
        variation = 5.5
        commit_comment = "Utveckling"

        [git]
        authors = ["Alice", "alice@example.com"]

        [[git.projects]]
        name = "toki"
        path = "~/code/toki2"

        [[git.projects]]
        name = "milltime"
        path = "/srv/milltime"
        match_email = true

        [github]
        reviewer = "alice"
        repositories = ["ponbac/toki2"]
    "#;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        load(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_reads_settings_file() {
        let settings = from_toml(TOML).unwrap();

        assert_eq!(settings.report.target_hours, 150.0);
        assert_eq!(settings.report.variation, 5.5);
        assert_eq!(settings.report.commit_comment, "Utveckling");
        assert_eq!(settings.report.review_comment, "Code review");
        assert_eq!(settings.git.authors, vec!["Alice", "alice@example.com"]);
        assert!(settings.git.skip_merges);
        assert_eq!(settings.git.projects.len(), 2);
        assert!(settings.git.projects[1].match_email);
        assert_eq!(settings.github.api_url, "https://api.github.com");
        assert!(settings.github.is_enabled());
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = from_toml("").unwrap();

        assert_eq!(settings.report.target_hours, 160.0);
        assert_eq!(settings.report.date_format, DEFAULT_DATE_FORMAT);
        assert!(settings.git.projects.is_empty());
        assert!(!settings.github.is_enabled());
    }

    #[test]
    fn test_environment_overrides_file() {
        let env = config::Map::from([
            ("TIMESHEET_GITHUB__TOKEN".to_string(), "s3cret".to_string()),
            ("TIMESHEET_REPORT__TARGET_HOURS".to_string(), "120".to_string()),
            (
                "TIMESHEET_GITHUB__REPOSITORIES".to_string(),
                "ponbac/toki2,ponbac/milltime".to_string(),
            ),
        ]);

        let settings = load(
            config::Config::builder()
                .add_source(File::from_str(TOML, FileFormat::Toml))
                .add_source(environment().source(Some(env))),
        )
        .unwrap();

        assert_eq!(settings.github.token.as_deref(), Some("s3cret"));
        assert_eq!(settings.report.target_hours, 120.0);
        assert_eq!(
            settings.github.repositories,
            vec!["ponbac/toki2", "ponbac/milltime"]
        );
    }

    #[test]
    fn test_variation_must_stay_below_target() {
        let result = from_toml(
            r#"
            [report]
            target_hours = 10
            variation = 10
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Message(_))));
    }

    #[test]
    fn test_target_must_be_positive() {
        let result = from_toml(
            r#"
            [report]
            target_hours = 0
            variation = 0
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Message(_))));
    }

    #[test]
    fn test_blank_reviewer_is_rejected() {
        for reviewer in ["\"\"", "\"   \""] {
            let result = from_toml(&format!("[github]\nreviewer = {reviewer}\n"));

            assert!(matches!(result, Err(ConfigError::Message(_))));
        }
    }

    #[test]
    fn test_resolve_month() {
        let settings = Settings::default();
        let today = date!(2024 - 01 - 15);

        assert_eq!(
            settings.resolve_month(None, None, today).unwrap(),
            TargetMonth::new(2023, 12).unwrap()
        );
        assert_eq!(
            settings.resolve_month(None, Some(3), today).unwrap(),
            TargetMonth::new(2024, 3).unwrap()
        );
        assert_eq!(
            settings.resolve_month(Some(2022), Some(7), today).unwrap(),
            TargetMonth::new(2022, 7).unwrap()
        );

        let pinned = Settings {
            report: ReportSettings {
                year: Some(2021),
                month: Some(5),
                ..ReportSettings::default()
            },
            ..Settings::default()
        };
        assert_eq!(
            pinned.resolve_month(None, Some(6), today).unwrap(),
            TargetMonth::new(2021, 6).unwrap()
        );
    }

    #[test]
    fn test_timesheet_config() {
        let settings = from_toml(TOML).unwrap();
        let month = TargetMonth::new(2024, 3).unwrap();

        let config = settings.timesheet_config(month, Some(UtcOffset::UTC));

        assert!(config.allowed_authors.contains("alice@example.com"));
        assert_eq!(config.reviewer.as_deref(), Some("alice"));
        assert_eq!(config.comments.commit, "Utveckling");
        assert_eq!(config.target_hours, 150.0);
        assert_eq!(config.offset, Some(UtcOffset::UTC));
    }
}
