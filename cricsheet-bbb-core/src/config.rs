use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_MATCH_TYPE: &str = "test";
pub const DEFAULT_OUTPUT_PATH: &str = "ind_eng_2025_tests_balls.csv";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("exactly two teams are required, got {0}")]
    TeamCount(usize),
    #[error("team names must not be empty")]
    EmptyTeamName,
    #[error("the two teams must differ, got {0:?} twice")]
    DuplicateTeams(String),
    #[error("date window start {start} is after end {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
    #[error("match type must not be empty")]
    EmptyMatchType,
}

/// Closed, inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateWindow {
    /// The 2025 England v India Test series.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap_or_default(),
        }
    }
}

/// Which matches belong to the target dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesConfig {
    teams: [String; 2],
    window: DateWindow,
    match_type: String,
    /// Stop scanning the archive once this many matches were accepted.
    expected_matches: Option<usize>,
}

impl SeriesConfig {
    pub fn new(
        teams: Vec<String>,
        window: DateWindow,
        match_type: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let teams: [String; 2] = teams
            .try_into()
            .map_err(|t: Vec<String>| ConfigError::TeamCount(t.len()))?;
        if teams.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::EmptyTeamName);
        }
        if teams[0] == teams[1] {
            return Err(ConfigError::DuplicateTeams(teams[0].clone()));
        }
        let match_type = match_type.into();
        if match_type.trim().is_empty() {
            return Err(ConfigError::EmptyMatchType);
        }
        Ok(Self {
            teams,
            window,
            match_type,
            expected_matches: None,
        })
    }

    pub fn with_expected_matches(mut self, expected: Option<usize>) -> Self {
        self.expected_matches = expected;
        self
    }

    pub fn teams(&self) -> &[String; 2] {
        &self.teams
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn match_type(&self) -> &str {
        &self.match_type
    }

    pub fn expected_matches(&self) -> Option<usize> {
        self.expected_matches
    }

    pub fn trace_loaded(&self) {
        info!(
            team_a = %self.teams[0],
            team_b = %self.teams[1],
            start = %self.window.start,
            end = %self.window.end,
            match_type = %self.match_type,
            expected_matches = ?self.expected_matches,
            "Loaded series filter"
        );
        debug!(?self, "Series filter loaded (full debug)");
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            teams: ["India".to_string(), "England".to_string()],
            window: DateWindow::default(),
            match_type: DEFAULT_MATCH_TYPE.to_string(),
            expected_matches: None,
        }
    }
}

/// Everything the pipeline needs apart from the archive source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub series: SeriesConfig,
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            series: SeriesConfig::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}
