use std::fmt;

use crate::survey::SurveyError;

/// Machine-readable error codes for scripts and agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputNotFound,
    InputParseError,
    SurveyNotFound,
    DuplicateSurvey,
    InvalidSurvey,
    InvalidAnswer,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InputNotFound => "E2001",
            Self::InputParseError => "E2002",
            Self::SurveyNotFound => "E3001",
            Self::DuplicateSurvey => "E3002",
            Self::InvalidSurvey => "E3003",
            Self::InvalidAnswer => "E3004",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputNotFound => "Input file not found",
            Self::InputParseError => "Input is not valid JSON for this command",
            Self::SurveyNotFound => "Survey form not found",
            Self::DuplicateSurvey => "Survey form already exists",
            Self::InvalidSurvey => "Survey form is invalid",
            Self::InvalidAnswer => "Survey answer is invalid",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .coursetree/config.toml and retry."),
            Self::InputNotFound => Some("Check the path, or pass `-` to read from stdin."),
            Self::InputParseError => {
                Some("Run with --json on a known-good file to see the expected shape.")
            }
            Self::SurveyNotFound => Some("Create the survey form before saving answers."),
            Self::DuplicateSurvey => Some("Pick another name or update the existing form."),
            Self::InvalidSurvey => Some("Provide non-empty form markup and a name of at most 255 characters."),
            Self::InvalidAnswer => Some("Keep field names to 255 characters and answers to 1024."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<&SurveyError> for ErrorCode {
    fn from(err: &SurveyError) -> Self {
        match err {
            SurveyError::DuplicateName(_) => Self::DuplicateSurvey,
            SurveyError::FormNotFound(_) => Self::SurveyNotFound,
            SurveyError::InvalidForm { .. } => Self::InvalidSurvey,
            SurveyError::InvalidAnswer { .. } => Self::InvalidAnswer,
        }
    }
}
