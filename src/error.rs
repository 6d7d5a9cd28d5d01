use thiserror::Error;

/// Everything that can go wrong while turning a spreadsheet into a table.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported schedule format: {0} (expected .xlsx, .xls, .ods or .csv)")]
    UnsupportedFormat(String),
    #[error("workbook error: {0}")]
    Workbook(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("schedule has no header row")]
    Empty,
    #[error("schedule must contain columns Week, Day, Breakfast, Lunch, Snacks, Dinner; missing: {missing}. Found: {found}")]
    MissingColumns { missing: String, found: String },
    #[error("row {row}: week value {value:?} is not a whole number")]
    InvalidWeek { row: usize, value: String },
    #[error("row {row}: day is empty")]
    MissingDay { row: usize },
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Top-level outcome of one run. Each variant maps to a process exit code.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("No password found. Set {0} env var.")]
    MissingCredentials(String),
    #[error("Failed to load schedule: {0}")]
    ScheduleLoad(#[from] ScheduleError),
    #[error("Failed to send email: {0}")]
    Delivery(#[from] MailError),
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(_) | RunError::MissingCredentials(_) => 2,
            RunError::ScheduleLoad(_) | RunError::Delivery(_) => 1,
        }
    }
}
