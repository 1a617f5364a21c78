use shatter_core::ParseError;

/// A file-level problem met while assembling a campaign.
///
/// None of these stop a load; the affected sub-part is left empty or
/// partially filled and the issue is added to the report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadIssue {
    #[error("could not read '{file}': {message}")]
    Unreadable { file: String, message: String },

    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The leading bare-text tag is absent or names another file type.
    #[error("invalid {expected} file '{file}' (found {found})")]
    WrongFileType {
        file: String,
        expected: &'static str,
        found: String,
    },

    /// An optional file is absent; its list stays empty.
    #[error("optional file '{file}' does not exist")]
    MissingFile { file: String },

    #[error("{record} struct missing in '{file}'")]
    NotAStruct { record: String, file: String },
}

/// Loader configuration could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config '{file}': {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
