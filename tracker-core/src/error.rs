use std::path::PathBuf;

/// Errors surfaced by dashboard operations.
///
/// Operations on an unknown project id are not errors; they are silent no-ops.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Export requested with no project selected
    #[error("Please select at least one project to export")]
    EmptySelection,

    /// Operation reserved for the admin role
    #[error("Only an admin can {0}")]
    AdminRequired(&'static str),

    /// BRD attachment with an extension outside the accepted list
    #[error("Unsupported BRD file type: {0}")]
    UnsupportedBrdFile(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl TrackerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
