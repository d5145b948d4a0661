pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use config::{get_config_path, TrackerConfig};
pub use error::{Result, TrackerError};
pub use export::{Cell, ExportRecord, Sheet, SheetWriter, XlsxSheetWriter, EXPORT_HEADERS};
pub use models::{
    ApprovalStatus, BrdFile, BrdRequirement, ColorCode, Project, ProjectDraft, ProjectField,
    ProjectId, ProjectStatus, Stage, StageFlags, UatPhase,
};
pub use session::{Dashboard, Role};
pub use store::ProjectStore;
