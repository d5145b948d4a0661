use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use tracker_core::{Role, TrackerConfig};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Interactive project tracking dashboard")]
pub struct Cli {
    /// Path to a YAML config file (defaults to the user config directory)
    #[clap(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Role to start the session in
    #[clap(long, value_enum)]
    pub role: Option<RoleArg>,

    /// Start with an empty project list instead of the sample project
    #[clap(long)]
    pub no_sample: bool,

    /// File the export writes to
    #[clap(long)]
    pub export_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Admin,
    User,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::User => Role::User,
        }
    }
}

impl Cli {
    /// Command-line flags win over the config file
    pub fn apply_overrides(&self, config: &mut TrackerConfig) {
        if let Some(role) = self.role {
            config.default_role = role.into();
        }
        if self.no_sample {
            config.seed_sample_project = false;
        }
        if let Some(path) = &self.export_file {
            config.export_file = path.clone();
        }
    }
}
