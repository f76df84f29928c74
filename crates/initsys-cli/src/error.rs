use initsys::core::forcefield::params::ParamLoadError;
use initsys::core::io::template::TemplateLoadError;
use initsys::engine::box_sizer::BoxError;
use initsys::engine::error::SystemError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    System(#[from] SystemError),

    #[error(transparent)]
    Box(#[from] BoxError),

    #[error(transparent)]
    Template(#[from] TemplateLoadError),

    #[error(transparent)]
    Forcefield(#[from] ParamLoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
