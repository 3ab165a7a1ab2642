//! Crate-wide error type. One enum spans every phase of the pipeline, the way
//! this codebase keeps a single error surface per crate rather than letting
//! each phase's error type leak to the caller unconverted.

use std::path::PathBuf;

use crate::checker::ConflictError;
use crate::parser::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("error parsing protobuf in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("failed parsing generation template: {0}")]
    Template(#[from] askama::Error),

    #[error("failed formatting generated output: {0}")]
    Format(#[from] syn::Error),
}
