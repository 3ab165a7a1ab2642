//! `eventbus-gen` compiles a `.proto` schema into a statically typed,
//! in-process event bus.
//!
//! The pipeline is a straight, synchronous sequence of five phases: load an
//! optional [`config::Config`], parse the schema into the [`model::Template`]
//! via [`ir::build`], run the [`checker`] for cross-service name conflicts,
//! render the result through the embedded template in [`render`], then format
//! and write it out. [`generate`] drives all five phases end to end and is
//! the entry point both the CLI binary and this crate's own integration
//! tests use.

pub mod ast;
pub mod checker;
pub mod config;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod model;
pub mod naming;
pub mod parser;
pub mod render;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

pub use error::GenError;
pub use model::Template;

/// Runs the full pipeline: read `in_path` (and, if given, `config_path`),
/// build and check the Template Model, render it, and write the formatted
/// result to `out_path`.
///
/// Each phase's error is wrapped into [`GenError`] with the offending path
/// attached here, so the lower-level functions (`config::Config::from_path`,
/// `ir::build`, `checker::check`, `render::render`) stay independently
/// testable without this path-attaching boilerplate.
pub fn generate(in_path: &Path, out_path: &Path, config_path: Option<&Path>) -> Result<(), GenError> {
    let extra_imports = match config_path {
        Some(path) => {
            let config = config::Config::from_path(path).map_err(|source| match source {
                config::ConfigError::Io { path, source } => GenError::Io { path, source },
                config::ConfigError::Yaml { path, source } => GenError::Config { path, source },
            })?;
            info!(path = %path.display(), count = config.imports.len(), "loaded config");
            config.imports
        }
        None => Vec::new(),
    };

    let proto_file = File::open(in_path).map_err(|source| GenError::Io {
        path: in_path.to_path_buf(),
        source,
    })?;

    let template = ir::build(extra_imports, proto_file).map_err(|source| match source {
        ir::IrError::Io(source) => GenError::Io {
            path: in_path.to_path_buf(),
            source,
        },
        ir::IrError::Parse(source) => GenError::Parse {
            path: in_path.to_path_buf(),
            source,
        },
    })?;
    info!(
        package = %template.package,
        structs = template.structs.len(),
        methods = template.methods.len(),
        enums = template.enums.len(),
        "built template model"
    );

    checker::check(&template)?;
    info!("consistency check passed");

    let rendered = render::render(&template)?;
    let formatted = format_output(&rendered)?;
    info!("rendered and formatted output");

    write_output(out_path, &formatted)?;
    info!(path = %out_path.display(), "wrote output");

    Ok(())
}

#[cfg(feature = "format")]
fn format_output(rendered: &str) -> Result<String, GenError> {
    render::format_rust(rendered).map_err(GenError::Format)
}

#[cfg(not(feature = "format"))]
fn format_output(rendered: &str) -> Result<String, GenError> {
    Ok(rendered.to_owned())
}

/// Writes `contents` to `out_path`, truncating any existing file. This only
/// runs after formatting above has already succeeded, so a formatter failure
/// never leaves partial output behind.
fn write_output(out_path: &Path, contents: &str) -> Result<(), GenError> {
    let mut file = File::create(out_path).map_err(|source| GenError::Io {
        path: out_path.to_path_buf(),
        source,
    })?;
    file.write_all(contents.as_bytes()).map_err(|source| GenError::Io {
        path: out_path.to_path_buf(),
        source,
    })
}
