//! Source classification and parsing.

pub mod signatures;

use std::path::Path;

use rustpython_parser::{ast, Mode};

use crate::errors::ParseFailure;

/// Python sources are the only files with signature weight.
pub fn is_python_source(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "py")
}

/// Parse a module's source text into its top-level statements.
pub(crate) fn parse_module(path: &Path, source: &str) -> Result<Vec<ast::Stmt>, ParseFailure> {
    let parsed = rustpython_parser::parse(source, Mode::Module, &path.to_string_lossy()).map_err(
        |err| ParseFailure {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    )?;

    match parsed {
        ast::Mod::Module(module) => Ok(module.body),
        // Mode::Module only ever yields a module tree.
        _ => Ok(Vec::new()),
    }
}
