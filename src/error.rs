//! Compiler error taxonomy.
//!
//! Fatal structural errors abort compilation outright. Everything else
//! (recoverable-at-root placeholders, silent normalization, external
//! subprocess failures) is handled in place and logged, never returned here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a compile frame.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{path} does not exist or is not a .yml file")]
    MissingSubworkflowFile { path: PathBuf },

    #[error("multiple definitions of &{name}")]
    DuplicateDefinition { name: String },

    #[error("unknown tool class {class:?} for step {stem}")]
    UnknownToolClass { stem: String, class: String },

    #[error("len(nss_call_tails) == 0 for def {def:?} call {call:?}; this is a compiler bug")]
    LcaInvariantViolation { def: Vec<String>, call: Vec<String> },

    #[error("no producer found for required input {port} of step {step} and no inference match")]
    UnresolvedRequiredInput { step: String, port: String },

    #[error("tool {stem} not found in tool registry")]
    ToolLookupMiss { stem: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path}: document root is not a YAML mapping")]
    InvalidDocumentRoot { path: PathBuf },

    #[error("invalid name component {component:?}: {reason}")]
    InvalidComponentName { component: String, reason: String },
}
