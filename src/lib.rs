//! wic-compiler - Recursive Elaboration Compiler for Nested Workflow Trees
//!
//! Elaborates a tree of nested CWL sub-workflow documents into a single,
//! fully-wired CWL v1.0 workflow, inferring step-to-step data edges and
//! resolving explicit cross-scope `&name`/`*name` bindings along the way.
//!
//! # Architecture
//!
//! - [`discovery`]: Walks a project directory, indexing tool (`.cwl`) and
//!   sub-workflow (`.yml`) documents before compilation starts.
//! - [`loader`]: Reads a single YAML document and writes compiled output.
//! - [`mangle`]: Canonical, collision-free, reversible names for steps and
//!   ports.
//! - [`lca`]: Lowest-common-ancestor resolution over namespace paths.
//! - [`registry`]: The mutable tool registry shared across the recursion.
//! - [`scope`]: Per-frame accumulators for workflow inputs and outputs.
//! - [`inference`]: Connects unbound required inputs to the most recent
//!   matching producer, or promotes them to workflow-level inputs.
//! - [`graph`]: A hierarchical cluster graph mirroring the recursion tree,
//!   serialized to Graphviz DOT text.
//! - [`kernel`]: The recursive compiler itself, tying every other module
//!   together.
//! - [`validator`]: Best-effort `cwltool --validate` invocation.
//! - [`diagnostics`]: Compile timeline for reporting elaboration time.
//!
//! # Example
//!
//! ```rust,no_run
//! use wic_compiler::{discovery, kernel, loader, model::CompileConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut discovered = discovery::discover(Path::new("."))?;
//!     let config = CompileConfig::default();
//!     let result = kernel::compile(&config, &mut discovered.tools, &discovered.yml_paths, Path::new("root.yml"), None)?;
//!     loader::save_compiled_workflow(&result.node.data.compiled_tree, Path::new("root.cwl"))?;
//!     Ok(())
//! }
//! ```

pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod inference;
pub mod kernel;
pub mod lca;
pub mod loader;
pub mod mangle;
pub mod model;
pub mod ordered_map;
pub mod registry;
pub mod scope;
pub mod validator;

pub use error::CompileError;
pub use model::CompileConfig;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const APP_NAME: &str = "wic-compiler";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_app_name() {
        assert_eq!(APP_NAME, "wic-compiler");
    }

    #[test]
    fn test_default_config_reexported() {
        let cfg = CompileConfig::default();
        assert!(!cfg.cwl_validate);
    }
}
