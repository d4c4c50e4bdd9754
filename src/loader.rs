//! Document I/O (A2): reading a single YAML tree into memory and writing a
//! compiled workflow plus its companion inputs file back to disk.

use std::path::Path;

use log::info;
use serde_yaml::{Mapping, Value};

use crate::error::CompileError;

/// Reads and parses one YAML document, failing if its root is not a mapping
/// (every CWL document - tool, workflow, or sub-workflow fragment - is).
pub fn load_document(path: &Path) -> Result<Mapping, CompileError> {
    let text = std::fs::read_to_string(path).map_err(|source| CompileError::Io { path: path.to_path_buf(), source })?;
    let value: Value = serde_yaml::from_str(&text).map_err(|source| CompileError::Yaml { path: path.to_path_buf(), source })?;
    value.as_mapping().cloned().ok_or_else(|| CompileError::InvalidDocumentRoot { path: path.to_path_buf() })
}

/// Writes a compiled workflow document to `path`.
pub fn save_compiled_workflow(tree: &Value, path: &Path) -> Result<(), CompileError> {
    let text = serde_yaml::to_string(tree).map_err(|source| CompileError::Yaml { path: path.to_path_buf(), source })?;
    std::fs::write(path, text).map_err(|source| CompileError::Io { path: path.to_path_buf(), source })?;
    info!("wrote compiled workflow to {}", path.display());
    Ok(())
}

/// Writes a companion inputs file (the runtime parameter bindings a CWL
/// runner reads alongside the compiled workflow) to `path`.
pub fn save_inputs_file(inputs: &Mapping, path: &Path) -> Result<(), CompileError> {
    let text = serde_yaml::to_string(inputs).map_err(|source| CompileError::Yaml { path: path.to_path_buf(), source })?;
    std::fs::write(path, text).map_err(|source| CompileError::Io { path: path.to_path_buf(), source })?;
    info!("wrote inputs file to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_compiled_workflow_and_inputs_file() {
        let tmp = tempfile::tempdir().unwrap();
        let doc_path = tmp.path().join("root.yml");
        let inputs_path = tmp.path().join("root.inputs.yml");

        let mut tree = Mapping::new();
        tree.insert(Value::String("cwlVersion".into()), Value::String("v1.0".into()));
        tree.insert(Value::String("class".into()), Value::String("Workflow".into()));

        let mut inputs = Mapping::new();
        inputs.insert(Value::String("x".into()), Value::String("5".into()));

        save_compiled_workflow(&Value::Mapping(tree), &doc_path).unwrap();
        save_inputs_file(&inputs, &inputs_path).unwrap();

        let reloaded = load_document(&doc_path).unwrap();
        assert_eq!(reloaded.get(Value::String("class".into())), Some(&Value::String("Workflow".into())));

        let reloaded_inputs = load_document(&inputs_path).unwrap();
        assert_eq!(reloaded_inputs.get(Value::String("x".into())), Some(&Value::String("5".into())));
    }

    #[test]
    fn load_document_rejects_non_mapping_root() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("list.yml");
        std::fs::write(&path, "[1, 2, 3]\n").unwrap();
        let result = load_document(&path);
        assert!(matches!(result, Err(CompileError::InvalidDocumentRoot { .. })));
    }

    #[test]
    fn load_document_missing_file_is_io_error() {
        let result = load_document(Path::new("/nonexistent/path/workflow.yml"));
        assert!(matches!(result, Err(CompileError::Io { .. })));
    }
}
