//! Tool/sub-workflow discovery (A1): walks a directory tree once at startup,
//! populating the initial tool registry from `.cwl` documents and indexing
//! every `.yml` document by file stem so the kernel can resolve a step key
//! to a path without touching the filesystem mid-compile.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::CompileError;
use crate::model::{file_stem, string_path};
use crate::registry::ToolRegistry;

/// Result of one discovery pass.
pub struct Discovered {
    pub tools: ToolRegistry,
    pub yml_paths: HashMap<String, PathBuf>,
}

/// Recursively walks `root`, registering every `.cwl` file it finds as a
/// tool and every `.yml` file as a candidate sub-workflow. A stem seen twice
/// keeps the most recently visited path; directory walk order is otherwise
/// unspecified, so a project with duplicate stems in different directories
/// should not rely on which one wins.
pub fn discover(root: &Path) -> Result<Discovered, CompileError> {
    let mut tools = ToolRegistry::new();
    let mut yml_paths = HashMap::new();
    walk(root, &mut tools, &mut yml_paths)?;
    info!(
        "discovered {} tool document(s) and {} sub-workflow document(s) under {}",
        tools.len(),
        yml_paths.len(),
        root.display()
    );
    Ok(Discovered { tools, yml_paths })
}

fn walk(dir: &Path, tools: &mut ToolRegistry, yml_paths: &mut HashMap<String, PathBuf>) -> Result<(), CompileError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CompileError::Io { path: dir.to_path_buf(), source })?;

    for entry in entries {
        let entry = entry.map_err(|source| CompileError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();

        if path.is_dir() {
            walk(&path, tools, yml_paths)?;
            continue;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("cwl") => {
                let stem = file_stem(&path.to_string_lossy());
                match load_tool_document(&path) {
                    Ok(doc) => {
                        debug!("registered tool {stem} from {}", path.display());
                        tools.insert(stem, string_path(&path), doc);
                    }
                    Err(err) => warn!("skipping unparseable tool document {}: {err}", path.display()),
                }
            }
            Some("yml") => {
                let stem = file_stem(&path.to_string_lossy());
                debug!("indexed sub-workflow document {stem} at {}", path.display());
                yml_paths.insert(stem, path);
            }
            _ => {}
        }
    }

    Ok(())
}

fn load_tool_document(path: &Path) -> Result<serde_yaml::Mapping, CompileError> {
    let text = std::fs::read_to_string(path).map_err(|source| CompileError::Io { path: path.to_path_buf(), source })?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&text).map_err(|source| CompileError::Yaml { path: path.to_path_buf(), source })?;
    value.as_mapping().cloned().ok_or_else(|| CompileError::InvalidDocumentRoot { path: path.to_path_buf() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn discovers_tools_and_subworkflows_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "toolA.cwl", "class: CommandLineTool\ninputs: {}\noutputs: {}\n");
        write_file(tmp.path(), "root.yml", "steps: []\n");
        let nested = tmp.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        write_file(&nested, "toolB.cwl", "class: CommandLineTool\ninputs: {}\noutputs: {}\n");

        let discovered = discover(tmp.path()).unwrap();
        assert!(discovered.tools.contains("toolA"));
        assert!(discovered.tools.contains("toolB"));
        assert!(discovered.yml_paths.contains_key("root"));
    }

    #[test]
    fn unparseable_tool_document_is_skipped_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "broken.cwl", "this: [is, not, valid: yaml");
        let discovered = discover(tmp.path()).unwrap();
        assert!(!discovered.tools.contains("broken"));
    }
}
