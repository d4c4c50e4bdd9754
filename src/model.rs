//! Core data types shared across the compiler: the YAML tree representation,
//! the definition/call token variant, the recursive result shape, and the
//! compile-time configuration options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::graph::Cluster;
use crate::ordered_map::OrderedMap;

/// A generic CWL-shaped YAML document. `serde_yaml::Mapping` preserves
/// insertion order, which the §3 step-order-preservation invariant depends on.
pub type Yaml = Mapping;

/// A hierarchical namespace path: step names from the root document down to
/// (but not including) the current step.
pub type Namespace = Vec<String>;

/// A `$defs` entry: where a value was declared with `&name`.
pub type DefSite = (Namespace, String);

/// `name -> DefSite`, at most one entry per name for the whole compilation.
pub type DollarDefs = std::collections::HashMap<String, DefSite>;

/// `mangled_input_name -> DefSite`, used to forward a binding through an
/// intermediate frame that is neither the definition nor the call's LCA.
pub type DollarCalls = std::collections::HashMap<String, DefSite>;

/// Tool stem -> (run path, tool document).
pub type ToolEntry = (String, Yaml);

/// The value of a `in:` scalar, classified by its leading sigil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Literal(String),
    Define(String),
    Call(String),
}

impl ArgValue {
    pub fn parse(raw: &str) -> Self {
        match raw.as_bytes().first() {
            Some(b'&') => ArgValue::Define(raw[1..].to_string()),
            Some(b'*') => ArgValue::Call(raw[1..].to_string()),
            _ => ArgValue::Literal(raw.to_string()),
        }
    }
}

/// Configuration recognized by the kernel (§6).
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub graph_label_stepname: bool,
    pub graph_inline_depth: usize,
    pub graph_show_inputs: bool,
    pub graph_show_outputs: bool,
    pub graph_label_edges: bool,
    pub cwl_output_intermediate_files: bool,
    pub cwl_validate: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            graph_label_stepname: false,
            graph_inline_depth: 10,
            graph_show_inputs: false,
            graph_show_outputs: false,
            graph_label_edges: false,
            cwl_output_intermediate_files: false,
            cwl_validate: false,
        }
    }
}

/// A companion inputs-file entry: a plain scalar or a `File` reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InputsFileValue {
    Scalar(String),
    File { class: String, path: String, format: String },
}

/// Per-frame output bundle: the compiled document, its companion inputs
/// file, and the graph cluster this frame drew into.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub yaml_stem: String,
    pub compiled_tree: Value,
    pub inputs_file: Mapping,
    pub cluster: Cluster,
}

/// One activation of the recursive compiler: its own node data plus the
/// results of every child sub-workflow it recursed into, in step order.
#[derive(Debug, Clone)]
pub struct CompilerNode {
    pub data: NodeData,
    pub children: Vec<CompilerNode>,
}

/// Everything a frame hands back to its caller.
#[derive(Debug, Clone)]
pub struct CompilerResult {
    pub node: CompilerNode,
    pub inputs_workflow: OrderedMap<String>,
    pub inputs_file_workflow: OrderedMap<(String, String)>,
    pub vars_workflow_output_internal: Vec<String>,
    pub dollar_defs: DollarDefs,
    pub dollar_calls: DollarCalls,
    pub step_1_name: String,
}

/// Resolves a tool document's `class` field, failing loudly on anything else.
pub fn tool_class(tool: &Yaml) -> Option<&str> {
    tool.get(Value::String("class".into())).and_then(|v| v.as_str())
}

pub fn string_path(p: &PathBuf) -> String {
    p.to_string_lossy().into_owned()
}

/// Small YAML-mapping accessors, used throughout the kernel to avoid
/// repeating `Value::String(...)` lookups.
pub fn yaml_get<'a>(m: &'a Mapping, key: &str) -> Option<&'a Value> {
    m.get(Value::String(key.to_string()))
}

pub fn yaml_get_str<'a>(m: &'a Mapping, key: &str) -> Option<&'a str> {
    yaml_get(m, key).and_then(|v| v.as_str())
}

pub fn yaml_get_mapping<'a>(m: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    yaml_get(m, key).and_then(|v| v.as_mapping())
}

pub fn yaml_set(m: &mut Mapping, key: &str, value: Value) {
    m.insert(Value::String(key.to_string()), value);
}

pub fn file_stem(name: &str) -> String {
    std::path::Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_value_classifies_sigils() {
        assert_eq!(ArgValue::parse("&name"), ArgValue::Define("name".into()));
        assert_eq!(ArgValue::parse("*name"), ArgValue::Call("name".into()));
        assert_eq!(ArgValue::parse("5"), ArgValue::Literal("5".into()));
        assert_eq!(ArgValue::parse(""), ArgValue::Literal("".into()));
    }

    #[test]
    fn default_config_inlines_small_trees() {
        let cfg = CompileConfig::default();
        assert!(cfg.graph_inline_depth >= 3);
        assert!(!cfg.graph_show_inputs);
        assert!(!cfg.graph_show_outputs);
        assert!(!cfg.cwl_output_intermediate_files);
        assert!(!cfg.cwl_validate);
    }
}
