//! Tool registry (C3): mutable map from tool stem to its run path and
//! parsed document. Pre-populated by discovery (A1), then mutated in place
//! as each sub-workflow finishes compiling so later siblings can reference
//! it as a tool.

use std::collections::HashMap;

use crate::error::CompileError;
use crate::model::{tool_class, ToolEntry, Yaml};

#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    entries: HashMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn insert(&mut self, stem: impl Into<String>, run_path: impl Into<String>, document: Yaml) {
        self.entries.insert(stem.into(), (run_path.into(), document));
    }

    pub fn get(&self, stem: &str) -> Result<&ToolEntry, CompileError> {
        self.entries.get(stem).ok_or_else(|| CompileError::ToolLookupMiss { stem: stem.to_string() })
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.entries.contains_key(stem)
    }

    pub fn class_of(&self, stem: &str) -> Result<String, CompileError> {
        let (_, doc) = self.get(stem)?;
        tool_class(doc)
            .map(str::to_string)
            .ok_or_else(|| CompileError::UnknownToolClass { stem: stem.to_string(), class: "<missing>".into() })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn tool_doc(class: &str) -> Yaml {
        let mut m = Yaml::new();
        m.insert(Value::String("class".into()), Value::String(class.into()));
        m
    }

    #[test]
    fn insert_and_lookup() {
        let mut reg = ToolRegistry::new();
        reg.insert("samtools_sort", "samtools_sort.cwl", tool_doc("CommandLineTool"));
        assert!(reg.contains("samtools_sort"));
        assert_eq!(reg.class_of("samtools_sort").unwrap(), "CommandLineTool");
    }

    #[test]
    fn missing_lookup_is_an_error() {
        let reg = ToolRegistry::new();
        assert!(reg.get("nope").is_err());
    }

    #[test]
    fn later_insert_overwrites_for_recompiled_subworkflows() {
        let mut reg = ToolRegistry::new();
        reg.insert("sub", "sub.cwl", tool_doc("Workflow"));
        reg.insert("sub", "sub.cwl", tool_doc("Workflow"));
        assert_eq!(reg.len(), 1);
    }
}
