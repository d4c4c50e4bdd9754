//! Scope tables (C4): per-frame accumulators for workflow inputs,
//! companion-inputs-file entries, and internally consumed outputs.
//!
//! `DollarDefs` is global to the whole compilation and is threaded through
//! every recursive frame as `&mut DollarDefs` directly (it mirrors a Python
//! dict mutated in place and visible to every caller). `DollarCalls` is a
//! fresh, owned value per frame instead: each frame starts with an empty
//! one and explicitly merges in every child's returned value, since a
//! forwarded call that a child resolved at its own level must never leak
//! back down to a sibling. Neither lives on `ScopeAccumulator`; the kernel
//! owns them directly.

use crate::ordered_map::OrderedMap;

/// The mutable state one recursive frame accumulates while walking its
/// steps.
#[derive(Debug, Default)]
pub struct ScopeAccumulator {
    pub inputs_workflow: OrderedMap<String>,
    pub inputs_file_workflow: OrderedMap<(String, String)>,
    pub vars_workflow_output_internal: Vec<String>,
}

impl ScopeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a child frame's returned accumulators into this one, namespacing
    /// the child's inputs-file entries under the step name that invoked it
    /// (§4.7 step 4.i). `inputs_workflow` is deliberately not merged: a
    /// child's "internal" inputs are already encoded in the compiled
    /// document it returned.
    pub fn merge_child(
        &mut self,
        step_name_i: &str,
        child_inputs_file_workflow: OrderedMap<(String, String)>,
        child_vars_workflow_output_internal: Vec<String>,
    ) {
        for (k, v) in child_inputs_file_workflow {
            self.inputs_file_workflow.insert(format!("{step_name_i}___{k}"), v);
        }
        self.vars_workflow_output_internal.extend(child_vars_workflow_output_internal);
    }

    pub fn dedupe_outputs(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.vars_workflow_output_internal.retain(|v| seen.insert(v.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_child_namespaces_inputs_file_entries() {
        let mut acc = ScopeAccumulator::new();
        let mut child_inputs = OrderedMap::new();
        child_inputs.insert("sub___x", ("5".to_string(), "int".to_string()));
        acc.merge_child("root__step__0__sub", child_inputs, vec!["sub/out".to_string()]);

        assert_eq!(
            acc.inputs_file_workflow.get("root__step__0__sub___sub___x"),
            Some(&("5".to_string(), "int".to_string()))
        );
        assert_eq!(acc.vars_workflow_output_internal, vec!["sub/out".to_string()]);
    }

    #[test]
    fn dedupe_outputs_removes_duplicates_preserving_first_occurrence() {
        let mut acc = ScopeAccumulator::new();
        acc.vars_workflow_output_internal = vec!["a".into(), "b".into(), "a".into()];
        acc.dedupe_outputs();
        assert_eq!(acc.vars_workflow_output_internal, vec!["a".to_string(), "b".to_string()]);
    }
}
