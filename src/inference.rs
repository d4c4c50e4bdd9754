//! Edge inference (C5): connects a required, unbound step input to the most
//! recently produced matching output, or promotes it to a workflow-level
//! input if no producer is found.

use crate::ordered_map::OrderedMap;

/// A previously processed step's mangled name and its tool's output ports
/// (port name, type), in declaration order.
pub struct ProducerCandidate<'a> {
    pub step_name: &'a str,
    pub outputs: &'a [(String, String)],
}

/// Result of attempting to infer a wire for one required input.
pub enum Inferred {
    /// Wired to `<step_name>/<port>` of an earlier step.
    Wired { step_name: String, port: String },
    /// No producer found; promoted to a workflow-level input.
    PromotedToInput,
    /// No producer found, but the input was already provided a literal
    /// value earlier (via the inputs file), so nothing further to do.
    AlreadyProvided,
}

fn strip_optional(ty: &str) -> &str {
    ty.strip_suffix('?').unwrap_or(ty)
}

/// Scans `candidates` (assumed to be in step order, index 0 first) in
/// reverse for the most recent step whose output type matches
/// `required_type`. On a match, the caller is responsible for recording the
/// wire; on no match, `inputs_workflow` gains a new entry (§4.5) unless
/// `in_name_in_inputs_file` indicates a literal was already provided.
pub fn perform_edge_inference(
    candidates: &[ProducerCandidate],
    required_type: &str,
    in_name: &str,
    in_name_in_inputs_file: bool,
    inputs_workflow: &mut OrderedMap<String>,
) -> Inferred {
    let wanted = strip_optional(required_type);

    for candidate in candidates.iter().rev() {
        for (port, ty) in candidate.outputs {
            if strip_optional(ty) == wanted {
                return Inferred::Wired {
                    step_name: candidate.step_name.to_string(),
                    port: port.clone(),
                };
            }
        }
    }

    if in_name_in_inputs_file {
        return Inferred::AlreadyProvided;
    }

    inputs_workflow.insert(in_name, wanted.to_string());
    Inferred::PromotedToInput
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_producer_wins() {
        let step0 = ProducerCandidate { step_name: "root__step__0__toolA", outputs: &[("bam".into(), "File".into())] };
        let step1 = ProducerCandidate { step_name: "root__step__1__toolB", outputs: &[("bam".into(), "File".into())] };
        let candidates = vec![step0, step1];
        let mut inputs_workflow = OrderedMap::new();

        let result = perform_edge_inference(&candidates, "File", "unused", false, &mut inputs_workflow);
        match result {
            Inferred::Wired { step_name, port } => {
                assert_eq!(step_name, "root__step__1__toolB");
                assert_eq!(port, "bam");
            }
            _ => panic!("expected a wire"),
        }
        assert!(inputs_workflow.is_empty());
    }

    #[test]
    fn optional_marker_is_stripped_before_matching() {
        let step0 = ProducerCandidate { step_name: "s0", outputs: &[("out".into(), "File?".into())] };
        let candidates = vec![step0];
        let mut inputs_workflow = OrderedMap::new();
        let result = perform_edge_inference(&candidates, "File", "x", false, &mut inputs_workflow);
        assert!(matches!(result, Inferred::Wired { .. }));
    }

    #[test]
    fn no_match_promotes_to_workflow_input() {
        let candidates: Vec<ProducerCandidate> = vec![];
        let mut inputs_workflow = OrderedMap::new();
        let result = perform_edge_inference(&candidates, "int", "root__step__0__toolA___count", false, &mut inputs_workflow);
        assert!(matches!(result, Inferred::PromotedToInput));
        assert_eq!(inputs_workflow.get("root__step__0__toolA___count"), Some(&"int".to_string()));
    }

    #[test]
    fn no_match_but_literal_already_provided_is_a_noop() {
        let candidates: Vec<ProducerCandidate> = vec![];
        let mut inputs_workflow = OrderedMap::new();
        let result = perform_edge_inference(&candidates, "int", "already_there", true, &mut inputs_workflow);
        assert!(matches!(result, Inferred::AlreadyProvided));
        assert!(inputs_workflow.is_empty());
    }

    #[test]
    fn type_mismatch_does_not_match() {
        let step0 = ProducerCandidate { step_name: "s0", outputs: &[("out".into(), "File".into())] };
        let candidates = vec![step0];
        let mut inputs_workflow = OrderedMap::new();
        let result = perform_edge_inference(&candidates, "int", "s1___n", false, &mut inputs_workflow);
        assert!(matches!(result, Inferred::PromotedToInput));
    }
}
