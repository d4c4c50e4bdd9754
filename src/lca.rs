//! Lowest-common-ancestor resolution (C2) over hierarchical namespace paths.
//!
//! Namespace paths are ordered sequences of mangled step names, so the LCA
//! is a pure prefix operation, never a graph traversal.

/// Splits `a` relative to its longest common prefix with `b`.
///
/// Returns `(common, tail)` where `common` is the shared prefix and
/// `tail = a[common.len()..]`.
pub fn partition(a: &[String], b: &[String]) -> (Vec<String>, Vec<String>) {
    let common_len = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    (a[..common_len].to_vec(), a[common_len..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn shared_prefix_is_symmetric() {
        let a = ns(&["root", "step1", "step2"]);
        let b = ns(&["root", "step1", "other"]);
        let (common_a, _) = partition(&a, &b);
        let (common_b, _) = partition(&b, &a);
        assert_eq!(common_a, common_b);
        assert_eq!(common_a, ns(&["root", "step1"]));
    }

    #[test]
    fn tails_are_the_unshared_suffixes() {
        let a = ns(&["root", "step1", "step2"]);
        let b = ns(&["root", "step1", "other"]);
        let (common, tail_a) = partition(&a, &b);
        assert_eq!(common, ns(&["root", "step1"]));
        assert_eq!(tail_a, ns(&["step2"]));
    }

    #[test]
    fn identical_paths_have_empty_tails() {
        let a = ns(&["root", "step1"]);
        let (common, tail) = partition(&a, &a.clone());
        assert_eq!(common, a);
        assert!(tail.is_empty());
    }

    #[test]
    fn disjoint_paths_have_empty_common() {
        let a = ns(&["x"]);
        let b = ns(&["y"]);
        let (common, tail) = partition(&a, &b);
        assert!(common.is_empty());
        assert_eq!(tail, ns(&["x"]));
    }

    #[test]
    fn nested_call_always_has_namespace_as_a_prefix() {
        // By construction in the kernel, nss_call always begins with the
        // current frame's own namespace, so the common ancestor can never be
        // deeper than the current frame.
        let namespace = ns(&["root", "step1"]);
        let nss_call = ns(&["root", "step1", "step2", "port"]);
        let nss_def = ns(&["root", "other"]);
        let (common, _) = partition(&nss_def, &nss_call);
        assert!(common.len() <= namespace.len());
    }
}
