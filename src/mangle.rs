//! Name mangling (C1): canonical, collision-free, reversible names for
//! steps and ports.

/// Separator between namespace/step/port components. Must not appear inside
/// any step or port name component.
pub const PORT_SEP: &str = "___";

/// Separator used inside a mangled step name between the parent stem, the
/// step index, and the child stem.
const STEP_SEP: &str = "__step__";

/// Builds the canonical name for step `index` of workflow `parent_stem`,
/// referencing tool/sub-workflow `step_key`.
///
/// `step_key` may itself be a relative path (e.g. `foo.yml`); only the file
/// stem is used.
pub fn step_name(parent_stem: &str, index: usize, step_key: &str) -> String {
    let child_stem = std::path::Path::new(step_key)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(step_key);
    format!("{parent_stem}{STEP_SEP}{index}{STEP_SEP}{child_stem}")
}

/// Joins a namespace path and trailing components into a mangled port name.
pub fn mangle(namespace: &[String], tail: &[&str]) -> String {
    let mut parts: Vec<&str> = namespace.iter().map(String::as_str).collect();
    parts.extend(tail);
    parts.join(PORT_SEP)
}

/// Splits a mangled name back into its components.
pub fn unmangle(name: &str) -> Vec<String> {
    name.split(PORT_SEP).map(str::to_string).collect()
}

/// Checks that a raw name component does not contain the reserved separator.
pub fn validate_component(component: &str) -> Result<(), String> {
    if component.contains(PORT_SEP) {
        Err(format!(
            "component {component:?} contains the reserved separator {PORT_SEP:?}"
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_name_uses_child_stem_not_full_path() {
        assert_eq!(step_name("root", 2, "align.yml"), "root__step__2__align");
        assert_eq!(step_name("root", 0, "samtools_sort"), "root__step__0__samtools_sort");
    }

    #[test]
    fn mangle_and_unmangle_roundtrip() {
        let ns = vec!["root__step__0__align".to_string()];
        let m = mangle(&ns, &["root__step__1__sort", "bam_out"]);
        assert_eq!(m, "root__step__0__align___root__step__1__sort___bam_out");
        let parts = unmangle(&m);
        assert_eq!(
            parts,
            vec![
                "root__step__0__align".to_string(),
                "root__step__1__sort".to_string(),
                "bam_out".to_string(),
            ]
        );
    }

    #[test]
    fn validate_component_rejects_separator() {
        assert!(validate_component("clean_name").is_ok());
        assert!(validate_component("bad___name").is_err());
    }

    #[test]
    fn mangle_empty_namespace_is_just_the_tail() {
        let m = mangle(&[], &["step", "port"]);
        assert_eq!(m, "step___port");
    }
}
