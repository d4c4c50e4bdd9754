//! Graph builder (C6): a hierarchical cluster graph mirroring the recursion
//! tree, serialized to Graphviz DOT text. Rendering the DOT text to an image
//! is an external collaborator (not implemented here).

/// Edges are drawn in white so they remain visible on dark backgrounds.
pub const FONT_EDGE_COLOR: &str = "white";

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub label: String,
    pub shape: String,
    pub style: String,
    pub fillcolor: String,
}

impl Node {
    pub fn step(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            shape: "box".into(),
            style: "rounded, filled".into(),
            fillcolor: "lightblue".into(),
        }
    }

    pub fn input(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            shape: "box".into(),
            style: "rounded, filled".into(),
            fillcolor: "lightgreen".into(),
        }
    }

    pub fn output(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            shape: "box".into(),
            style: "rounded, filled".into(),
            fillcolor: "lightyellow".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub tail: String,
    pub head: String,
    pub color: String,
    pub label: Option<String>,
}

/// One sub-cluster of the hierarchical graph, corresponding to one
/// recursive compile frame.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub name: String,
    pub label: String,
    pub color: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub subclusters: Vec<Cluster>,
    /// Raw `{rank=same; ...}` directive bodies, appended verbatim.
    pub rank_directives: Vec<String>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            color: "lightblue".into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            subclusters: Vec::new(),
            rank_directives: Vec::new(),
        }
    }

    pub fn node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Inserts a sibling sub-cluster at the front, reproducing the
    /// downstream layout engine's reverse-sibling-insertion quirk (see
    /// Design Notes / Open Question #1).
    pub fn push_sibling_reversed(&mut self, sibling: Cluster) {
        self.subclusters.insert(0, sibling);
    }

    pub fn rank_same(&mut self, names: &[String]) {
        if names.len() > 1 {
            self.rank_directives.push(format!("{{rank=same; {}}}", names.join("; ")));
        }
    }

    fn write_dot(&self, out: &mut String, is_root: bool) {
        if is_root {
            out.push_str("digraph G {\n");
        } else {
            out.push_str(&format!("subgraph cluster_{} {{\n", dot_escape_id(&self.name)));
            out.push_str(&format!("  label=\"{}\";\n", self.label));
            out.push_str(&format!("  color={};\n", self.color));
        }
        for node in &self.nodes {
            out.push_str(&format!(
                "  \"{}\" [label=\"{}\", shape={}, style=\"{}\", fillcolor={}];\n",
                node.name, node.label, node.shape, node.style, node.fillcolor
            ));
        }
        for edge in &self.edges {
            match &edge.label {
                Some(label) => out.push_str(&format!(
                    "  \"{}\" -> \"{}\" [color={}, label=\"{}\"];\n",
                    edge.tail, edge.head, edge.color, label
                )),
                None => out.push_str(&format!(
                    "  \"{}\" -> \"{}\" [color={}];\n",
                    edge.tail, edge.head, edge.color
                )),
            }
        }
        for directive in &self.rank_directives {
            out.push_str(&format!("  \t{}\n", directive));
        }
        for sub in &self.subclusters {
            sub.write_dot(out, false);
        }
        out.push_str("}\n");
    }

    /// Serializes this cluster tree as a Graphviz DOT document, treating
    /// `self` as the root (`digraph G { ... }`) rather than a named subgraph.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        self.write_dot(&mut out, true);
        out
    }
}

fn dot_escape_id(name: &str) -> String {
    name.replace(['.', ' ', '/'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cluster_renders_as_digraph() {
        let mut root = Cluster::new("root", "root");
        root.node(Node::step("a", "toolA"));
        let dot = root.to_dot();
        assert!(dot.starts_with("digraph G {"));
        assert!(dot.contains("\"a\""));
    }

    #[test]
    fn nested_cluster_gets_cluster_prefix() {
        let mut root = Cluster::new("root", "root");
        let mut child = Cluster::new("sub.yml", "sub.yml");
        child.node(Node::step("s", "step"));
        root.push_sibling_reversed(child);
        let dot = root.to_dot();
        assert!(dot.contains("subgraph cluster_sub_yml"));
        assert!(dot.contains("label=\"sub.yml\""));
    }

    #[test]
    fn siblings_are_inserted_in_reverse_order() {
        let mut root = Cluster::new("root", "root");
        root.push_sibling_reversed(Cluster::new("first", "first"));
        root.push_sibling_reversed(Cluster::new("second", "second"));
        assert_eq!(root.subclusters[0].name, "second");
        assert_eq!(root.subclusters[1].name, "first");
    }

    #[test]
    fn rank_same_directive_only_emitted_for_multiple_names() {
        let mut c = Cluster::new("root", "root");
        c.rank_same(&["only".to_string()]);
        assert!(c.rank_directives.is_empty());
        c.rank_same(&["a".to_string(), "b".to_string()]);
        assert_eq!(c.rank_directives.len(), 1);
        assert!(c.rank_directives[0].contains("rank=same"));
    }

    #[test]
    fn edge_with_label_renders_label_attribute() {
        let mut c = Cluster::new("root", "root");
        c.edge(Edge {
            tail: "a".into(),
            head: "b".into(),
            color: FONT_EDGE_COLOR.into(),
            label: Some("bam_out".into()),
        });
        let dot = c.to_dot();
        assert!(dot.contains("label=\"bam_out\""));
    }
}
