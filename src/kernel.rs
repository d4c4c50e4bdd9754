//! Recursive compiler kernel (C7): orchestrates the name mangler (C1), LCA
//! resolver (C2), tool registry (C3), scope tables (C4), edge inference
//! (C5), and graph builder (C6) to elaborate one YAML document tree into a
//! compiled workflow document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_yaml::{Mapping, Value};

use crate::diagnostics::CompileTimeline;
use crate::error::CompileError;
use crate::graph::{Cluster, Edge, Node, FONT_EDGE_COLOR};
use crate::inference::{self, Inferred, ProducerCandidate};
use crate::lca;
use crate::mangle;
use crate::model::{
    file_stem, yaml_get, yaml_get_mapping, yaml_get_str, yaml_set, ArgValue, CompileConfig,
    CompilerNode, CompilerResult, DollarCalls, DollarDefs, InputsFileValue, Namespace, NodeData,
};
use crate::ordered_map::OrderedMap;
use crate::registry::ToolRegistry;
use crate::scope::ScopeAccumulator;

/// Output ports whose bulk makes them uninteresting to propagate by default.
const OUTPUT_BLACKLIST: &[&str] = &["dhdl", "xtc"];

/// One entry of the input `steps:` sequence: a step key plus its (possibly
/// absent) body.
struct StepEntry {
    key: String,
    body: Option<Mapping>,
}

/// A fully processed step, retained so that later steps in the same frame
/// can reference its outputs during edge inference and graph output
/// aggregation.
struct ProcessedStep {
    step_name: String,
    step_key: String,
    body: Mapping,
    tool_class: String,
    outputs: Vec<(String, String)>,
}

/// Compiles the root document at `yaml_path` and returns the full recursive
/// result. Sets up the initial graph cluster stack; every nested frame pops
/// its own entry before returning, so `subgraphs` is empty again afterward.
pub fn compile(
    config: &CompileConfig,
    tools: &mut ToolRegistry,
    yml_paths: &HashMap<String, PathBuf>,
    yaml_path: &Path,
    mut timeline: Option<&mut CompileTimeline>,
) -> Result<CompilerResult, CompileError> {
    let mut subgraphs: Vec<Cluster> = vec![Cluster::new("root", file_stem(&yaml_path.to_string_lossy()))];
    let mut dollar_defs = DollarDefs::new();
    compile_frame(config, &Vec::new(), &mut subgraphs, &mut dollar_defs, tools, true, yaml_path, yml_paths, timeline.as_deref_mut())
}

/// A seam for workflow-description-specific preprocessing. This system
/// defines no such preprocessing, so it is a pass-through.
fn extract_backend_steps(tree: Mapping, _yaml_path: &Path) -> Mapping {
    tree
}

fn parse_steps(tree: &Mapping) -> Vec<StepEntry> {
    let mut out = Vec::new();
    let Some(Value::Sequence(seq)) = yaml_get(tree, "steps") else { return out };
    for item in seq {
        if let Value::Mapping(m) = item {
            if let Some((k, v)) = m.iter().next() {
                let key = k.as_str().unwrap_or_default().to_string();
                let body = v.as_mapping().cloned();
                out.push(StepEntry { key, body });
            }
        }
    }
    out
}

fn is_required_input(entry: &Mapping) -> bool {
    let ty = yaml_get_str(entry, "type").unwrap_or("");
    let has_default = yaml_get(entry, "default").is_some();
    !has_default && !ty.ends_with('?')
}

fn input_type(entry: &Mapping) -> String {
    yaml_get_str(entry, "type").unwrap_or("Any").to_string()
}

fn tool_outputs(tool_doc: &Mapping) -> Vec<(String, String)> {
    let Some(outputs) = yaml_get_mapping(tool_doc, "outputs") else { return Vec::new() };
    outputs
        .iter()
        .filter_map(|(k, v)| {
            let key = k.as_str()?.to_string();
            let ty = v.as_mapping().map(input_type).unwrap_or_else(|| "Any".to_string());
            Some((key, ty))
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn compile_frame(
    config: &CompileConfig,
    namespaces: &Namespace,
    subgraphs: &mut Vec<Cluster>,
    dollar_defs: &mut DollarDefs,
    tools: &mut ToolRegistry,
    is_root: bool,
    yaml_path: &Path,
    yml_paths: &HashMap<String, PathBuf>,
    mut timeline: Option<&mut CompileTimeline>,
) -> Result<CompilerResult, CompileError> {
    let yaml_stem = file_stem(&yaml_path.to_string_lossy());
    debug!("compiling frame {yaml_stem} at depth {}", namespaces.len());
    if let Some(t) = timeline.as_deref_mut() {
        t.frame_started(yaml_stem.clone());
    }

    let mut tree = extract_backend_steps(crate::loader::load_document(yaml_path)?, yaml_path);
    let steps = parse_steps(&tree);
    let steps_keys: Vec<String> = steps.iter().map(|s| s.key.clone()).collect();
    let subkeys: Vec<bool> = steps_keys.iter().map(|k| !tools.contains(&file_stem(k))).collect();

    yaml_set(&mut tree, "cwlVersion", Value::String("v1.0".into()));
    yaml_set(&mut tree, "class", Value::String("Workflow".into()));

    let any_subworkflow = subkeys.iter().any(|b| *b)
        || steps_keys
            .iter()
            .zip(subkeys.iter())
            .filter(|(_, is_sub)| !**is_sub)
            .any(|(key, _)| tools.class_of(&file_stem(key)).map(|c| c == "Workflow").unwrap_or(false));
    if any_subworkflow {
        add_subworkflow_requirement(&mut tree);
    }

    let own_idx = subgraphs.len() - 1;
    let mut scope = ScopeAccumulator::new();
    let mut dollar_calls = DollarCalls::new();
    let mut step_1_names: Vec<String> = Vec::new();
    let mut sibling_clusters: Vec<Cluster> = Vec::new();
    let mut children: Vec<CompilerNode> = Vec::new();
    let mut processed: Vec<ProcessedStep> = Vec::new();
    let mut new_steps: Vec<(String, Mapping)> = Vec::with_capacity(steps.len());

    for (i, entry) in steps.iter().enumerate() {
        let step_key = entry.key.clone();
        let stem = file_stem(&step_key);
        mangle::validate_component(&stem)
            .map_err(|reason| CompileError::InvalidComponentName { component: stem.clone(), reason })?;
        let mut body = entry.body.clone().unwrap_or_default();
        let step_name_i = mangle::step_name(&yaml_stem, i, &step_key);

        if subkeys[i] {
            let path = yml_paths
                .get(&stem)
                .ok_or_else(|| CompileError::MissingSubworkflowFile { path: PathBuf::from(&step_key) })?;
            if !(path.exists() && path.extension().map(|e| e == "yml").unwrap_or(false)) {
                return Err(CompileError::MissingSubworkflowFile { path: path.clone() });
            }
            let mut child_cluster = Cluster::new(format!("cluster_{step_key}"), step_key.clone());
            child_cluster.color = "lightblue".into();
            subgraphs.push(child_cluster);

            let child_namespaces: Namespace = namespaces.iter().cloned().chain(std::iter::once(step_name_i.clone())).collect();
            let child_result = compile_frame(config, &child_namespaces, subgraphs, dollar_defs, tools, false, path, yml_paths, timeline.as_deref_mut())?;

            sibling_clusters.push(child_result.node.data.cluster.clone());
            step_1_names.push(child_result.step_1_name.clone());
            tools.insert(stem.clone(), format!("{stem}.cwl"), compiled_tree_as_mapping(&child_result.node.data.compiled_tree));

            scope.merge_child(&step_name_i, child_result.inputs_file_workflow.clone(), child_result.vars_workflow_output_internal.clone());
            for (k, v) in child_result.dollar_calls.clone() {
                dollar_calls.insert(k, v);
            }
            children.push(child_result.node);
        }

        let (run_path, tool_doc) = tools.get(&stem)?.clone();
        if !body.contains_key(Value::String("run".into())) {
            yaml_set(&mut body, "run", Value::String(run_path));
        }

        let args_provided: Vec<String> = yaml_get_mapping(&body, "in")
            .map(|m| m.iter().filter_map(|(k, _)| k.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let in_tool = yaml_get_mapping(&tool_doc, "inputs").cloned().unwrap_or_default();
        let tool_class = yaml_get_str(&tool_doc, "class").unwrap_or("").to_string();
        let args_required: Vec<String> = match tool_class.as_str() {
            "CommandLineTool" => in_tool
                .iter()
                .filter_map(|(k, v)| {
                    let key = k.as_str()?.to_string();
                    let entry = v.as_mapping()?;
                    is_required_input(entry).then_some(key)
                })
                .collect(),
            "Workflow" => {
                let keys: Vec<String> = in_tool.iter().filter_map(|(k, _)| k.as_str().map(str::to_string)).collect();
                let mut self_map = Mapping::new();
                for k in &keys {
                    self_map.insert(Value::String(k.clone()), Value::String(k.clone()));
                }
                yaml_set(&mut body, "in", Value::Mapping(self_map));
                keys
            }
            other => return Err(CompileError::UnknownToolClass { stem: stem.clone(), class: other.to_string() }),
        };

        let step_node_name = mangle::mangle(namespaces, &[step_name_i.as_str()]);
        let label = if config.graph_label_stepname { step_name_i.clone() } else { step_key.clone() };
        let mut drawn_step_node_name = step_node_name.clone();
        if tool_class != "Workflow" {
            subgraphs[own_idx].node(Node::step(step_node_name.clone(), label.clone()));
        } else if !(subkeys[i] && namespaces.len() < config.graph_inline_depth) {
            let mut nssnode: Namespace = namespaces.iter().cloned().chain(std::iter::once(step_name_i.clone())).collect();
            nssnode.truncate(1 + config.graph_inline_depth);
            drawn_step_node_name = nssnode.join(mangle::PORT_SEP);
            subgraphs[own_idx].node(Node::step(drawn_step_node_name.clone(), label));
        }

        for arg_key in &args_provided {
            mangle::validate_component(arg_key)
                .map_err(|reason| CompileError::InvalidComponentName { component: arg_key.clone(), reason })?;
            let in_name = mangle::mangle(&[step_name_i.clone()], &[arg_key.as_str()]);
            let entry = yaml_get_mapping(&in_tool, arg_key);
            let in_type = entry.map(input_type).unwrap_or_else(|| "Any".to_string());
            let raw = yaml_get_mapping(&body, "in")
                .and_then(|m| m.get(Value::String(arg_key.clone())))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            match ArgValue::parse(&raw) {
                ArgValue::Define(name) => {
                    if dollar_defs.contains_key(&name) {
                        return Err(CompileError::DuplicateDefinition { name });
                    }
                    // No literal accompanies a `&name` token: the port becomes a
                    // required top-level workflow input, filled in by whoever
                    // runs the compiled workflow.
                    scope.inputs_workflow.insert(in_name.clone(), in_type);
                    set_in_value(&mut body, arg_key, Value::String(in_name.clone()));
                    let mut def_namespace = namespaces.clone();
                    def_namespace.push(step_name_i.clone());
                    dollar_defs.insert(name, (def_namespace, arg_key.clone()));
                }
                ArgValue::Call(name) => {
                    resolve_call(
                        config,
                        subgraphs,
                        dollar_defs,
                        &mut dollar_calls,
                        &mut scope.inputs_workflow,
                        namespaces,
                        &step_name_i,
                        arg_key,
                        &in_name,
                        &in_type,
                        &name,
                        is_root,
                        &mut body,
                    )?;
                }
                ArgValue::Literal(value) => {
                    scope.inputs_workflow.insert(in_name.clone(), in_type.clone());
                    scope.inputs_file_workflow.insert(in_name.clone(), (value, in_type));
                    set_in_value(&mut body, arg_key, Value::String(in_name.clone()));
                    if config.graph_show_inputs {
                        let input_node_name = mangle::mangle(namespaces, &[step_name_i.as_str(), arg_key.as_str()]);
                        subgraphs[own_idx].node(Node::input(input_node_name.clone(), arg_key.clone()));
                        subgraphs[own_idx].edge(Edge { tail: input_node_name, head: drawn_step_node_name.clone(), color: FONT_EDGE_COLOR.into(), label: None });
                    }
                }
            }
        }

        for arg_key in &args_required {
            if args_provided.contains(arg_key) {
                continue;
            }
            let in_name = mangle::mangle(&[step_name_i.clone()], &[arg_key.as_str()]);
            if let Some(def_site) = dollar_calls.get(&in_name).cloned() {
                let var_slash = resolve_forwarded_call(namespaces, &step_name_i, arg_key, &def_site)?;
                scope.vars_workflow_output_internal.push(var_slash.clone());
                set_in_value(&mut body, arg_key, Value::String(var_slash));
            } else {
                let entry = yaml_get_mapping(&in_tool, arg_key);
                let required_type = entry.map(input_type).unwrap_or_else(|| "Any".to_string());
                let candidates: Vec<ProducerCandidate> = processed
                    .iter()
                    .map(|p| ProducerCandidate { step_name: &p.step_name, outputs: &p.outputs })
                    .collect();
                let already_in_inputs_file = scope.inputs_file_workflow.contains_key(&in_name);
                match inference::perform_edge_inference(&candidates, &required_type, &in_name, already_in_inputs_file, &mut scope.inputs_workflow) {
                    Inferred::Wired { step_name, port } => {
                        let var_slash = format!("{step_name}/{port}");
                        scope.vars_workflow_output_internal.push(var_slash.clone());
                        set_in_value(&mut body, arg_key, Value::String(var_slash));
                    }
                    Inferred::PromotedToInput => {
                        set_in_value(&mut body, arg_key, Value::String(in_name));
                    }
                    Inferred::AlreadyProvided => {
                        warn!("required input {arg_key} of step {step_name_i} has no producer but already has a literal value");
                    }
                }
            }
        }

        let out_keys: Vec<String> = yaml_get_mapping(&tool_doc, "outputs")
            .map(|m| m.iter().filter_map(|(k, _)| k.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        set_out_value(&mut body, out_keys);

        let outputs = tool_outputs(&tool_doc);
        processed.push(ProcessedStep { step_name: step_name_i.clone(), step_key: step_key.clone(), body: body.clone(), tool_class, outputs });
        new_steps.push((step_name_i, body));
    }

    // Attach sibling sub-clusters, reversed, and align the first-step ranks,
    // but only down to the configured inline depth.
    if namespaces.len() < config.graph_inline_depth {
        for sibling in sibling_clusters.into_iter().rev() {
            subgraphs[own_idx].push_sibling_reversed(sibling);
        }
        let displayed: Vec<String> = step_1_names
            .iter()
            .filter(|name| mangle::unmangle(name).len() < 2 + config.graph_inline_depth)
            .cloned()
            .collect();
        subgraphs[own_idx].rank_same(&displayed);
    }

    let step_name_1 = if !steps.is_empty() && subkeys[0] {
        step_1_names[0].clone()
    } else if !steps.is_empty() {
        let n = mangle::step_name(&yaml_stem, 0, &steps_keys[0]);
        format!("\"{}\"", mangle::mangle(namespaces, &[n.as_str()]))
    } else {
        String::new()
    };

    build_inputs_section(&mut tree, &scope.inputs_workflow);
    scope.dedupe_outputs();
    build_outputs_section(config, subgraphs, own_idx, namespaces, &processed, &mut scope.vars_workflow_output_internal, &tree);
    let outputs_section = build_outputs_value(config, &processed, &scope.vars_workflow_output_internal);
    yaml_set(&mut tree, "outputs", outputs_section);

    let steps_mapping = steps_to_mapping(new_steps);
    yaml_set(&mut tree, "steps", Value::Mapping(steps_mapping));

    let inputs_file = build_inputs_file(&scope.inputs_file_workflow);

    if let Some(t) = timeline.as_deref_mut() {
        t.frame_completed(yaml_stem.clone());
    }

    let own_cluster = subgraphs.pop().expect("frame's own cluster was pushed by its caller");

    let node = CompilerNode {
        data: NodeData { yaml_stem: yaml_stem.clone(), compiled_tree: Value::Mapping(tree), inputs_file, cluster: own_cluster },
        children,
    };

    Ok(CompilerResult {
        node,
        inputs_workflow: scope.inputs_workflow,
        inputs_file_workflow: scope.inputs_file_workflow,
        vars_workflow_output_internal: scope.vars_workflow_output_internal,
        dollar_defs: dollar_defs.clone(),
        dollar_calls,
        step_1_name: step_name_1,
    })
}

fn add_subworkflow_requirement(tree: &mut Mapping) {
    const REQ: &str = "SubworkflowFeatureRequirement";
    let mut req_body = Mapping::new();
    req_body.insert(Value::String("class".into()), Value::String(REQ.into()));

    match tree.get_mut(Value::String("requirements".into())) {
        Some(Value::Mapping(reqs)) => {
            if !reqs.contains_key(Value::String(REQ.into())) {
                reqs.insert(Value::String(REQ.into()), Value::Mapping(req_body));
            }
        }
        _ => {
            let mut reqs = Mapping::new();
            reqs.insert(Value::String(REQ.into()), Value::Mapping(req_body));
            yaml_set(tree, "requirements", Value::Mapping(reqs));
        }
    }
}

fn set_in_value(body: &mut Mapping, key: &str, value: Value) {
    if let Some(Value::Mapping(m)) = body.get_mut(Value::String("in".into())) {
        m.insert(Value::String(key.to_string()), value);
        return;
    }
    let mut m = Mapping::new();
    m.insert(Value::String(key.to_string()), value);
    yaml_set(body, "in", Value::Mapping(m));
}

fn set_out_value(body: &mut Mapping, out_keys: Vec<String>) {
    let seq = Value::Sequence(out_keys.into_iter().map(Value::String).collect());
    yaml_set(body, "out", seq);
}

fn compiled_tree_as_mapping(v: &Value) -> Mapping {
    v.as_mapping().cloned().unwrap_or_default()
}

fn steps_to_mapping(steps: Vec<(String, Mapping)>) -> Mapping {
    let mut m = Mapping::new();
    for (name, body) in steps {
        m.insert(Value::String(name), Value::Mapping(body));
    }
    m
}

fn build_inputs_section(tree: &mut Mapping, inputs_workflow: &OrderedMap<String>) {
    let mut inputs = Mapping::new();
    for (k, ty) in inputs_workflow.iter() {
        let mut entry = Mapping::new();
        entry.insert(Value::String("type".into()), Value::String(ty.clone()));
        // Domain-specific file-format heuristic, parameterized per Design Notes.
        if k.contains("mdin") && ty.contains("File") {
            entry.insert(Value::String("format".into()), Value::String("https://edamontology.org/format_2330".into()));
        }
        inputs.insert(Value::String(k.clone()), Value::Mapping(entry));
    }
    yaml_set(tree, "inputs", Value::Mapping(inputs));
}

fn build_inputs_file(inputs_file_workflow: &OrderedMap<(String, String)>) -> Mapping {
    let mut out = Mapping::new();
    for (k, (val, ty)) in inputs_file_workflow.iter() {
        let entry = if ty.contains("File") {
            InputsFileValue::File {
                class: "File".into(),
                path: val.clone(),
                format: "https://edamontology.org/format_2330".into(),
            }
        } else {
            InputsFileValue::Scalar(val.clone())
        };
        let value = serde_yaml::to_value(&entry).expect("InputsFileValue always serializes");
        out.insert(Value::String(k.clone()), value);
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn build_outputs_section(
    config: &CompileConfig,
    subgraphs: &mut [Cluster],
    own_idx: usize,
    namespaces: &Namespace,
    processed: &[ProcessedStep],
    vars_workflow_output_internal: &mut Vec<String>,
    _tree: &Mapping,
) {
    for p in processed {
        for (out_key, _ty) in &p.outputs {
            if OUTPUT_BLACKLIST.iter().any(|b| out_key.contains(b)) {
                continue;
            }
            let out_var = format!("{}/{}", p.step_name, out_key);
            if !config.graph_show_outputs {
                continue;
            }
            let step_node_name = mangle::mangle(namespaces, &[p.step_name.as_str()]);
            let output_node_name = mangle::mangle(namespaces, &[p.step_name.as_str(), out_key.as_str()]);
            let case1 = p.tool_class == "Workflow" && !vars_workflow_output_internal.contains(&out_var);
            let case2 = p.tool_class == "CommandLineTool" && !vars_workflow_output_internal.contains(&out_var);
            if case1 || case2 {
                subgraphs[own_idx].node(Node::output(output_node_name.clone(), out_key.clone()));
                let label = config.graph_label_edges.then(|| out_key.clone());
                subgraphs[own_idx].edge(Edge { tail: step_node_name, head: output_node_name, color: FONT_EDGE_COLOR.into(), label });
            }
        }
    }
}

fn build_outputs_value(config: &CompileConfig, processed: &[ProcessedStep], vars_workflow_output_internal: &[String]) -> Value {
    let mut outputs = Mapping::new();
    for p in processed {
        for (out_key, _ty) in &p.outputs {
            if OUTPUT_BLACKLIST.iter().any(|b| out_key.contains(b)) {
                continue;
            }
            let out_var = format!("{}/{}", p.step_name, out_key);
            if vars_workflow_output_internal.contains(&out_var) && !config.cwl_output_intermediate_files {
                continue;
            }
            let out_name = mangle::mangle(&[p.step_name.clone()], &[out_key.as_str()]);
            let mut entry = Mapping::new();
            entry.insert(Value::String("type".into()), Value::String("File".into()));
            entry.insert(Value::String("outputSource".into()), Value::String(out_var));
            outputs.insert(Value::String(out_name), Value::Mapping(entry));
        }
    }
    Value::Mapping(outputs)
}

/// Resolves a `*name` reference at its call site: looks up the definition,
/// partitions the two namespace paths via the LCA resolver, and either
/// wires the reference directly (if this frame is the LCA) or registers it
/// as a forwarded call for an ancestor frame to resolve (§4.7 step 4.iv).
#[allow(clippy::too_many_arguments)]
fn resolve_call(
    config: &CompileConfig,
    subgraphs: &mut [Cluster],
    dollar_defs: &DollarDefs,
    dollar_calls: &mut DollarCalls,
    inputs_workflow: &mut OrderedMap<String>,
    namespaces: &Namespace,
    step_name_i: &str,
    arg_key: &str,
    in_name: &str,
    in_type: &str,
    call_name: &str,
    is_root: bool,
    body: &mut Mapping,
) -> Result<(), CompileError> {
    let Some((nss_def_init, var)) = dollar_defs.get(call_name) else {
        if is_root {
            warn!("no definition found for &{call_name}; creating CWL input {in_name} anyway");
            inputs_workflow.insert(in_name.to_string(), in_type.to_string());
            set_in_value(body, arg_key, Value::String(in_name.to_string()));
        } else {
            warn!("no definition found for &{call_name} (non-root, unresolved)");
        }
        return Ok(());
    };

    let nss_def_embedded: Vec<String> = mangle::unmangle(var);
    let nss_def_embedded = nss_def_embedded[..nss_def_embedded.len().saturating_sub(1)].to_vec();
    let nss_call_embedded: Vec<String> = mangle::unmangle(arg_key);
    let nss_call_embedded = nss_call_embedded[..nss_call_embedded.len().saturating_sub(1)].to_vec();

    let mut nss_def = nss_def_init.clone();
    nss_def.extend(nss_def_embedded);
    let mut nss_call = namespaces.clone();
    nss_call.push(step_name_i.to_string());
    nss_call.extend(nss_call_embedded);

    let (nss_def_inits, nss_def_tails) = lca::partition(&nss_def, &nss_call);
    let (nss_call_inits, nss_call_tails) = lca::partition(&nss_call, &nss_def);
    debug_assert_eq!(nss_def_inits, nss_call_inits);

    if nss_call_tails.len() > 1 {
        inputs_workflow.insert(in_name.to_string(), in_type.to_string());
        set_in_value(body, arg_key, Value::String(in_name.to_string()));
        dollar_calls.insert(in_name.to_string(), (nss_def_init.clone(), var.clone()));
    } else if nss_call_tails.len() == 1 {
        let var_slash = format!("{}/{}", nss_def_tails[0], mangle::mangle(&nss_def_tails[1..].to_vec(), &[var.as_str()]));
        set_in_value(body, arg_key, Value::String(var_slash));
    } else {
        return Err(CompileError::LcaInvariantViolation { def: nss_def, call: nss_call });
    }

    let label = mangle::unmangle(var).last().cloned().unwrap_or_default();
    let graph_init_idx = nss_def_inits.len();
    if graph_init_idx < subgraphs.len() {
        add_graph_edge(config, subgraphs, graph_init_idx, &nss_def, &nss_call, &label);
    }
    Ok(())
}

/// Resolves a required-but-unprovided input whose mangled name matches a
/// pending `$calls` forward (§4.7 step 5.i): this frame is the LCA for a
/// binding whose call site was in a deeper, already-compiled sub-workflow.
fn resolve_forwarded_call(namespaces: &Namespace, step_name_i: &str, arg_key: &str, def_site: &(Namespace, String)) -> Result<String, CompileError> {
    let (nss_def_init, var) = def_site;
    let nss_def_embedded: Vec<String> = mangle::unmangle(var);
    let nss_def_embedded = nss_def_embedded[..nss_def_embedded.len().saturating_sub(1)].to_vec();
    let nss_call_embedded: Vec<String> = mangle::unmangle(arg_key);
    let nss_call_embedded = nss_call_embedded[..nss_call_embedded.len().saturating_sub(1)].to_vec();

    let mut nss_def = nss_def_init.clone();
    nss_def.extend(nss_def_embedded);
    let mut nss_call = namespaces.clone();
    nss_call.push(step_name_i.to_string());
    nss_call.extend(nss_call_embedded);

    let (nss_def_inits, nss_def_tails) = lca::partition(&nss_def, &nss_call);
    let (nss_call_inits, _) = lca::partition(&nss_call, &nss_def);
    debug_assert_eq!(nss_def_inits, nss_call_inits);

    Ok(format!("{}/{}", nss_def_tails[0], mangle::mangle(&nss_def_tails[1..].to_vec(), &[var.as_str()])))
}

fn add_graph_edge(config: &CompileConfig, subgraphs: &mut [Cluster], idx: usize, nss_def: &Namespace, nss_call: &Namespace, label: &str) {
    let tail = nss_def.join(mangle::PORT_SEP);
    let head = nss_call.join(mangle::PORT_SEP);
    let edge_label = config.graph_label_edges.then(|| label.to_string());
    subgraphs[idx].edge(Edge { tail, head, color: FONT_EDGE_COLOR.into(), label: edge_label });
}
