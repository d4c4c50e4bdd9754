//! wic-compile CLI Entry Point
//!
//! Elaborates a tree of nested CWL sub-workflow documents into a single
//! compiled workflow, its companion inputs file, and (optionally) a
//! Graphviz DOT rendering of the step graph.
//!
//! # Usage
//!
//! ```bash
//! # Compile a root sub-workflow document found under the current directory
//! wic-compile root.yml
//!
//! # Search a different project directory for tools and sub-workflows
//! wic-compile root.yml --search-dir ./pipelines
//!
//! # Emit a Graphviz DOT rendering of the step graph
//! wic-compile root.yml --out-graph root.dot
//!
//! # Validate the compiled output with cwltool afterward
//! wic-compile root.yml --cwl-validate
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

use wic_compiler::diagnostics::CompileTimeline;
use wic_compiler::model::CompileConfig;
use wic_compiler::{discovery, kernel, loader, validator, APP_NAME, VERSION};

/// Default directory to search for tool and sub-workflow documents.
const DEFAULT_SEARCH_DIR: &str = ".";

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct Cli {
    root_yml: String,
    search_dir: PathBuf,
    out_workflow: Option<PathBuf>,
    out_inputs: Option<PathBuf>,
    out_graph: Option<PathBuf>,
    config: CompileConfig,
    verbose: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            root_yml: String::new(),
            search_dir: PathBuf::from(DEFAULT_SEARCH_DIR),
            out_workflow: None,
            out_inputs: None,
            out_graph: None,
            config: CompileConfig::default(),
            verbose: false,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME, VERSION);
    println!("Recursive elaboration compiler for nested CWL sub-workflow trees");
    println!();
}

fn print_usage() {
    println!("Usage: wic-compile [OPTIONS] <ROOT_YML>");
    println!();
    println!("Arguments:");
    println!("  <ROOT_YML>                   Root sub-workflow document to elaborate");
    println!();
    println!("Options:");
    println!("  --search-dir PATH            Directory to discover tools/sub-workflows in (default: .)");
    println!("  --out PATH                   Compiled workflow output path (default: <stem>.cwl)");
    println!("  --out-inputs PATH            Inputs file output path (default: <stem>.inputs.yml)");
    println!("  --out-graph PATH             Write a Graphviz DOT rendering of the step graph");
    println!("  --graph-label-stepname       Label graph nodes with mangled step names");
    println!("  --graph-inline-depth N       Depth at which nested sub-workflows collapse to one node");
    println!("  --graph-show-inputs          Draw workflow-level input nodes");
    println!("  --graph-show-outputs         Draw workflow-level output nodes");
    println!("  --graph-label-edges          Label edges with port names");
    println!("  --cwl-output-intermediate-files  Expose intermediate step outputs as workflow outputs");
    println!("  --cwl-validate               Run cwltool --validate on the compiled output");
    println!("  --verbose                    Enable debug logging");
    println!("  --help                       Show this help message");
    println!("  --version                    Show version information");
}

fn parse_arguments(args: &[String]) -> Result<Cli, String> {
    let mut cli = Cli::default();
    let mut positional_index = 0;
    let mut i = 1;

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--search-dir" => {
                i += 1;
                let val = args.get(i).ok_or("--search-dir requires a path argument")?;
                cli.search_dir = PathBuf::from(val);
            }
            "--out" => {
                i += 1;
                let val = args.get(i).ok_or("--out requires a path argument")?;
                cli.out_workflow = Some(PathBuf::from(val));
            }
            "--out-inputs" => {
                i += 1;
                let val = args.get(i).ok_or("--out-inputs requires a path argument")?;
                cli.out_inputs = Some(PathBuf::from(val));
            }
            "--out-graph" => {
                i += 1;
                let val = args.get(i).ok_or("--out-graph requires a path argument")?;
                cli.out_graph = Some(PathBuf::from(val));
            }
            "--graph-label-stepname" => cli.config.graph_label_stepname = true,
            "--graph-inline-depth" => {
                i += 1;
                let val = args.get(i).ok_or("--graph-inline-depth requires a number argument")?;
                cli.config.graph_inline_depth = val.parse().map_err(|_| format!("invalid depth: {val}"))?;
            }
            "--graph-show-inputs" => cli.config.graph_show_inputs = true,
            "--graph-show-outputs" => cli.config.graph_show_outputs = true,
            "--graph-label-edges" => cli.config.graph_label_edges = true,
            "--cwl-output-intermediate-files" => cli.config.cwl_output_intermediate_files = true,
            "--cwl-validate" => cli.config.cwl_validate = true,
            "--verbose" | "-v" => cli.verbose = true,
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}"));
            }
            _ => {
                match positional_index {
                    0 => cli.root_yml = arg.clone(),
                    _ => return Err(format!("unexpected argument: {arg}")),
                }
                positional_index += 1;
            }
        }
        i += 1;
    }

    if cli.root_yml.is_empty() {
        return Err("missing required argument <ROOT_YML>".to_string());
    }

    Ok(cli)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let cli = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(cli.verbose);
    print_banner();

    let root_path = PathBuf::from(&cli.root_yml);
    let stem = root_path.file_stem().and_then(|s| s.to_str()).unwrap_or("workflow").to_string();

    info!("discovering tools and sub-workflows under {}", cli.search_dir.display());
    let mut discovered = discovery::discover(&cli.search_dir)?;

    let mut timeline = CompileTimeline::new();
    info!("compiling {}", root_path.display());
    let result = kernel::compile(&cli.config, &mut discovered.tools, &discovered.yml_paths, &root_path, Some(&mut timeline))?;

    let out_workflow = cli.out_workflow.unwrap_or_else(|| PathBuf::from(format!("{stem}.cwl")));
    let out_inputs = cli.out_inputs.unwrap_or_else(|| PathBuf::from(format!("{stem}.inputs.yml")));

    loader::save_compiled_workflow(&result.node.data.compiled_tree, &out_workflow)?;
    loader::save_inputs_file(&result.node.data.inputs_file, &out_inputs)?;

    if let Some(graph_path) = cli.out_graph {
        std::fs::write(&graph_path, result.node.data.cluster.to_dot())?;
        info!("wrote graph to {}", graph_path.display());
    }

    if cli.config.cwl_validate {
        validator::validate(&out_workflow);
    }

    info!("{}", timeline.report());

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!();
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
