use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use onnxir::graph::Graph;

#[derive(Debug, Clone, clap::ValueEnum)]
enum EmitStage {
    Text,
    Json,
    Dot,
    Values,
    Constants,
    Fingerprint,
}

#[derive(Parser, Debug)]
#[command(
    name = "onnxir",
    version,
    about = "Inspect JSON-encoded ONNX-style graphs"
)]
struct Cli {
    /// Input graph (JSON GraphProto)
    source: PathBuf,

    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to print
    #[arg(long, value_enum, default_value_t = EmitStage::Text)]
    emit: EmitStage,

    /// Overwrite shape and type of resolved constants before emitting
    #[arg(long)]
    propagate: bool,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::debug!("source = {}", cli.source.display());
    log::debug!("emit   = {:?}", cli.emit);

    // ── Read and decode ──
    let text = match std::fs::read_to_string(&cli.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("onnxir: error: {}: {}", cli.source.display(), e);
            std::process::exit(2);
        }
    };
    let mut graph = match onnxir::codec::from_json(&text) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("onnxir: error: {}: {}", cli.source.display(), e);
            std::process::exit(1);
        }
    };
    log::debug!(
        "decoded {} nodes, {} inputs, {} initializers, {} outputs",
        graph.len(),
        graph.inputs().len(),
        graph.initializers().len(),
        graph.outputs().len()
    );

    // ── Constant resolution ──
    let constants = if cli.propagate || matches!(cli.emit, EmitStage::Constants) {
        let (lines, failed) = resolve_constants(&mut graph, cli.propagate);
        if failed {
            std::process::exit(1);
        }
        lines
    } else {
        Vec::new()
    };

    // ── Emit ──
    let rendered = match cli.emit {
        EmitStage::Text => format!("{graph}\n"),
        EmitStage::Json => match onnxir::codec::to_json(&graph) {
            Ok(s) => s + "\n",
            Err(e) => {
                eprintln!("onnxir: error: {}", e);
                std::process::exit(1);
            }
        },
        EmitStage::Dot => onnxir::dot::emit_dot(&graph),
        EmitStage::Values => render_values(&graph),
        EmitStage::Constants => constants.concat(),
        EmitStage::Fingerprint => onnxir::fingerprint::fingerprint_hex(&graph) + "\n",
    };

    let result = match &cli.output {
        Some(path) => std::fs::write(path, rendered.as_bytes()),
        None => std::io::stdout().write_all(rendered.as_bytes()),
    };
    if let Err(e) = result {
        eprintln!("onnxir: error: {}", e);
        std::process::exit(2);
    }
}

/// Resolve every top-level value; one line per constant. Diagnostics go to
/// stderr, and the flag is set if any of them is an error.
fn resolve_constants(graph: &mut Graph, propagate: bool) -> (Vec<String>, bool) {
    let (resolved, diagnostics) = onnxir::constant::resolve_all_constants(graph, propagate);
    for diag in &diagnostics {
        eprintln!("onnxir: {}", diag);
    }
    let lines = resolved
        .into_iter()
        .map(|(id, tensor)| format!("{} = {}\n", graph.value_label(id), tensor))
        .collect();
    (lines, diagnostics.iter().any(|d| d.is_error()))
}

fn render_values(graph: &Graph) -> String {
    let mut out = String::new();
    for (name, value) in onnxir::create_value_mapping(graph) {
        let owner = value.graph.name().unwrap_or("");
        let ty = value
            .value()
            .ty()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!("{name}\t{owner}\t{}\t{ty}\n", value.id));
    }
    out
}
