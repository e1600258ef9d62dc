use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spantour::{
    compute_tour_observed, AntColonyStrategy, Graph, Point, PointId, Trace, TourStrategy,
};

#[derive(Debug, Parser)]
#[command(about)]
struct Opt {
    /// A path to a JSON graph document, else reads from stdin
    file: Option<PathBuf>,

    /// Id of the start point, else the first point in the document
    #[arg(long)]
    start: Option<u64>,

    /// Tour strategy
    #[arg(long, value_enum, default_value = "span-tree")]
    strategy: Strategy,

    /// Colony size for the ant strategy
    #[arg(long, default_value_t = 20)]
    ants: usize,

    /// Lookahead depth for the ant strategy
    #[arg(long, default_value_t = 4)]
    lookahead: usize,

    /// Output file path (overwrites old files), else writes to stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Spanning-tree walk with back-edge shortcutting
    SpanTree,
    /// Probabilistic ant colony
    Ants,
}

/// Graph document: `{"points": [{"id", "x", "y"}, …], "edges": [[a, b], …]}`
#[derive(Debug, Deserialize)]
struct GraphDoc {
    points: Vec<Point>,
    edges: Vec<(PointId, PointId)>,
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spantour=info")),
        )
        .init();
    let opt = Opt::parse();

    let raw = match &opt.file {
        Some(filepath) => std::fs::read_to_string(filepath)?,
        None => {
            info!("Reading from stdin");
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let doc: GraphDoc = serde_json::from_str(&raw).expect("not a graph document");

    let start = opt
        .start
        .map(PointId)
        .or_else(|| doc.points.first().map(|p| p.id))
        .expect("graph document has no points");
    let graph = Graph::build(doc.points, &doc.edges).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    info!(
        vertices = graph.len(),
        %start,
        strategy = ?opt.strategy,
        "computing tour"
    );
    let cycle = match opt.strategy {
        Strategy::SpanTree => compute_tour_observed(&graph, start, &mut Trace),
        Strategy::Ants => AntColonyStrategy {
            ants: opt.ants,
            lookahead: opt.lookahead,
        }
        .plan(&graph, start),
    }
    .unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    match &opt.out {
        Some(filepath) => serde_json::to_writer(File::create(filepath)?, &cycle)?,
        None => {
            serde_json::to_writer(io::stdout(), &cycle)?;
            io::stdout().write_all(b"\n")?;
        }
    }

    Ok(())
}
