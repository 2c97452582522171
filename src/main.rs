use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use taxatree::model::LookupTable;
use taxatree::newick::NewickParser;
use taxatree::parser::ParsingError;

#[derive(Parser)]
#[command(
    version,
    about = "Parse a Newick tree and annotate it with family statistics",
    long_about = "Reads a Newick file, annotates named nodes from an optional JSON \
                  taxonomy dataset and prints the tree as nested JSON."
)]
struct Cli {
    /// Newick file containing a single tree
    tree: PathBuf,

    /// JSON array of records with keys fam, estimate, scaled_estimate, lwr_95, upr_95
    #[arg(short, long)]
    stats: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, default_value = "false")]
    pretty: bool,

    /// Print an indented text rendering instead of JSON
    #[arg(long, default_value = "false", conflicts_with = "pretty")]
    text: bool,

    /// Fail on input after the terminating ';'
    #[arg(long, default_value = "false")]
    strict: bool,

    /// Log debug information (overridden by RUST_LOG)
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<String, ParsingError> {
    let table = match &cli.stats {
        Some(path) => {
            let table = LookupTable::from_file(path)?;
            info!("Loaded {} families from {}", table.len(), path.display());
            table
        }
        None => LookupTable::new(),
    };

    let newick = std::fs::read_to_string(&cli.tree)?;
    let tree = NewickParser::new(&table)
        .with_strict_termination(cli.strict)
        .parse_str(&newick)?;
    info!(
        "Parsed {} nodes ({} leaves, {} annotated)",
        tree.num_nodes(),
        tree.num_leaves(),
        tree.annotated_nodes().count()
    );

    if cli.text {
        return Ok(tree.to_string());
    }
    let json = if cli.pretty {
        tree.to_json_pretty()
    } else {
        tree.to_json()
    };
    json.map_err(ParsingError::from)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
