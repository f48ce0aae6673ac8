//! iquery CLI: query newline-separated records from a file or stdin.

use clap::{Args, Parser, Subcommand, ValueEnum};
use iquery_core::config::{PipelineConfig, StatePolicy};
use iquery_exec::Pipeline;
use iquery_operators::{Comparator, Predicate, Projector};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "iquery")]
#[command(about = "Filter, sort, page and project text records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and print one record per line
    Run {
        #[command(flatten)]
        query: QueryArgs,

        /// Print only the element at --offset (default 0)
        #[arg(long)]
        first: bool,

        /// Print only the number of matching records
        #[arg(long)]
        count: bool,
    },

    /// Show what each stage would do (EXPLAIN), as JSON
    Explain {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Default)]
struct QueryArgs {
    /// Input file; stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON pipeline config (state policy, initial window)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep records containing this text (repeatable, all must match)
    #[arg(long)]
    contains: Vec<String>,

    /// Sort key (repeatable; later keys break ties of earlier ones)
    #[arg(long, value_enum)]
    sort: Vec<SortKey>,

    /// Skip this many records
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i64>,

    /// Yield at most this many records (-1 for no limit)
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Uppercase every emitted record
    #[arg(long)]
    upper: bool,

    /// Forget filters and sort keys after the first build
    #[arg(long)]
    consume: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SortKey {
    /// Byte-wise lexicographic
    Lex,
    /// Shortest first
    Length,
    /// Reverse lexicographic
    Reverse,
}

impl SortKey {
    fn comparator(self) -> Comparator<String> {
        match self {
            SortKey::Lex => Comparator::natural(),
            SortKey::Length => Comparator::by_key(|s: &String| s.len()),
            SortKey::Reverse => Comparator::<String>::natural().reversed(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            query,
            first,
            count,
        } => {
            if let Err(e) = run(&query, first, count) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Explain { query } => {
            if let Err(e) = explain(&query) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(args: &QueryArgs, first: bool, count: bool) -> CliResult<()> {
    let records = read_records(args.input.as_ref())?;
    let mut pipeline = build_pipeline(records, args)?;

    if first {
        if let Some(record) = pipeline.fetch_one(args.offset.unwrap_or(0))? {
            println!("{}", record);
        }
        return Ok(());
    }
    if count {
        println!("{}", pipeline.each(|_, _, _| true));
        return Ok(());
    }
    for record in pipeline.fetch_all() {
        println!("{}", record);
    }
    Ok(())
}

fn explain(args: &QueryArgs) -> CliResult<()> {
    let pipeline = build_pipeline(Vec::new(), args)?;
    println!("{}", serde_json::to_string_pretty(&pipeline.explain())?);
    Ok(())
}

fn read_records(input: Option<&PathBuf>) -> CliResult<Vec<String>> {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(text.lines().map(str::to_owned).collect())
}

/// `--config` replaces the environment as the base config; flags override either.
fn load_config(args: &QueryArgs) -> CliResult<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => PipelineConfig::from_env(),
    };
    if args.consume {
        config.state = StatePolicy::Consuming;
    }
    Ok(config)
}

fn build_pipeline(records: Vec<String>, args: &QueryArgs) -> CliResult<Pipeline<Vec<String>>> {
    let mut pipeline = Pipeline::with_config(records, load_config(args)?);

    for needle in &args.contains {
        let needle = needle.clone();
        pipeline.add_filter(Predicate::from_value(move |s: &String| s.contains(&needle)));
    }
    for key in &args.sort {
        pipeline.add_sort_by(key.comparator());
    }
    if let Some(offset) = args.offset {
        pipeline.set_offset(offset)?;
    }
    if let Some(limit) = args.limit {
        pipeline.set_limit(limit)?;
    }
    if args.upper {
        pipeline.set_select(Some(Projector::from_value(|s: String| s.to_uppercase())));
    }
    Ok(pipeline)
}
