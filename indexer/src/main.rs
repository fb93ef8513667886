mod display;
mod load;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use search_core::{
    process_queries, process_queries_joined, remove_duplicates, DocId, DocumentPredicate,
    DocumentStatus, ExecutionMode, LogDuration, RequestQueue, SearchConfig, SearchIndex, StopWords,
};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::PathBuf;

use display::{paginate, MatchResult};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Input path (file or directory of .json / .jsonl documents)
    #[arg(long)]
    input: PathBuf,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// JSON file with search settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the number of hits per query
    #[arg(long)]
    max_results: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<StatusArg> for DocumentStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Actual => DocumentStatus::Actual,
            StatusArg::Irrelevant => DocumentStatus::Irrelevant,
            StatusArg::Banned => DocumentStatus::Banned,
            StatusArg::Removed => DocumentStatus::Removed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents for one query
    Search {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        query: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Actual)]
        status: StatusArg,
        /// Fan scoring out over all cores
        #[arg(long, default_value_t = false)]
        parallel: bool,
        #[arg(long, default_value_t = 2)]
        page_size: usize,
    },
    /// Show which query words a document contains
    Match {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: DocId,
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Remove documents with the same vocabulary as a lower id
    Dedup {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Run every line of a file as a query
    Batch {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        queries: PathBuf,
        /// Print one flat list instead of per-query results
        #[arg(long, default_value_t = false)]
        joined: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { index, query, status, parallel, page_size } => {
            let idx = build_index(&index)?;
            let predicate = DocumentPredicate::from(DocumentStatus::from(status));
            let hits = idx.find_top_documents_with(mode(parallel), &query, &predicate)?;
            for page in paginate(&hits, page_size) {
                for doc in page {
                    println!("{doc}");
                }
                println!("Page break");
            }
        }
        Commands::Match { index, query, id, parallel } => {
            let idx = build_index(&index)?;
            let (words, status) = idx.match_document_with(mode(parallel), &query, id)?;
            println!("{}", MatchResult { id, status, words: &words });
        }
        Commands::Dedup { index } => {
            let mut idx = build_index(&index)?;
            for id in remove_duplicates(&mut idx) {
                println!("Found duplicate document id {id}");
            }
            println!("{} documents remain", idx.document_count());
        }
        Commands::Batch { index, queries, joined } => {
            let idx = build_index(&index)?;
            let text = fs::read_to_string(&queries).with_context(|| format!("reading {}", queries.display()))?;
            let queries: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
            run_batch(&idx, &queries, joined)?;
        }
    }
    Ok(())
}

fn mode(parallel: bool) -> ExecutionMode {
    if parallel { ExecutionMode::Parallel } else { ExecutionMode::Sequential }
}

fn build_index(args: &IndexArgs) -> Result<SearchIndex> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<SearchConfig>(&raw)?
        }
        None => SearchConfig::default(),
    };
    if let Some(max_results) = args.max_results {
        config.max_results = max_results;
    }
    let stop_words = StopWords::from_text(&args.stop_words)?;
    let mut idx = SearchIndex::with_config(stop_words, config);
    load::load_index(&mut idx, &args.input)?;
    Ok(idx)
}

fn run_batch(idx: &SearchIndex, queries: &[&str], joined: bool) -> Result<()> {
    {
        let _timer = LogDuration::new("process_queries");
        if joined {
            for doc in process_queries_joined(idx, queries)? {
                println!("{doc}");
            }
        } else {
            for (query, hits) in queries.iter().zip(process_queries(idx, queries)?) {
                println!("{query}: {} hits", hits.len());
                for doc in hits {
                    println!("  {doc}");
                }
            }
        }
    }

    let mut requests = RequestQueue::new(idx);
    for query in queries {
        requests.add_find_request(query)?;
    }
    println!("Total empty requests: {}", requests.no_result_requests());
    Ok(())
}
