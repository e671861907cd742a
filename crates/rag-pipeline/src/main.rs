use anyhow::Result;
use clap::{Parser, Subcommand};
use rag_pipeline::config::Settings;
use rag_pipeline::embedding::HttpEmbedder;
use rag_pipeline::index::VectorStore;
use rag_pipeline::llm::LlmClient;
use rag_pipeline::pipeline::{Ingestor, QueryEngine, QueryResult};
use rag_pipeline::utils::logger;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "ragpipe", about = "Ingest documents and ask questions about them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a document (txt, md, pdf, docx) into the store
    Ingest {
        /// File to ingest
        file: PathBuf,
    },
    /// Ask a question, or start an interactive session when none is given
    Query {
        /// One-shot question; omit for interactive mode
        question: Option<String>,
        /// Number of chunks to retrieve
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Print store summary
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger()?;

    let cli = Cli::parse();
    let mut settings = Settings::load()?;

    match cli.command {
        Command::Ingest { file } => {
            let embedder = Arc::new(HttpEmbedder::new(&settings.embedding));
            embedder.wait_until_ready(10).await?;

            let ingestor = Ingestor::new(settings, embedder);
            let report = ingestor.ingest_file(&file).await?;

            println!(
                "Ingested {:?}: {} chunks added ({} total in store)",
                file, report.chunks_added, report.total_chunks
            );
        }

        Command::Query { question, top_k } => {
            apply_top_k_override(&mut settings, top_k)?;

            let embedder = Arc::new(HttpEmbedder::new(&settings.embedding));
            let llm = Arc::new(LlmClient::new(settings.llm.clone())?);
            let engine = QueryEngine::open(settings, embedder, llm)?;

            match question {
                Some(question) => {
                    let result = engine.answer(&question).await?;
                    print_result(&result);
                }
                None => run_repl(&engine).await?,
            }
        }

        Command::Stats => {
            let store = VectorStore::open(&settings.store, settings.embedding.dimension)?;
            println!("Chunks:    {}", store.len());
            println!("Dimension: {}", store.dimension());
            println!("Chunks at: {:?}", settings.store.chunks_path);
            println!("Index at:  {:?}", settings.store.index_path);
        }
    }

    Ok(())
}

/// Apply the --top-k flag; Settings::load already validated the configured
/// value, so the override gets the same check.
fn apply_top_k_override(settings: &mut Settings, top_k: Option<usize>) -> Result<()> {
    if let Some(k) = top_k {
        if k == 0 {
            anyhow::bail!("--top-k must be greater than zero");
        }
        settings.retrieval.top_k = k;
    }

    Ok(())
}

/// Interactive question loop, original `query.py` behavior
async fn run_repl(engine: &QueryEngine) -> Result<()> {
    info!("Interactive session started ({} chunks)", engine.store().len());

    println!("Type 'exit' or 'quit' to end the session.\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("Type your question: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let question = line.trim();

        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            break;
        }

        if question.is_empty() {
            println!("Please enter a question.");
            continue;
        }

        match engine.answer(question).await {
            Ok(result) => print_result(&result),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn print_result(result: &QueryResult) {
    println!("\n=== TOP CHUNKS ===");
    for (i, chunk) in result.hits.iter().enumerate() {
        println!(
            "{}. (Distance: {:.4}, Source: {})\n{}\n{}",
            i + 1,
            chunk.distance,
            chunk.source,
            chunk.content,
            "-".repeat(40)
        );
    }
    println!("=== END OF CHUNKS ===\n");

    println!("=== LLM RESPONSE ===\n{}\n", result.answer);
}
