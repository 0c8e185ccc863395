use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use recall_cache::{MemoryStore, SemanticCache};
use recall_core::config::{expand_path, Config, Settings};
use recall_core::data_processor::DataProcessor;
use recall_core::traits::Embedder;
use recall_embed::HashEmbedder;
use recall_hybrid::{HybridSearchEngine, SearchRequest};
use recall_text::TantivyBackend;
use recall_vector::FlatVectorIndex;

type Engine = HybridSearchEngine<FlatVectorIndex, TantivyBackend>;

const USAGE: &str = "Usage: recall <query|vector|lexical|repl> [\"<query>\"] [--limit N] [--weights V L]";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    args.remove(0);
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

/// Positional query text plus `--limit` / `--weights` overrides.
fn build_request(engine: &Engine, args: &[String]) -> anyhow::Result<SearchRequest> {
    let mut query = None;
    let mut request = engine.request(String::new());
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--limit" => {
                let n = it.next().context("--limit needs a value")?;
                request = request.with_limit(n.parse().with_context(|| format!("bad limit {n:?}"))?);
            }
            "--weights" => {
                let (v, l) = (it.next().context("--weights needs two values")?, it.next().context("--weights needs two values")?);
                request = request.with_weights(v.parse()?, l.parse()?);
            }
            other => query = Some(other.to_string()),
        }
    }
    request.query = query.context(USAGE)?;
    Ok(request)
}

fn build_engine(settings: &Settings) -> anyhow::Result<Engine> {
    let data_dir = expand_path(&settings.data.raw_txt_dir);
    let chunks = DataProcessor::new().process_directory(&data_dir)?;
    let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(settings.embed.dim)?);
    let vector = FlatVectorIndex::build(embedder.as_ref(), &chunks)?;
    let lexical = TantivyBackend::new(&chunks)?;
    let cache = Arc::new(SemanticCache::new(Arc::new(MemoryStore::new()), embedder.clone(), &settings.cache));
    tracing::info!(dir = %data_dir.display(), chunks = chunks.len(), "engine ready");
    Ok(HybridSearchEngine::new(vector, lexical, embedder, cache, settings))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One engine for the whole session, so repeated and reworded queries show up as cache hits.
async fn repl(engine: &Engine) -> anyhow::Result<()> {
    let stdin = io::stdin();
    loop {
        print!("recall> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        let line = line.trim();
        if line.is_empty() { continue; }
        if line == ":quit" || line == ":q" { break; }
        let request = match build_request(engine, &[line.to_string()]) {
            Ok(r) => r,
            Err(e) => { eprintln!("{e:#}"); continue; }
        };
        match engine.fuse_search(&request).await {
            Ok(response) => print_json(&response)?,
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e:#}"); e })?;
    let settings = config.settings()?;
    let (cmd, args) = parse_args();
    let engine = build_engine(&settings)?;
    match cmd.as_str() {
        "query" => {
            let request = build_request(&engine, &args)?;
            print_json(&engine.fuse_search(&request).await?)?;
        }
        "vector" => {
            let request = build_request(&engine, &args)?;
            print_json(&engine.search_vector(&request.query, request.limit).await?)?;
        }
        "lexical" => {
            let request = build_request(&engine, &args)?;
            print_json(&engine.search_lexical(&request.query, request.limit).await?)?;
        }
        "repl" => repl(&engine).await?,
        _ => { eprintln!("Unknown command: {cmd}\n{USAGE}"); std::process::exit(1); }
    }
    Ok(())
}
