// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (to stderr, so JSON on stdout stays clean)
// 3. Build the crawl config and run the crawl
// 4. Write / print the report
// 5. Exit with proper code (0 = success, 1 = nothing could be crawled, 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod domain;
mod error;
mod extract;
mod render;
mod report;
mod search;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CrawlArgs};
use crawl::QueryResult;
use render::HttpRenderer;
use search::DuckDuckGoSearch;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Returns:
//   Ok(0) = at least one page crawled
//   Ok(1) = every seed failed (or there were none)
//   Err   = bad input or the page session could not be opened
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Search { queries, crawl } => handle_search(&queries, &crawl).await,
        Commands::Site { urls, crawl } => handle_site(&urls, &crawl).await,
    }
}

async fn handle_search(queries: &[String], args: &CrawlArgs) -> Result<i32> {
    let (queries, config) = args.resolve(queries)?;
    if queries.is_empty() {
        bail!("No queries given (pass them as arguments or in --config)");
    }

    if !args.json {
        println!("🔍 Harvesting {} quer(ies)", queries.len());
        println!(
            "📊 Seeds per query: {}, max depth: {}, links per page: {}",
            config.urls_per_query, config.max_depth, config.urls_per_depth
        );
    }

    let search = DuckDuckGoSearch::new()?;
    let mut renderer = HttpRenderer::new();

    let results = crawl::crawl_queries(&mut renderer, &search, &config, &queries).await?;

    finish(&results, args)
}

async fn handle_site(urls: &[String], args: &CrawlArgs) -> Result<i32> {
    let (_, mut config) = args.resolve(&[])?;

    // Every URL given is a seed, unless the user capped it explicitly
    if args.urls_per_query.is_none() {
        config.urls_per_query = config.urls_per_query.max(urls.len());
    }

    if !args.json {
        println!("🔍 Crawling {} site(s)", urls.len());
        println!("📊 Max depth: {}, links per page: {}", config.max_depth, config.urls_per_depth);
    }

    let mut renderer = HttpRenderer::new();
    let result = crawl::crawl_seeds(&mut renderer, &config, &urls.join(" "), urls).await?;

    finish(&[result], args)
}

fn finish(results: &[QueryResult], args: &CrawlArgs) -> Result<i32> {
    if let Some(path) = &args.output {
        report::write_json(results, path)?;
        eprintln!("💾 Report written to {}", path.display());
    }

    if args.json {
        println!("{}", report::to_json(results)?);
    } else {
        println!();
        report::print_summary(results);
    }

    if report::has_pages(results) {
        Ok(0)
    } else {
        Ok(1)
    }
}
