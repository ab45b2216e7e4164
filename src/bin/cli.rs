//! Tavily search CLI
//!
//! One-shot web search from the command line.

use std::time::Duration;

use clap::{Parser, Subcommand};

use tavily_search::error::{Result, SearchError};
use tavily_search::format::format_results;
use tavily_search::tavily::{SearchProvider, TavilyClient, TavilyConfig};
use tavily_search::types::{SearchDepth, SearchQuery};

#[derive(Parser)]
#[command(name = "tavily-search")]
#[command(about = "Web search from the command line via the Tavily API")]
#[command(version)]
struct Cli {
    /// Tavily API key
    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Search timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a web search and print formatted results
    Search {
        /// Search query
        query: String,
        /// Search depth (basic or advanced)
        #[arg(short, long, default_value = "basic")]
        depth: String,
    },
    /// Ask a question and print the direct answer with its sources
    Answer {
        /// Question to answer
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let api_key = cli.api_key.filter(|key| !key.is_empty()).ok_or_else(|| {
        SearchError::Config("TAVILY_API_KEY environment variable required".to_string())
    })?;
    let client = TavilyClient::new(TavilyConfig::new(api_key));
    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Search { query, depth } => {
            let depth: SearchDepth = depth.parse()?;
            let search_query = SearchQuery::new(&query, depth);
            let search = client.search(&search_query);
            let response = tokio::time::timeout(timeout, search)
                .await
                .map_err(|_| SearchError::Timeout(cli.timeout))??;
            println!("{}", format_results(&response));
        }
        Commands::Answer { query } => {
            let direct = tokio::time::timeout(timeout, client.answer(&query))
                .await
                .map_err(|_| SearchError::Timeout(cli.timeout))??;
            println!("{}", direct.answer);
            if !direct.sources.is_empty() {
                println!("\nSources:");
                for source in &direct.sources {
                    println!(
                        "- {}: {}",
                        source.title.as_deref().unwrap_or("Title not found"),
                        source.url.as_deref().unwrap_or("URL not found"),
                    );
                }
            }
        }
    }

    Ok(())
}
