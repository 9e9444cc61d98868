//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paced, rate-limit aware API calls from the command line
#[derive(Parser, Debug)]
#[command(name = "paced-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pacing configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Environment variable holding the API key
    #[arg(long, global = true, default_value = "PACED_API_KEY")]
    pub api_key_env: String,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// GET a single response
    Get {
        /// Endpoint URL
        url: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// POST to an endpoint
    Post {
        /// Endpoint URL
        url: String,

        /// Inline JSON body
        #[arg(long)]
        json: Option<String>,
    },

    /// DELETE an endpoint
    Delete {
        /// Endpoint URL
        url: String,
    },

    /// GET every page of a cursor-paginated collection
    Pages {
        /// First page URL
        url: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Print only this array field, concatenated across pages
        #[arg(long)]
        field: Option<String>,

        /// Response field holding the next cursor
        #[arg(long, default_value = "nextPageToken")]
        cursor_field: String,

        /// Query parameter that carries the cursor
        #[arg(long, default_value = "pageToken")]
        cursor_param: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a `key=value` argument
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no '=' found in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
