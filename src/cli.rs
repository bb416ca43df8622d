// Command-line surface for the `voynich` binary: argument definitions,
// dispatch of one subcommand to one client call, and the mapping from
// errors to process exit codes.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::info;

use crate::api::{ApiCall, ApiClient, DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::config::{Config, API_KEY_ENV, API_URL_ENV, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::models::{NewAnnotation, NewSymbol, Region, Timeframe, VoteType};
use crate::output::print_json;
use crate::transport::Transport;

/// Command line usage error
pub const EXIT_USAGE: i32 = 64;
/// Configuration error
pub const EXIT_CONFIG: i32 = 78;
pub const EXIT_FAILURE: i32 = 1;

/// Connection flags shared by every binary in this crate.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the API
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key for authentication
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> crate::error::Result<Config> {
        Config::new(self.base_url.as_str(), self.api_key.clone())
    }
}

/// Voynich Manuscript Research Platform API Client
#[derive(Parser, Debug)]
#[command(name = "voynich")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct RegionArgs {
    /// X coordinate
    #[arg(long, allow_negative_numbers = true)]
    pub x: i64,
    /// Y coordinate
    #[arg(long, allow_negative_numbers = true)]
    pub y: i64,
    /// Width
    #[arg(long)]
    pub width: i64,
    /// Height
    #[arg(long)]
    pub height: i64,
}

impl From<&RegionArgs> for Region {
    fn from(args: &RegionArgs) -> Self {
        Region::new(args.x, args.y, args.width, args.height)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List manuscript pages
    ListPages {
        /// Number of items to skip
        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: u32,
        /// Number of items to return
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Get a specific manuscript page
    GetPage {
        /// ID of the manuscript page
        id: i64,
    },

    /// List symbols for a page
    ListSymbols {
        /// ID of the manuscript page
        page_id: i64,
    },

    /// Create a new symbol
    CreateSymbol {
        /// ID of the manuscript page
        #[arg(long)]
        page_id: i64,
        #[command(flatten)]
        region: RegionArgs,
        /// Symbol category
        #[arg(long)]
        category: Option<String>,
        /// Additional metadata (JSON object)
        #[arg(long, value_parser = parse_metadata)]
        metadata: Option<Map<String, Value>>,
    },

    /// List annotations for a page
    ListAnnotations {
        /// ID of the manuscript page
        page_id: i64,
    },

    /// Create a new annotation
    CreateAnnotation {
        /// ID of the manuscript page
        #[arg(long)]
        page_id: i64,
        #[command(flatten)]
        region: RegionArgs,
        /// Annotation text content
        #[arg(long)]
        content: String,
        /// Keep the annotation private (annotations are public by default)
        #[arg(long)]
        private: bool,
    },

    /// Vote on an annotation
    Vote {
        /// ID of the annotation
        id: i64,
        /// Type of vote
        #[arg(value_enum)]
        vote_type: VoteType,
    },

    /// Get activity feed
    Activity {
        /// Number of items to return
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
        /// Number of items to skip
        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: u32,
    },

    /// Get leaderboard data
    Leaderboard {
        /// Timeframe for leaderboard data
        #[arg(long, value_enum, default_value_t = Timeframe::Weekly)]
        timeframe: Timeframe,
    },

    /// Get API usage statistics
    Usage,
}

fn parse_metadata(raw: &str) -> std::result::Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("metadata must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

/// Resolve the configuration, build an HTTP client and run `command`.
/// Fails before any network call when the API key is missing.
pub fn run(connection: &ConnectionArgs, command: &Commands, out: &mut dyn Write) -> Result<()> {
    let config = connection.to_config()?;
    info!(base_url = config.base_url(), "using API");
    let client = ApiClient::new(&config).context("Failed to build API client")?;
    execute(&client, command, out)
}

/// Run one subcommand against `client` and print the server's response
/// as pretty JSON, exactly as it was received.
pub fn execute<T: Transport>(
    client: &ApiClient<T>,
    command: &Commands,
    out: &mut dyn Write,
) -> Result<()> {
    let response = match command {
        Commands::ListPages { offset, limit } => client.send(&ApiCall::ListPages {
            offset: *offset,
            limit: *limit,
        })?,
        Commands::GetPage { id } => client.send(&ApiCall::GetPage(*id))?,
        Commands::ListSymbols { page_id } => client.send(&ApiCall::ListSymbols(*page_id))?,
        Commands::CreateSymbol {
            page_id,
            region,
            category,
            metadata,
        } => {
            let symbol = NewSymbol {
                page_id: *page_id,
                region: region.into(),
                category: category.clone(),
                metadata: metadata.clone(),
            };
            client.send(&ApiCall::CreateSymbol(&symbol))?
        }
        Commands::ListAnnotations { page_id } => {
            client.send(&ApiCall::ListAnnotations(*page_id))?
        }
        Commands::CreateAnnotation {
            page_id,
            region,
            content,
            private,
        } => {
            let annotation =
                NewAnnotation::new(*page_id, region.into(), content.as_str()).with_public(!private);
            client.send(&ApiCall::CreateAnnotation(&annotation))?
        }
        Commands::Vote { id, vote_type } => client.send(&ApiCall::Vote {
            annotation_id: *id,
            vote_type: *vote_type,
        })?,
        Commands::Activity { limit, offset } => client.send(&ApiCall::ActivityFeed {
            limit: *limit,
            offset: *offset,
        })?,
        Commands::Leaderboard { timeframe } => client.send(&ApiCall::Leaderboard(*timeframe))?,
        Commands::Usage => client.send(&ApiCall::Usage)?,
    };
    print_json(out, &response)?;
    Ok(())
}

/// Exit code for a top-level error.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Config(_)) => EXIT_CONFIG,
        Some(ApiError::InvalidArgument(_)) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}
