// Example research workflow: a fixed sequence of client calls showing how
// the API fits together.
//
// Scenario: a researcher
// 1. retrieves a manuscript page,
// 2. lists the symbols found on it,
// 3. annotates an interesting region and upvotes the annotation,
// 4. checks recent platform activity,
// 5. looks at the weekly leaderboard,
// 6. checks their API usage.
//
// Step 3 is allowed to fail; the remaining steps still run.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::warn;

use crate::api::{ApiCall, ApiClient};
use crate::cli::ConnectionArgs;
use crate::models::{NewAnnotation, Region, Timeframe, VoteType};
use crate::output::{print_json, print_section};
use crate::transport::Transport;

const ANNOTATION_CONTENT: &str = "This area contains what appears to be a characteristic plant drawing with \
distinct leaf structures typical of the herbal section. The curved stems \
and detailed root system are particularly noteworthy.";

/// Voynich API Usage Example
#[derive(Parser, Debug)]
#[command(name = "voynich-workflow")]
#[command(author, version, about, long_about = None)]
pub struct WorkflowCli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// ID of the manuscript page to work with
    #[arg(long, default_value_t = 1)]
    pub page_id: i64,
}

#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub page_id: i64,
    pub annotation_region: Region,
    pub annotation_content: String,
    /// Pause between creating the annotation and voting on it, giving the
    /// server time to process the new record.
    pub settle_delay: Duration,
    pub activity_limit: u32,
    pub symbol_preview: usize,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        WorkflowOptions {
            page_id: 1,
            annotation_region: Region::new(200, 300, 100, 80),
            annotation_content: ANNOTATION_CONTENT.to_string(),
            settle_delay: Duration::from_secs(1),
            activity_limit: 5,
            symbol_preview: 2,
        }
    }
}

/// Run the whole workflow, printing progress to `out`. Any failure
/// outside the annotation step aborts the run.
pub fn run_example<T: Transport>(
    client: &ApiClient<T>,
    options: &WorkflowOptions,
    out: &mut dyn Write,
) -> Result<()> {
    // Step 1: the page we work on
    print_section(out, "STEP 1: Retrieving a manuscript page")?;
    writeln!(out, "Fetching manuscript page with ID {}...", options.page_id)?;
    let page = client
        .get_page(options.page_id)
        .with_context(|| format!("Failed to fetch page {}", options.page_id))?;
    writeln!(out, "Retrieved page data:")?;
    print_json(out, &page)?;

    let page_id = page.data.id;
    let folio = page.data.folio_number().unwrap_or_else(|| "?".to_string());
    writeln!(out, "\nWorking with page ID {page_id} (Folio {folio})")?;

    // Step 2: symbols on the page
    print_section(out, "STEP 2: Retrieving symbols for the page")?;
    writeln!(out, "Fetching symbols for page ID {page_id}...")?;
    let symbols = client
        .send(&ApiCall::ListSymbols(page_id))
        .context("Failed to list symbols")?;
    let symbols = data_items(&symbols);
    writeln!(out, "Found {} symbols on page {folio}", symbols.len())?;
    if !symbols.is_empty() {
        writeln!(out, "\nFirst few symbols:")?;
        for symbol in symbols.iter().take(options.symbol_preview) {
            print_json(out, symbol)?;
            writeln!(out)?;
        }
    }

    // Step 3: annotate and upvote, tolerated to fail
    print_section(out, "STEP 3: Creating an annotation")?;
    let region = options.annotation_region;
    writeln!(
        out,
        "Creating annotation at coordinates ({}, {}) with dimensions {}x{}...",
        region.x, region.y, region.width, region.height
    )?;
    if let Err(e) = annotate_and_upvote(client, page_id, options, out) {
        warn!(error = %e, "annotation step failed");
        writeln!(out, "Error creating or upvoting annotation: {e:#}")?;
    }

    // Step 4: recent activity
    print_section(out, "STEP 4: Retrieving activity feed")?;
    writeln!(out, "Fetching the latest platform activity...")?;
    let activity = client
        .send(&ApiCall::ActivityFeed {
            limit: options.activity_limit,
            offset: 0,
        })
        .context("Failed to fetch activity feed")?;
    let activity = data_items(&activity);
    writeln!(out, "Retrieved {} recent activities:", activity.len())?;
    for item in activity {
        print_json(out, item)?;
        writeln!(out)?;
    }

    // Step 5: leaderboard
    print_section(out, "STEP 5: Retrieving leaderboard data")?;
    writeln!(out, "Fetching weekly leaderboard...")?;
    let leaderboard = client
        .get_leaderboard(Timeframe::Weekly)
        .context("Failed to fetch leaderboard")?;
    writeln!(out, "Weekly leaderboard data:")?;
    print_json(out, &leaderboard)?;

    // Step 6: usage
    print_section(out, "STEP 6: Checking API usage statistics")?;
    writeln!(out, "Fetching API usage statistics...")?;
    let usage = client.get_usage().context("Failed to fetch usage statistics")?;
    writeln!(out, "API usage statistics:")?;
    print_json(out, &usage)?;

    print_section(out, "EXAMPLE WORKFLOW COMPLETED SUCCESSFULLY")?;
    Ok(())
}

fn annotate_and_upvote<T: Transport>(
    client: &ApiClient<T>,
    page_id: i64,
    options: &WorkflowOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let request = NewAnnotation::new(
        page_id,
        options.annotation_region,
        options.annotation_content.as_str(),
    );
    let annotation = client.create_annotation(&request)?;
    writeln!(out, "Annotation created successfully:")?;
    print_json(out, &annotation)?;

    let annotation_id = annotation.data.id;
    writeln!(out, "\nCreated annotation with ID: {annotation_id}")?;

    settle(options.settle_delay);

    writeln!(out, "\nUpvoting the annotation...")?;
    let vote = client.send(&ApiCall::Vote {
        annotation_id,
        vote_type: VoteType::Upvote,
    })?;
    writeln!(out, "Upvote successful:")?;
    print_json(out, &vote)?;
    Ok(())
}

// Items under `data`, or nothing when the response carries no list there.
fn data_items(response: &Value) -> &[Value] {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

// Spinner on stderr while we wait; indicatif hides it when stderr is not
// a terminal.
fn settle(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Waiting for the annotation to be processed...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    thread::sleep(delay);
    spinner.finish_and_clear();
}
