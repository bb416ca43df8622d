//! Integration tests for the `voynich` command-line surface: argument
//! parsing, configuration resolution and command dispatch.

use clap::Parser;
use reqwest::Method;
use serde_json::{json, Value};

use voynich_cli::cli::{execute, exit_code, run, Cli, Commands, EXIT_CONFIG};
use voynich_cli::config::{API_KEY_ENV, API_URL_ENV};
use voynich_cli::models::{Timeframe, VoteType};
use voynich_cli::testing::{init_test_setup, MockTransport};
use voynich_cli::{ApiClient, ApiError, Config};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("voynich").chain(args.iter().copied()))
        .expect("arguments should parse")
}

fn mock_client(transport: MockTransport) -> ApiClient<MockTransport> {
    init_test_setup();
    let config = Config::new("http://voynich.test", Some("test-key".into())).expect("config");
    ApiClient::with_transport(&config, transport).expect("client")
}

fn run_command(client: &ApiClient<MockTransport>, args: &[&str]) -> String {
    let cli = parse(args);
    let command = cli.command.expect("subcommand");
    let mut out = Vec::new();
    execute(client, &command, &mut out).expect("command succeeds");
    String::from_utf8(out).expect("utf8 output")
}

// ============================================================
// Parsing
// ============================================================

#[test]
fn given_no_subcommand_when_parsed_then_command_is_none() {
    let cli = parse(&["--api-key", "k"]);
    assert!(cli.command.is_none());
}

#[test]
fn given_leaderboard_without_timeframe_when_parsed_then_defaults_to_weekly() {
    match parse(&["leaderboard"]).command {
        Some(Commands::Leaderboard { timeframe }) => assert_eq!(timeframe, Timeframe::Weekly),
        other => panic!("unexpected command: {other:?}"),
    }
    match parse(&["leaderboard", "--timeframe", "alltime"]).command {
        Some(Commands::Leaderboard { timeframe }) => assert_eq!(timeframe, Timeframe::AllTime),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_list_pages_without_flags_when_parsed_then_uses_defaults() {
    match parse(&["list-pages"]).command {
        Some(Commands::ListPages { offset, limit }) => {
            assert_eq!(offset, 0);
            assert_eq!(limit, 20);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_vote_arguments_when_parsed_then_vote_type_is_typed() {
    match parse(&["vote", "12", "downvote"]).command {
        Some(Commands::Vote { id, vote_type }) => {
            assert_eq!(id, 12);
            assert_eq!(vote_type, VoteType::Downvote);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_invalid_vote_or_timeframe_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["voynich", "vote", "12", "sideways"]).is_err());
    assert!(Cli::try_parse_from(["voynich", "leaderboard", "--timeframe", "yearly"]).is_err());
}

#[test]
fn given_metadata_when_parsed_then_must_be_json_object() {
    let base = [
        "voynich", "create-symbol", "--page-id", "1", "--x", "1", "--y", "2", "--width", "3",
        "--height", "4", "--metadata",
    ];
    let with = |metadata: &str| {
        let mut args: Vec<&str> = base.to_vec();
        args.push(metadata);
        Cli::try_parse_from(args)
    };

    assert!(with(r#"{"script": "eva"}"#).is_ok());
    assert!(with("[1, 2]").is_err());
    assert!(with("{not json").is_err());
}

#[test]
fn given_connection_flags_and_env_when_parsed_then_flags_win() {
    std::env::set_var(API_URL_ENV, "http://from-env.test");
    std::env::set_var(API_KEY_ENV, "env-key");

    let from_env = parse(&["usage"]);
    let from_flag = parse(&[
        "--base-url",
        "http://from-flag.test/",
        "--api-key",
        "flag-key",
        "usage",
    ]);

    std::env::remove_var(API_URL_ENV);
    std::env::remove_var(API_KEY_ENV);

    let env_config = from_env.connection.to_config().expect("config from env");
    assert_eq!(env_config.base_url(), "http://from-env.test");
    assert_eq!(env_config.api_key(), "env-key");

    let flag_config = from_flag.connection.to_config().expect("config from flags");
    assert_eq!(flag_config.base_url(), "http://from-flag.test");
    assert_eq!(flag_config.api_key(), "flag-key");
}

// ============================================================
// Configuration errors
// ============================================================

#[test]
fn given_missing_api_key_when_running_then_fails_with_config_error() {
    let cli = parse(&["--base-url", "http://127.0.0.1:9", "--api-key", "", "usage"]);
    let command = cli.command.as_ref().expect("subcommand");
    let mut out = Vec::new();

    let err = run(&cli.connection, command, &mut out).expect_err("missing key");

    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Config(_))
    ));
    assert!(err.to_string().contains("API key is required"));
    assert_eq!(exit_code(&err), EXIT_CONFIG);
    assert!(out.is_empty());
}

// ============================================================
// Dispatch
// ============================================================

#[test]
fn given_list_pages_when_executed_then_prints_pretty_json() {
    let client = mock_client(MockTransport::new().route(
        Method::GET,
        "pages",
        200,
        json!({"data": [{"id": 1, "folioNumber": "1r"}]}),
    ));

    let output = run_command(&client, &["list-pages", "--offset", "10", "--limit", "5"]);

    assert!(output.contains("\"folioNumber\": \"1r\""), "got: {output}");
    let printed: Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(printed["data"][0]["id"], 1);
    assert_eq!(
        client.transport().requests()[0].query,
        vec![
            ("offset".to_string(), "10".to_string()),
            ("limit".to_string(), "5".to_string())
        ]
    );
}

#[test]
fn given_private_flag_when_creating_annotation_then_sends_is_public_false() {
    let client = mock_client(MockTransport::new().route(
        Method::POST,
        "annotations",
        201,
        json!({"data": {"id": 5}}),
    ));

    run_command(
        &client,
        &[
            "create-annotation", "--page-id", "1", "--x", "200", "--y", "300", "--width", "100",
            "--height", "80", "--content", "leaf", "--private",
        ],
    );

    let body = client.transport().requests()[0].body.clone().expect("body");
    assert_eq!(body["isPublic"], false);
    assert_eq!(body["content"], "leaf");
}

#[test]
fn given_create_symbol_with_metadata_when_executed_then_posts_metadata() {
    let client = mock_client(MockTransport::new().route(
        Method::POST,
        "symbols",
        201,
        json!({"data": {"id": 8}}),
    ));

    run_command(
        &client,
        &[
            "create-symbol", "--page-id", "2", "--x", "1", "--y", "2", "--width", "3", "--height",
            "4", "--category", "gallows", "--metadata", r#"{"script": "eva"}"#,
        ],
    );

    let body = client.transport().requests()[0].body.clone().expect("body");
    assert_eq!(
        body,
        json!({
            "pageId": 2, "x": 1, "y": 2, "width": 3, "height": 4,
            "category": "gallows", "metadata": {"script": "eva"}
        })
    );
}

#[test]
fn given_server_error_when_executed_then_error_propagates_with_exit_code_one() {
    let client = mock_client(MockTransport::new().route(
        Method::GET,
        "pages/999",
        404,
        json!({"error": "not found"}),
    ));
    let command = parse(&["get-page", "999"]).command.expect("subcommand");
    let mut out = Vec::new();

    let err = execute(&client, &command, &mut out).expect_err("not found");

    assert!(err.to_string().contains("not found"));
    assert_eq!(exit_code(&err), 1);
}

// ============================================================
// Pass-through output
// ============================================================

fn printed_for(path: &str, payload: Value, args: &[&str]) -> String {
    let client = mock_client(MockTransport::new().route(Method::GET, path, 200, payload));
    run_command(&client, args)
}

#[test]
fn given_null_folio_when_getting_page_then_prints_payload_unchanged() {
    let payload = json!({"data": {"id": 1, "folioNumber": null, "imageUrl": "x"}});

    let output = printed_for("pages/1", payload.clone(), &["get-page", "1"]);

    let printed: Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(printed, payload);
    assert!(output.contains("\"folioNumber\": null"), "got: {output}");
}

#[test]
fn given_numeric_folio_when_getting_page_then_prints_it() {
    let payload = json!({"data": {"id": 1, "folioNumber": 17}});

    let output = printed_for("pages/1", payload.clone(), &["get-page", "1"]);

    let printed: Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(printed, payload);
}

#[test]
fn given_response_without_data_key_when_listing_pages_then_prints_it() {
    let payload = json!({"pages": [], "total": 0});

    let output = printed_for("pages", payload.clone(), &["list-pages"]);

    let printed: Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(printed, payload);
}

#[test]
fn given_vote_response_without_data_key_when_voting_then_prints_it() {
    let payload = json!({"ok": true, "votes": 3});
    let client = mock_client(MockTransport::new().route(
        Method::POST,
        "annotations/12/vote",
        200,
        payload.clone(),
    ));

    let output = run_command(&client, &["vote", "12", "upvote"]);

    let printed: Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(printed, payload);
}

#[test]
fn given_server_key_order_when_printing_then_order_is_kept() {
    let client = mock_client(MockTransport::new().route_text(
        Method::GET,
        "pages/42",
        200,
        r#"{"data": {"id": 42, "zeta": 1, "alpha": 2}}"#,
    ));

    let output = run_command(&client, &["get-page", "42"]);

    let zeta = output.find("\"zeta\"").expect("zeta printed");
    let alpha = output.find("\"alpha\"").expect("alpha printed");
    assert!(zeta < alpha, "got: {output}");
}
