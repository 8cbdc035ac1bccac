//! Local invocation harness.
//!
//! Runs a sample handler under the debug wrapper with a local invocation
//! context, printing event lines on stdout and the response last.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::{json, Value};
use thiserror::Error;

use lambda_debug_toolkit::config;
use lambda_debug_toolkit::handler::invoke;
use lambda_debug_toolkit::observability::tracing::{init_tracing, DEFAULT_FILTER};
use lambda_debug_toolkit::{time_fn, Debugger, InvocationContext, LocalContext};

#[derive(Parser)]
#[command(name = "lambda-debug")]
#[command(about = "Invoke a sample handler locally under the debug wrapper", long_about = None)]
struct Cli {
    /// Inline JSON event.
    #[arg(short, long, conflicts_with = "event_file")]
    event: Option<String>,

    /// Path to a JSON event file.
    #[arg(long)]
    event_file: Option<PathBuf>,

    /// TOML config file; DEBUG / LOG_SAMPLE_RATE still override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force debug events on.
    #[arg(long)]
    debug: bool,

    /// Override the default sampling rate.
    #[arg(long)]
    sample_rate: Option<f64>,

    #[arg(long, default_value = LocalContext::DEFAULT_REQUEST_ID)]
    request_id: String,

    #[arg(long, default_value = LocalContext::DEFAULT_FUNCTION_NAME)]
    function_name: String,

    #[arg(long, default_value_t = LocalContext::DEFAULT_MEMORY_LIMIT_MB)]
    memory_mb: u64,

    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
}

#[derive(Debug, Error)]
enum DemoError {
    #[error("user_id is required")]
    MissingUserId,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(DEFAULT_FILTER);

    let cli = Cli::parse();

    let mut debug_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_from_env()?,
    };
    if cli.debug {
        debug_config.debug = true;
    }
    if let Some(rate) = cli.sample_rate {
        debug_config = debug_config.with_sample_rate(rate);
    }

    let event: Value = match (&cli.event, &cli.event_file) {
        (Some(inline), _) => serde_json::from_str(inline)?,
        (None, Some(path)) => serde_json::from_str(&fs::read_to_string(path)?)?,
        (None, None) => json!({ "user_id": "test-123" }),
    };

    let ctx = LocalContext::new(
        cli.request_id,
        cli.function_name,
        cli.memory_mb,
        Duration::from_millis(cli.timeout_ms),
    );

    tracing::info!(
        debug = debug_config.debug,
        log_sample_rate = debug_config.log_sample_rate,
        request_id = %ctx.request_id(),
        "Invoking sample handler"
    );

    let debugger = Debugger::new(debug_config);
    let response = invoke(&debugger, event, &ctx, |event, _ctx| {
        sample_handler(&debugger, event)
    })?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn sample_handler(debugger: &Debugger, event: Value) -> Result<Value, DemoError> {
    let user_id = event
        .get("user_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(DemoError::MissingUserId)?;

    let data = time_fn!(debugger, get_user_data(user_id))?;

    if debugger.should_log(Some(0.1)) {
        debugger.log(
            "user_data_fetched",
            &json!({
                "user_id": user_id,
                "data_size": data.to_string().len(),
            }),
        );
    }

    let result = time_fn!(debugger, process_data(&data))?;

    Ok(json!({
        "statusCode": 200,
        "body": result.to_string(),
    }))
}

fn get_user_data(user_id: &str) -> Result<Value, DemoError> {
    Ok(json!({
        "user_id": user_id,
        "name": "Local User",
        "plan": "free",
    }))
}

fn process_data(data: &Value) -> Result<Value, DemoError> {
    std::thread::sleep(Duration::from_millis(100));
    let items = data.as_object().map_or(0, |fields| fields.len());
    Ok(json!({ "processed": true, "items": items }))
}
