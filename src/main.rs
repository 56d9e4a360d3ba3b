mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::{Value, json};

use cli::{Cli, Commands, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use locality_lens::{AnalysisError, AnalyzeRequest, DatasetStore};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let outcome = run(&cli);

    let (body, code) = match outcome {
        Ok(body) => (body, EXIT_SUCCESS),
        Err(err) => {
            let code = match err.downcast_ref::<AnalysisError>() {
                Some(e) if e.is_user_error() => EXIT_USAGE,
                _ => EXIT_ERROR,
            };
            log::error!("{err:#}");
            (json!({ "ok": false, "error": format!("{err:#}") }), code)
        }
    };

    let printed = if cli.pretty {
        serde_json::to_string_pretty(&body)
    } else {
        serde_json::to_string(&body)
    };
    match printed {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("failed to render output: {err}");
            return ExitCode::from(EXIT_ERROR);
        }
    }
    ExitCode::from(code)
}

fn run(cli: &Cli) -> Result<Value> {
    let store = DatasetStore::new(&cli.data);

    match &cli.command {
        Commands::Upload { file } => {
            let rows = store.replace_from_file(file)?;
            Ok(json!({
                "ok": true,
                "message": "File uploaded and dataset replaced.",
                "rows": rows,
            }))
        }
        Commands::Download { dest } => {
            let bytes = store.download_to(dest)?;
            Ok(json!({
                "ok": true,
                "message": format!("Dataset copied to {}.", dest.display()),
                "bytes": bytes,
            }))
        }
        Commands::Analyze { query, limit } => {
            let request = AnalyzeRequest::new(query.as_str()).with_limit(*limit);
            if request.query.trim().is_empty() {
                return Err(AnalysisError::BlankQuery.into());
            }
            store.load()?;
            ok_with(store.analyze(&request)?)
        }
        Commands::Compare { labels, limit } => {
            locality_lens::analysis::query::normalize_labels(labels)?;
            store.load()?;
            let comparisons = store.compare(labels, *limit)?;
            Ok(json!({ "ok": true, "comparisons": comparisons }))
        }
        Commands::Columns => {
            store.load()?;
            ok_with(store.columns()?)
        }
    }
}

/// Flatten `payload` into an `{"ok": true, ...}` envelope.
fn ok_with<T: Serialize>(payload: T) -> Result<Value> {
    let mut value = serde_json::to_value(payload).context("serializing result")?;
    if let Value::Object(map) = &mut value {
        map.insert("ok".to_string(), Value::Bool(true));
    }
    Ok(value)
}
