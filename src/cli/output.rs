//! Output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{CoursearchArgs, OutputFormat};
use crate::engine::SearchResults;
use crate::error::Result;

/// Output a command result in the requested format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &CoursearchArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output search results in the requested format.
pub fn output_search_results(
    message: &str,
    results: &SearchResults,
    args: &CoursearchArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            print!("{}", format_search_results(results));
            Ok(())
        }
        OutputFormat::Json => output_json(results, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &CoursearchArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(&val));
            }
        }
        other => println!("{}", format_value(&other)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &CoursearchArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Render search results as human-readable text.
pub fn format_search_results(results: &SearchResults) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Found {} result(s) in {}ms\n",
        results.total, results.took
    ));
    if let Some(denied) = results.access_denied_count.filter(|d| *d > 0) {
        out.push_str(&format!("{denied} result(s) hidden by access rules\n"));
    }

    for (i, hit) in results.results.iter().enumerate() {
        out.push_str(&format!("{}. {} (score: {:.2})\n", i + 1, hit.id, hit.score));
        let Some(data) = &hit.data else { continue };
        if let Some(title) = hit_title(data) {
            out.push_str(&format!("   {title}\n"));
        }
        if let Some(excerpt) = data.get("excerpt").and_then(Value::as_str) {
            out.push_str(&format!("   {excerpt}\n"));
        }
    }

    for (field, facet) in &results.facets {
        if facet.terms.is_empty() {
            continue;
        }
        let terms: Vec<String> = facet
            .terms
            .iter()
            .map(|(term, count)| format!("{term} ({count})"))
            .collect();
        out.push_str(&format!("{field}: {}\n", terms.join(", ")));
    }
    out
}

fn hit_title(data: &Value) -> Option<&str> {
    data.pointer("/content/display_name")
        .or_else(|| data.get("display_name"))
        .or_else(|| data.get("name"))
        .and_then(Value::as_str)
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
