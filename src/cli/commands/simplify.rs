//! Policy simplification command.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use super::extract::load_document;
use crate::analysis::{validate_text, SimplificationResult, Simplifier};
use crate::config::Config;
use crate::llm::GeminiClient;
use crate::markup;

/// Where the policy text comes from.
pub enum Input {
    File(PathBuf),
    Text(String),
}

pub async fn cmd_simplify(config: &Config, input: Input, json: bool) -> anyhow::Result<()> {
    let text = match input {
        Input::File(path) => load_document(config, &path).await?.text,
        Input::Text(text) => text,
    };
    validate_text(&text)?;

    let client = GeminiClient::new(config.gemini.clone())?;
    let simplifier =
        Simplifier::new(Arc::new(client)).with_failure_policy(config.analysis.on_failure);

    eprintln!(
        "{} Analyzing {} characters with {}...",
        style("→").cyan(),
        text.chars().count(),
        simplifier.model_name()
    );

    let result = simplifier.simplify(&text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_result(&result));
    }
    Ok(())
}

/// Render a result for the terminal.
fn format_result(result: &SimplificationResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style("Plain-English Summary").bold().underlined()));
    out.push_str(&format!("{}\n\n", markup::to_terminal(&result.summary)));

    out.push_str(&format!("{}\n", style("Pros").green().bold()));
    for pro in &result.pros {
        out.push_str(&format!("  {} {}\n", style("+").green(), markup::to_terminal(pro)));
    }

    out.push_str(&format!("\n{}\n", style("Cons").red().bold()));
    for con in &result.cons {
        out.push_str(&format!("  {} {}\n", style("-").red(), markup::to_terminal(con)));
    }
    out
}
