//! Analyze command - run the pipeline for one repository

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use repocat::config::Config;
use repocat::error::ClassifiedError;
use repocat::models::RepoRef;
use repocat::pipeline::{Orchestrator, PipelineFailure, PipelineOutput, PipelineState};
use repocat::providers::{
    GitHubSource, OpenRouterAssessor, Renderer, Retrier, ThreadSleeper, TogetherRenderer,
};
use repocat::selection::FileSelector;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

fn build_orchestrator(config: &Config, no_render: bool) -> Result<Orchestrator> {
    let assessor_key = config.assessor_key().context(
        "OPENROUTER_API_KEY is not configured. Get a key at https://openrouter.ai/keys \
         and export it or set [assessor] api_key in the config file",
    )?;

    let mut orchestrator = Orchestrator::new(
        Box::new(GitHubSource::new(&config.github)),
        Box::new(OpenRouterAssessor::new(&config.assessor, assessor_key)),
    )
    .with_selector(FileSelector::new(config.selection.tie_break))
    .with_content_policy(config.fetch)
    .with_retrier(Retrier::new(config.retry.clone(), Arc::new(ThreadSleeper)));

    if !no_render && config.renderer.enabled {
        match config.renderer_key() {
            Some(key) => {
                let renderer: Box<dyn Renderer> =
                    Box::new(TogetherRenderer::new(&config.renderer, key));
                orchestrator = orchestrator.with_renderer(renderer);
            }
            None => warn!("TOGETHER_API_KEY is not configured; skipping image rendering"),
        }
    }

    Ok(orchestrator)
}

/// Run the analyze command
pub fn run(config: &Config, url: &str, format: &str, no_render: bool) -> Result<()> {
    let generation_id = Uuid::new_v4();

    let repo = match RepoRef::parse(url) {
        Ok(repo) => repo,
        Err(err) => {
            report_failure(
                &PipelineFailure {
                    generation_id,
                    stage: "validation",
                    error: ClassifiedError::from(&err),
                },
                format,
            )?;
            std::process::exit(1);
        }
    };

    let orchestrator = build_orchestrator(config, no_render)?;

    let spinner = if format == "text" {
        println!(
            "\n{} Analyzing {}\n",
            style("🐱").bold(),
            style(repo.slug()).cyan()
        );
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(create_spinner_style());
        spinner.set_message("Sampling files and scoring...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let mut state = PipelineState::new(repo, generation_id);
    let result = orchestrator.execute(&mut state);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(()) => {
            let output = state.into_output()?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_text(&output);
            }
            Ok(())
        }
        Err((stage, err)) => {
            report_failure(
                &PipelineFailure {
                    generation_id,
                    stage: stage.name(),
                    error: ClassifiedError::from(&err),
                },
                format,
            )?;
            std::process::exit(1);
        }
    }
}

fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn report_failure(failure: &PipelineFailure, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(failure)?);
    } else {
        eprintln!(
            "{} {} failed [{} / {}]: {}",
            style("✗").red().bold(),
            failure.stage,
            failure.error.kind,
            failure.error.status,
            failure.error.message
        );
    }
    Ok(())
}

fn score_style(score: f64) -> console::StyledObject<String> {
    let text = format!("{:.1}", score);
    if score >= 8.0 {
        style(text).green().bold()
    } else if score >= 6.0 {
        style(text).cyan().bold()
    } else if score >= 4.0 {
        style(text).yellow().bold()
    } else {
        style(text).red().bold()
    }
}

fn print_list(title: &str, items: Option<&serde_json::Value>) {
    let Some(items) = items.and_then(|v| v.as_array()) else {
        return;
    };
    if items.is_empty() {
        return;
    }
    println!("\n{}", style(title).bold());
    for item in items.iter().filter_map(|v| v.as_str()) {
        println!("  • {}", item);
    }
}

fn print_text(output: &PipelineOutput) {
    let fused = &output.fused;
    let attrs = &output.attributes;

    println!(
        "{} {}/10  (heuristic {:.1}, review {:.1})",
        style("Score").bold(),
        score_style(fused.score),
        fused.heuristic_score,
        fused.qualitative_score
    );
    println!(
        "{} {}",
        style("Files").bold(),
        style(fused.files_analyzed.join(", ")).dim()
    );
    println!(
        "{} {:?} / {:?} / {:?} / {:?}",
        style("Cat  ").bold(),
        attrs.size,
        attrs.age,
        attrs.expression,
        attrs.breed
    );

    if let Some(summary) = fused.metrics.get("summary").and_then(|v| v.as_str()) {
        if !summary.is_empty() {
            println!("\n{}", summary);
        }
    }
    print_list("Strengths", fused.metrics.get("strengths"));
    print_list("Weaknesses", fused.metrics.get("weaknesses"));
    print_list("Recommendations", fused.metrics.get("recommendations"));

    println!("\n{}\n  {}", style("Prompt").bold(), style(&output.description).dim());

    if let Some(render) = &output.render {
        println!(
            "\n{} {}",
            style("✓").green(),
            style(&render.image_url).cyan().underlined()
        );
    }
    println!();
}
