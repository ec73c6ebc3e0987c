//! Housing pipeline CLI
//!
//! Command-line interface for the load, preprocess and predict stages.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::pipeline::{HousingPipeline, RunReport, RunStatus};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn fail(s: &str) -> ColoredString   { s.truecolor(235, 100, 100) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn step_failed(detail: &str) {
    println!("{} {}", fail("failed"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "housing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Housing price batch pipeline: load, preprocess, predict")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Raw CSV export (overrides configuration)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Model artifact (overrides configuration)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Table store directory (overrides configuration)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the raw CSV into the raw table
    Load,

    /// Transform the raw table into the model-ready table
    Preprocess,

    /// Score the transformed table and persist predictions
    Predict,

    /// Score the built-in three-row sample
    Sample,

    /// Print persisted predictions
    Show {
        /// Maximum rows to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Start the HTTP server
    Serve {
        /// Server port
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Server host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Load, preprocess and predict in order
    Run,
}

impl Cli {
    /// Resolve the pipeline configuration: file (or defaults), then flag overrides
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(data) = &self.data {
            config = config.with_data_path(data);
        }
        if let Some(model) = &self.model {
            config = config.with_model_path(model);
        }
        if let Some(store) = &self.store {
            config = config.with_store_dir(store);
        }
        Ok(config)
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn print_report(report: &RunReport) {
    step_run(&format!("{} [{}]", report.stage, report.run_id));
    match &report.status {
        RunStatus::Success { rows, columns } => step_done(&format!(
            "{} rows × {} cols in {}ms",
            rows, columns, report.elapsed_ms
        )),
        RunStatus::Failed { error } => step_failed(error),
    }
}

fn finish(reports: &[RunReport]) -> anyhow::Result<()> {
    let failed: Vec<_> = reports.iter().filter(|r| !r.is_success()).collect();
    println!();
    if failed.is_empty() {
        return Ok(());
    }
    let stages: Vec<String> = failed.iter().map(|r| r.stage.to_string()).collect();
    anyhow::bail!("stage(s) failed: {}", stages.join(", "))
}

pub fn cmd_load(config: PipelineConfig) -> anyhow::Result<()> {
    section("Load");
    let report = HousingPipeline::new(config).load_raw_data();
    print_report(&report);
    finish(&[report])
}

pub fn cmd_preprocess(config: PipelineConfig) -> anyhow::Result<()> {
    section("Preprocess");
    let report = HousingPipeline::new(config).preprocess();
    print_report(&report);
    finish(&[report])
}

pub fn cmd_predict(config: PipelineConfig) -> anyhow::Result<()> {
    section("Predict");
    let report = HousingPipeline::new(config).generate_predictions();
    print_report(&report);
    finish(&[report])
}

pub fn cmd_run(config: PipelineConfig) -> anyhow::Result<()> {
    section("Pipeline");
    let pipeline = HousingPipeline::new(config);
    println!("  {}", kv("Store", &pipeline.store().describe()));
    println!();

    let reports = pipeline.run_all();
    for report in &reports {
        print_report(report);
    }

    step_run("sample");
    match pipeline.sample_predictions() {
        Ok(scores) => {
            let shown: Vec<String> = scores.iter().map(|s| format!("{:.2}", s)).collect();
            step_done(&shown.join(", "));
        }
        Err(e) => step_failed(&e.to_string()),
    }

    finish(&reports)
}

pub fn cmd_sample(config: PipelineConfig) -> anyhow::Result<()> {
    section("Sample predictions");
    let scores = HousingPipeline::new(config).sample_predictions()?;
    for (i, score) in scores.iter().enumerate() {
        println!("  {:<16} {}", muted(&format!("Sample {}", i + 1)), format!("{:.2}", score).white().bold());
    }
    println!();
    Ok(())
}

pub fn cmd_show(config: PipelineConfig, limit: usize) -> anyhow::Result<()> {
    section("Predictions");
    let predictions = HousingPipeline::new(config).fetch_predictions()?;
    step_ok(&format!("{} rows × {} cols", predictions.height(), predictions.width()));
    println!();
    println!("{}", predictions.head(Some(limit)));
    println!();
    Ok(())
}

pub async fn cmd_serve(config: PipelineConfig, host: &str, port: u16) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Housing Pipeline".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Preprocess ", &format!("POST http://{}:{}/preprocess", host, port)));
    line_box(&kv("Predict    ", &format!("POST http://{}:{}/predict", host, port)));
    line_box(&kv("Results    ", &format!("GET  http://{}:{}/get_predictions", host, port)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let server = ServerConfig {
        host: host.to_string(),
        port,
    };

    run_server(server, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["housing", "show", "--limit", "3"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Show { limit: 3 })));

        let cli = Cli::try_parse_from(["housing"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_flag_overrides() {
        let cli = Cli::try_parse_from([
            "housing", "predict", "--model", "m.json", "--store", "/tmp/tables",
        ])
        .unwrap();
        let config = cli.pipeline_config().unwrap();
        assert_eq!(config.model_path, PathBuf::from("m.json"));
        assert_eq!(config.store_dir, PathBuf::from("/tmp/tables"));
    }

    #[test]
    fn test_strip_ansi() {
        let colored = format!("{}", "abc".red());
        assert_eq!(strip_ansi(&colored), "abc");
    }
}
