//! Library half of the `tracecluster` binary, kept separate so the
//! command flow can be driven from tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracecluster_core::config::{CliOverrides, TraceClusterConfig};
use tracecluster_core::constants::REPORT_FILE_PREFIX;
use tracecluster_core::errors::ErrorCode;
use tracecluster_core::types::Trace;
use tracecluster_engine::report::{base_report, full_report, Report};
use tracecluster_engine::truth::extract_truth;
use tracecluster_engine::ClusterPipeline;
use tracing::info;
use walkdir::WalkDir;

#[derive(Debug, Parser)]
#[command(name = "tracecluster")]
#[command(about = "Cluster execution traces by dynamic control-flow similarity")]
pub struct Cli {
    /// Traces root directory, searched recursively. Every file is a trace.
    #[arg(short = 'i', value_name = "DIR")]
    pub input: PathBuf,

    /// Directory receiving the `report_<unix-millis>` JSON file.
    #[arg(short = 'o', value_name = "DIR")]
    pub output: PathBuf,

    /// Regex locating the ground-truth tag in each trace path. Enables scoring.
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Outlier ratio in [0, 1]; 0 disables outlier detection.
    #[arg(long)]
    pub outlier: Option<f64>,

    /// Maximum number of clusters tried (at least 2).
    #[arg(long = "cluster-limit", visible_alias = "cluster_limit")]
    pub cluster_limit: Option<usize>,

    /// Config file read instead of `tracecluster.toml` in the working directory.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            outlier_ratio: self.outlier,
            max_cluster: self.cluster_limit,
            benchmark: self.benchmark.clone(),
            config_file: self.config.clone(),
        }
    }
}

/// Every regular file under `root`, following symlinks, sorted by path.
pub fn collect_traces(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("trace root {} is not a directory", root.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Cluster the traces and build the report; nothing is written.
pub fn build_report(config: &TraceClusterConfig, paths: &[PathBuf]) -> Result<Report> {
    let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();

    let truth = match config.evaluation.benchmark_pattern() {
        Some(pattern) => {
            let tags = extract_truth(&names, pattern).context("building ground truth")?;
            info!(tags = tags.len(), "benchmark has been built");
            Some(tags)
        }
        None => None,
    };

    let run = ClusterPipeline::from_config(config)
        .run(&Trace::sequence(paths))
        .map_err(|e| anyhow!("clustering traces: {}", e.coded_string()))?;

    info!("generating report");
    let report = match truth {
        Some(tags) => Report::Full(full_report(
            &names,
            &run.labels,
            &tags,
            config.evaluation.effective_f_beta(),
        )?),
        None => Report::Base(base_report(&names, &run.labels)?),
    };
    Ok(report)
}

/// Short human summary: scores, outlier count, cluster count.
pub fn preview(report: &Report) -> Result<String> {
    let mut out = String::new();
    if let Some(scores) = report.scores() {
        out.push_str(&serde_json::to_string_pretty(scores)?);
        out.push('\n');
    }
    if let Some(outliers) = report.outlier_count() {
        out.push_str(&format!("{outliers} outliers in total\n"));
    }
    out.push_str(&format!("{} clusters in total\n", report.cluster_count()));
    Ok(out)
}

/// Write `report` as `report_<unix-millis>` into `dir`.
pub fn write_report(dir: &Path, report: &Report) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_millis();
    let path = dir.join(format!("{REPORT_FILE_PREFIX}{millis}"));
    let json = report.to_json_pretty().context("serializing report")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Full command flow.
pub fn run(cli: &Cli) -> Result<PathBuf> {
    let root = std::env::current_dir().context("resolving working directory")?;
    let config = TraceClusterConfig::load(&root, Some(&cli.overrides()))?;

    let paths = collect_traces(&cli.input)?;
    info!(count = paths.len(), root = %cli.input.display(), "found trace files");

    let report = build_report(&config, &paths)?;
    print!("{}", preview(&report)?);

    let path = write_report(&cli.output, &report)?;
    info!(path = %path.display(), "report saved");
    Ok(path)
}
