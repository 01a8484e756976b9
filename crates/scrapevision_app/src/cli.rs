use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scrapevision_core::{
    ActiveView, CrawlMethod, Criterion, FilterCriteria, JobParams, Label, SentimentLabel,
    StarLabel,
};

use crate::error::AppError;

/// Submit a site for sentiment analysis and report the results.
#[derive(Parser, Debug)]
#[command(name = "scrapevision")]
#[command(version)]
pub struct Args {
    /// Start URL of the crawl
    pub url: String,

    /// Crawl traversal order
    #[arg(long, value_enum, default_value_t = MethodArg::Bfs)]
    pub method: MethodArg,

    /// Maximum link depth to follow
    #[arg(long, default_value_t = 5)]
    pub depth: u32,

    /// Maximum number of pages to analyse
    #[arg(long)]
    pub limit: Option<u32>,

    /// Show only this star rating in the table ("all", "1 star" .. "5 stars")
    #[arg(long, default_value = "all")]
    pub star: String,

    /// Show only this sentiment in the table ("all", "POSITIVE", "NEGATIVE", "NEUTRAL")
    #[arg(long, default_value = "all")]
    pub sentiment: String,

    /// View printed when the job completes
    #[arg(long, value_enum, default_value_t = ViewArg::Table)]
    pub view: ViewArg,

    /// Write results.csv into this directory on completion
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Config file (defaults to ./scrapevision.ron)
    #[arg(long, env = "SCRAPEVISION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the analysis service base URL
    #[arg(long, env = "SCRAPEVISION_API_BASE")]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Bfs,
    Dfs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Table,
    Histogram,
    Confidence,
}

impl From<MethodArg> for CrawlMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Bfs => CrawlMethod::Bfs,
            MethodArg::Dfs => CrawlMethod::Dfs,
        }
    }
}

impl From<ViewArg> for ActiveView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Table => ActiveView::Table,
            ViewArg::Histogram => ActiveView::StarHistogram,
            ViewArg::Confidence => ActiveView::ConfidenceChart,
        }
    }
}

impl Args {
    pub fn job_params(&self) -> JobParams {
        let params = JobParams::crawl(self.method.into(), self.depth);
        match self.limit {
            Some(limit) => params.with("limit", limit),
            None => params,
        }
    }

    pub fn filter_criteria(&self) -> Result<FilterCriteria, AppError> {
        Ok(FilterCriteria::new(
            parse_criterion("star", &self.star)?,
            parse_criterion("sentiment", &self.sentiment)?,
        ))
    }
}

fn parse_criterion<L: Label>(kind: &'static str, raw: &str) -> Result<Criterion<L>, AppError> {
    Criterion::parse(raw).ok_or_else(|| AppError::InvalidFilter {
        kind,
        value: raw.to_string(),
        expected: L::ALL
            .iter()
            .map(|label| label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
