//! Command-line argument parsing
//!
//! This module defines the CLI structure using clap derive macros: faceted
//! search, export quota checks and submissions, and membership checkout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::models::Channel;

/// Enterprise Lookup - search companies and manage membership
#[derive(Parser, Debug)]
#[command(
    name = "entlookup",
    version,
    about = "Search enterprise records with faceted filters, exports, and membership checkout",
    long_about = "Client for a consumer enterprise-lookup service.
Compiles faceted filter selections into weighted search queries, enforces
membership page limits, gates exports on the daily quota, and runs the
membership checkout flow."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a faceted search
    Search(SearchArgs),

    /// Export the current query or check today's allowance
    Export(ExportArgs),

    /// Purchase a membership plan
    Checkout(CheckoutArgs),
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search keyword
    #[arg(value_name = "KEYWORD")]
    pub keyword: String,

    /// Restrict keyword matching to these scope labels (e.g. 企业名称)
    #[arg(long = "scope", value_name = "LABEL")]
    pub scopes: Vec<String>,

    /// Province filter (at most one)
    #[arg(short, long)]
    pub province: Option<String>,

    /// City filters within the selected province
    #[arg(long = "city", value_name = "CITY")]
    pub cities: Vec<String>,

    /// Industry filters
    #[arg(long = "industry", value_name = "INDUSTRY")]
    pub industries: Vec<String>,

    /// Establishment-age filters (e.g. 3个月内, 10年以上)
    #[arg(long = "years", value_name = "RANGE")]
    pub year_ranges: Vec<String>,

    /// Require a contact channel to exist (电话, 邮箱, 网址)
    #[arg(long = "has", value_name = "CHANNEL")]
    pub contact_channels: Vec<String>,

    /// Page number (one-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Arguments for export management
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(subcommand)]
    pub action: ExportAction,
}

/// Export actions
#[derive(Subcommand, Debug)]
pub enum ExportAction {
    /// Show today's remaining export allowance
    Quota,

    /// Submit an export job for a query
    Submit {
        /// Search keyword
        #[arg(value_name = "KEYWORD")]
        keyword: String,

        /// Province filter
        #[arg(short, long)]
        province: Option<String>,

        /// Industry filters
        #[arg(long = "industry", value_name = "INDUSTRY")]
        industries: Vec<String>,
    },
}

/// Arguments for the checkout command
#[derive(Args, Debug, Clone)]
pub struct CheckoutArgs {
    /// Membership plan to purchase
    #[arg(value_name = "PLAN_ID")]
    pub plan_id: i64,

    /// Payment channel
    #[arg(short, long, default_value = "wechat")]
    pub channel: Channel,

    /// User-agent string used for environment detection
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl SearchArgs {
    /// Reject argument combinations the compiler cannot honor
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("Page numbers are one-based; use --page 1".to_string());
        }
        if self.province.is_none() && !self.cities.is_empty() {
            return Err("City filters require a province".to_string());
        }
        Ok(())
    }
}
