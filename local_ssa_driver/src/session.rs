// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logger configuration of an `ssa-dump` run.

use crate::args::DumpArgs;
use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::str::FromStr;
use tracing_subscriber::{filter::Directive, layer::SubscriberExt, EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

/// Environment variable used to control this session log tracing.
const LOG_ENV_VAR: &str = "LOCAL_SSA_LOG";

/// Initialize the logger using the LOCAL_SSA_LOG environment variable and the --log-level
/// argument. Logs go to stderr; stdout is reserved for the dump.
pub fn init_logger(args: &DumpArgs) -> Result<()> {
    let filter = EnvFilter::from_env(LOG_ENV_VAR);
    let filter = if let Some(log_level) = &args.log_level {
        let directive = Directive::from_str(log_level)
            .with_context(|| format!("invalid log directive `{log_level}`"))?;
        filter.add_directive(directive)
    } else {
        filter
    };

    if args.json_logs { json_logs(filter) } else { hier_logs(filter) }
}

/// Configure global logger to use a json logger.
fn json_logs(filter: EnvFilter) -> Result<()> {
    use tracing_subscriber::fmt::layer;
    let subscriber =
        Registry::default().with(filter).with(layer().json().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")
}

/// Configure global logger to use a hierarchical view.
fn hier_logs(filter: EnvFilter) -> Result<()> {
    let use_colors = std::io::stderr().is_terminal();
    let subscriber = Registry::default().with(filter);
    let subscriber = subscriber.with(
        HierarchicalLayer::default()
            .with_writer(std::io::stderr)
            .with_indent_lines(true)
            .with_ansi(use_colors)
            .with_targets(true)
            .with_verbose_exit(true)
            .with_indent_amount(4),
    );
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")
}
