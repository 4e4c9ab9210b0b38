use std::io::Read;

use calm_io::stdoutln;
use clap::Parser;
use cli::Opts;
use fs_err as fs;
use install_tracing::install_tracing;
use itertools::Itertools;
use miette::Context;
use miette::IntoDiagnostic;

use gerrit_events::approval_table::approval_table;
use gerrit_events::event_stream;
use gerrit_events::event_stream::EventApprovals;
use gerrit_events::persisted;

mod cli;
mod install_tracing;

fn main() -> miette::Result<()> {
    let opts = Opts::parse();
    install_tracing(&opts.log)?;

    match opts.command {
        cli::Command::Approvals { path, unique } => {
            let stdout = match &path {
                Some(path) => fs::read_to_string(path).into_diagnostic()?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .into_diagnostic()
                        .wrap_err("Failed to read events from stdin")?;
                    buffer
                }
            };
            let events = event_stream::parse_events(&stdout)?;
            let rows = events.iter().flat_map(EventApprovals::rows);
            let rows: Vec<_> = if unique {
                rows.unique_by(|(_, approval)| *approval).collect()
            } else {
                rows.collect()
            };
            let changed = rows
                .iter()
                .filter(|(_, approval)| approval.is_changed())
                .count();
            tracing::debug!(count = rows.len(), changed, unique, "Read approvals");
            let _ = stdoutln!("{}", approval_table(rows));
        }
        cli::Command::Migrate { path, write } => {
            let approvals = persisted::load_approvals(&path)?;
            if write {
                persisted::write_approvals(&path, &approvals)?;
                tracing::info!("Upgraded {} approvals in {path}", approvals.len());
            } else {
                let json = serde_json::to_string_pretty(&approvals).into_diagnostic()?;
                let _ = stdoutln!("{json}");
            }
        }
    }

    Ok(())
}
