use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;

/// Read approvals from Gerrit events.
#[derive(Debug, Clone, Parser)]
#[command(version, author, about)]
#[command(max_term_width = 100, disable_help_subcommand = true)]
pub struct Opts {
    /// Log filter directives, of the form `target[span{field=value}]=level`, where all components
    /// except the level are optional.
    ///
    /// Try `debug` or `trace`.
    #[arg(long, default_value = "info", env = "GERRIT_EVENTS_LOG")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the approvals in `gerrit stream-events` output.
    Approvals {
        /// File of events, one JSON object per line. Defaults to stdin.
        path: Option<Utf8PathBuf>,

        /// Only show each category and value once, no matter who gave it.
        #[arg(long)]
        unique: bool,
    },
    /// Upgrade a file of saved approvals to the current format.
    Migrate {
        /// JSON file containing an array of approvals.
        path: Utf8PathBuf,

        /// Rewrite the file in place instead of printing the upgraded approvals.
        #[arg(long)]
        write: bool,
    },
}
