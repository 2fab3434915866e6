use clap::Parser;
use std::path::PathBuf;

/// Width the original terminal window laid `ls` output out in.
pub const DEFAULT_COLUMNS: usize = 71;

#[derive(Parser, Debug)]
#[clap(name = "deskfs", about = "An in-memory filesystem with a tiny shell")]
pub struct Opts {
    #[clap(short, long)]
    pub version: bool,
    #[clap(short, long)]
    pub debug: bool,
    /// Start with an empty filesystem instead of the sample tree
    #[clap(long)]
    pub no_seed: bool,
    /// Characters available per line of `ls` output
    #[clap(long)]
    pub columns: Option<usize>,
    /// Directory for log files, defaults to the user data directory
    #[clap(long)]
    pub log_dir: Option<PathBuf>,
    /// Run these commands and exit instead of reading from stdin
    #[clap(short = 'c', long = "command")]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub debug: bool,
    pub seed: bool,
    pub columns: usize,
    pub log_dir: Option<PathBuf>,
    pub commands: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            seed: true,
            columns: DEFAULT_COLUMNS,
            log_dir: None,
            commands: Vec::new(),
        }
    }
}

impl From<Opts> for Config {
    fn from(opts: Opts) -> Self {
        Config {
            debug: opts.debug,
            seed: !opts.no_seed,
            columns: opts.columns.filter(|c| *c > 0).unwrap_or(DEFAULT_COLUMNS),
            log_dir: opts.log_dir,
            commands: opts.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_command_line() {
        let opts = Opts::parse_from(["deskfs"]);
        assert_eq!(Config::from(opts), Config::default());
    }

    #[test]
    fn flags_map_onto_config() {
        let opts = Opts::parse_from([
            "deskfs", "--no-seed", "--columns", "0", "-c", "ls", "-c", "pwd", "--debug",
        ]);
        let config = Config::from(opts);
        assert!(!config.seed);
        assert!(config.debug);
        assert_eq!(config.columns, DEFAULT_COLUMNS);
        assert_eq!(config.commands, vec!["ls", "pwd"]);
    }
}
