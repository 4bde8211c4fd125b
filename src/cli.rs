use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "typedstate")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Validate, decode and round-trip typed resource state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to ./typedstate.toml when present)
    #[arg(long, global = true, env = "TYPEDSTATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable next-major-version behaviour
    #[arg(long, global = true)]
    pub next_major_version: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check every typed model against its resource schema
    Validate {
        /// Only validate this resource type
        resource: Option<String>,

        /// Number of parallel jobs
        #[arg(short, long, default_value = "4")]
        jobs: usize,
    },

    /// List registered resource types
    List,

    /// Decode a JSON state document into the resource's typed model
    Decode(StateArgs),

    /// Decode a JSON state document and encode it back
    Roundtrip(StateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, clap::Args)]
pub struct StateArgs {
    /// Resource type, e.g. example_lab_service_lab
    pub resource: String,

    /// JSON file holding the resource state
    pub state: PathBuf,

    /// Print the serialization trace
    #[arg(long)]
    pub trace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "typedstate",
            "decode",
            "example_lab_service_lab",
            "lab.json",
            "--next-major-version",
            "-vv",
        ]);
        assert!(cli.next_major_version);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Decode(args) => {
                assert_eq!(args.resource, "example_lab_service_lab");
                assert_eq!(args.state, PathBuf::from("lab.json"));
                assert!(!args.trace);
            }
            _ => panic!("expected decode"),
        }
    }

    #[test]
    fn test_validate_defaults() {
        let cli = Cli::parse_from(["typedstate", "validate"]);
        match cli.command {
            Command::Validate { resource, jobs } => {
                assert!(resource.is_none());
                assert_eq!(jobs, 4);
            }
            _ => panic!("expected validate"),
        }
    }
}
