//! CLI argument and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clamp", version, about = "Bounded web-API tools for LLM agents")]
pub struct Cli {
    /// Config file to load (defaults to ~/.clamp/config.json).
    #[arg(long, env = "CLAMP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List loaded tools, or show one tool's schema.
    Tools {
        /// Tool to describe.
        name: Option<String>,
    },

    /// Call a tool and print its bounded output.
    Invoke {
        /// Tool name.
        name: String,

        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,

        /// Maximum characters returned (overrides the tool default).
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,

        /// Pattern whose matches are removed (overrides the tool default).
        #[arg(long, allow_hyphen_values = true)]
        regexp: Option<String>,

        /// Print a JSON envelope with truncation and filter flags.
        #[arg(long)]
        metadata: bool,
    },

    /// Bound a local payload (stdin by default).
    Bound {
        /// Read the payload from a file.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Maximum characters returned.
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,

        /// Pattern whose matches are removed.
        #[arg(long, allow_hyphen_values = true)]
        regexp: Option<String>,

        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invoke() {
        let cli = Cli::try_parse_from([
            "clamp", "invoke", "get_file", "--args", r#"{"file_key":"abc"}"#, "--limit", "200",
            "--metadata",
        ])
        .unwrap();

        match cli.command {
            Commands::Invoke {
                name,
                args,
                limit,
                regexp,
                metadata,
            } => {
                assert_eq!(name, "get_file");
                assert_eq!(args, r#"{"file_key":"abc"}"#);
                assert_eq!(limit.as_deref(), Some("200"));
                assert!(regexp.is_none());
                assert!(metadata);
            }
            _ => panic!("expected invoke"),
        }
    }

    #[test]
    fn test_parse_bound_defaults() {
        let cli = Cli::try_parse_from(["clamp", "-v", "bound"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Bound {
                file, limit, json, ..
            } => {
                assert!(file.is_none());
                assert!(limit.is_none());
                assert!(!json);
            }
            _ => panic!("expected bound"),
        }
    }

    #[test]
    fn test_negative_limit_reaches_binder() {
        let cli = Cli::try_parse_from(["clamp", "bound", "--limit", "-5"]).unwrap();
        match cli.command {
            Commands::Bound { limit, .. } => assert_eq!(limit.as_deref(), Some("-5")),
            _ => panic!("expected bound"),
        }
    }
}
