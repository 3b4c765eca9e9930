// Command line front end over the GitHub service

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ios-repos")]
#[command(about = "Browse the most starred iOS repositories on GitHub", long_about = None)]
pub struct Cli {
    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List iOS repositories sorted by stars
    List {
        /// Results page, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Print a repository's README
    Readme {
        /// Repository as owner/name or GitHub URL
        repository: String,
    },

    /// Percent-encode key=value pairs into a query string
    Encode {
        /// Parameters as key=value
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Decode a query string into its parameters
    Decode {
        /// Encoded query string
        query: String,
    },
}
