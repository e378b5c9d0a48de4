use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "symsearch",
    about = "Fuzzy symbol search over a documentation corpus",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query a corpus and print ranked, highlighted matches
    Search {
        /// Corpus file: pre-rendered markup, or a JSON records payload
        #[arg(short, long)]
        corpus: PathBuf,

        /// The search term
        term: String,

        /// Fuzzy tolerance in [0,1]; 0 = exact token matches only
        #[arg(long, default_value_t = 0.4)]
        threshold: f64,

        /// Show at most this many hits
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Inspect a corpus: records, sections, and index statistics
    Inspect {
        /// Corpus file: pre-rendered markup, or a JSON records payload
        #[arg(short, long)]
        corpus: PathBuf,
    },
}
