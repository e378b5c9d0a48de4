use std::fs;
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use symsearch::{
    CorpusSource, QueryOutcome, SearchOptions, SearchSession, SessionConfig, SourceError,
};

mod cli;
use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Search {
            corpus,
            term,
            threshold,
            limit,
        } => run_search(&corpus, &term, threshold, limit),
        Commands::Inspect { corpus } => run_inspect(&corpus),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn load_session(corpus: &Path, options: SearchOptions) -> Result<SearchSession, SourceError> {
    let blob = fs::read_to_string(corpus)
        .map_err(|e| SourceError::Unavailable(format!("{}: {}", corpus.display(), e)))?;
    let session = SearchSession::build(CorpusSource::Inline(blob), SessionConfig { options });
    match session.last_error() {
        Some(e) => Err(e.clone()),
        None => Ok(session),
    }
}

fn run_search(
    corpus: &Path,
    term: &str,
    threshold: f64,
    limit: Option<usize>,
) -> Result<(), SourceError> {
    let options = SearchOptions {
        threshold,
        limit,
        ..SearchOptions::default()
    };
    let mut session = load_session(corpus, options)?;

    let results = match session.query(term) {
        QueryOutcome::Active(results) => results,
        QueryOutcome::Inactive => {
            println!("(empty term: no query active)");
            return Ok(());
        }
        QueryOutcome::NotReady => unreachable!("load_session returned a ready session"),
    };

    if results.hits.is_empty() {
        println!("no matches for {:?}", term);
        return Ok(());
    }

    let color = atty::is(atty::Stream::Stdout);
    for hit in &results.hits {
        let Some(out) = session
            .highlight_for(results.seq, &record_name(&session, hit), term)
        else {
            continue;
        };
        println!(
            "{:>7.3}  {}",
            hit.score,
            render_marks(&out.name_html, color)
        );
        if !out.markup.is_empty() {
            println!("         {}", render_marks(&out.markup, color));
        }
    }

    let hidden: Vec<&str> = results
        .sections
        .iter()
        .filter(|s| !s.visible)
        .map(|s| s.id.as_str())
        .collect();
    if !hidden.is_empty() {
        println!("\nhidden sections: {}", hidden.join(", "));
    }

    Ok(())
}

fn record_name(session: &SearchSession, hit: &symsearch::Hit) -> String {
    session
        .index()
        .and_then(|i| i.record(hit.record_id))
        .map(|r| r.name.clone())
        .unwrap_or_default()
}

fn run_inspect(corpus: &Path) -> Result<(), SourceError> {
    let session = load_session(corpus, SearchOptions::default())?;
    let index = session
        .index()
        .expect("load_session returned a ready session");

    println!("records: {}", index.len());
    println!("terms:   {}", index.term_count());
    for record in index.records() {
        println!(
            "  {:<24} {}",
            record.name,
            truncate(&record.description, 60)
        );
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Replace the `<mark>` markers with ANSI reverse-video on a TTY, or keep
/// them literal when piping.
fn render_marks(html: &str, color: bool) -> String {
    if !color {
        return html.to_string();
    }
    html.replace(symsearch::highlight::MARK_OPEN, "\x1b[7m")
        .replace(symsearch::highlight::MARK_CLOSE, "\x1b[0m")
}
