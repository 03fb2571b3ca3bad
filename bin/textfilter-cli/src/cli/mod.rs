use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use textfilter::{dig_sort, Engine, Options};

use crate::{logging, service};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter JSON records with a gmail-style query.
///
/// Records are read from stdin, as a JSON array or one JSON object per line.
#[derive(Parser, Debug)]
#[clap(name = "tfq", version = VERSION)]
pub struct Root {
    /// The query expression.
    query: String,

    /// Path to a settings file.
    #[clap(long = "config", short = 'c')]
    config: Option<PathBuf>,

    /// Path to a logging configuration file.
    #[clap(long = "log")]
    log: Option<PathBuf>,

    /// Match text regardless of case.
    #[clap(long = "ignore-case", short = 'i')]
    ignore_case: bool,

    /// The field free text is searched in.
    #[clap(long = "haystack-key")]
    haystack_key: Option<String>,

    /// Search free text as a single phrase.
    #[clap(long = "one-token")]
    one_token: bool,

    /// Sort matches by this field.
    #[clap(long = "sort", short = 's')]
    sort: Option<String>,

    /// Sort in descending order.
    #[clap(long = "reverse", short = 'r', requires = "sort")]
    reverse: bool,

    /// Print the compiled conditions instead of filtering.
    #[clap(long = "tokens")]
    tokens: bool,
}

impl Root {
    fn options(&self) -> Result<Options> {
        let mut settings = service::settings::load(&self.config)?;

        if self.ignore_case {
            settings.ignore_case = true;
        }
        if self.one_token {
            settings.haystack_as_one_token = true;
        }
        if let Some(key) = &self.haystack_key {
            settings.haystack_key = key.clone();
        }

        Ok(Options::from_settings(settings))
    }

    pub fn run(self) -> Result<()> {
        logging::init_logger(&self.log)?;

        let engine = Engine::new(self.options()?);
        let stdout = io::stdout();
        let mut out = stdout.lock();

        if self.tokens {
            for (idx, tokens) in engine.tokenize(&self.query).iter().enumerate() {
                if idx > 0 {
                    writeln!(out, "|")?;
                }
                for token in tokens {
                    writeln!(out, "{}\t{}", token, token.describe())?;
                }
            }
            return Ok(());
        }

        let records = service::input::read_records(io::stdin().lock())?;
        let mut matches = engine.search_and_sort(&records, &self.query);
        tracing::info!(records = records.len(), matches = matches.len(), "search complete");

        if let Some(key) = &self.sort {
            dig_sort(&mut matches, key, self.reverse);
        }

        for record in matches {
            serde_json::to_writer(&mut out, record)?;
            writeln!(out)?;
        }

        Ok(())
    }
}

/// Whether the error comes from writing to a closed pipe, e.g. `tfq ... | head`.
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<io::Error>() {
            return e.kind() == io::ErrorKind::BrokenPipe;
        }
        cause
            .downcast_ref::<serde_json::Error>()
            .and_then(serde_json::Error::io_error_kind)
            == Some(io::ErrorKind::BrokenPipe)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_pipe_is_detected() {
        let err = anyhow::Error::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(is_broken_pipe(&err));

        let json_err = serde_json::Error::io(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(is_broken_pipe(&anyhow::Error::from(json_err)));

        let other = anyhow::Error::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(!is_broken_pipe(&other));
    }

    #[test]
    fn parse_flags() {
        let root = Root::try_parse_from(["tfq", "-i", "--sort", "age", "-r", "age:<30"]).unwrap();

        assert_eq!(root.query, "age:<30");
        assert!(root.ignore_case);
        assert_eq!(root.sort.as_deref(), Some("age"));
        assert!(root.reverse);
        assert!(!root.tokens);
    }

    #[test]
    fn reverse_requires_sort() {
        assert!(Root::try_parse_from(["tfq", "-r", "age:<30"]).is_err());
    }
}
