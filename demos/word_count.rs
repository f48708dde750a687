//! Count whitespace-separated words on stdin.
//!
//! Prints `word count` per distinct word (in table order), then the
//! number of distinct words. A token longer than 100 bytes is read as
//! several words of at most 100 bytes each, split at char boundaries.
//!
//! ```text
//! echo "the quick fox the fox the" | cargo run --example word_count
//! ```

use hashed_table::{Table, TableError};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use thiserror::Error;

const MAX_WORD: usize = 100;

#[derive(Debug, Error)]
enum CountError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

/// Split a token into pieces of at most `MAX_WORD` bytes, cut at char
/// boundaries. Each piece counts as a word of its own.
fn chunks<'a>(mut word: &'a str) -> impl Iterator<Item = &'a str> {
    std::iter::from_fn(move || {
        if word.is_empty() {
            return None;
        }
        let mut end = word.len().min(MAX_WORD);
        while !word.is_char_boundary(end) {
            end -= 1;
        }
        let (head, rest) = word.split_at(end);
        word = rest;
        Some(head)
    })
}

fn count(input: impl BufRead) -> Result<Table<Box<u64>>, CountError> {
    let mut counts: Table<Box<u64>> = Table::new()?;
    for line in input.lines() {
        let line = line?;
        for word in line.split_whitespace().flat_map(chunks) {
            if let Some(n) = counts.get_mut(word) {
                **n += 1;
                continue;
            }
            counts.set(word, Box::new(1))?;
        }
    }
    Ok(counts)
}

fn main() -> ExitCode {
    let counts = match count(io::stdin().lock()) {
        Ok(counts) => counts,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let unique = counts.len();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // Consuming the table hands each counter back; it is freed as we go.
    for (word, n) in counts {
        if writeln!(out, "{word} {n}").is_err() {
            return ExitCode::FAILURE;
        }
    }
    if writeln!(out, "{unique}").is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
