//! Interactive input: how many peers and what to call them.

use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("input ended before {0} was entered")]
    Eof(&'static str),
    #[error("peer count must be an integer, got {0:?}")]
    NotAnInteger(String),
}

/// Prints `question` and returns the next line without its line ending.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    what: &'static str,
) -> Result<String, PromptError> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::Eof(what));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks for the number of peers. Range checking is left to the generator.
pub fn ask_peer_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<i64, PromptError> {
    let answer = ask(input, output, "Number of peers to create: ", "a peer count")?;
    answer
        .trim()
        .parse()
        .map_err(|_| PromptError::NotAnInteger(answer))
}

pub fn ask_name_prefix<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String, PromptError> {
    ask(input, output, "Peer name prefix: ", "a name prefix")
}
