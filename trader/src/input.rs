use crate::{constants::AMOUNT_PROMPT, error::TraderResult};
use amm_core::warn;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Where the trade loop gets the asset A amount of each swap.
#[async_trait]
pub trait AmountSource: Send {
    /// The next amount, or `None` once the source is exhausted.
    async fn next_amount(&mut self) -> TraderResult<Option<u64>>;
}

/// Prompts on stdout and reads one amount per line from stdin.
pub struct StdinAmounts {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinAmounts {
    pub fn new() -> Self {
        Self { lines: BufReader::new(stdin()).lines() }
    }
}

impl Default for StdinAmounts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AmountSource for StdinAmounts {
    async fn next_amount(&mut self) -> TraderResult<Option<u64>> {
        loop {
            print!("{AMOUNT_PROMPT}");
            std::io::stdout().flush()?;
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            match parse_amount(&line) {
                Some(amount) => return Ok(Some(amount)),
                None => warn!("'{}' is not a positive amount of asset A", line.trim()),
            }
        }
    }
}

/// A whole, positive number of sats. Underscores may group digits.
pub fn parse_amount(line: &str) -> Option<u64> {
    line.trim().replace('_', "").parse::<u64>().ok().filter(|amount| *amount > 0)
}
