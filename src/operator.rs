//! Line-oriented operator session.
//!
//! Each line is a URL, `raw` to paste recipe text, or `exit`. With auto
//! mode on, the frontier is drained after every input.

use crate::crawler::{CrawlSummary, Crawler};
use crate::error::CrawlError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "Enter a recipe URL (or 'exit' to quit): ";
const END_OF_PASTE: &str = "END";

/// One operator input line, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Raw,
    Url(String),
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        Command::Empty
    } else if line.eq_ignore_ascii_case("exit") {
        Command::Exit
    } else if line.eq_ignore_ascii_case("raw") {
        Command::Raw
    } else {
        Command::Url(line.to_string())
    }
}

/// Runs the interactive loop until `exit` or end of input.
pub async fn run_session<R, W>(
    crawler: &mut Crawler,
    input: R,
    output: &mut W,
    auto: bool,
) -> Result<CrawlSummary, CrawlError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = CrawlSummary::default();
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match parse_command(&line) {
            Command::Empty => continue,
            Command::Exit => {
                output.write_all(b"Exiting...\n").await?;
                break;
            }
            Command::Raw => {
                output
                    .write_all(b"Paste recipe here, finish with a line containing only END\n")
                    .await?;
                output.flush().await?;

                let mut pasted = Vec::new();
                while let Some(line) = lines.next_line().await? {
                    if line.trim() == END_OF_PASTE {
                        break;
                    }
                    pasted.push(line);
                }

                let text = pasted.join("\n");
                if text.trim().is_empty() {
                    output.write_all(b"Nothing pasted\n").await?;
                    continue;
                }
                crawler.process_text(&text).await
            }
            Command::Url(url) => {
                output.write_all(b"Processing the recipe...\n").await?;
                output.flush().await?;
                crawler.process_url(&url).await
            }
        };
        summary.record(&outcome);

        if auto {
            summary.merge(crawler.run_frontier().await);
        }
    }

    Ok(summary)
}
