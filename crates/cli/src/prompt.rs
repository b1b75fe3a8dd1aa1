//! Line-oriented terminal I/O.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

/// Typed at an [`ask_or_keep`](Prompter::ask_or_keep) prompt to empty the
/// current value.
pub const CLEAR: &str = ":-";

/// Reads answers line by line and writes prompts.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub async fn say(&mut self, line: &str) -> io::Result<()> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// Ask for one line. `None` at end of input.
    pub async fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        self.output.write_all(format!("{label}: ").as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`ask`](Self::ask), but an empty answer keeps `current` and
    /// [`CLEAR`] yields an empty value.
    pub async fn ask_or_keep(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        let label = if current.is_empty() {
            label.to_string()
        } else {
            format!("{label} [{current}]")
        };
        Ok(self.ask(&label).await?.map(|answer| match answer.as_str() {
            "" => current.to_string(),
            CLEAR => String::new(),
            _ => answer,
        }))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
