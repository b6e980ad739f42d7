use std::path::Path;

use anyhow::Context;
use shared::domain::Frame;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::{wrappers::LinesStream, StreamExt};
use tracing::warn;

type LineReader = BufReader<Box<dyn AsyncRead + Unpin + Send>>;

/// Newline-delimited JSON frames from a file or stdin, handed out as
/// consecutive (previous, current) pairs.
pub struct FrameSource {
    lines: LinesStream<LineReader>,
    previous: Option<Frame>,
    line_number: usize,
}

impl FrameSource {
    pub async fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let reader: Box<dyn AsyncRead + Unpin + Send> = match path {
            Some(path) => Box::new(
                tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("failed to open frames '{}'", path.display()))?,
            ),
            None => Box::new(tokio::io::stdin()),
        };
        Ok(Self::from_reader(reader))
    }

    pub fn from_reader(reader: Box<dyn AsyncRead + Unpin + Send>) -> Self {
        Self {
            lines: LinesStream::new(BufReader::new(reader).lines()),
            previous: None,
            line_number: 0,
        }
    }

    /// Next frame that parses, or `None` at end of input.
    pub async fn next_frame(&mut self) -> anyhow::Result<Option<Frame>> {
        while let Some(line) = self.lines.next().await {
            self.line_number += 1;
            let line = line.context("failed to read frame input")?;
            if let Some(frame) = parse_frame_line(&line, self.line_number) {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Slides the depth-2 window forward. The first frame only primes it;
    /// afterwards each call yields the previous frame together with the new
    /// current one.
    pub async fn next_pair(&mut self) -> anyhow::Result<Option<(Frame, Frame)>> {
        loop {
            let Some(current) = self.next_frame().await? else {
                return Ok(None);
            };
            match self.previous.replace(current.clone()) {
                Some(previous) => return Ok(Some((previous, current))),
                None => continue,
            }
        }
    }
}

pub(crate) fn parse_frame_line(line: &str, line_number: usize) -> Option<Frame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(frame) => Some(frame),
        Err(error) => {
            warn!(line_number, %error, "skipping malformed frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(input: &'static str) -> FrameSource {
        FrameSource::from_reader(Box::new(input.as_bytes()))
    }

    #[tokio::test]
    async fn pairs_consecutive_frames_and_skips_bad_lines() {
        let mut frames = source(
            "{\"id\":1,\"hands\":[]}\n\nnot json\n{\"id\":2}\n{\"id\":3,\"hands\":[]}\n",
        );

        let (previous, current) = frames.next_pair().await.expect("read").expect("pair");
        assert_eq!((previous.id, current.id), (Some(1), Some(2)));
        let (previous, current) = frames.next_pair().await.expect("read").expect("pair");
        assert_eq!((previous.id, current.id), (Some(2), Some(3)));
        assert!(frames.next_pair().await.expect("read").is_none());
    }

    #[tokio::test]
    async fn single_frame_only_primes_the_window() {
        let mut frames = source("{\"id\":1}\n");
        assert!(frames.next_pair().await.expect("read").is_none());
    }

    #[test]
    fn blank_and_malformed_lines_parse_to_nothing() {
        assert!(parse_frame_line("   ", 1).is_none());
        assert!(parse_frame_line("{\"hands\": 5}", 2).is_none());
        assert!(parse_frame_line("{}", 3).is_some());
    }
}
