// ABOUTME: Accumulated build output and the completion-marker parser.
// ABOUTME: Grammar: exactly one "Successfully built " followed by the id up to end of line.

use std::collections::VecDeque;

use thiserror::Error;

use super::LOG_TAIL_LINES;
use crate::types::ImageId;

/// Line the engine prints once a classic build has produced an image.
pub const BUILD_MARKER: &str = "Successfully built ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("build output has no completion marker")]
    Missing,

    #[error("completion marker appears {0} times")]
    Ambiguous(usize),

    #[error("completion marker is not followed by an image id")]
    EmptyId,
}

/// Build output as it arrives, kept line by line.
///
/// Only the last `capacity` lines and the lines carrying the completion marker
/// are retained; a build may print far more than either.
#[derive(Debug, Clone)]
pub struct BuildLog {
    capacity: usize,
    partial: String,
    tail: VecDeque<String>,
    markers: Vec<String>,
    marker_count: usize,
}

impl Default for BuildLog {
    fn default() -> Self {
        Self::with_capacity(LOG_TAIL_LINES)
    }
}

impl BuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            partial: String::new(),
            tail: VecDeque::with_capacity(capacity),
            markers: Vec::new(),
            marker_count: 0,
        }
    }

    /// Append a chunk. Chunks may end mid-line.
    pub fn push(&mut self, chunk: &str) {
        self.partial.push_str(chunk);
        while let Some(end) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=end).collect();
            self.complete(line.trim_end_matches(['\n', '\r']).to_string());
        }
    }

    fn complete(&mut self, line: String) {
        let hits = line.matches(BUILD_MARKER).count();
        if hits > 0 {
            self.marker_count += hits;
            self.markers.push(line.clone());
        }
        if self.capacity == 0 {
            return;
        }
        if self.tail.len() == self.capacity {
            self.tail.pop_front();
        }
        self.tail.push_back(line);
    }

    /// The unterminated last line, if any.
    fn pending(&self) -> Option<&str> {
        let line = self.partial.trim_end_matches('\r');
        (!line.is_empty()).then_some(line)
    }

    /// Extract the image id announced by the completion marker.
    pub fn image_id(&self) -> Result<ImageId, MarkerError> {
        let pending = self.pending().filter(|l| l.contains(BUILD_MARKER));
        let total = self.marker_count + pending.map_or(0, |l| l.matches(BUILD_MARKER).count());
        if total > 1 {
            return Err(MarkerError::Ambiguous(total));
        }

        let Some(line) = self.markers.first().map(String::as_str).or(pending) else {
            return Err(MarkerError::Missing);
        };
        let (_, rest) = line.split_once(BUILD_MARKER).ok_or(MarkerError::Missing)?;
        let id = rest.trim();
        if id.is_empty() {
            return Err(MarkerError::EmptyId);
        }
        Ok(ImageId::new(id))
    }

    /// The last `lines` lines (at most the retained capacity), for error
    /// reports.
    pub fn tail(&self, lines: usize) -> String {
        let pending = self.pending();
        let retained = self.tail.len() + usize::from(pending.is_some());
        let skip = retained.saturating_sub(lines);
        self.tail
            .iter()
            .map(String::as_str)
            .chain(pending)
            .skip(skip)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
