//! Scripted input for headless runs and tests.
//!
//! A script is a comma-separated list of `KEYS[:FRAMES]` segments:
//! ```text
//! w:60,wd:30,-:10,in:5,esc
//! ```
//! `KEYS` is any combination of `w a s d`, or one of `-` (idle), `in` / `out`
//! (scroll one notch), `esc` (close request). `FRAMES` defaults to 1.

use std::str::FromStr;

use crate::state::{InputSource, InputState};

/// Errors from parsing an input script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
    #[error("segment {0:?} has a frame count but no keys")]
    EmptyKeys(String),
    #[error("unknown key {key:?} in segment {segment:?}")]
    UnknownKey { segment: String, key: char },
    #[error("bad frame count in segment {segment:?}: {source}")]
    BadFrameCount {
        segment: String,
        source: std::num::ParseIntError,
    },
}

/// Plays back a fixed sequence of input states, each held for a number of
/// ticks. Once exhausted it reports idle input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    segments: Vec<(InputState, u32)>,
    segment: usize,
    frame: u32,
}

impl ScriptedInput {
    pub fn new(segments: Vec<(InputState, u32)>) -> Self {
        Self {
            segments,
            segment: 0,
            frame: 0,
        }
    }

    /// Total number of ticks the script covers.
    pub fn len_frames(&self) -> u64 {
        self.segments.iter().map(|(_, n)| u64::from(*n)).sum()
    }

    /// True once every segment has been played.
    pub fn is_finished(&self) -> bool {
        self.segment >= self.segments.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputState {
        while let Some((state, frames)) = self.segments.get(self.segment) {
            if self.frame < *frames {
                self.frame += 1;
                return *state;
            }
            self.segment += 1;
            self.frame = 0;
        }
        InputState::idle()
    }
}

impl FromStr for ScriptedInput {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for (index, raw) in s.split(',').enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(ScriptError::EmptySegment(index));
            }
            let (keys, frames) = match raw.split_once(':') {
                Some((keys, count)) => {
                    let frames = count.trim().parse::<u32>().map_err(|source| {
                        ScriptError::BadFrameCount {
                            segment: raw.to_string(),
                            source,
                        }
                    })?;
                    (keys.trim(), frames)
                }
                None => (raw, 1),
            };
            segments.push((parse_keys(raw, keys)?, frames));
        }
        tracing::debug!(segments = segments.len(), "parsed input script");
        Ok(Self::new(segments))
    }
}

fn parse_keys(segment: &str, keys: &str) -> Result<InputState, ScriptError> {
    let mut state = InputState::idle();
    match keys {
        "-" => return Ok(state),
        "esc" => return Ok(InputState::close()),
        "in" => {
            state.scroll_delta = 1.0;
            return Ok(state);
        }
        "out" => {
            state.scroll_delta = -1.0;
            return Ok(state);
        }
        _ => {}
    }
    if keys.is_empty() {
        return Err(ScriptError::EmptyKeys(segment.to_string()));
    }
    for key in keys.chars() {
        match key.to_ascii_lowercase() {
            'w' => state.forward = true,
            's' => state.back = true,
            'a' => state.left = true,
            'd' => state.right = true,
            _ => {
                return Err(ScriptError::UnknownKey {
                    segment: segment.to_string(),
                    key,
                });
            }
        }
    }
    Ok(state)
}
