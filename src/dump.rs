//! Detection dumps: one frame per line, `<seconds>:<json array of observations>`.
//!
//! ```text
//! 0.04:[{"x":300,"y":450,"w":40,"h":100,"p":0.91,"c":7,"id":1}]
//! ```

use std::io::BufRead;

use crate::detection::Observation;
use crate::error::Error;
use crate::frame::Frame;

/// Parses one dump line. The frame is rejected as a whole when any of its
/// observations fails to decode, and so is a timestamp that is not finite.
pub fn parse_line(line: &str, lineno: usize) -> Result<Frame, Error> {
    let malformed = |reason: String| Error::MalformedDump {
        line: lineno,
        reason,
    };

    let idx = line
        .find(':')
        .ok_or_else(|| malformed("expected `:`".into()))?;
    let (ts, vector) = line.split_at(idx);

    let ts: f32 = ts
        .trim()
        .parse()
        .map_err(|e| malformed(format!("parse timestamp failed: {}", e)))?;

    if !ts.is_finite() {
        return Err(malformed(format!("timestamp `{}` is not finite", ts)));
    }

    let observations: Vec<Observation> = serde_json::from_str(&vector[1..])
        .map_err(|e| malformed(format!("parse json failed: {}", e)))?;

    Ok(Frame::new(ts, observations))
}

/// Iterates the frames of a dump, skipping blank lines. Line numbers start at 1.
pub fn read_frames<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Frame, Error>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_line(&line, idx + 1)),
            Err(err) => Some(Err(err.into())),
        })
}
