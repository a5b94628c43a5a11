use std::fmt;
use std::io::{self, Read};

use tracing::debug;

use super::scan::ScanState;
use crate::common::io::read_full;
use crate::common::rng::Rng;

/// Files larger than `SAMPLE_SPREAD * S` are sampled at head, middle and tail.
pub const SAMPLE_SPREAD: u64 = 5;
/// Files larger than `RANDOM_SPREAD * S` also get random windows.
pub const RANDOM_SPREAD: u64 = 1000;
/// Number of random windows taken from very large files.
pub const RANDOM_SAMPLES: usize = 10;

/// Buffer size for streaming reads from non-seekable input.
const STREAM_BUF: usize = 64 * 1024;

/// Which part of the source a pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Whole,
    Start,
    Middle,
    Random,
    End,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PassKind::Whole => "whole",
            PassKind::Start => "start",
            PassKind::Middle => "middle",
            PassKind::Random => "random",
            PassKind::End => "end",
        };
        f.write_str(s)
    }
}

/// One bounded run of the classifier. `limit == 0` means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub kind: PassKind,
    pub offset: u64,
    pub limit: u64,
}

/// Decide which windows of a `total`-byte source to scan with sample size `sample`.
///
/// - `sample == 0`: one unbounded pass.
/// - `total <= 5 * sample`: one pass of `sample` bytes from the start.
/// - otherwise start, middle, then (above `1000 * sample`) ten random
///   windows that stay at least `2 * sample` away from either end, then end.
///
/// Sources of unknown size should pass `total == 0`.
pub fn plan_passes(total: u64, sample: u64, rng: &mut Rng) -> Vec<Pass> {
    if sample == 0 {
        return vec![Pass {
            kind: PassKind::Whole,
            offset: 0,
            limit: 0,
        }];
    }

    let mut passes = vec![Pass {
        kind: PassKind::Start,
        offset: 0,
        limit: sample,
    }];

    if total <= SAMPLE_SPREAD.saturating_mul(sample) {
        return passes;
    }

    passes.push(Pass {
        kind: PassKind::Middle,
        offset: total / 2 - sample / 2,
        limit: sample,
    });

    if total > RANDOM_SPREAD.saturating_mul(sample) {
        let margin = 2 * sample;
        let mut taken = 0;
        while taken < RANDOM_SAMPLES {
            let offset = rng.gen_range(total);
            if offset < margin || offset > total - margin {
                continue;
            }
            taken += 1;
            passes.push(Pass {
                kind: PassKind::Random,
                offset,
                limit: sample,
            });
        }
    }

    passes.push(Pass {
        kind: PassKind::End,
        offset: total - sample,
        limit: sample,
    });

    passes
}

/// Run the planned passes over an in-memory (or mapped) source.
///
/// Window edges never split a CRLF: a window that starts on the LF of a
/// pair skips it, and one that ends on the CR of a pair takes the LF too.
/// A window that starts mid-file sees the real preceding byte as its
/// previous byte.
pub fn scan_bytes(state: &mut ScanState, data: &[u8], passes: &[Pass]) {
    let len = data.len();
    for pass in passes {
        let mut start = pass.offset.min(len as u64) as usize;
        let mut end = if pass.limit == 0 {
            len
        } else {
            (start as u64).saturating_add(pass.limit).min(len as u64) as usize
        };

        if start > 0 && start < end {
            if data[start - 1] == b'\r' && data[start] == b'\n' {
                start += 1;
            }
            state.previous_byte = Some(data[start - 1]);
        }
        if start < end && end < len && data[end - 1] == b'\r' && data[end] == b'\n' {
            end += 1;
        }

        debug!(
            pass = %pass.kind,
            offset = start,
            len = end.saturating_sub(start),
            "sampling"
        );
        if start < end {
            state.scan(&data[start..end]);
        }
    }
}

/// Classify a non-seekable stream: one pass from the current position,
/// bounded by `sample` bytes when `sample > 0`.
pub fn scan_reader<R: Read>(state: &mut ScanState, reader: R, sample: u64) -> io::Result<()> {
    let kind = if sample == 0 {
        PassKind::Whole
    } else {
        PassKind::Start
    };
    debug!(pass = %kind, limit = sample, "sampling stream");

    let limit = if sample == 0 { u64::MAX } else { sample };
    let mut reader = reader.take(limit);
    let mut buf = vec![0u8; STREAM_BUF];
    loop {
        let n = read_full(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        state.scan(&buf[..n]);
    }
    Ok(())
}
