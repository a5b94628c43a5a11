use std::fmt;

use super::scan::ScanState;

/// Lines longer than this are reported as `WIDE`.
pub const WIDE_LINE: u64 = 80;
/// Lines longer than this are reported as `LONG`.
pub const LONG_LINE: u64 = 132;

/// Which line terminators a source uses, after CRLF pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    None,
    Cr,
    Lf,
    Crlf,
    CrLf,
    CrCrlf,
    LfCrlf,
    CrLfCrlf,
}

impl LineEnding {
    /// Build from the three terminator tallies; only zero/non-zero matters.
    pub fn from_counts(cr: u64, lf: u64, crlf: u64) -> Self {
        match (cr != 0, lf != 0, crlf != 0) {
            (false, false, false) => LineEnding::None,
            (true, false, false) => LineEnding::Cr,
            (false, true, false) => LineEnding::Lf,
            (false, false, true) => LineEnding::Crlf,
            (true, true, false) => LineEnding::CrLf,
            (true, false, true) => LineEnding::CrCrlf,
            (false, true, true) => LineEnding::LfCrlf,
            (true, true, true) => LineEnding::CrLfCrlf,
        }
    }

    /// Classify a finished scan. A CR as the very last byte is not counted:
    /// the scan may have stopped between the CR and LF of a CRLF.
    pub fn of(state: &ScanState) -> Self {
        let cr = if state.previous_byte == Some(b'\r') {
            state.cr_count.saturating_sub(1)
        } else {
            state.cr_count
        };
        Self::from_counts(cr, state.lf_count, state.crlf_count)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::None => "NONE",
            LineEnding::Cr => "CR",
            LineEnding::Lf => "LF",
            LineEnding::Crlf => "CRLF",
            LineEnding::CrLf => "CR+LF",
            LineEnding::CrCrlf => "CR+CRLF",
            LineEnding::LfCrlf => "LF+CRLF",
            LineEnding::CrLfCrlf => "CR+LF+CRLF",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which optional parts of the summary to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Append the max line width to `LONG` / `WIDE`.
    pub verbose: bool,
    /// Append counts to `8BIT`, `CTRL`, `NULL` and `TAB`.
    pub counts: bool,
    /// Emit the `WL(..)IL(..)` word/identifier length tag.
    pub word_lengths: bool,
}

fn push_num(msg: &mut String, n: u64) {
    let mut buf = itoa::Buffer::new();
    msg.push_str(buf.format(n));
}

fn push_count(msg: &mut String, n: u64) {
    msg.push('(');
    push_num(msg, n);
    msg.push(')');
}

/// Render the `+`-joined summary, e.g. `LONG+8BIT+TAB+CRLF`.
/// The line-ending class is always the last segment.
pub fn format_summary(state: &ScanState, opts: &ReportOptions) -> String {
    let mut msg = String::with_capacity(64);

    let line_max = state.effective_max_line_length();
    let width_tag = if line_max > LONG_LINE {
        Some("LONG")
    } else if line_max > WIDE_LINE {
        Some("WIDE")
    } else {
        None
    };
    if let Some(tag) = width_tag {
        msg.push_str(tag);
        if opts.verbose {
            push_num(&mut msg, line_max);
        }
        msg.push('+');
    }

    if opts.word_lengths {
        msg.push_str("WL");
        push_count(&mut msg, state.max_token_length.max(state.current_token_length));
        msg.push_str("IL");
        push_count(
            &mut msg,
            state
                .max_identifier_length
                .max(state.current_identifier_length),
        );
        msg.push('+');
    }

    if state.saw_high_bit {
        msg.push_str("8BIT");
        if opts.counts {
            push_count(&mut msg, state.high_bit_count);
        }
        msg.push('+');
    }

    if state.saw_control_char {
        msg.push_str("CTRL");
        if opts.counts {
            push_count(&mut msg, state.control_count);
        }
        msg.push('+');
    }

    if state.null_count > 0 {
        msg.push_str("NULL");
        if opts.counts {
            push_count(&mut msg, state.null_count);
        }
        msg.push('+');
    }

    if state.tab_count > 0 {
        msg.push_str("TAB");
        if opts.counts {
            msg.push('(');
            push_num(&mut msg, state.tab_count);
            msg.push('/');
            push_num(&mut msg, state.effective_max_tabs_per_line());
            msg.push(')');
        }
        msg.push('+');
    }

    if state.del_count > 0 {
        msg.push_str("DEL+");
    }

    msg.push_str(LineEnding::of(state).as_str());
    msg
}
