const CR: u8 = b'\r';
const LF: u8 = b'\n';
const NUL: u8 = 0x00;
const TAB: u8 = b'\t';
const SPACE: u8 = b' ';
const VTAB: u8 = 0x0B;
const BACKSPACE: u8 = 0x08;
const FORMFEED: u8 = 0x0C;
const DEL: u8 = 0x7F;

/// Byte class bits for the word/identifier tracker.
const SPACE_BIT: u8 = 1;
const ALNUM_BIT: u8 = 2;

/// C locale `isspace()` / `isalnum()` as one lookup table.
/// Bytes above 127 are neither.
const fn make_class_table() -> [u8; 256] {
    let mut t = [0u8; 256];
    t[0x09] = SPACE_BIT; // \t
    t[0x0A] = SPACE_BIT; // \n
    t[0x0B] = SPACE_BIT; // \v
    t[0x0C] = SPACE_BIT; // \f
    t[0x0D] = SPACE_BIT; // \r
    t[0x20] = SPACE_BIT; // space
    let mut b = b'0';
    while b <= b'9' {
        t[b as usize] = ALNUM_BIT;
        b += 1;
    }
    let mut b = b'A';
    while b <= b'Z' {
        t[b as usize] = ALNUM_BIT;
        t[(b + 32) as usize] = ALNUM_BIT;
        b += 1;
    }
    t
}

const CLASS_TABLE: [u8; 256] = make_class_table();

#[inline]
fn class_of(b: Option<u8>) -> u8 {
    match b {
        Some(b) => CLASS_TABLE[b as usize],
        None => 0,
    }
}

/// Saturating counter increment. Counters stick at `u64::MAX` instead of
/// wrapping, so a pathological input can only under-report, never flip a
/// count back to zero.
#[inline]
pub fn incr(value: &mut u64) {
    *value = value.saturating_add(1);
}

/// Where a NUL byte was seen: column within its line and zero-based line
/// number (the number of line terminators seen before it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullSite {
    pub column: u64,
    pub line: u64,
}

/// Running counters for one input source.
///
/// Created fresh per source, fed by one or more scan passes, then read by
/// the formatter. Passes accumulate: no counter is reset between them.
/// Within one pass, and across the chunks of a streamed read,
/// `previous_byte` is the byte just before the current one. A sampled
/// window that starts mid-file has it set to the byte preceding the window
/// in the file, so two windows never pair a CR and LF that are not adjacent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    pub previous_byte: Option<u8>,
    pub current_line_length: u64,
    pub max_line_length: u64,
    pub current_token_length: u64,
    pub max_token_length: u64,
    pub current_identifier_length: u64,
    pub max_identifier_length: u64,
    pub tab_count: u64,
    pub tabs_since_last_line_end: u64,
    pub max_tabs_per_line: u64,
    pub null_count: u64,
    pub del_count: u64,
    pub high_bit_count: u64,
    pub control_count: u64,
    /// Bare CRs. Given back by one whenever an LF completes a CRLF.
    pub cr_count: u64,
    pub lf_count: u64,
    pub crlf_count: u64,
    pub saw_high_bit: bool,
    pub saw_control_char: bool,
    /// Size of the source when known (regular files only).
    pub total_source_size: Option<u64>,
    /// How many more NUL sites may be recorded.
    pub null_budget: u32,
    pub null_sites: Vec<NullSite>,
    pub bytes_scanned: u64,
}

impl ScanState {
    pub fn new(total_source_size: Option<u64>, null_budget: u32) -> Self {
        ScanState {
            total_source_size,
            null_budget,
            ..Default::default()
        }
    }

    /// Number of line terminators seen so far, of any kind.
    #[inline]
    pub fn line_number(&self) -> u64 {
        self.cr_count
            .saturating_add(self.lf_count)
            .saturating_add(self.crlf_count)
    }

    /// Longest line including a trailing line that never got terminated.
    #[inline]
    pub fn effective_max_line_length(&self) -> u64 {
        self.max_line_length.max(self.current_line_length)
    }

    /// Most tabs on one line, counting an unterminated trailing line.
    #[inline]
    pub fn effective_max_tabs_per_line(&self) -> u64 {
        self.max_tabs_per_line.max(self.tabs_since_last_line_end)
    }

    #[inline]
    fn flush_tabs(&mut self) {
        if self.max_tabs_per_line < self.tabs_since_last_line_end {
            self.max_tabs_per_line = self.tabs_since_last_line_end;
        }
        self.tabs_since_last_line_end = 0;
    }

    /// Classify every byte of `data`, in order.
    pub fn scan(&mut self, data: &[u8]) {
        for &c in data {
            self.scan_byte(c);
        }
        self.bytes_scanned = self.bytes_scanned.saturating_add(data.len() as u64);
    }

    #[inline]
    fn scan_byte(&mut self, c: u8) {
        if self.current_line_length > self.max_line_length {
            self.max_line_length = self.current_line_length;
        }
        if self.current_token_length > self.max_token_length {
            self.max_token_length = self.current_token_length;
        }
        if self.current_identifier_length > self.max_identifier_length {
            self.max_identifier_length = self.current_identifier_length;
        }

        if c > 127 {
            self.saw_high_bit = true;
            incr(&mut self.high_bit_count);
        }

        if c == DEL {
            incr(&mut self.del_count);
        }

        let class = CLASS_TABLE[c as usize];
        let prev_class = class_of(self.previous_byte);
        if class & SPACE_BIT != 0 && prev_class & SPACE_BIT == 0 {
            self.current_token_length = 0;
        }
        if class & ALNUM_BIT == 0 && prev_class & ALNUM_BIT != 0 {
            self.current_identifier_length = 0;
        }
        if class & ALNUM_BIT != 0 {
            incr(&mut self.current_identifier_length);
        }

        if c > 32 {
            incr(&mut self.current_line_length);
            incr(&mut self.current_token_length);
        } else {
            match c {
                CR => {
                    incr(&mut self.cr_count);
                    self.flush_tabs();
                    self.current_line_length = 0;
                }
                LF => {
                    if self.previous_byte == Some(CR) {
                        incr(&mut self.crlf_count);
                        self.cr_count = self.cr_count.saturating_sub(1);
                    } else {
                        incr(&mut self.lf_count);
                    }
                    self.flush_tabs();
                    self.current_line_length = 0;
                }
                NUL => {
                    incr(&mut self.null_count);
                    if self.null_budget > 0 {
                        self.null_budget -= 1;
                        self.null_sites.push(NullSite {
                            column: self.current_line_length,
                            line: self.line_number(),
                        });
                    }
                    incr(&mut self.current_line_length);
                }
                TAB => {
                    incr(&mut self.tab_count);
                    incr(&mut self.tabs_since_last_line_end);
                    incr(&mut self.current_line_length);
                }
                SPACE | VTAB | BACKSPACE | FORMFEED => {
                    incr(&mut self.current_line_length);
                }
                _ => {
                    self.saw_control_char = true;
                    incr(&mut self.control_count);
                }
            }
        }

        self.previous_byte = Some(c);
    }
}
