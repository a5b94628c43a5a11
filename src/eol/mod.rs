mod report;
mod sample;
mod scan;
mod source;


pub use self::report::{LONG_LINE, LineEnding, ReportOptions, WIDE_LINE, format_summary};
pub use self::sample::{Pass, PassKind, plan_passes, scan_bytes, scan_reader};
pub use self::sample::{RANDOM_SAMPLES, RANDOM_SPREAD, SAMPLE_SPREAD};
pub use self::scan::{NullSite, ScanState, incr};
pub use self::source::{Classified, EolConfig, EolError, Inspection};
pub use self::source::{MAX_REPORTED_NULLS, QUICK_SAMPLE_SIZE};
pub use self::source::{classify_bytes, classify_reader, inspect_path};
