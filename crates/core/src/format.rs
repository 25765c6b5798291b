//! Display helpers for durations given in milliseconds.
//!
//! All variants truncate; nothing is rounded up. Minutes keep counting past
//! 59 (there is no hour field).

fn split(ms: u64) -> (u64, u64) {
    let total_secs = ms / 1_000;
    (total_secs / 60, total_secs % 60)
}

/// `MM:SS`, zero padded.
#[must_use]
pub fn format_clock(ms: u64) -> String {
    let (minutes, seconds) = split(ms);
    format!("{minutes:02}:{seconds:02}")
}

/// `MM:SS.hh` where `hh` is hundredths of a second.
#[must_use]
pub fn format_clock_hundredths(ms: u64) -> String {
    let (minutes, seconds) = split(ms);
    let hundredths = (ms % 1_000) / 10;
    format!("{minutes:02}:{seconds:02}.{hundredths:02}")
}

/// `"N min M s"`, or `"M s"` under a minute.
#[must_use]
pub fn format_readable(ms: u64) -> String {
    let (minutes, seconds) = split(ms);
    if minutes > 0 {
        format!("{minutes} min {seconds} s")
    } else {
        format!("{seconds} s")
    }
}
