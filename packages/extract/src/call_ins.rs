//! Call-in points report parsing.
//!
//! The attendance ("call-ins") report lists one employee per line in the
//! form `Jane Doe - 12 Value ...`. Each entry is the name before the first
//! dash and the integer between the dash and the word `Value`.

/// One employee's call-in points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInEntry {
    /// Employee name.
    pub name: String,
    /// Accumulated call-in points.
    pub points: u32,
}

/// Parsed call-in entries plus the number of candidate lines whose points
/// could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallInReport {
    /// Entries in document order.
    pub entries: Vec<CallInEntry>,
    /// Lines that looked like entries but had unreadable points.
    pub skipped: usize,
}

enum CallInLine {
    Entry(CallInEntry),
    Unreadable,
    Other,
}

fn parse_line(line: &str) -> CallInLine {
    if !line.contains("Value") {
        return CallInLine::Other;
    }
    let Some((name, rest)) = line.split_once('-') else {
        return CallInLine::Other;
    };
    let points = rest.split("Value").next().unwrap_or_default().trim();
    points.parse::<u32>().map_or(CallInLine::Unreadable, |points| {
        CallInLine::Entry(CallInEntry {
            name: name.trim().to_owned(),
            points,
        })
    })
}

/// Parses every call-in entry in `text`.
#[must_use]
pub fn parse_call_ins(text: &str) -> CallInReport {
    let mut report = CallInReport::default();
    for line in text.lines() {
        match parse_line(line) {
            CallInLine::Entry(entry) => report.entries.push(entry),
            CallInLine::Unreadable => {
                log::debug!("Skipping call-in line with unreadable points: {line:?}");
                report.skipped += 1;
            }
            CallInLine::Other => {}
        }
    }
    log::info!(
        "Parsed {} call-in entries ({} skipped)",
        report.entries.len(),
        report.skipped
    );
    report
}

/// Sorts entries by points, highest first; ties keep document order.
pub fn rank_call_ins(entries: &mut [CallInEntry]) {
    entries.sort_by(|a, b| b.points.cmp(&a.points));
}
