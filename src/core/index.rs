//! Year → month → day index of written documents.
//!
//! [`Index`] accumulates every day that received at least one entry during
//! the run, across all archives. [`render_index`] turns it into a Markdown
//! navigation page: years newest first, months newest first, and within a
//! month a single line of day links in ascending order.
//!
//! ```text
//! ### 2021
//!
//! * 06 | [03](2021/06/03.md)
//! * 05 | [01](2021/05/01.md) [17](2021/05/17.md)
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use super::partition::DayKey;

/// Ordered set of written days.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Index {
    years: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a day. Returns `true` if it was not present yet.
    pub fn insert(&mut self, key: &DayKey) -> bool {
        self.years
            .entry(key.year().to_string())
            .or_default()
            .entry(key.month().to_string())
            .or_default()
            .insert(key.day().to_string())
    }

    /// Returns `true` if the given day is present.
    pub fn contains(&self, year: &str, month: &str, day: &str) -> bool {
        self.years
            .get(year)
            .and_then(|months| months.get(month))
            .is_some_and(|days| days.contains(day))
    }

    /// Total number of days.
    pub fn len(&self) -> usize {
        self.years
            .values()
            .flat_map(|months| months.values())
            .map(BTreeSet::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// All days as `(year, month, day)` in ascending order.
    pub fn days(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.years.iter().flat_map(|(year, months)| {
            months.iter().flat_map(move |(month, days)| {
                days.iter()
                    .map(move |day| (year.as_str(), month.as_str(), day.as_str()))
            })
        })
    }

    /// Writes the navigation page to `out`.
    pub fn render_to<W: Write>(&self, out: &mut W, link_prefix: &str) -> io::Result<()> {
        for (year, months) in self.years.iter().rev() {
            write!(out, "### {}\n\n", year)?;
            for (month, days) in months.iter().rev() {
                write!(out, "* {} |", month)?;
                for day in days {
                    write!(out, " [{}]({})", day, document_link(link_prefix, year, month, day))?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// Renders `index` into a string.
pub fn render_index(index: &Index, link_prefix: &str) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = index.render_to(&mut buf, link_prefix);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Joins `prefix/YYYY/MM/DD.md` with `/`, dropping empty and `.` prefixes.
/// A bare `/` prefix yields a site-root link.
pub fn document_link(prefix: &str, year: &str, month: &str, day: &str) -> String {
    if !prefix.is_empty() && prefix.bytes().all(|b| b == b'/') {
        return format!("/{year}/{month}/{day}.md");
    }
    let mut prefix = prefix.trim_end_matches('/');
    while let Some(rest) = prefix.strip_prefix("./") {
        prefix = rest.trim_start_matches('/');
    }
    if prefix.is_empty() || prefix == "." {
        format!("{year}/{month}/{day}.md")
    } else {
        format!("{prefix}/{year}/{month}/{day}.md")
    }
}
