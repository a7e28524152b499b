use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde::Serialize;

use crate::store::error::StoreError;

/// One user-recorded interval of time tagged with a category. Periods are
/// append-only and must not overlap each other within a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPeriod {
    pub category: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub details: String,
}

impl ActivityPeriod {
    /// Builds a period, rejecting empty categories and zero or negative
    /// durations up front so they never reach the file.
    pub fn new(
        category: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        details: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let category = category.into();
        if category.trim().is_empty() || end <= start {
            return Err(StoreError::InvalidPeriod);
        }
        Ok(Self {
            category,
            start,
            end,
            details: details.into(),
        })
    }

    pub fn duration(&self) -> Duration {
        std::cmp::max(Duration::zero(), self.end - self.start)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Half-open interval intersection. Touching endpoints (one period ends
    /// exactly where the next starts) do not count as overlap.
    pub fn overlaps(&self, other: &ActivityPeriod) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Palette entry from categories.json. Read-only to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub color: String,
}

impl CategoryDef {
    /// `#` followed by 3 or 6 hex digits.
    pub fn has_valid_color(&self) -> bool {
        let Some(hex) = self.color.strip_prefix('#') else {
            return false;
        };
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Expands the color into RGB components for terminal rendering.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        if !self.has_valid_color() {
            return None;
        }
        let hex = &self.color[1..];
        let expanded: String = if hex.len() == 3 {
            hex.chars().flat_map(|c| [c, c]).collect()
        } else {
            hex.to_string()
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Free-text note attached to a calendar day. Several reflections may share
/// a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReflection {
    pub date: String,
    pub idea: String,
}

/// Outcome of checking every backing file in a storage root.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
