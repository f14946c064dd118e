//! Logical teaching week to actual calendar week mapping.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use coursecal_core::types::RestBreak;

use crate::error::{ServiceError, ServiceResult};

/// Total, monotonic lookup from logical week to actual week.
///
/// Actual weeks are counted from 1 at the semester start and include the
/// weeks swallowed by rest breaks. Logical weeks skip them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeekMapping {
    /// `table[i]` is the actual week of logical week `i + 1`.
    table: Vec<u32>,
    /// Break anchor to merged break length, ascending by anchor.
    breaks: BTreeMap<u32, u32>,
}

impl WeekMapping {
    /// Mapping with no breaks: every logical week is its own actual week.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Builds the mapping for logical weeks `1..=horizon`.
    ///
    /// Breaks may arrive in any order. Breaks sharing an anchor are merged
    /// into one break of the summed length. Weeks past `horizon` are still
    /// answered by [`WeekMapping::actual_week`] using the same offsets.
    ///
    /// ## Errors
    /// - `ServiceError::RangeExceeded` if `horizon > max_logical_week`.
    /// - `ServiceError::InvalidConfiguration` if a break has a zero anchor or
    ///   length, or the breaks push actual weeks past `u32::MAX`.
    #[tracing::instrument(skip(breaks), fields(break_count = breaks.len()))]
    pub fn build(breaks: &[RestBreak], horizon: u32, max_logical_week: u32) -> ServiceResult<Self> {
        if horizon > max_logical_week {
            return Err(ServiceError::RangeExceeded {
                horizon,
                max: max_logical_week,
            });
        }

        let breaks = merge_breaks(breaks)?;

        let mut table = Vec::new();
        let mut cursor: u32 = 1;
        for logical in 1..=horizon {
            table.push(cursor);
            let rest = breaks.get(&logical).copied().unwrap_or(0);
            cursor = cursor
                .checked_add(1)
                .and_then(|next| next.checked_add(rest))
                .ok_or_else(|| {
                    ServiceError::InvalidConfiguration(
                        "rest breaks push the calendar past the last representable week".to_string(),
                    )
                })?;
        }

        tracing::debug!(
            horizon,
            anchors = breaks.len(),
            last_actual = table.last().copied().unwrap_or(0),
            "Built week mapping"
        );

        Ok(Self {
            table,
            breaks,
        })
    }

    /// ## Summary
    /// Returns the actual week of `logical`.
    ///
    /// Returns `None` for logical week 0 or if the result does not fit in a
    /// `u32`.
    #[must_use]
    pub fn actual_week(&self, logical: u32) -> Option<u32> {
        let index = usize::try_from(logical.checked_sub(1)?).ok()?;
        if let Some(&actual) = self.table.get(index) {
            return Some(actual);
        }

        self.breaks
            .range(..logical)
            .try_fold(logical, |acc, (_, &length)| acc.checked_add(length))
    }

    /// Actual weeks of the break inserted after `anchor`, if there is one.
    #[must_use]
    pub fn rest_weeks_after(&self, anchor: u32) -> Option<RangeInclusive<u32>> {
        let length = *self.breaks.get(&anchor)?;
        let first = self.actual_week(anchor)?.checked_add(1)?;
        let last = first.checked_add(length - 1)?;
        Some(first..=last)
    }

    /// Every actual week that falls inside a rest break, ascending.
    #[must_use]
    pub fn rest_actual_weeks(&self) -> Vec<u32> {
        self.breaks
            .keys()
            .filter_map(|&anchor| self.rest_weeks_after(anchor))
            .flatten()
            .collect()
    }
}

fn merge_breaks(breaks: &[RestBreak]) -> ServiceResult<BTreeMap<u32, u32>> {
    let mut merged = BTreeMap::new();
    for rest in breaks {
        if rest.after_week == 0 || rest.length == 0 {
            return Err(ServiceError::InvalidConfiguration(format!(
                "rest break after week {} of length {} is not valid",
                rest.after_week, rest.length
            )));
        }

        let length: &mut u32 = merged.entry(rest.after_week).or_default();
        *length = length.checked_add(rest.length).ok_or_else(|| {
            ServiceError::InvalidConfiguration(format!(
                "rest breaks after week {} are too long",
                rest.after_week
            ))
        })?;
    }
    Ok(merged)
}
