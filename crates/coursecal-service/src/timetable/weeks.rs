//! Expansion of a course's week specification into actual calendar weeks.

use coursecal_core::types::WeekSpec;

use super::week_map::WeekMapping;
use crate::error::{CourseError, CourseResult};

/// Sorted, de-duplicated actual weeks a course meets in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActualWeekSet(Vec<u32>);

impl ActualWeekSet {
    #[must_use]
    pub fn from_weeks(weeks: impl IntoIterator<Item = u32>) -> Self {
        let mut weeks: Vec<u32> = weeks.into_iter().collect();
        weeks.sort_unstable();
        weeks.dedup();
        Self(weeks)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<u32> {
        self.0.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.0.last().copied()
    }

    /// `true` when the set has no holes between its first and last week.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.0.windows(2).all(|pair| pair[1] == pair[0] + 1)
    }

    /// Weeks in `first..=last` that the set does not contain, ascending.
    #[must_use]
    pub fn missing_weeks(&self) -> Vec<u32> {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return Vec::new();
        };
        (first..=last)
            .filter(|week| self.0.binary_search(week).is_err())
            .collect()
    }
}

/// ## Summary
/// Lists the logical weeks selected by `spec`, in the order they are listed.
///
/// ## Errors
/// - `CourseError::MalformedWeekSpec` for week 0, `start > end`, a zero
///   interval or count, or an interval running past `u32::MAX`.
/// - `CourseError::EmptyWeekSet` for an empty explicit list.
pub fn logical_weeks(spec: &WeekSpec) -> CourseResult<Vec<u32>> {
    let weeks = match spec {
        WeekSpec::Continuous { start, end } => {
            if *start == 0 || start > end {
                return Err(CourseError::MalformedWeekSpec(format!(
                    "continuous range {start}..={end}"
                )));
            }
            (*start..=*end).collect()
        }
        WeekSpec::Discontinuous(weeks) => {
            if weeks.contains(&0) {
                return Err(CourseError::MalformedWeekSpec(
                    "week list contains week 0".to_string(),
                ));
            }
            weeks.clone()
        }
        WeekSpec::Interval {
            start,
            interval,
            count,
        } => {
            let last = last_interval_week(*start, *interval, *count)?;
            (*start..=last).step_by(usize::try_from(*interval).map_err(|_e| {
                CourseError::MalformedWeekSpec(format!("interval {interval} is too large"))
            })?)
            .collect()
        }
    };

    if weeks.is_empty() {
        return Err(CourseError::EmptyWeekSet);
    }
    Ok(weeks)
}

/// ## Summary
/// Returns the largest logical week `spec` references without listing them.
///
/// ## Errors
/// Same as [`logical_weeks`].
pub fn last_logical_week(spec: &WeekSpec) -> CourseResult<u32> {
    match spec {
        WeekSpec::Continuous { start, end } => {
            if *start == 0 || start > end {
                return Err(CourseError::MalformedWeekSpec(format!(
                    "continuous range {start}..={end}"
                )));
            }
            Ok(*end)
        }
        WeekSpec::Discontinuous(weeks) => {
            if weeks.contains(&0) {
                return Err(CourseError::MalformedWeekSpec(
                    "week list contains week 0".to_string(),
                ));
            }
            weeks.iter().copied().max().ok_or(CourseError::EmptyWeekSet)
        }
        WeekSpec::Interval {
            start,
            interval,
            count,
        } => last_interval_week(*start, *interval, *count),
    }
}

fn last_interval_week(start: u32, interval: u32, count: u32) -> CourseResult<u32> {
    if start == 0 || interval == 0 || count == 0 {
        return Err(CourseError::MalformedWeekSpec(format!(
            "interval start {start}, step {interval}, count {count}"
        )));
    }
    (count - 1)
        .checked_mul(interval)
        .and_then(|span| span.checked_add(start))
        .ok_or_else(|| {
            CourseError::MalformedWeekSpec(format!(
                "interval start {start}, step {interval}, count {count} overflows"
            ))
        })
}

/// ## Summary
/// Expands `spec` into the actual weeks the course meets in.
///
/// Each logical week is mapped through `mapping`. When a logical week is a
/// break anchor and the course has a later logical week, the break's rest
/// weeks are included too, since the course carries on across the break.
///
/// ## Errors
/// Returns the errors of [`logical_weeks`], or `MalformedWeekSpec` if a week
/// maps past the representable range.
pub fn expand(spec: &WeekSpec, mapping: &WeekMapping) -> CourseResult<ActualWeekSet> {
    let logical = logical_weeks(spec)?;
    let last = logical.iter().copied().max().unwrap_or_default();

    let mut actual = Vec::with_capacity(logical.len());
    for &week in &logical {
        let mapped = mapping.actual_week(week).ok_or_else(|| {
            CourseError::MalformedWeekSpec(format!("logical week {week} cannot be mapped"))
        })?;
        actual.push(mapped);

        if week < last
            && let Some(rest) = mapping.rest_weeks_after(week)
        {
            tracing::trace!(anchor = week, ?rest, "Including rest weeks");
            actual.extend(rest);
        }
    }

    Ok(ActualWeekSet::from_weeks(actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecal_core::types::RestBreak;

    fn with_breaks(breaks: &[(u32, u32)]) -> WeekMapping {
        let breaks: Vec<RestBreak> = breaks
            .iter()
            .map(|&(after, length)| RestBreak::new(after, length))
            .collect();
        WeekMapping::build(&breaks, 30, 100).unwrap()
    }

    #[test]
    fn continuous_across_break_includes_rest_week() {
        let weeks = expand(
            &WeekSpec::Continuous { start: 1, end: 16 },
            &with_breaks(&[(3, 1)]),
        )
        .unwrap();
        assert_eq!(weeks.as_slice(), (1..=17).collect::<Vec<_>>().as_slice());
        assert!(weeks.is_contiguous());
    }

    #[test]
    fn course_ending_at_anchor_gets_no_rest_week() {
        let weeks = expand(
            &WeekSpec::Continuous { start: 1, end: 3 },
            &with_breaks(&[(3, 1)]),
        )
        .unwrap();
        assert_eq!(weeks.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn discontinuous_without_breaks() {
        let weeks = expand(
            &WeekSpec::Discontinuous(vec![8, 2, 6, 4, 4]),
            &WeekMapping::identity(),
        )
        .unwrap();
        assert_eq!(weeks.as_slice(), &[2, 4, 6, 8]);
        assert_eq!(weeks.missing_weeks(), vec![3, 5, 7]);
    }

    #[test]
    fn discontinuous_only_touching_anchor() {
        // Week 3 is an anchor and week 5 follows it, so the rest week is kept.
        let weeks = expand(
            &WeekSpec::Discontinuous(vec![1, 3, 5]),
            &with_breaks(&[(3, 2)]),
        )
        .unwrap();
        assert_eq!(weeks.as_slice(), &[1, 3, 4, 5, 7]);
    }

    #[test]
    fn interval_matches_equivalent_list() {
        let mapping = with_breaks(&[(7, 1)]);
        let interval = expand(
            &WeekSpec::Interval {
                start: 2,
                interval: 2,
                count: 8,
            },
            &mapping,
        )
        .unwrap();
        let listed = expand(
            &WeekSpec::Discontinuous(vec![2, 4, 6, 8, 10, 12, 14, 16]),
            &mapping,
        )
        .unwrap();
        assert_eq!(interval, listed);
    }

    #[test]
    fn interval_without_breaks() {
        let weeks = expand(
            &WeekSpec::Interval {
                start: 2,
                interval: 2,
                count: 8,
            },
            &WeekMapping::identity(),
        )
        .unwrap();
        assert_eq!(weeks.as_slice(), &[2, 4, 6, 8, 10, 12, 14, 16]);
    }

    #[test]
    fn malformed_specs() {
        let mapping = WeekMapping::identity();
        for spec in [
            WeekSpec::Continuous { start: 5, end: 2 },
            WeekSpec::Continuous { start: 0, end: 2 },
            WeekSpec::Discontinuous(vec![0, 1]),
            WeekSpec::Interval {
                start: 1,
                interval: 0,
                count: 3,
            },
            WeekSpec::Interval {
                start: 1,
                interval: 2,
                count: 0,
            },
        ] {
            assert!(
                matches!(expand(&spec, &mapping), Err(CourseError::MalformedWeekSpec(_))),
                "{spec:?} should be malformed"
            );
        }
    }

    #[test]
    fn empty_list_is_empty_week_set() {
        let result = expand(&WeekSpec::Discontinuous(Vec::new()), &WeekMapping::identity());
        assert_eq!(result, Err(CourseError::EmptyWeekSet));
    }

    #[test]
    fn last_logical_week_per_variant() {
        assert_eq!(
            last_logical_week(&WeekSpec::Continuous { start: 1, end: 16 }),
            Ok(16)
        );
        assert_eq!(
            last_logical_week(&WeekSpec::Discontinuous(vec![4, 18, 2])),
            Ok(18)
        );
        assert_eq!(
            last_logical_week(&WeekSpec::Interval {
                start: 2,
                interval: 2,
                count: 8
            }),
            Ok(16)
        );
        assert!(
            last_logical_week(&WeekSpec::Interval {
                start: 2,
                interval: u32::MAX,
                count: 3
            })
            .is_err()
        );
    }

    #[test]
    fn week_set_helpers() {
        let set = ActualWeekSet::from_weeks([5, 3, 3, 7]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.first(), Some(3));
        assert_eq!(set.last(), Some(7));
        assert!(!set.is_contiguous());
        assert_eq!(set.missing_weeks(), vec![4, 6]);
        assert!(ActualWeekSet::default().missing_weeks().is_empty());
    }
}
