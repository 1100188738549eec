//! Visibility tag engine.
//!
//! Rules are evaluated in order and each applicable rule replaces the tag produced by the
//! rules before it. A rule that does not apply leaves the previous tag untouched.

use crate::config::CodeAllowList;
use crate::dates;
use chrono::NaiveDateTime;
use fhir::VisibilityTag;

/// The parts of a record the rules look at.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilitySubject<'a> {
    pub standard_code: Option<&'a str>,
    pub local_code: Option<&'a str>,
    pub start: Option<&'a str>,
    pub status: Option<&'a str>,
}

#[derive(Clone, Debug)]
pub enum VisibilityRule<'a> {
    /// `summary` if either code is permitted, otherwise `none`.
    AllowList(&'a CodeAllowList),
    /// `summary` if the start is recorded, is not later than `now` and falls on one of the last
    /// `days` calendar days, otherwise `detail`.
    RecencyWindow { days: i64, now: NaiveDateTime },
    /// `none` when the status matches. Does not apply otherwise.
    SuppressStatus(&'a str),
}

impl VisibilityRule<'_> {
    fn evaluate(&self, subject: &VisibilitySubject<'_>) -> Option<VisibilityTag> {
        match self {
            VisibilityRule::AllowList(codes) => {
                if codes.permits(subject.standard_code, subject.local_code) {
                    Some(VisibilityTag::Summary)
                } else {
                    Some(VisibilityTag::Hidden)
                }
            }
            VisibilityRule::RecencyWindow { days, now } => {
                let recent = dates::recorded(subject.start)
                    .is_some_and(|start| within_window(&start, *now, *days));
                if recent {
                    Some(VisibilityTag::Summary)
                } else {
                    Some(VisibilityTag::Detail)
                }
            }
            VisibilityRule::SuppressStatus(status) => (subject.status == Some(*status))
                .then_some(VisibilityTag::Hidden),
        }
    }
}

/// A start carrying a time is compared against `now` in full, so a start later today is still in
/// the future. A date-only start is compared by calendar day.
fn within_window(start: &str, now: NaiveDateTime, days: i64) -> bool {
    let (day, not_future) = match dates::parse_timestamp(start) {
        Some(at) => (at.date(), at <= now),
        None => match dates::parse_day(start) {
            Some(day) => (day, day <= now.date()),
            None => return false,
        },
    };
    not_future && (now.date() - day).num_days() <= days
}

/// Classify `subject` against `rules`; the last applicable rule wins.
pub fn classify(subject: &VisibilitySubject<'_>, rules: &[VisibilityRule<'_>]) -> Option<VisibilityTag> {
    rules
        .iter()
        .fold(None, |tag, rule| rule.evaluate(subject).or(tag))
}
