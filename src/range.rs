use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Named date-range shortcuts offered by the reporting filter.
///
/// The tags are stable wire values; stored filter state from older clients
/// may carry tags outside this set, which [`RangePreset::parse`] folds to
/// `All` so a stale filter never breaks a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    #[serde(rename = "last_7")]
    Last7,
    #[serde(rename = "last_30")]
    Last30,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    YearToDate,
    All,
}

pub const PRESETS: [RangePreset; 8] = [
    RangePreset::Last7,
    RangePreset::Last30,
    RangePreset::ThisMonth,
    RangePreset::LastMonth,
    RangePreset::ThisQuarter,
    RangePreset::LastQuarter,
    RangePreset::YearToDate,
    RangePreset::All,
];

impl RangePreset {
    /// Parses a wire tag. Unknown tags fold to `All` (unbounded) instead of
    /// erroring, so a legacy value persisted in filter state degrades to
    /// "show everything" rather than a failed request.
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "last_7" => Self::Last7,
            "last_30" => Self::Last30,
            "this_month" => Self::ThisMonth,
            "last_month" => Self::LastMonth,
            "this_quarter" => Self::ThisQuarter,
            "last_quarter" => Self::LastQuarter,
            "year_to_date" => Self::YearToDate,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last7 => "last_7",
            Self::Last30 => "last_30",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::ThisQuarter => "this_quarter",
            Self::LastQuarter => "last_quarter",
            Self::YearToDate => "year_to_date",
            Self::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Last7 => "Last 7 days",
            Self::Last30 => "Last 30 days",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
            Self::ThisQuarter => "This quarter",
            Self::LastQuarter => "Last quarter",
            Self::YearToDate => "Year to date",
            Self::All => "All time",
        }
    }
}

/// A concrete UTC instant range, both ends normalized to day boundaries:
/// `date_from` at 00:00:00.000Z of its calendar day, `date_to` at
/// 23:59:59.999Z of its. Always `date_from <= date_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
}

impl DateRange {
    fn from_days(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            date_from: day_start(from),
            date_to: day_end(to),
        }
    }

    pub fn date_from_iso(&self) -> String {
        self.date_from.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn date_to_iso(&self) -> String {
        self.date_to.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// The filter state a report view holds: no bound at all, a named preset,
/// or an explicit pair picked in the UI. `Custom` is its own variant so the
/// "custom range applied" case never has to masquerade as `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFilter {
    Unbounded,
    Preset(RangePreset),
    Custom {
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    },
}

impl RangeFilter {
    /// Builds a custom filter from two calendar-date strings (`YYYY-MM-DD`,
    /// as date pickers emit). Returns `None` when either fails to parse or
    /// the pair is reversed; the caller keeps its previous filter.
    pub fn custom(from: &str, to: &str) -> Option<Self> {
        let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d").ok()?;
        let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d").ok()?;
        if from > to {
            return None;
        }
        Some(Self::Custom {
            date_from: day_start(from),
            date_to: day_end(to),
        })
    }

    /// `None` means no constraint: the caller omits the filter entirely.
    pub fn resolve(&self, reference: DateTime<Utc>) -> Option<DateRange> {
        match *self {
            Self::Unbounded => None,
            Self::Preset(preset) => resolve_preset(preset, reference),
            Self::Custom { date_from, date_to } => Some(DateRange { date_from, date_to }),
        }
    }
}

/// Resolves a preset against a reference instant. `All` resolves to `None`
/// (unbounded); everything else gets concrete UTC day-boundary instants.
///
/// Current-period presets (`this_month`, `this_quarter`, `year_to_date`)
/// deliberately end at the reference day, not at the period's last day:
/// a report for an in-progress month covers "so far", not the whole month.
pub fn resolve_preset(preset: RangePreset, reference: DateTime<Utc>) -> Option<DateRange> {
    let today = reference.date_naive();
    let range = match preset {
        RangePreset::All => return None,
        RangePreset::Last7 => DateRange::from_days(today - Duration::days(6), today),
        RangePreset::Last30 => DateRange::from_days(today - Duration::days(29), today),
        RangePreset::ThisMonth => DateRange::from_days(month_start(today), today),
        RangePreset::LastMonth => {
            let last = month_start(today) - Duration::days(1);
            DateRange::from_days(month_start(last), last)
        }
        RangePreset::ThisQuarter => DateRange::from_days(quarter_start(today), today),
        RangePreset::LastQuarter => {
            let shifted = today.checked_sub_months(Months::new(3)).unwrap_or(today);
            let start = quarter_start(shifted);
            let end = start.checked_add_months(Months::new(3)).unwrap_or(start) - Duration::days(1);
            DateRange::from_days(start, end)
        }
        RangePreset::YearToDate => {
            let jan1 = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            DateRange::from_days(jan1, today)
        }
    };
    Some(range)
}

/// Formats a range for display: `"1 Mar 2025 – 15 Mar 2025"`.
pub fn format_range_label(range: &DateRange) -> String {
    format!(
        "{} – {}",
        range.date_from.format("%-d %b %Y"),
        range.date_to.format("%-d %b %Y")
    )
}

/// Inclusive membership test used inside list-filtering loops. Records come
/// from external sources and may have missing or malformed date fields, so
/// `None` and anything unparseable are simply non-matches.
pub fn is_in_range(candidate: Option<&str>, range: &DateRange) -> bool {
    let Some(raw) = candidate else {
        return false;
    };
    let Some(instant) = parse_instant(raw) else {
        return false;
    };
    range.date_from <= instant && instant <= range.date_to
}

/// Accepts RFC 3339 instants and bare `YYYY-MM-DD` calendar dates (taken as
/// the start of that UTC day).
pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(day_start)
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date + Duration::days(1)) - Duration::milliseconds(1)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(instant: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(instant)
            .expect("test instant")
            .with_timezone(&Utc)
    }

    #[test]
    fn all_resolves_to_unbounded() {
        assert_eq!(resolve_preset(RangePreset::All, at("2025-03-15T10:00:00Z")), None);
        assert_eq!(resolve_preset(RangePreset::All, at("1999-12-31T23:59:59Z")), None);
    }

    #[test]
    fn every_bounded_preset_is_ordered() {
        let references = ["2025-01-01T00:00:00Z", "2025-03-15T10:00:00Z", "2024-12-31T23:59:59Z"];
        for reference in references {
            for preset in PRESETS {
                if let Some(range) = resolve_preset(preset, at(reference)) {
                    assert!(
                        range.date_from <= range.date_to,
                        "{} at {reference}",
                        preset.as_str()
                    );
                }
            }
        }
    }

    #[test]
    fn last_7_spans_seven_calendar_days() {
        let range = resolve_preset(RangePreset::Last7, at("2025-03-15T10:00:00Z")).unwrap();
        let days = (range.date_to.date_naive() - range.date_from.date_naive()).num_days();
        assert_eq!(days, 6);
        assert_eq!(range.date_to_iso(), "2025-03-15T23:59:59.999Z");
    }

    #[test]
    fn last_30_spans_thirty_calendar_days() {
        let range = resolve_preset(RangePreset::Last30, at("2025-03-15T10:00:00Z")).unwrap();
        let days = (range.date_to.date_naive() - range.date_from.date_naive()).num_days();
        assert_eq!(days, 29);
    }

    #[test]
    fn this_month_runs_from_month_start_to_reference_day() {
        let range = resolve_preset(RangePreset::ThisMonth, at("2025-03-15T10:00:00Z")).unwrap();
        assert_eq!(range.date_from_iso(), "2025-03-01T00:00:00.000Z");
        assert_eq!(range.date_to_iso(), "2025-03-15T23:59:59.999Z");
    }

    #[test]
    fn last_month_rolls_over_the_year() {
        let range = resolve_preset(RangePreset::LastMonth, at("2025-01-10T00:00:00Z")).unwrap();
        assert_eq!(range.date_from_iso(), "2024-12-01T00:00:00.000Z");
        assert_eq!(range.date_to_iso(), "2024-12-31T23:59:59.999Z");
    }

    #[test]
    fn this_quarter_starts_in_april_for_may() {
        let range = resolve_preset(RangePreset::ThisQuarter, at("2025-05-01T00:00:00Z")).unwrap();
        assert_eq!(range.date_from_iso(), "2025-04-01T00:00:00.000Z");
        assert_eq!(range.date_to_iso(), "2025-05-01T23:59:59.999Z");
    }

    #[test]
    fn last_quarter_from_april_is_q1() {
        let range = resolve_preset(RangePreset::LastQuarter, at("2025-04-15T00:00:00Z")).unwrap();
        assert_eq!(range.date_from_iso(), "2025-01-01T00:00:00.000Z");
        assert_eq!(range.date_to_iso(), "2025-03-31T23:59:59.999Z");
    }

    #[test]
    fn last_quarter_from_february_rolls_into_previous_year() {
        let range = resolve_preset(RangePreset::LastQuarter, at("2025-02-10T00:00:00Z")).unwrap();
        assert_eq!(range.date_from_iso(), "2024-10-01T00:00:00.000Z");
        assert_eq!(range.date_to_iso(), "2024-12-31T23:59:59.999Z");
    }

    #[test]
    fn year_to_date_starts_january_first() {
        let range = resolve_preset(RangePreset::YearToDate, at("2025-05-20T08:30:00Z")).unwrap();
        assert_eq!(range.date_from_iso(), "2025-01-01T00:00:00.000Z");
        assert_eq!(range.date_to_iso(), "2025-05-20T23:59:59.999Z");
    }

    #[test]
    fn resolution_is_deterministic() {
        let reference = at("2025-03-15T10:00:00Z");
        assert_eq!(
            resolve_preset(RangePreset::LastQuarter, reference),
            resolve_preset(RangePreset::LastQuarter, reference)
        );
    }

    #[test]
    fn unknown_tags_fold_to_all() {
        assert_eq!(RangePreset::parse("fortnight"), RangePreset::All);
        assert_eq!(RangePreset::parse(""), RangePreset::All);
        assert_eq!(RangePreset::parse(" last_7 "), RangePreset::Last7);
    }

    #[test]
    fn range_label_uses_short_months() {
        let range = resolve_preset(RangePreset::ThisMonth, at("2025-03-15T10:00:00Z")).unwrap();
        assert_eq!(format_range_label(&range), "1 Mar 2025 – 15 Mar 2025");
    }

    #[test]
    fn membership_is_inclusive_on_both_ends() {
        let range = resolve_preset(RangePreset::ThisMonth, at("2025-03-31T12:00:00Z")).unwrap();
        assert!(is_in_range(Some("2025-03-15T12:00:00Z"), &range));
        assert!(is_in_range(Some("2025-03-01T00:00:00.000Z"), &range));
        assert!(is_in_range(Some("2025-03-31T23:59:59.999Z"), &range));
        assert!(!is_in_range(Some("2025-04-01T00:00:00.000Z"), &range));
    }

    #[test]
    fn membership_accepts_bare_calendar_dates() {
        let range = resolve_preset(RangePreset::ThisMonth, at("2025-03-31T12:00:00Z")).unwrap();
        assert!(is_in_range(Some("2025-03-15"), &range));
        assert!(!is_in_range(Some("2025-02-28"), &range));
    }

    #[test]
    fn missing_or_malformed_candidates_never_match() {
        let range = resolve_preset(RangePreset::Last7, at("2025-03-15T10:00:00Z")).unwrap();
        assert!(!is_in_range(None, &range));
        assert!(!is_in_range(Some(""), &range));
        assert!(!is_in_range(Some("15/03/2025"), &range));
    }

    #[test]
    fn custom_filter_rejects_bad_input() {
        assert_eq!(RangeFilter::custom("2025-03-10", "2025-03-01"), None);
        assert_eq!(RangeFilter::custom("yesterday", "2025-03-01"), None);
        assert_eq!(RangeFilter::custom("2025-03-01", ""), None);
    }

    #[test]
    fn custom_filter_resolves_to_day_boundaries() {
        let filter = RangeFilter::custom("2025-03-01", "2025-03-10").unwrap();
        let range = filter.resolve(at("2026-01-01T00:00:00Z")).unwrap();
        assert_eq!(range.date_from_iso(), "2025-03-01T00:00:00.000Z");
        assert_eq!(range.date_to_iso(), "2025-03-10T23:59:59.999Z");
    }

    #[test]
    fn unbounded_filter_resolves_to_none() {
        assert_eq!(RangeFilter::Unbounded.resolve(at("2025-03-15T10:00:00Z")), None);
        assert_eq!(
            RangeFilter::Preset(RangePreset::All).resolve(at("2025-03-15T10:00:00Z")),
            None
        );
    }
}
