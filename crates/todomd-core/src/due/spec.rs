//! Due specifier grammar and occurrence arithmetic.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, Weekday};

/// Unit of an interval recurrence (`e3d`, `e2w`, `e1m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
}

/// A parsed due specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueSpec {
    /// `2024-01-01`
    Date(NaiveDate),
    /// `2024-01-01T10:00` or `2024-01-01T10:00:00`
    DateTime(NaiveDateTime),
    /// `2024-01-01|e3d`: every `every` units starting at `start`.
    Interval {
        start: NaiveDate,
        every: u32,
        unit: IntervalUnit,
    },
    /// `ed` / `everyday`
    EveryDay,
    /// `mon,wed`, `mon-fri`. Sorted from Monday, without duplicates.
    Weekdays(Vec<Weekday>),
    /// Anything that did not match a known form.
    Invalid,
}

impl DueSpec {
    /// Parses a due specifier. Never fails: unknown input is [`DueSpec::Invalid`].
    ///
    /// # Example
    ///
    /// ```
    /// use todomd_core::due::DueSpec;
    ///
    /// assert!(matches!(DueSpec::parse("2024-01-01"), DueSpec::Date(_)));
    /// assert!(matches!(DueSpec::parse("mon-fri"), DueSpec::Weekdays(_)));
    /// assert_eq!(DueSpec::parse("someday"), DueSpec::Invalid);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let spec = Self::parse_known(raw);
        if spec == DueSpec::Invalid {
            tracing::trace!(specifier = raw, "unrecognized due specifier");
        }
        spec
    }

    fn parse_known(raw: &str) -> Self {
        if let Some((date, rule)) = raw.split_once('|') {
            return parse_date(date)
                .and_then(|start| parse_interval_rule(start, rule))
                .unwrap_or(DueSpec::Invalid);
        }

        if let Some(date) = parse_date(raw) {
            return DueSpec::Date(date);
        }
        if let Some(datetime) = parse_datetime(raw) {
            return DueSpec::DateTime(datetime);
        }

        let lower = raw.to_lowercase();
        if lower == "ed" || lower == "everyday" {
            return DueSpec::EveryDay;
        }

        parse_weekday_set(&lower)
            .map(DueSpec::Weekdays)
            .unwrap_or(DueSpec::Invalid)
    }

    /// Returns true for the repeating forms.
    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            DueSpec::Interval { .. } | DueSpec::EveryDay | DueSpec::Weekdays(_)
        )
    }

    /// First occurrence on or after `from`.
    ///
    /// For absolute dates this is the date itself when it is not before `from`.
    pub fn next_occurrence(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            DueSpec::Date(date) => (*date >= from).then_some(*date),
            DueSpec::DateTime(datetime) => {
                let date = datetime.date();
                (date >= from).then_some(date)
            }
            DueSpec::Interval { start, every, unit } => {
                if from <= *start {
                    return Some(*start);
                }
                match unit {
                    IntervalUnit::Days | IntervalUnit::Weeks => {
                        let step = step_days(*every, *unit);
                        let elapsed = (from - *start).num_days();
                        let steps = (elapsed + step - 1) / step;
                        add_days(*start, steps.checked_mul(step)?)
                    }
                    IntervalUnit::Months => {
                        let mut k = month_distance(*start, from) / i64::from(*every);
                        loop {
                            let candidate = add_months(*start, k * i64::from(*every))?;
                            if candidate >= from {
                                return Some(candidate);
                            }
                            k += 1;
                        }
                    }
                }
            }
            DueSpec::EveryDay => Some(from),
            DueSpec::Weekdays(days) => (0..7)
                .filter_map(|offset| from.checked_add_days(Days::new(offset)))
                .find(|date| days.contains(&date.weekday())),
            DueSpec::Invalid => None,
        }
    }

    /// Most recent occurrence strictly before `before`.
    pub fn previous_occurrence(&self, before: NaiveDate) -> Option<NaiveDate> {
        match self {
            DueSpec::Date(date) => (*date < before).then_some(*date),
            DueSpec::DateTime(datetime) => {
                let date = datetime.date();
                (date < before).then_some(date)
            }
            DueSpec::Interval { start, every, unit } => {
                if before <= *start {
                    return None;
                }
                match unit {
                    IntervalUnit::Days | IntervalUnit::Weeks => {
                        let step = step_days(*every, *unit);
                        let elapsed = (before - *start).num_days() - 1;
                        add_days(*start, (elapsed / step).checked_mul(step)?)
                    }
                    IntervalUnit::Months => {
                        let mut k = month_distance(*start, before) / i64::from(*every) + 1;
                        while k >= 0 {
                            let candidate = add_months(*start, k * i64::from(*every))?;
                            if candidate < before {
                                return Some(candidate);
                            }
                            k -= 1;
                        }
                        None
                    }
                }
            }
            DueSpec::EveryDay => before.pred_opt(),
            DueSpec::Weekdays(days) => (1..=7)
                .filter_map(|offset| before.checked_sub_days(Days::new(offset)))
                .find(|date| days.contains(&date.weekday())),
            DueSpec::Invalid => None,
        }
    }

    /// Returns true if `date` is an occurrence.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.next_occurrence(date) == Some(date)
    }

    /// The anchor date of an interval recurrence, or the date of an absolute specifier.
    pub fn anchor(&self) -> Option<NaiveDate> {
        match self {
            DueSpec::Date(date) => Some(*date),
            DueSpec::DateTime(datetime) => Some(datetime.date()),
            DueSpec::Interval { start, .. } => Some(*start),
            _ => None,
        }
    }
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parses `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DDTHH:MM`.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Parses either a date or a date-time, keeping only the date part.
pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
    parse_date(value).or_else(|| parse_datetime(value).map(|dt| dt.date()))
}

fn parse_interval_rule(start: NaiveDate, rule: &str) -> Option<DueSpec> {
    let rule = rule.trim().to_lowercase();
    let body = rule.strip_prefix('e')?;
    let unit = match body.chars().last()? {
        'd' => IntervalUnit::Days,
        'w' => IntervalUnit::Weeks,
        'm' => IntervalUnit::Months,
        _ => return None,
    };
    let every: u32 = body[..body.len() - 1].parse().ok()?;
    if every == 0 {
        return None;
    }
    Some(DueSpec::Interval { start, every, unit })
}

fn parse_weekday_set(value: &str) -> Option<Vec<Weekday>> {
    if value.is_empty() {
        return None;
    }

    let mut days = Vec::new();
    for item in value.split(',') {
        match item.split_once('-') {
            Some((from, to)) => {
                let mut day: Weekday = from.trim().parse().ok()?;
                let last: Weekday = to.trim().parse().ok()?;
                days.push(day);
                while day != last {
                    day = day.succ();
                    days.push(day);
                }
            }
            None => days.push(item.trim().parse().ok()?),
        }
    }

    days.sort_by_key(|day| day.num_days_from_monday());
    days.dedup();
    Some(days)
}

fn step_days(every: u32, unit: IntervalUnit) -> i64 {
    match unit {
        IntervalUnit::Weeks => i64::from(every) * 7,
        _ => i64::from(every),
    }
}

fn month_distance(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_index = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_index = i64::from(to.year()) * 12 + i64::from(to.month0());
    (to_index - from_index).max(0)
}

/// `None` past the end of the supported calendar.
fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::try_from(days).ok()?))
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(u32::try_from(months).ok()?))
}
