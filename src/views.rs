//! Page-level derivations over fetched collections. Nothing here talks
//! to the network or mutates a store; pages feed snapshots in and render
//! what comes out.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::model::{Institute, Student, Subject, Teacher};
use crate::store::Keyed;

/// Subject picker on the course builder. The course fee is always the
/// sum of the selected subjects' fees and cannot be set directly.
#[derive(Debug, Clone, Default)]
pub struct FeeSelection {
    selected: BTreeSet<String>,
}

impl FeeSelection {
    /// Flips one subject in or out of the selection. Returns whether the
    /// subject is selected afterwards.
    pub fn toggle(&mut self, subject_id: &str) -> bool {
        if self.selected.remove(subject_id) {
            false
        } else {
            self.selected.insert(subject_id.to_string());
            true
        }
    }

    pub fn is_selected(&self, subject_id: &str) -> bool {
        self.selected.contains(subject_id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn total(&self, subjects: &[Subject]) -> f64 {
        subjects
            .iter()
            .filter(|subject| self.selected.contains(subject.key()))
            .map(|subject| subject.subject_fee)
            .sum()
    }
}

/// Sums fees for an explicit id set; the id-set variant of the picker,
/// used when the selection lives in the UI shell.
pub fn fee_total(subjects: &[Subject], selected_ids: &[String]) -> f64 {
    subjects
        .iter()
        .filter(|subject| selected_ids.iter().any(|id| id == subject.key()))
        .map(|subject| subject.subject_fee)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("unknown session type: {0}")]
    UnknownKind(String),
    #[error("a start date is required")]
    MissingDate,
    #[error("an end date is required")]
    MissingEndDate,
    #[error("weekly schedules need at least one weekday")]
    NoWeekdays,
    #[error("unrecognized weekday: {0}")]
    BadWeekday(String),
    #[error("repeat interval must be at least 1")]
    ZeroInterval,
    #[error("day of month must be between 1 and 31")]
    DayOutOfRange,
    #[error("monthly schedules need a day of month or an ordinal weekday")]
    MissingMonthlyAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ordinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Ordinal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ordinal::First => "First",
            Ordinal::Second => "Second",
            Ordinal::Third => "Third",
            Ordinal::Fourth => "Fourth",
            Ordinal::Last => "Last",
        }
    }
}

impl FromStr for Ordinal {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Ordinal::First),
            "second" => Ok(Ordinal::Second),
            "third" => Ok(Ordinal::Third),
            "fourth" => Ok(Ordinal::Fourth),
            "last" => Ok(Ordinal::Last),
            _ => Err(()),
        }
    }
}

/// Monthly sessions anchor on a calendar day or an ordinal weekday
/// ("Second Monday"), never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonthlyOn {
    Day(u8),
    The(Ordinal, Weekday),
}

/// The four mutually exclusive recurrence kinds a session form offers.
/// Only the fields a kind needs exist on its variant, so an impossible
/// combination (a weekly day list on a monthly session) cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum Recurrence {
    Single {
        date: NaiveDate,
    },
    EveryDay {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Weekly {
        start_date: NaiveDate,
        end_date: NaiveDate,
        repeat_every: u32,
        days: Vec<Weekday>,
    },
    Monthly {
        start_date: NaiveDate,
        end_date: NaiveDate,
        repeat_every: u32,
        on: MonthlyOn,
    },
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl Recurrence {
    pub fn kind(&self) -> &'static str {
        match self {
            Recurrence::Single { .. } => "Single",
            Recurrence::EveryDay { .. } => "Every Day",
            Recurrence::Weekly { .. } => "Weekly",
            Recurrence::Monthly { .. } => "Monthly",
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        match self {
            Recurrence::Single { .. } | Recurrence::EveryDay { .. } => Ok(()),
            Recurrence::Weekly {
                repeat_every, days, ..
            } => {
                if *repeat_every < 1 {
                    return Err(ScheduleError::ZeroInterval);
                }
                if days.is_empty() {
                    return Err(ScheduleError::NoWeekdays);
                }
                Ok(())
            }
            Recurrence::Monthly {
                repeat_every, on, ..
            } => {
                if *repeat_every < 1 {
                    return Err(ScheduleError::ZeroInterval);
                }
                if let MonthlyOn::Day(day) = on {
                    if !(1..=31).contains(day) {
                        return Err(ScheduleError::DayOutOfRange);
                    }
                }
                Ok(())
            }
        }
    }

    /// Exactly the recurrence fields the selected kind needs — a weekly
    /// payload never carries `onDay`/`onThe`, a monthly one never
    /// carries `weeklyDays`.
    pub fn schedule_details(&self) -> Value {
        match self {
            Recurrence::Single { date } => json!({ "startDate": date }),
            Recurrence::EveryDay {
                start_date,
                end_date,
            } => json!({ "startDate": start_date, "endDate": end_date }),
            Recurrence::Weekly {
                start_date,
                end_date,
                repeat_every,
                days,
            } => {
                let mut ordered: Vec<Weekday> = days.clone();
                ordered.sort_by_key(|d| d.num_days_from_monday());
                ordered.dedup();
                let names: Vec<&str> = ordered.into_iter().map(weekday_name).collect();
                json!({
                    "startDate": start_date,
                    "endDate": end_date,
                    "repeatEvery": repeat_every,
                    "weeklyDays": names,
                })
            }
            Recurrence::Monthly {
                start_date,
                end_date,
                repeat_every,
                on,
            } => {
                let mut details = json!({
                    "startDate": start_date,
                    "endDate": end_date,
                    "repeatEvery": repeat_every,
                });
                match on {
                    MonthlyOn::Day(day) => details["onDay"] = json!(day),
                    MonthlyOn::The(ordinal, weekday) => {
                        details["onThe"] =
                            json!(format!("{} {}", ordinal.as_str(), weekday_name(*weekday)));
                    }
                }
                details
            }
        }
    }
}

/// Raw schedule fields as the UI shell submits them; `Recurrence::from_form`
/// turns this into a validated kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleForm {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub weekly_days: Vec<String>,
    #[serde(default = "ScheduleForm::default_repeat")]
    pub repeat_every: u32,
    #[serde(default)]
    pub on_day: Option<u8>,
    #[serde(default)]
    pub on_the: Option<String>,
}

impl ScheduleForm {
    fn default_repeat() -> u32 {
        1
    }
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            start_time: None,
            end_time: None,
            weekly_days: Vec::new(),
            repeat_every: 1,
            on_day: None,
            on_the: None,
        }
    }
}

fn parse_on_the(raw: &str) -> Result<MonthlyOn, ScheduleError> {
    let mut words = raw.split_whitespace();
    let ordinal = words
        .next()
        .and_then(|w| Ordinal::from_str(w).ok())
        .ok_or_else(|| ScheduleError::BadWeekday(raw.to_string()))?;
    let weekday = words
        .next()
        .and_then(|w| Weekday::from_str(w).ok())
        .ok_or_else(|| ScheduleError::BadWeekday(raw.to_string()))?;
    Ok(MonthlyOn::The(ordinal, weekday))
}

impl Recurrence {
    pub fn from_form(session_type: &str, form: &ScheduleForm) -> Result<Self, ScheduleError> {
        let start = form.start_date.ok_or(ScheduleError::MissingDate);
        let end = form.end_date.ok_or(ScheduleError::MissingEndDate);
        let recurrence = match session_type {
            "Single" => Recurrence::Single { date: start? },
            "Every Day" => Recurrence::EveryDay {
                start_date: start?,
                end_date: end?,
            },
            "Weekly" => {
                let mut days = Vec::new();
                for name in &form.weekly_days {
                    let day = Weekday::from_str(name)
                        .map_err(|_| ScheduleError::BadWeekday(name.clone()))?;
                    days.push(day);
                }
                Recurrence::Weekly {
                    start_date: start?,
                    end_date: end?,
                    repeat_every: form.repeat_every,
                    days,
                }
            }
            "Monthly" => {
                let on = match (form.on_day, form.on_the.as_deref()) {
                    (Some(day), _) => MonthlyOn::Day(day),
                    (None, Some(raw)) if !raw.trim().is_empty() => parse_on_the(raw)?,
                    _ => return Err(ScheduleError::MissingMonthlyAnchor),
                };
                Recurrence::Monthly {
                    start_date: start?,
                    end_date: end?,
                    repeat_every: form.repeat_every,
                    on,
                }
            }
            other => return Err(ScheduleError::UnknownKind(other.to_string())),
        };
        recurrence.validate()?;
        Ok(recurrence)
    }
}

/// Everything a session create/update submits. `payload()` shapes the
/// wire body: base fields, the session type, and only the schedule
/// fields that type needs.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub batch_class_id: String,
    pub status: String,
    pub class_type: String,
    pub session_mode: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub absent_notification: bool,
    pub present_notification: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub recurrence: Recurrence,
}

impl SessionDraft {
    pub fn payload(&self) -> Result<Value, ScheduleError> {
        self.recurrence.validate()?;
        let mut details = self.recurrence.schedule_details();
        if let Some(time) = self.start_time {
            details["startTime"] = json!(time.format("%H:%M").to_string());
        }
        if let Some(time) = self.end_time {
            details["endTime"] = json!(time.format("%H:%M").to_string());
        }
        Ok(json!({
            "batchClassId": self.batch_class_id,
            "status": self.status,
            "classType": self.class_type,
            "sessionMode": self.session_mode,
            "subjectId": self.subject_id,
            "teacherId": self.teacher_id,
            "absentNotification": self.absent_notification,
            "presentNotification": self.present_notification,
            "sessionType": self.recurrence.kind(),
            "scheduleDetails": details,
        }))
    }
}

/// Display fields a free-text filter matches against.
pub trait Searchable {
    fn haystacks(&self) -> Vec<&str>;
}

impl Searchable for Student {
    fn haystacks(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.father_name.as_deref());
        fields
    }
}

impl Searchable for Teacher {
    fn haystacks(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.phone.as_deref());
        fields
    }
}

impl Searchable for Institute {
    fn haystacks(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.address.as_deref());
        fields
    }
}

impl Searchable for Subject {
    fn haystacks(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

/// Case-insensitive substring narrowing of an already-fetched list. The
/// store is untouched; this is a rendered subset.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            item.haystacks()
                .iter()
                .any(|hay| hay.to_lowercase().contains(&needle))
        })
        .collect()
}

/// A row in a table export. Exports serialize whatever page is loaded;
/// they never fetch.
pub trait CsvRow {
    fn csv_header() -> &'static [&'static str];
    fn csv_fields(&self) -> Vec<String>;
}

impl CsvRow for Teacher {
    fn csv_header() -> &'static [&'static str] {
        &["name", "subject", "gender", "phone"]
    }

    fn csv_fields(&self) -> Vec<String> {
        let subject = self
            .subject
            .as_ref()
            .map(|s| s.resolved().map(|r| r.name.clone()).unwrap_or_else(|| s.id().to_string()))
            .unwrap_or_default();
        vec![
            self.name.clone(),
            subject,
            self.gender.clone().unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
        ]
    }
}

impl CsvRow for Student {
    fn csv_header() -> &'static [&'static str] {
        &["name", "email", "fatherPhone", "address"]
    }

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone().unwrap_or_default(),
            self.father_phone.clone().unwrap_or_default(),
            self.address.clone().unwrap_or_default(),
        ]
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn to_csv<T: CsvRow>(rows: &[T]) -> String {
    let mut out = String::new();
    out.push_str(&T::csv_header().join(","));
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = row.csv_fields().iter().map(|f| csv_escape(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn write_csv<T: CsvRow>(rows: &[T], path: &Path) -> anyhow::Result<usize> {
    std::fs::write(path, to_csv(rows))
        .with_context(|| format!("failed to write export {}", path.display()))?;
    Ok(rows.len())
}
