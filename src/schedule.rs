use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

lazy_static! {
    // Matched against the uppercased label, so only ASCII capitals are needed.
    static ref DAY_CODE_REGEX: Regex = Regex::new(r"(?:^|[^A-Z])([A-Z]{1,3})$").unwrap();
    static ref TIME_REGEX: Regex = Regex::new(r"(?:^|\D)(\d{1,2}):(\d{2})([AP])").unwrap();
}

/// Sort value used for rows whose label carries no recognizable time.
pub const NO_TIME_SORT_VALUE: u16 = 9999;

/// Ordinal used for labels whose weekday could not be recognized.
pub const UNKNOWN_ORDINAL: u8 = 99;

const FULL_DAY_NAMES: [(&str, Weekday); 7] = [
    ("MONDAY", Weekday::Monday),
    ("TUESDAY", Weekday::Tuesday),
    ("WEDNESDAY", Weekday::Wednesday),
    ("THURSDAY", Weekday::Thursday),
    ("FRIDAY", Weekday::Friday),
    ("SATURDAY", Weekday::Saturday),
    ("SUNDAY", Weekday::Sunday),
];

/// Weekday derived from a class label
///
/// Variants are declared in schedule order, so the derived `Ord` matches the
/// ordinal order (Monday first, Unknown last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Unknown,
}

impl Weekday {
    /// All recognizable weekdays, Monday first.
    pub const DAYS: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Ordinal of the weekday: 0 (Monday) through 6 (Sunday), or 99 for Unknown.
    pub fn ordinal(self) -> u8 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
            Weekday::Unknown => UNKNOWN_ORDINAL,
        }
    }

    /// Inverse of [`Weekday::ordinal`]. Anything outside 0..=6 is Unknown.
    pub fn from_ordinal(ordinal: u8) -> Self {
        Self::DAYS
            .get(ordinal as usize)
            .copied()
            .unwrap_or(Weekday::Unknown)
    }

    /// Look up a short day code such as `M`, `TU` or `THU`.
    ///
    /// The table is fixed: a lone `T` is Tuesday and Thursday's single
    /// letter form is `R`.
    ///
    /// # Arguments
    /// * `code` - Uppercase code of one to three letters
    ///
    /// # Returns
    /// * `Option<Weekday>` - The matching weekday, or None for unknown codes
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" | "MO" | "MON" => Some(Weekday::Monday),
            "T" | "TU" | "TUE" => Some(Weekday::Tuesday),
            "W" | "WE" | "WED" => Some(Weekday::Wednesday),
            "TH" | "R" | "THU" => Some(Weekday::Thursday),
            "F" | "FRI" => Some(Weekday::Friday),
            "SA" | "SAT" => Some(Weekday::Saturday),
            "SU" | "SUN" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
            Weekday::Unknown => "Unknown",
        }
    }

    /// CSS class used to color rows scheduled on this weekday.
    pub fn color_class(self) -> &'static str {
        match self {
            Weekday::Monday => "day-mon",
            Weekday::Tuesday => "day-tue",
            Weekday::Wednesday => "day-wed",
            Weekday::Thursday => "day-thu",
            Weekday::Friday => "day-fri",
            Weekday::Saturday => "day-sat",
            Weekday::Sunday => "day-sun",
            Weekday::Unknown => "day-unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Weekday::Unknown
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.ordinal())
    }
}

/// Time of day as minutes since midnight (0..=1439)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build a time from a 12-hour clock reading
    ///
    /// # Arguments
    /// * `hour` - Hour on the 12-hour clock (1..=12)
    /// * `minute` - Minute (0..=59)
    /// * `pm` - True for PM, false for AM
    ///
    /// # Returns
    /// * `Option<TimeOfDay>` - None when the hour or minute is out of range
    ///
    /// # Examples
    /// ```
    /// use heads_up::schedule::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::from_12_hour(12, 0, false).unwrap().minutes(), 0);
    /// assert_eq!(TimeOfDay::from_12_hour(2, 15, true).unwrap().minutes(), 855);
    /// assert!(TimeOfDay::from_12_hour(13, 0, true).is_none());
    /// ```
    pub fn from_12_hour(hour: u16, minute: u16, pm: bool) -> Option<Self> {
        if !(1..=12).contains(&hour) || minute > 59 {
            return None;
        }
        let hour = hour % 12 + if pm { 12 } else { 0 };
        Some(TimeOfDay(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.0 / 60;
        let minute = self.0 % 60;
        let suffix = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{}:{:02} {}", display_hour, minute, suffix)
    }
}

/// Derived scheduling information for one class label
///
/// Serializes as `{"weekday": 0-6|99, "timeMinutes": n|null, "colorClass": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowClassification {
    pub weekday: Weekday,
    #[serde(rename = "timeMinutes")]
    pub time: Option<TimeOfDay>,
    #[serde(rename = "colorClass")]
    pub color_class: &'static str,
}

impl RowClassification {
    /// Time used for ordering; a missing time sorts after every real time.
    pub fn sort_minutes(&self) -> u16 {
        self.time.map_or(NO_TIME_SORT_VALUE, TimeOfDay::minutes)
    }

    /// Compare two classified labels by weekday, then time, then label text.
    pub fn schedule_cmp(&self, label: &str, other: &RowClassification, other_label: &str) -> Ordering {
        self.weekday
            .cmp(&other.weekday)
            .then_with(|| self.sort_minutes().cmp(&other.sort_minutes()))
            .then_with(|| label.cmp(other_label))
    }
}

/// Classify a free-text class label
///
/// Never fails: labels without a recognizable weekday resolve to
/// `Weekday::Unknown` with no time, and a recognized weekday without a
/// parseable time keeps `time` as None.
///
/// # Arguments
/// * `label` - Class label as written in the sheet, e.g. `"Ballet 10:45A M"`
///
/// # Returns
/// * `RowClassification` - Weekday, optional time and color class
///
/// # Examples
/// ```
/// use heads_up::schedule::{classify, Weekday};
///
/// let class = classify("Ballet 10:45A M");
/// assert_eq!(class.weekday, Weekday::Monday);
/// assert_eq!(class.time.map(|t| t.minutes()), Some(645));
///
/// assert_eq!(classify("Recital").weekday.ordinal(), 99);
/// ```
pub fn classify(label: &str) -> RowClassification {
    let normalized = label.trim().to_uppercase();
    let weekday = extract_weekday(&normalized);
    let time = if weekday.is_known() {
        extract_time(&normalized)
    } else {
        None
    };

    RowClassification {
        weekday,
        time,
        color_class: weekday.color_class(),
    }
}

fn extract_weekday(normalized: &str) -> Weekday {
    if normalized.is_empty() {
        return Weekday::Unknown;
    }

    for (name, day) in FULL_DAY_NAMES {
        if normalized.ends_with(name) {
            return day;
        }
    }

    DAY_CODE_REGEX
        .captures(normalized)
        .and_then(|caps| caps.get(1))
        .and_then(|code| Weekday::from_code(code.as_str()))
        .unwrap_or(Weekday::Unknown)
}

fn extract_time(normalized: &str) -> Option<TimeOfDay> {
    let caps = TIME_REGEX.captures(normalized)?;
    let hour = caps.get(1)?.as_str().parse::<u16>().ok()?;
    let minute = caps.get(2)?.as_str().parse::<u16>().ok()?;
    let pm = caps.get(3)?.as_str() == "P";
    TimeOfDay::from_12_hour(hour, minute, pm)
}

/// Stable-sort items by the schedule order of their labels
///
/// Orders by weekday ordinal, then time of day (missing times last), then
/// label text. Items with identical labels keep their relative order.
///
/// # Arguments
/// * `items` - Items to sort in place
/// * `label_of` - Accessor returning the class label of an item
///
/// # Examples
/// ```
/// use heads_up::schedule::sort_by_schedule;
///
/// let mut labels = vec!["Tap 2 TU", "Ballet 1 M", "Jazz 3 W", "Recital"];
/// sort_by_schedule(&mut labels, |l| *l);
/// assert_eq!(labels, ["Ballet 1 M", "Tap 2 TU", "Jazz 3 W", "Recital"]);
/// ```
pub fn sort_by_schedule<T, F>(items: &mut [T], label_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| {
        let label = label_of(item);
        let class = classify(label);
        (class.weekday, class.sort_minutes(), label.to_string())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ordinal(label: &str) -> u8 {
        classify(label).weekday.ordinal()
    }

    fn minutes(label: &str) -> Option<u16> {
        classify(label).time.map(TimeOfDay::minutes)
    }

    #[test]
    fn short_codes_map_to_each_day() {
        assert_eq!(ordinal("Ballet 1 M"), 0);
        assert_eq!(ordinal("Tap 2 TU"), 1);
        assert_eq!(ordinal("Jazz 3 W"), 2);
        assert_eq!(ordinal("Hip Hop TH"), 3);
        assert_eq!(ordinal("Company F"), 4);
        assert_eq!(ordinal("Rehearsal SA"), 5);
        assert_eq!(ordinal("Open SU"), 6);
    }

    #[test]
    fn single_letter_t_is_tuesday_and_r_is_thursday() {
        assert_eq!(classify("Acro T").weekday, Weekday::Tuesday);
        assert_eq!(classify("Acro R").weekday, Weekday::Thursday);
        assert_eq!(classify("Acro THU").weekday, Weekday::Thursday);
    }

    #[test]
    fn codes_are_case_insensitive() {
        assert_eq!(classify("Hip Hop 10:45A Th").weekday, Weekday::Thursday);
        assert_eq!(classify("ballet mon").weekday, Weekday::Monday);
        assert_eq!(classify("tumbling sat  ").weekday, Weekday::Saturday);
    }

    #[test]
    fn full_names_win_over_short_codes() {
        assert_eq!(ordinal("Jazz 3 Wednesday"), 2);
        assert_eq!(ordinal("Lyrical sunday"), 6);
        assert_eq!(ordinal("Pointe THURSDAY"), 3);
    }

    #[test]
    fn unrecognized_labels_are_unknown() {
        assert_eq!(ordinal("Recital"), UNKNOWN_ORDINAL);
        assert_eq!(ordinal(""), UNKNOWN_ORDINAL);
        assert_eq!(ordinal("   "), UNKNOWN_ORDINAL);
        assert_eq!(ordinal("Tap"), UNKNOWN_ORDINAL);
        assert_eq!(ordinal("Ballet 10:45AM"), UNKNOWN_ORDINAL);
        assert_eq!(ordinal("Jazz 7"), UNKNOWN_ORDINAL);
        assert_eq!(ordinal("Céilí É"), UNKNOWN_ORDINAL);
    }

    #[test]
    fn times_convert_to_minutes_since_midnight() {
        assert_eq!(minutes("Ballet 10:45A M"), Some(645));
        assert_eq!(minutes("Tap 2:15P TU"), Some(855));
        assert_eq!(minutes("Rehearsal 12:00A SA"), Some(0));
        assert_eq!(minutes("Company 12:30P F"), Some(750));
        assert_eq!(minutes("Jazz 6:05pm W"), Some(18 * 60 + 5));
    }

    #[test]
    fn invalid_or_missing_times_are_absent() {
        assert_eq!(minutes("Ballet 1 M"), None);
        assert_eq!(minutes("Ballet 13:00P M"), None);
        assert_eq!(minutes("Ballet 0:30A M"), None);
        assert_eq!(minutes("Ballet 10:45 AM M"), None);
        assert_eq!(classify("Ballet 1 M").sort_minutes(), NO_TIME_SORT_VALUE);
    }

    #[test]
    fn hour_must_not_be_part_of_a_longer_number() {
        assert_eq!(minutes("Tap 112:15P TU"), None);
        assert_eq!(minutes("Tap 2:15P TU"), Some(14 * 60 + 15));
        assert_eq!(minutes("2:15P TU"), Some(14 * 60 + 15));
        assert_eq!(minutes("Tap(12:15P) TU"), Some(12 * 60 + 15));
    }

    #[test]
    fn time_is_ignored_without_weekday() {
        assert_eq!(minutes("Recital 10:45A"), None);
    }

    #[test]
    fn color_depends_only_on_weekday() {
        let a = classify("Ballet 1 M");
        let b = classify("Zumba 9:00A Monday");
        assert_eq!(a.color_class, b.color_class);

        let mut colors: Vec<&str> = Weekday::DAYS.iter().map(|d| d.color_class()).collect();
        colors.push(Weekday::Unknown.color_class());
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 8);
    }

    #[test]
    fn ordinals_round_trip() {
        for day in Weekday::DAYS {
            assert_eq!(Weekday::from_ordinal(day.ordinal()), day);
        }
        assert_eq!(Weekday::from_ordinal(42), Weekday::Unknown);
    }

    #[test]
    fn sorts_by_day_then_time_then_label() {
        let mut labels = vec![
            "Tap 2 TU",
            "Zumba M",
            "Ballet 1 M",
            "Recital",
            "Jazz 3 W",
            "Early 9:00A M",
            "Late 6:00P M",
        ];
        sort_by_schedule(&mut labels, |l| *l);
        assert_eq!(
            labels,
            [
                "Early 9:00A M",
                "Late 6:00P M",
                "Ballet 1 M",
                "Zumba M",
                "Tap 2 TU",
                "Jazz 3 W",
                "Recital"
            ]
        );
    }

    #[test]
    fn sort_is_stable_for_identical_labels() {
        let mut rows = vec![("Tap 2 TU", 1), ("Ballet 1 M", 2), ("Tap 2 TU", 3), ("Ballet 1 M", 4)];
        sort_by_schedule(&mut rows, |row| row.0);
        assert_eq!(rows, [("Ballet 1 M", 2), ("Ballet 1 M", 4), ("Tap 2 TU", 1), ("Tap 2 TU", 3)]);
    }

    #[test]
    fn time_display_uses_twelve_hour_clock() {
        assert_eq!(TimeOfDay::from_12_hour(12, 5, false).unwrap().to_string(), "12:05 AM");
        assert_eq!(TimeOfDay::from_12_hour(12, 30, true).unwrap().to_string(), "12:30 PM");
        assert_eq!(TimeOfDay::from_12_hour(9, 0, true).unwrap().to_string(), "9:00 PM");
    }

    #[test]
    fn serializes_to_wire_shape() {
        let json = serde_json::to_value(classify("Tap 2:15P TU")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"weekday": 1, "timeMinutes": 855, "colorClass": "day-tue"})
        );
        let json = serde_json::to_value(classify("Recital")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"weekday": 99, "timeMinutes": null, "colorClass": "day-unknown"})
        );
    }

    proptest! {
        #[test]
        fn classify_is_total_for_any_string(label in any::<String>()) {
            let class = classify(&label);
            let ordinal = class.weekday.ordinal();
            prop_assert!(ordinal <= 6 || ordinal == UNKNOWN_ORDINAL);
            prop_assert!(class.time.map_or(true, |t| t.minutes() < 1440));
            prop_assert_eq!(class.color_class, class.weekday.color_class());
        }

        #[test]
        fn classify_handles_label_shaped_strings(label in "[A-Za-z ]{0,12}[0-9]{0,3}(:[0-9]{1,3}[AaPp]?)? ?[A-Za-z]{0,9}") {
            let class = classify(&label);
            prop_assert!(class.weekday.is_known() || class.time.is_none());
            prop_assert!(class.sort_minutes() < 1440 || class.sort_minutes() == NO_TIME_SORT_VALUE);
        }
    }
}
