//! Semesters and schedules
//!
//! Semester labels have the form `<term><year>`: `fall1`, `spring1`,
//! `summer1`, `fall2`, ... Year 1 starts in the fall, so `spring1` follows
//! `fall1`.

use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::code::CourseCode;
use super::course::Term;

#[derive(Debug, Error, PartialEq)]
pub enum SemesterError {
    #[error("Invalid semester label: expected '<fall|spring|summer><year>', got '{0}'")]
    InvalidLabel(String),
}

/// A semester in the degree calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterId {
    term: Term,
    year: u16,
}

impl SemesterId {
    pub fn new(term: Term, year: u16) -> Self {
        Self { term, year }
    }

    pub fn term(&self) -> Term {
        self.term
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// The semester after this one, or `None` past the last representable year
    pub fn next(&self, include_summer: bool) -> Option<Self> {
        match self.term {
            Term::Fall => Some(Self::new(Term::Spring, self.year)),
            Term::Spring if include_summer => Some(Self::new(Term::Summer, self.year)),
            Term::Spring | Term::Summer => self
                .year
                .checked_add(1)
                .map(|year| Self::new(Term::Fall, year)),
        }
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.term.as_str().to_lowercase(), self.year)
    }
}

impl FromStr for SemesterId {
    type Err = SemesterError;

    /// Accepts `fall1`, `fall_1`, `Fall 1` and `FALL-1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        let split = compact
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| SemesterError::InvalidLabel(s.to_string()))?;
        let (term, year) = compact.split_at(split);

        let term: Term = term
            .parse()
            .map_err(|_| SemesterError::InvalidLabel(s.to_string()))?;
        let year: u16 = year
            .parse()
            .map_err(|_| SemesterError::InvalidLabel(s.to_string()))?;
        if year == 0 {
            return Err(SemesterError::InvalidLabel(s.to_string()));
        }

        Ok(Self { term, year })
    }
}

impl TryFrom<String> for SemesterId {
    type Error = SemesterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemesterId> for String {
    fn from(id: SemesterId) -> Self {
        id.to_string()
    }
}

/// Number of regular (fall/spring) terms left before graduating after the
/// spring of `graduation_year`, counting the term `today` falls in
pub fn semesters_remaining(today: NaiveDate, graduation_year: i32) -> usize {
    let half = match Term::containing(today) {
        Term::Spring => 0,
        Term::Summer | Term::Fall => 1,
    };
    let current = i64::from(today.year()) * 2 + half;
    let graduation = i64::from(graduation_year) * 2 + 1;
    usize::try_from(graduation - current).unwrap_or(0)
}

/// The ordered sequence of semesters a plan may use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    years: u16,
    include_summer: bool,
}

impl Calendar {
    pub fn new(years: u16, include_summer: bool) -> Self {
        Self {
            years: years.max(1),
            include_summer,
        }
    }

    pub fn include_summer(&self) -> bool {
        self.include_summer
    }

    /// First semester of the calendar
    pub fn first(&self) -> SemesterId {
        SemesterId::new(Term::Fall, 1)
    }

    /// All semesters of the nominal program length, in order
    pub fn semesters(&self) -> Vec<SemesterId> {
        std::iter::successors(Some(self.first()), |s| s.next(self.include_summer))
            .take_while(|s| s.year <= self.years)
            .collect()
    }

    /// Returns true if the label names a semester of this calendar
    pub fn contains(&self, id: &SemesterId) -> bool {
        (id.term != Term::Summer || self.include_summer) && id.year >= 1 && id.year <= self.years
    }

    /// `count` consecutive semesters starting at `start`
    ///
    /// A label that doesn't parse or isn't part of the calendar starts at
    /// the calendar's first semester. Plans may run past the nominal length,
    /// but the window ends at the last representable year.
    pub fn active(&self, start: &str, count: usize) -> Vec<SemesterId> {
        let start = start
            .parse::<SemesterId>()
            .ok()
            .filter(|id| self.contains(id))
            .unwrap_or_else(|| self.first());

        std::iter::successors(Some(start), |s| s.next(self.include_summer))
            .take(count)
            .collect()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(4, false)
    }
}

/// Something that occupies room in a semester
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlanItem {
    Course(CourseCode),
    /// A non-course slot such as a general-education credit block
    Placeholder(String),
}

impl PlanItem {
    pub fn course_code(&self) -> Option<&CourseCode> {
        match self {
            PlanItem::Course(code) => Some(code),
            PlanItem::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PlanItem::Placeholder(_))
    }
}

impl fmt::Display for PlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanItem::Course(code) => write!(f, "{}", code),
            PlanItem::Placeholder(label) => f.write_str(label),
        }
    }
}

impl Serialize for PlanItem {
    /// Serializes as the course code or placeholder label
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One semester of a schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterSlot {
    pub id: SemesterId,
    /// Position within the schedule, starting at 0
    pub index: usize,
    pub items: Vec<PlanItem>,
}

impl SemesterSlot {
    pub fn courses(&self) -> impl Iterator<Item = &CourseCode> {
        self.items.iter().filter_map(PlanItem::course_code)
    }
}

/// Semester slots in chronological order
///
/// No item appears in two slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    slots: Vec<SemesterSlot>,
}

impl Schedule {
    /// Creates an empty schedule over the given semesters
    pub fn new(semesters: &[SemesterId]) -> Self {
        Self {
            slots: semesters
                .iter()
                .enumerate()
                .map(|(index, id)| SemesterSlot {
                    id: *id,
                    index,
                    items: vec![],
                })
                .collect(),
        }
    }

    /// Builds a schedule exactly as given, duplicates included
    ///
    /// For plans edited outside the planner; audit them before trusting them.
    pub fn from_slots(slots: impl IntoIterator<Item = (SemesterId, Vec<PlanItem>)>) -> Self {
        Self {
            slots: slots
                .into_iter()
                .enumerate()
                .map(|(index, (id, items))| SemesterSlot { id, index, items })
                .collect(),
        }
    }

    pub fn slots(&self) -> &[SemesterSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&SemesterSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the slot holding `item`
    pub fn position_of(&self, item: &PlanItem) -> Option<usize> {
        self.slots.iter().position(|s| s.items.contains(item))
    }

    pub fn contains(&self, item: &PlanItem) -> bool {
        self.position_of(item).is_some()
    }

    /// Appends `item` to a slot
    ///
    /// Returns false (and changes nothing) if the item is already scheduled
    /// or the slot doesn't exist.
    pub fn place(&mut self, index: usize, item: PlanItem) -> bool {
        if index >= self.slots.len() || self.contains(&item) {
            return false;
        }
        self.slots[index].items.push(item);
        true
    }

    /// Removes `item` from a slot, returning true if it was there
    pub fn remove(&mut self, index: usize, item: &PlanItem) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        let before = slot.items.len();
        slot.items.retain(|i| i != item);
        slot.items.len() != before
    }

    /// Moves `item` between slots, appending it to the target
    pub fn relocate(&mut self, from: usize, to: usize, item: &PlanItem) -> bool {
        if to >= self.slots.len() || !self.remove(from, item) {
            return false;
        }
        self.slots[to].items.push(item.clone());
        true
    }

    /// Course codes placed strictly before slot `index`
    pub fn courses_before(&self, index: usize) -> impl Iterator<Item = &CourseCode> {
        self.slots[..index.min(self.slots.len())]
            .iter()
            .flat_map(SemesterSlot::courses)
    }

    /// Every scheduled item, in slot order
    pub fn items(&self) -> impl Iterator<Item = &PlanItem> {
        self.slots.iter().flat_map(|s| s.items.iter())
    }

    /// Number of slots holding at least one item
    pub fn semesters_used(&self) -> usize {
        self.slots.iter().filter(|s| !s.items.is_empty()).count()
    }
}

impl Serialize for Schedule {
    /// Serializes as `{label: [item, ...]}` in chronological order
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for slot in &self.slots {
            map.serialize_entry(&slot.id, &slot.items)?;
        }
        map.end()
    }
}
