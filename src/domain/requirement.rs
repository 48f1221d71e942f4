//! Degree requirement structure
//!
//! Mirrors the program file format:
//!
//! ```json
//! {
//!   "core_courses": ["CS 1114", "CS 2114"],
//!   "math_requirements": ["MATH 1225"],
//!   "choice_requirements": {"capstone": {"from": ["CS 4704", "CS 4784"], "pick": 1}},
//!   "elective_requirements": {"cs_3000": {"min_courses": 4, "filter": "CS 3000+"}},
//!   "science_requirements": {"sequences": [{"name": "physics", "courses": ["PHYS 2305"]}], "pick_sequences": 1},
//!   "pathways_credits": 27,
//!   "total_credits": 120
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::code::CourseCode;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("Invalid course filter: expected '<DEPT|STEM> <LEVEL>+', got '{0}'")]
    Malformed(String),

    #[error("Invalid level in course filter: '{0}'")]
    InvalidLevel(String),
}

fn default_pick() -> usize {
    1
}

fn default_total_credits() -> u32 {
    120
}

/// A "pick N of M" rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceGroup {
    #[serde(default)]
    pub from: Vec<CourseCode>,
    #[serde(default = "default_pick")]
    pub pick: usize,
}

impl ChoiceGroup {
    pub fn new(from: Vec<CourseCode>, pick: usize) -> Self {
        Self { from, pick }
    }
}

/// A minimum number of courses matching a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectiveCategory {
    #[serde(default)]
    pub min_courses: usize,
    #[serde(default)]
    pub filter: String,
}

impl ElectiveCategory {
    pub fn new(min_courses: usize, filter: impl Into<String>) -> Self {
        Self {
            min_courses,
            filter: filter.into(),
        }
    }
}

/// A named group of courses completed together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceSequence {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub courses: Vec<CourseCode>,
}

/// Science requirement block
///
/// `sequences` are alternatives of which `pick_sequences` must be finished;
/// every sequence in `required` must be finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScienceRequirements {
    pub sequences: Vec<ScienceSequence>,
    pub pick_sequences: usize,
    pub required: Vec<ScienceSequence>,
}

impl Default for ScienceRequirements {
    fn default() -> Self {
        Self {
            sequences: vec![],
            pick_sequences: 1,
            required: vec![],
        }
    }
}

/// Extra requirements layered on a major by a concentration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concentration {
    pub additional_core: Vec<CourseCode>,
    pub additional_electives: BTreeMap<String, ElectiveCategory>,
    pub recommended_sequence: Option<BTreeMap<String, Vec<String>>>,
}

/// Requirements of a minor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinorRequirements {
    pub minor_name: String,
    pub total_credits: u32,
    pub required_courses: Vec<CourseCode>,
}

/// Requirements of a degree program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeRequirements {
    pub major_code: String,
    pub major_name: String,
    pub college: String,
    pub degree: String,
    #[serde(default = "default_total_credits")]
    pub total_credits: u32,
    pub core_courses: Vec<CourseCode>,
    pub math_requirements: Vec<CourseCode>,
    pub choice_requirements: BTreeMap<String, ChoiceGroup>,
    pub elective_requirements: BTreeMap<String, ElectiveCategory>,
    pub science_requirements: ScienceRequirements,
    /// General-education credits owed
    pub pathways_credits: u32,
    /// Program-specific difficulty overriding the catalog
    pub difficulty_ratings: BTreeMap<CourseCode, u8>,
    pub recommended_sequence: BTreeMap<String, Vec<String>>,
    pub concentrations: BTreeMap<String, Concentration>,
}

impl Default for DegreeRequirements {
    fn default() -> Self {
        Self {
            major_code: String::new(),
            major_name: String::new(),
            college: String::new(),
            degree: String::new(),
            total_credits: default_total_credits(),
            core_courses: vec![],
            math_requirements: vec![],
            choice_requirements: BTreeMap::new(),
            elective_requirements: BTreeMap::new(),
            science_requirements: ScienceRequirements::default(),
            pathways_credits: 0,
            difficulty_ratings: BTreeMap::new(),
            recommended_sequence: BTreeMap::new(),
            concentrations: BTreeMap::new(),
        }
    }
}

impl DegreeRequirements {
    /// Applies a concentration's overrides
    ///
    /// Extra core courses are appended without duplicates, extra elective
    /// categories replace same-named ones, and a recommended sequence
    /// replaces the major's. Unknown concentrations leave the program as is.
    pub fn with_concentration(mut self, name: &str) -> Self {
        let Some(conc) = self.concentrations.get(name).cloned() else {
            return self;
        };

        push_unique(&mut self.core_courses, conc.additional_core);
        self.elective_requirements.extend(conc.additional_electives);
        if let Some(sequence) = conc.recommended_sequence {
            self.recommended_sequence = sequence;
        }
        self
    }

    /// Folds a minor's required courses into the core list
    pub fn with_minor(mut self, minor: &MinorRequirements) -> Self {
        push_unique(&mut self.core_courses, minor.required_courses.clone());
        self
    }
}

fn push_unique(list: &mut Vec<CourseCode>, extra: Vec<CourseCode>) {
    for code in extra {
        if !list.contains(&code) {
            list.push(code);
        }
    }
}

/// Department side of a course filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentFilter {
    /// Any department in the configured STEM set
    Stem,
    Department(String),
}

/// Parsed `"<DEPT|STEM> <LEVEL>+"` filter, e.g. `CS 3000+`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFilter {
    pub department: DepartmentFilter,
    pub min_level: u32,
}

impl CourseFilter {
    /// Returns true if `code` is in the department (or STEM set) at or
    /// above the level
    pub fn matches(&self, code: &CourseCode, stem_departments: &BTreeSet<String>) -> bool {
        let Some(number) = code.number() else {
            return false;
        };
        let dept = code.department();
        if dept.is_empty() || number < self.min_level {
            return false;
        }

        match &self.department {
            DepartmentFilter::Stem => stem_departments.contains(dept),
            DepartmentFilter::Department(d) => d == dept,
        }
    }
}

impl FromStr for CourseFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [dept, level] = parts.as_slice() else {
            return Err(FilterError::Malformed(s.to_string()));
        };

        let level_digits = level.trim_end_matches('+');
        let min_level = level_digits
            .parse()
            .map_err(|_| FilterError::InvalidLevel(level.to_string()))?;

        let dept = dept.to_uppercase();
        let department = if dept == "STEM" {
            DepartmentFilter::Stem
        } else {
            DepartmentFilter::Department(dept)
        };

        Ok(Self {
            department,
            min_level,
        })
    }
}

impl fmt::Display for CourseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.department {
            DepartmentFilter::Stem => write!(f, "STEM {}+", self.min_level),
            DepartmentFilter::Department(d) => write!(f, "{} {}+", d, self.min_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn stem() -> BTreeSet<String> {
        ["CS", "MATH"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_department_filter() {
        let filter: CourseFilter = "cs 3000+".parse().unwrap();
        assert_eq!(filter.department, DepartmentFilter::Department("CS".into()));
        assert_eq!(filter.min_level, 3000);
        assert_eq!(filter.to_string(), "CS 3000+");

        assert!(filter.matches(&code("CS 3114"), &stem()));
        assert!(!filter.matches(&code("CS 2114"), &stem()));
        assert!(!filter.matches(&code("MATH 4564"), &stem()));
    }

    #[test]
    fn parse_stem_filter() {
        let filter: CourseFilter = "STEM 2000+".parse().unwrap();
        assert_eq!(filter.department, DepartmentFilter::Stem);

        assert!(filter.matches(&code("MATH 2114"), &stem()));
        assert!(!filter.matches(&code("ENGL 3000"), &stem()));
        assert!(!filter.matches(&code("CS 1114"), &stem()));
    }

    #[test]
    fn malformed_filters() {
        assert!(matches!("".parse::<CourseFilter>(), Err(FilterError::Malformed(_))));
        assert!(matches!("CS".parse::<CourseFilter>(), Err(FilterError::Malformed(_))));
        assert!(matches!(
            "CS 3000+ extra".parse::<CourseFilter>(),
            Err(FilterError::Malformed(_))
        ));
        assert!(matches!(
            "CS level+".parse::<CourseFilter>(),
            Err(FilterError::InvalidLevel(_))
        ));
    }

    #[test]
    fn parse_requirements_json() {
        let json = r#"{
            "major_code": "CS",
            "core_courses": ["CS 1114", "CS 2114"],
            "choice_requirements": {"capstone": {"from": ["CS 4704", "CS 4784"]}},
            "elective_requirements": {"cs": {"min_courses": 2, "filter": "CS 3000+"}},
            "science_requirements": {"sequences": [{"name": "phys", "courses": ["PHYS 2305", "PHYS 2306"]}]},
            "difficulty_ratings": {"CS 2114": 4}
        }"#;

        let req: DegreeRequirements = serde_json::from_str(json).unwrap();
        assert_eq!(req.total_credits, 120);
        assert_eq!(req.core_courses.len(), 2);
        assert_eq!(req.choice_requirements["capstone"].pick, 1);
        assert_eq!(req.science_requirements.pick_sequences, 1);
        assert_eq!(req.difficulty_ratings.get(&code("cs2114")), Some(&4));
    }

    #[test]
    fn concentration_merges() {
        let mut req = DegreeRequirements {
            core_courses: vec![code("CS 1114")],
            ..Default::default()
        };
        req.elective_requirements
            .insert("cs".into(), ElectiveCategory::new(4, "CS 3000+"));
        req.concentrations.insert(
            "CS-AI".into(),
            Concentration {
                additional_core: vec![code("CS 4804"), code("CS 1114")],
                additional_electives: [("ai".to_string(), ElectiveCategory::new(2, "CS 4000+"))]
                    .into_iter()
                    .collect(),
                recommended_sequence: None,
            },
        );

        let merged = req.clone().with_concentration("CS-AI");
        assert_eq!(merged.core_courses, vec![code("CS 1114"), code("CS 4804")]);
        assert_eq!(merged.elective_requirements.len(), 2);

        let unchanged = req.clone().with_concentration("nope");
        assert_eq!(unchanged, req);
    }

    #[test]
    fn minor_adds_required_courses() {
        let req = DegreeRequirements {
            core_courses: vec![code("CS 1114")],
            ..Default::default()
        };
        let minor = MinorRequirements {
            minor_name: "Math".into(),
            total_credits: 18,
            required_courses: vec![code("MATH 3034"), code("cs 1114")],
        };

        let merged = req.with_minor(&minor);
        assert_eq!(merged.core_courses, vec![code("CS 1114"), code("MATH 3034")]);
    }
}
