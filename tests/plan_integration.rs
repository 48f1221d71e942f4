//! End-to-end tests for plan generation
//!
//! Covers the reference scenarios (prerequisite chain, OR prerequisite,
//! difficulty cap, choice groups) and a full program loaded from a
//! project directory.

use std::fs;

use degree_planner::domain::{
    satisfied, Catalog, ChoiceGroup, CodeSet, Course, CourseCode, DegreeRequirements, PlanItem,
    Prereq, Term,
};
use degree_planner::planner::{audit, CareerTrack, PlannerSettings, Preferences, Strategy};
use degree_planner::{PlanRequest, Planner, Project};
use tempfile::TempDir;

fn code(s: &str) -> CourseCode {
    s.parse().unwrap()
}

fn codes(list: &[&str]) -> Vec<CourseCode> {
    list.iter().map(|c| code(c)).collect()
}

fn core(list: &[&str]) -> DegreeRequirements {
    DegreeRequirements {
        core_courses: codes(list),
        ..Default::default()
    }
}

fn semester_items(plan: &degree_planner::PlanResult, label: &str) -> Vec<String> {
    let json = serde_json::to_value(&plan.schedule).unwrap();
    json[label]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn simple_chain_leaves_last_course_unplaced() {
    let catalog = Catalog::from_courses([
        Course::new(code("A 1000")).with_difficulty(1),
        Course::new(code("B 1000"))
            .with_difficulty(1)
            .with_prereq(Prereq::course(code("A 1000"))),
        Course::new(code("C 1000"))
            .with_difficulty(1)
            .with_prereq(Prereq::course(code("B 1000"))),
    ]);
    let requirements = core(&["A 1000", "B 1000", "C 1000"]);
    let settings = PlannerSettings::default();

    let request = PlanRequest::new().semesters(2).preferences(Preferences {
        max_credits: Some(6),
        ..Default::default()
    });
    let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);

    assert_eq!(semester_items(&plan, "fall1"), vec!["A 1000"]);
    assert_eq!(semester_items(&plan, "spring1"), vec!["B 1000"]);
    assert_eq!(plan.unplaced, vec!["C 1000"]);
    assert_eq!(plan.warnings[0], "1 courses could not be scheduled");
    assert_eq!(
        plan.warnings[1],
        "  - C 1000: check prerequisites or offering patterns"
    );
}

#[test]
fn or_prerequisite_satisfied_by_either_branch() {
    let z_prereq = Prereq::any(vec![
        Prereq::course(code("X 1000")),
        Prereq::course(code("Y 1000")),
    ]);
    let catalog = Catalog::from_courses([
        Course::new(code("X 1000")),
        Course::new(code("Y 1000")),
        Course::new(code("Z 1000")).with_prereq(z_prereq.clone()),
    ]);
    let done: CodeSet = [code("X 1000")].into_iter().collect();
    assert!(satisfied(Some(&z_prereq), &done));
    assert!(z_prereq.missing_from(&done).is_empty());

    let requirements = core(&["Z 1000"]);
    let settings = PlannerSettings::default();
    let request = PlanRequest::new().completed(codes(&["X 1000"]));
    let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);

    assert_eq!(semester_items(&plan, "fall1"), vec!["Z 1000"]);
    assert!(plan.unplaced.is_empty());
}

#[test]
fn difficulty_cap_excludes_one_course() {
    let catalog = Catalog::from_courses([
        Course::new(code("HARD 1000")).with_difficulty(5),
        Course::new(code("HARD 2000")).with_difficulty(5),
        Course::new(code("MID 1000")).with_difficulty(3),
    ]);
    let requirements = core(&["HARD 1000", "HARD 2000", "MID 1000"]);
    let settings = PlannerSettings::default();

    let request = PlanRequest::new().semesters(1).preferences(Preferences {
        max_difficulty_score: Some(8),
        ..Default::default()
    });
    let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);

    let placed = semester_items(&plan, "fall1");
    assert_eq!(placed.len(), 2);
    assert_eq!(plan.unplaced.len(), 1);
    assert!(!placed.contains(&plan.unplaced[0]));

    let difficulty: u32 = placed
        .iter()
        .map(|c| u32::from(catalog.get(&code(c)).unwrap().difficulty))
        .sum();
    assert!(difficulty <= 8);
}

#[test]
fn choice_group_follows_career_track() {
    let catalog = Catalog::from_courses([Course::new(code("P 1000")), Course::new(code("Q 1000"))]);
    let mut requirements = DegreeRequirements::default();
    requirements.choice_requirements.insert(
        "pick_one".into(),
        ChoiceGroup::new(codes(&["P 1000", "Q 1000"]), 1),
    );

    let mut settings = PlannerSettings::default();
    settings.career_tracks.insert(
        "quant".into(),
        CareerTrack {
            recommended: codes(&["Q 1000"]),
        },
    );

    let request = PlanRequest::new()
        .strategy(Strategy::CareerOptimized)
        .career_track("quant");
    let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);

    assert_eq!(semester_items(&plan, "fall1"), vec!["Q 1000"]);
    assert_eq!(plan.metadata.career_track.as_deref(), Some("quant"));
    assert_eq!(plan.metadata.courses_placed, 1);
}

#[test]
fn start_semester_and_summer_terms() {
    let catalog = Catalog::from_courses([
        Course::new(code("A 1000")),
        Course::new(code("S 1000"))
            .offered_in([Term::Summer])
            .with_prereq(Prereq::course(code("A 1000"))),
    ]);
    let requirements = core(&["A 1000", "S 1000"]);
    let mut settings = PlannerSettings::default();
    settings.calendar = degree_planner::domain::Calendar::new(4, true);

    let request = PlanRequest::new().starting_at("Spring 2").semesters(3);
    let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);

    assert_eq!(semester_items(&plan, "spring2"), vec!["A 1000"]);
    assert_eq!(semester_items(&plan, "summer2"), vec!["S 1000"]);
    assert!(semester_items(&plan, "fall3").is_empty());
}

// =============================================================================
// Full program from a project directory
// =============================================================================

const CATALOG: &str = r#"{
  "courses": {
    "CS 1114": {"name": "Intro to Software Design", "difficulty": 2},
    "CS 2114": {"name": "Software Design and Data Structures", "prereqs": ["CS 1114"]},
    "CS 2505": {"name": "Computer Organization I", "prereqs": ["CS 1114"]},
    "CS 2506": {"name": "Computer Organization II", "prereqs": ["CS 2505"]},
    "CS 3114": {
      "name": "Data Structures and Algorithms",
      "difficulty": 4,
      "prereqs_structured": {"type": "AND", "requirements": [
        {"type": "COURSE", "code": "CS 2114"},
        {"type": "OR", "requirements": [
          {"type": "COURSE", "code": "MATH 2534"},
          {"type": "COURSE", "code": "MATH 3034"}
        ]}
      ]}
    },
    "CS 3214": {
      "name": "Computer Systems",
      "difficulty": 5,
      "prereqs": ["CS 3114", "CS 2506"],
      "typically_offered": ["Fall"]
    },
    "CS 4104": {"name": "Data and Algorithm Analysis", "difficulty": 5, "prereqs": ["CS 3114"]},
    "CS 4704": {"name": "Software Engineering Capstone", "prereqs": ["CS 3114"]},
    "CS 4784": {"name": "HCI Capstone", "prereqs": ["CS 3114"]},
    "CS 4804": {"name": "Intro to AI", "difficulty": 4, "prereqs": ["CS 3114"]},
    "MATH 1225": {"name": "Calculus of a Single Variable", "credits": 4},
    "MATH 1226": {"name": "Calculus of a Single Variable", "credits": 4, "prereqs": ["MATH 1225"]},
    "MATH 2534": {"name": "Discrete Mathematics", "prereqs": ["MATH 1225"]},
    "MATH 3034": {"name": "Intro to Proofs", "prereqs": ["MATH 1226"]},
    "PHYS 2305": {"name": "Foundations of Physics I", "credits": 4},
    "PHYS 2306": {"name": "Foundations of Physics II", "credits": 4, "prereqs": ["PHYS 2305"]},
    "CHEM 1035": {"name": "General Chemistry"},
    "CHEM 1036": {"name": "General Chemistry", "prereqs": ["CHEM 1035"]},
    "ENGL 1105": {"name": "First-Year Writing"}
  },
  "metadata": {"source": "test"}
}"#;

const PROGRAMS: &str = r#"
programs:
  CS:
    major_name: Computer Science
    core_courses: [CS 1114, CS 2114, CS 2505, CS 2506, CS 3114, CS 3214, CS 4104]
    math_requirements: [MATH 1225, MATH 1226, MATH 2534]
    choice_requirements:
      capstone:
        from: [CS 4704, CS 4784]
        pick: 1
    elective_requirements:
      cs_4000:
        min_courses: 2
        filter: CS 4000+
    science_requirements:
      sequences:
        - name: physics
          courses: [PHYS 2305, PHYS 2306]
        - name: chemistry
          courses: [CHEM 1035, CHEM 1036]
      pick_sequences: 1
    pathways_credits: 6
    total_credits: 120
"#;

fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    Project::init(dir.path()).unwrap();

    let planner_dir = dir.path().join(".planner");
    fs::write(planner_dir.join("catalog.json"), CATALOG).unwrap();
    fs::write(planner_dir.join("programs.yaml"), PROGRAMS).unwrap();
    fs::write(
        planner_dir.join("config.toml"),
        "[program]\nmajor = \"CS\"\n",
    )
    .unwrap();
    dir
}

fn full_request() -> PlanRequest {
    PlanRequest::new()
        .completed(codes(&["CS 1114", "MATH 1225"]))
        .strategy(Strategy::MaximizeGpa)
        .career_track("ai_ml")
}

#[test]
fn full_program_plan_is_valid() {
    let dir = setup_project();
    let project = Project::open(dir.path()).unwrap();
    let catalog = project.catalog().unwrap();
    let requirements = project.requirements().unwrap();
    let settings = project.settings();

    let request = full_request();
    let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);

    assert!(plan.unplaced.is_empty(), "unplaced: {:?}", plan.unplaced);

    let schedule = &plan.schedule;

    let done: CodeSet = codes(&["CS 1114", "MATH 1225"]).into_iter().collect();
    let limits = settings.limits.resolve(request.strategy, &request.preferences);
    let facts = degree_planner::planner::CourseFacts::new(&catalog, &requirements, 3);
    let issues = audit(schedule, &done, &limits, &facts);
    assert!(issues.is_empty(), "issues: {:?}", issues);

    for required in ["CS 3214", "CS 4104", "MATH 2534", "PHYS 2306", "CS 4704", "CS 4804"] {
        assert!(
            schedule.contains(&PlanItem::Course(code(required))),
            "{} missing",
            required
        );
    }
    assert!(schedule.contains(&PlanItem::Placeholder("Pathway 2".into())));
    assert!(!schedule.contains(&PlanItem::Course(code("CHEM 1035"))));

    // Both branches of CS 3114's unmet OR are planned
    assert!(schedule.contains(&PlanItem::Course(code("MATH 3034"))));
    // The elective pick that lands on the capstone reuses it
    assert!(!schedule.contains(&PlanItem::Course(code("CS 4784"))));

    // 6 core, 2 math, capstone, 2 physics, 1 elective, MATH 3034, 2 pathways
    let meta = &plan.metadata;
    assert_eq!(meta.existing_credits, 7);
    assert_eq!(meta.courses_placed, 15);
    assert_eq!(meta.strategy, Strategy::MaximizeGpa);
}

#[test]
fn generation_is_deterministic() {
    let dir = setup_project();
    let project = Project::open(dir.path()).unwrap();
    let catalog = project.catalog().unwrap();
    let requirements = project.requirements().unwrap();
    let settings = project.settings();
    let planner = Planner::new(&catalog, &requirements, &settings);

    let first = serde_json::to_string(&planner.generate_plan(&full_request())).unwrap();
    let second = serde_json::to_string(&planner.generate_plan(&full_request())).unwrap();
    assert_eq!(first, second);
}
