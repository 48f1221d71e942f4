//! Property tests over randomly generated acyclic catalogs
//!
//! Course `i` may only require courses with a lower index, so every
//! generated catalog is free of cycles and every plan must pass a full
//! audit.

use std::collections::BTreeSet;

use degree_planner::domain::{
    satisfied, Calendar, Catalog, CodeSet, Course, CourseCode, DegreeRequirements, PlanItem,
    Prereq, Term,
};
use degree_planner::planner::{audit, CourseFacts, PlannerSettings, Preferences};
use degree_planner::Strategy as PlanStrategy;
use degree_planner::{PlanRequest, Planner};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct CourseSeed {
    difficulty: u8,
    credits: u32,
    terms: u8,
    prereq_seeds: Vec<usize>,
    any: bool,
    required: bool,
}

fn course_seed() -> impl Strategy<Value = CourseSeed> {
    (
        1u8..=5,
        1u32..=4,
        0u8..8,
        prop::collection::vec(any::<usize>(), 0..3),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(difficulty, credits, terms, prereq_seeds, any, required)| CourseSeed {
            difficulty,
            credits,
            terms,
            prereq_seeds,
            any,
            required,
        })
}

fn plan_strategy() -> impl Strategy<Value = PlanStrategy> {
    prop_oneof![
        Just(PlanStrategy::OnTime),
        Just(PlanStrategy::MaximizeGpa),
        Just(PlanStrategy::CareerOptimized),
    ]
}

fn code_at(index: usize) -> CourseCode {
    CourseCode::new(&format!("GEN {}", 1000 + index)).unwrap()
}

fn terms_from_mask(mask: u8) -> Vec<Term> {
    [Term::Fall, Term::Spring, Term::Summer]
        .into_iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << *bit) != 0)
        .map(|(_, term)| term)
        .collect()
}

fn build_inputs(seeds: &[CourseSeed]) -> (Catalog, DegreeRequirements) {
    let mut courses = Vec::new();
    let mut core = Vec::new();

    for (i, seed) in seeds.iter().enumerate() {
        let mut course = Course::new(code_at(i))
            .with_difficulty(seed.difficulty)
            .with_credits(seed.credits);

        let terms = terms_from_mask(seed.terms);
        if !terms.is_empty() {
            course = course.offered_in(terms);
        }

        if i > 0 && !seed.prereq_seeds.is_empty() {
            let mut picked: Vec<usize> = seed.prereq_seeds.iter().map(|s| s % i).collect();
            picked.sort_unstable();
            picked.dedup();
            let leaves: Vec<Prereq> = picked.into_iter().map(|p| Prereq::course(code_at(p))).collect();
            let prereq = if seed.any {
                Prereq::any(leaves)
            } else {
                Prereq::all(leaves)
            };
            course = course.with_prereq(prereq);
        }

        if seed.required {
            core.push(code_at(i));
        }
        courses.push(course);
    }

    let requirements = DegreeRequirements {
        core_courses: core,
        ..Default::default()
    };
    (Catalog::from_courses(courses), requirements)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_plans_pass_audit(
        seeds in prop::collection::vec(course_seed(), 1..14),
        completed_mask in any::<u16>(),
        strategy in plan_strategy(),
        include_summer in any::<bool>(),
        semesters in 1usize..9,
        max_credits in 3u32..=18,
        max_difficulty in 4u32..=16,
    ) {
        let (catalog, requirements) = build_inputs(&seeds);
        let mut settings = PlannerSettings::default();
        settings.calendar = Calendar::new(4, include_summer);

        let completed: Vec<CourseCode> = (0..seeds.len())
            .filter(|i| completed_mask & (1 << (i % 16)) != 0)
            .map(code_at)
            .collect();
        let request = PlanRequest::new()
            .completed(completed.clone())
            .semesters(semesters)
            .strategy(strategy)
            .preferences(Preferences {
                max_credits: Some(max_credits),
                max_difficulty_score: Some(max_difficulty),
                ..Default::default()
            });

        let plan = Planner::new(&catalog, &requirements, &settings).generate_plan(&request);

        let done: CodeSet = completed.into_iter().collect();
        let limits = settings.limits.resolve(strategy, &request.preferences);
        let facts = CourseFacts::new(&catalog, &requirements, settings.placeholder_credits);
        let issues = audit(&plan.schedule, &done, &limits, &facts);
        prop_assert!(issues.is_empty(), "audit findings: {:?}", issues);

        // Nothing completed is planned again, and nothing is both placed and unplaced
        let placed: BTreeSet<String> = plan.schedule.items().map(|i| i.to_string()).collect();
        prop_assert_eq!(placed.len(), plan.metadata.courses_placed);
        for code in &done {
            prop_assert!(!plan.schedule.contains(&PlanItem::Course(code.clone())));
        }
        for item in &plan.unplaced {
            prop_assert!(!placed.contains(item));
        }
        prop_assert!(plan.schedule.len() <= semesters);
    }

    #[test]
    fn generation_is_deterministic(
        seeds in prop::collection::vec(course_seed(), 1..14),
        strategy in plan_strategy(),
    ) {
        let (catalog, requirements) = build_inputs(&seeds);
        let settings = PlannerSettings::default();
        let request = PlanRequest::new().strategy(strategy);
        let planner = Planner::new(&catalog, &requirements, &settings);

        let first = serde_json::to_string(&planner.generate_plan(&request)).unwrap();
        let second = serde_json::to_string(&planner.generate_plan(&request)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn satisfaction_is_monotone(
        seeds in prop::collection::vec(course_seed(), 2..14),
        done_mask in any::<u16>(),
        extra_mask in any::<u16>(),
    ) {
        let (catalog, _) = build_inputs(&seeds);
        let pick = |mask: u16| -> CodeSet {
            (0..seeds.len())
                .filter(|i| mask & (1 << (i % 16)) != 0)
                .map(code_at)
                .collect()
        };
        let done = pick(done_mask);
        let more: CodeSet = done.union(&pick(extra_mask)).cloned().collect();

        for course in catalog.iter() {
            let expr = course.prereq.as_ref();
            if satisfied(expr, &done) {
                prop_assert!(satisfied(expr, &more));
            }
            prop_assert_eq!(
                satisfied(expr, &done),
                expr.map_or(true, |p| p.missing_from(&done).is_empty())
            );
        }
    }
}
