//! Dependency graph for courses
//!
//! Nodes are course codes still owed; an edge `B -> A` means "A requires B".
//! Uses petgraph for storage and cycle reporting.
//!
//! The graph is built as-is from catalog data. Catalog data that forms a
//! cycle is a data-integrity fault: it is recorded faithfully here and
//! reported by [`DependencyGraph::cycles`] rather than rejected on insert.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use thiserror::Error;

use super::code::CourseCode;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Course not found in graph: {0}")]
    CourseNotFound(CourseCode),
}

/// A dependency graph over course codes
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<CourseCode, ()>,

    /// Map from course code to node index
    node_map: HashMap<CourseCode, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Adds a course to the graph (no-op if present)
    pub fn add_course(&mut self, code: CourseCode) {
        if !self.node_map.contains_key(&code) {
            let idx = self.graph.add_node(code.clone());
            self.node_map.insert(code, idx);
        }
    }

    /// Adds a dependency edge: `course` requires `depends_on`
    ///
    /// The edge direction is: depends_on -> course
    pub fn add_dependency(
        &mut self,
        course: &CourseCode,
        depends_on: &CourseCode,
    ) -> Result<(), GraphError> {
        let course_idx = *self
            .node_map
            .get(course)
            .ok_or_else(|| GraphError::CourseNotFound(course.clone()))?;

        let dep_idx = *self
            .node_map
            .get(depends_on)
            .ok_or_else(|| GraphError::CourseNotFound(depends_on.clone()))?;

        if self.graph.find_edge(dep_idx, course_idx).is_none() {
            self.graph.add_edge(dep_idx, course_idx, ());
        }
        Ok(())
    }

    /// Returns the unmet prerequisites of a course, sorted
    pub fn dependencies(&self, code: &CourseCode) -> Vec<CourseCode> {
        self.neighbors(code, Direction::Incoming)
    }

    /// Returns the courses that require `code`, sorted
    pub fn dependents(&self, code: &CourseCode) -> Vec<CourseCode> {
        self.neighbors(code, Direction::Outgoing)
    }

    fn neighbors(&self, code: &CourseCode, direction: Direction) -> Vec<CourseCode> {
        let idx = match self.node_map.get(code) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut codes: Vec<CourseCode> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }

    /// Returns groups of courses that require each other, each group sorted
    ///
    /// Includes single courses that list themselves as a prerequisite.
    pub fn cycles(&self) -> Vec<Vec<CourseCode>> {
        let mut cycles: Vec<Vec<CourseCode>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| self.graph.find_edge(n, n).is_some())
            })
            .map(|component| {
                let mut codes: Vec<CourseCode> = component
                    .into_iter()
                    .filter_map(|n| self.graph.node_weight(n).cloned())
                    .collect();
                codes.sort();
                codes
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Returns true if the graph contains the course
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.node_map.contains_key(code)
    }

    /// Returns the number of courses in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns the number of dependency edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns all course codes in the graph, sorted
    pub fn courses(&self) -> Vec<CourseCode> {
        let mut codes: Vec<CourseCode> = self.node_map.keys().cloned().collect();
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn graph_with(codes: &[&str]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for c in codes {
            graph.add_course(code(c));
        }
        graph
    }

    #[test]
    fn empty_graph() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn add_courses_is_idempotent() {
        let mut graph = graph_with(&["CS 1114", "CS 2114"]);
        graph.add_course(code("cs1114"));

        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&code("CS 1114")));
    }

    #[test]
    fn edge_direction() {
        let mut graph = graph_with(&["CS 1114", "CS 2114"]);

        // CS 2114 requires CS 1114
        graph.add_dependency(&code("CS 2114"), &code("CS 1114")).unwrap();

        assert_eq!(graph.dependencies(&code("CS 2114")), vec![code("CS 1114")]);
        assert_eq!(graph.dependents(&code("CS 1114")), vec![code("CS 2114")]);
        assert!(graph.dependencies(&code("CS 1114")).is_empty());
    }

    #[test]
    fn duplicate_edges_are_collapsed() {
        let mut graph = graph_with(&["A 1", "B 1"]);
        graph.add_dependency(&code("B 1"), &code("A 1")).unwrap();
        graph.add_dependency(&code("B 1"), &code("a1")).unwrap();

        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unknown_course_returns_error() {
        let mut graph = graph_with(&["A 1"]);
        let result = graph.add_dependency(&code("A 1"), &code("B 1"));
        assert!(matches!(result, Err(GraphError::CourseNotFound(_))));
    }

    #[test]
    fn cycle_reporting() {
        let mut graph = graph_with(&["A 1", "B 1", "C 1", "D 1"]);
        graph.add_dependency(&code("B 1"), &code("A 1")).unwrap();
        graph.add_dependency(&code("C 1"), &code("B 1")).unwrap();
        graph.add_dependency(&code("A 1"), &code("C 1")).unwrap();

        assert_eq!(
            graph.cycles(),
            vec![vec![code("A 1"), code("B 1"), code("C 1")]]
        );
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut graph = graph_with(&["A 1"]);
        graph.add_dependency(&code("A 1"), &code("A 1")).unwrap();

        assert_eq!(graph.cycles(), vec![vec![code("A 1")]]);
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let mut graph = graph_with(&["A 1", "B 1", "C 1"]);
        graph.add_dependency(&code("B 1"), &code("A 1")).unwrap();
        graph.add_dependency(&code("C 1"), &code("B 1")).unwrap();

        assert!(graph.cycles().is_empty());
        assert_eq!(graph.courses(), vec![code("A 1"), code("B 1"), code("C 1")]);
    }
}
