//! Claim dependency graph

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use attest_domain::{ClaimId, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Colour {
    Unvisited,
    InProgress,
    Done,
}

/// A dependency cycle
///
/// The path starts at the revisited claim and ends at it again, so a claim
/// depending on itself is `[T2, T2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    path: Vec<ClaimId>,
}

impl Cycle {
    /// Full path, first and last element equal
    pub fn path(&self) -> &[ClaimId] {
        &self.path
    }

    /// The claim the traversal revisited
    pub fn revisited(&self) -> &ClaimId {
        &self.path[0]
    }

    /// Distinct members of the cycle in path order
    pub fn members(&self) -> &[ClaimId] {
        &self.path[..self.path.len() - 1]
    }

    /// Number of claims on the cycle
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// Whether the cycle is a single claim depending on itself
    pub fn is_self_loop(&self) -> bool {
        self.len() == 1
    }

    /// Whether the given claim lies on the cycle
    pub fn contains(&self, id: &str) -> bool {
        self.members().iter().any(|member| member.as_str() == id)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self.path.iter().map(ClaimId::as_str).collect();
        f.write_str(&path.join(" -> "))
    }
}

/// Directed graph over claim identifiers
///
/// Nodes follow registry order; on duplicate identifiers the first record
/// wins. Edges follow each claim's declared dependency order, restricted to
/// claim targets and de-duplicated.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<ClaimId>,
    index: HashMap<ClaimId, usize>,
    edges: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build the graph from the registry's claim records
    pub fn from_registry(registry: &Registry) -> Self {
        let mut graph = Self::default();

        for record in registry.claims() {
            let id = ClaimId::new(record.id.as_str());
            if !graph.index.contains_key(&id) {
                graph.index.insert(id.clone(), graph.nodes.len());
                graph.nodes.push(id);
            }
        }

        graph.edges = vec![Vec::new(); graph.nodes.len()];
        let mut wired = HashSet::new();
        for record in registry.claims() {
            let Some(&from) = graph.index.get(record.id.as_str()) else {
                continue;
            };
            if !wired.insert(from) {
                continue;
            }
            for dependency in &record.dependencies {
                if let Some(&to) = graph.index.get(dependency.as_str()) {
                    if !graph.edges[from].contains(&to) {
                        graph.edges[from].push(to);
                    }
                }
            }
        }

        graph
    }

    /// Claim identifiers in registry order
    pub fn nodes(&self) -> &[ClaimId] {
        &self.nodes
    }

    /// Number of claims in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no claims
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the graph contains the given claim
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Direct claim dependencies of a claim
    pub fn dependencies(&self, id: &str) -> Vec<&ClaimId> {
        self.index
            .get(id)
            .map(|&node| self.edges[node].iter().map(|&to| &self.nodes[to]).collect())
            .unwrap_or_default()
    }

    /// Transitive claim dependencies of a claim, in discovery order
    ///
    /// The claim itself appears only when it lies on a cycle.
    pub fn closure(&self, id: &str) -> Vec<&ClaimId> {
        match self.index.get(id) {
            Some(&node) => self
                .reachable(node)
                .into_iter()
                .map(|n| &self.nodes[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether the claim depends on itself, directly or transitively
    pub fn is_cyclic(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&node| self.reachable(node).contains(&node))
    }

    /// Every distinct cycle, in traversal order
    ///
    /// Three-colour depth-first traversal; each back edge `u -> v` yields the
    /// shortest path from `v` through `u` back to `v`. Cycles over the same
    /// set of claims are reported once.
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let mut colour = vec![Colour::Unvisited; self.len()];
        let mut seen = HashSet::new();
        let mut cycles = Vec::new();

        for start in 0..self.len() {
            if colour[start] != Colour::Unvisited {
                continue;
            }
            colour[start] = Colour::InProgress;
            let mut stack = vec![(start, 0usize)];

            while let Some((node, next)) = stack.last_mut() {
                let node = *node;
                let Some(&target) = self.edges[node].get(*next) else {
                    colour[node] = Colour::Done;
                    stack.pop();
                    continue;
                };
                *next += 1;

                match colour[target] {
                    Colour::Unvisited => {
                        colour[target] = Colour::InProgress;
                        stack.push((target, 0));
                    }
                    Colour::InProgress => {
                        let path = self.shortest_path(target, node);
                        let mut key: Vec<usize> = path.clone();
                        key.sort_unstable();
                        if seen.insert(key) {
                            let mut ids: Vec<ClaimId> =
                                path.iter().map(|&n| self.nodes[n].clone()).collect();
                            ids.push(self.nodes[target].clone());
                            cycles.push(Cycle { path: ids });
                        }
                    }
                    Colour::Done => {}
                }
            }
        }

        cycles
    }

    /// Implied tier of every claim, aligned with [`nodes`](Self::nodes)
    ///
    /// Longest dependency path from a root claim; a claim with no claim
    /// dependencies has implied tier 0. Claims on or downstream of a cycle
    /// have no implied tier.
    pub fn implied_tiers(&self) -> Vec<Option<u32>> {
        let on_cycle: Vec<bool> = (0..self.len())
            .map(|node| self.reachable(node).contains(&node))
            .collect();
        let tainted: Vec<bool> = (0..self.len())
            .map(|node| on_cycle[node] || self.reachable(node).iter().any(|&n| on_cycle[n]))
            .collect();

        let mut memo = vec![None; self.len()];
        (0..self.len())
            .map(|node| self.depth(node, &tainted, &mut memo))
            .collect()
    }

    fn depth(&self, node: usize, tainted: &[bool], memo: &mut Vec<Option<Option<u32>>>) -> Option<u32> {
        if let Some(depth) = memo[node] {
            return depth;
        }
        let depth = if tainted[node] {
            None
        } else {
            let mut deepest = None;
            for &dep in &self.edges[node] {
                let d = self.depth(dep, tainted, memo)?;
                deepest = deepest.max(Some(d));
            }
            Some(deepest.map_or(0, |d| d + 1))
        };
        memo[node] = Some(depth);
        depth
    }

    fn reachable(&self, node: usize) -> Vec<usize> {
        let mut visited = vec![false; self.len()];
        let mut order = Vec::new();
        let mut stack: Vec<usize> = self.edges[node].iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            order.push(current);
            stack.extend(self.edges[current].iter().rev().filter(|&&n| !visited[n]));
        }

        order
    }

    /// Shortest path `from .. to` following edges, both ends included
    fn shortest_path(&self, from: usize, to: usize) -> Vec<usize> {
        let mut parent: Vec<Option<usize>> = vec![None; self.len()];
        let mut visited = vec![false; self.len()];
        let mut queue = VecDeque::from([from]);
        visited[from] = true;

        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            for &next in &self.edges[current] {
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        let mut path = vec![to];
        let mut current = to;
        while let Some(prev) = parent[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_domain::{Axiom, ClaimRecord};
    use proptest::prelude::*;

    fn graph_of(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let registry = edges
            .iter()
            .fold(
                Registry::builder().axiom(Axiom::new("A1", "Axiom", "")),
                |builder, (id, deps)| {
                    builder.claim(ClaimRecord::new(*id, *id).with_dependencies(deps.iter().copied()))
                },
            )
            .build();
        DependencyGraph::from_registry(&registry)
    }

    fn ids(path: &[ClaimId]) -> Vec<&str> {
        path.iter().map(ClaimId::as_str).collect()
    }

    #[test]
    fn test_axioms_are_not_nodes() {
        let graph = graph_of(&[("T1", &["A1"]), ("T2", &["T1", "A1", "T1"])]);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.dependencies("T2"), vec![&ClaimId::new("T1")]);
        assert!(graph.dependencies("A1").is_empty());
    }

    #[test]
    fn test_acyclic_graph() {
        let graph = graph_of(&[("T1", &["A1"]), ("T2", &["T1"]), ("T3", &["T2", "T1"])]);
        assert!(graph.find_cycles().is_empty());
        assert!(!graph.is_cyclic("T3"));
        let closure: Vec<&str> = graph.closure("T3").into_iter().map(ClaimId::as_str).collect();
        assert_eq!(closure, vec!["T2", "T1"]);
    }

    #[test]
    fn test_self_loop() {
        let graph = graph_of(&[("T1", &["A1"]), ("T2", &["T1", "T2"])]);
        let cycles = graph.find_cycles();

        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(cycles[0].path()), vec!["T2", "T2"]);
        assert_eq!(cycles[0].to_string(), "T2 -> T2");
        assert!(cycles[0].is_self_loop());
        assert!(graph.is_cyclic("T2"));
        assert!(!graph.is_cyclic("T1"));
    }

    #[test]
    fn test_minimal_cycle_reported() {
        // T1 -> T2 -> T3 -> T1 with a chord T3 -> T2
        let graph = graph_of(&[("T1", &["T2"]), ("T2", &["T3"]), ("T3", &["T2", "T1"])]);
        let cycles = graph.find_cycles();

        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(cycles[0].path()), vec!["T2", "T3", "T2"]);
        assert_eq!(ids(cycles[1].path()), vec!["T1", "T2", "T3", "T1"]);
        assert_eq!(cycles[1].revisited().as_str(), "T1");
    }

    #[test]
    fn test_implied_tiers() {
        let graph = graph_of(&[
            ("T1", &["A1"]),
            ("T2", &["T1"]),
            ("T3", &["T1", "T2"]),
            ("T4", &["T5"]),
            ("T5", &["T4"]),
            ("T6", &["T4", "T1"]),
        ]);
        assert_eq!(
            graph.implied_tiers(),
            vec![Some(0), Some(1), Some(2), None, None, None]
        );
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let graph = graph_of(&[("T1", &["A1"]), ("T2", &["T1"]), ("T1", &["T2"])]);
        assert_eq!(graph.len(), 2);
        assert!(graph.find_cycles().is_empty());
    }

    proptest! {
        #[test]
        fn prop_edges_only_to_earlier_claims_are_acyclic(
            deps in proptest::collection::vec(proptest::collection::vec(0usize..100, 0..4), 1..20)
        ) {
            let names: Vec<String> = (0..deps.len()).map(|i| format!("T{}", i)).collect();
            let registry = deps.iter().enumerate().fold(Registry::builder(), |builder, (i, targets)| {
                let targets = targets.iter().filter(|_| i > 0).map(|t| names[t % i].clone());
                builder.claim(ClaimRecord::new(names[i].clone(), "claim").with_dependencies(targets))
            }).build();
            let graph = DependencyGraph::from_registry(&registry);

            prop_assert!(graph.find_cycles().is_empty());
            for (node, tier) in graph.implied_tiers().into_iter().enumerate() {
                let tier = tier.unwrap();
                for dep in graph.dependencies(graph.nodes()[node].as_str()) {
                    let dep_tier = graph.implied_tiers()[graph.nodes().iter().position(|n| n == dep).unwrap()].unwrap();
                    prop_assert!(dep_tier < tier);
                }
            }
        }
    }
}
