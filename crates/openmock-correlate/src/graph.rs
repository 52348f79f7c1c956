use std::collections::{BTreeMap, BTreeSet, VecDeque};

use openmock_core::CorrelationRule;

/// Source contract to target contracts, one entry per rule in rule order.
/// Parallel rules between the same pair are kept as repeated targets.
pub fn correlation_graph(rules: &[CorrelationRule]) -> BTreeMap<String, Vec<String>> {
    let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for rule in rules {
        graph
            .entry(rule.source_contract.clone())
            .or_default()
            .push(rule.target_contract.clone());
    }
    graph
}

/// Shortest rule sequence leading from `start` to `end`.
///
/// Breadth-first over source to target edges; among equally short paths
/// the first discovered in rule order wins. `start == end` yields an empty
/// chain; an unreachable `end` yields `None`.
pub fn correlation_chain(
    rules: &[CorrelationRule],
    start: &str,
    end: &str,
) -> Option<Vec<CorrelationRule>> {
    let mut queue: VecDeque<(&str, Vec<&CorrelationRule>)> = VecDeque::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    queue.push_back((start, Vec::new()));
    visited.insert(start);

    while let Some((current, path)) = queue.pop_front() {
        if current == end {
            return Some(path.into_iter().cloned().collect());
        }

        for rule in rules {
            if rule.source_contract == current && visited.insert(rule.target_contract.as_str()) {
                let mut next = path.clone();
                next.push(rule);
                queue.push_back((rule.target_contract.as_str(), next));
            }
        }
    }

    None
}

/// Rules naming `contract` as source or target.
pub fn rules_for_contract<'a>(
    rules: &'a [CorrelationRule],
    contract: &str,
) -> Vec<&'a CorrelationRule> {
    rules
        .iter()
        .filter(|rule| rule.source_contract == contract || rule.target_contract == contract)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmock_core::Relationship;

    fn rule(source: &str, target: &str) -> CorrelationRule {
        CorrelationRule::new(source, target, "id", "id", Relationship::OneToMany)
    }

    #[test]
    fn graph_keeps_duplicate_edges() {
        let rules = vec![rule("a", "b"), rule("a", "b"), rule("a", "c")];
        let graph = correlation_graph(&rules);
        assert_eq!(graph["a"], vec!["b", "b", "c"]);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn chain_prefers_shortest_path() {
        let rules = vec![rule("a", "b"), rule("b", "c"), rule("c", "d"), rule("a", "d")];
        let chain = correlation_chain(&rules, "a", "d").expect("path");
        assert_eq!(chain, vec![rule("a", "d")]);
    }

    #[test]
    fn chain_handles_cycles_and_self() {
        let rules = vec![rule("a", "b"), rule("b", "a")];
        assert_eq!(correlation_chain(&rules, "a", "a"), Some(Vec::new()));
        assert_eq!(correlation_chain(&rules, "a", "z"), None);
    }

    #[test]
    fn rules_for_contract_matches_either_side() {
        let rules = vec![rule("a", "b"), rule("b", "c"), rule("c", "d")];
        let touching = rules_for_contract(&rules, "b");
        assert_eq!(touching, vec![&rules[0], &rules[1]]);
    }
}
