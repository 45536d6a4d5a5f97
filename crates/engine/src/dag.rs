// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Topological sort over a mission's sortie dependency graph (§4.6 "Inputs").
//! Sortie dependencies are edges `dependency -> sortie`; the scheduler
//! validates the whole mission is acyclic before computing a ready set.

use ft_core::{Sortie, SortieId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Kahn's algorithm. Returns sorties in an order where every dependency
/// precedes its dependents, or `None` if the graph contains a cycle.
pub fn topological_order(sorties: &[Sortie]) -> Option<Vec<SortieId>> {
    let mut in_degree: HashMap<SortieId, usize> = HashMap::new();
    let mut dependents: HashMap<SortieId, Vec<SortieId>> = HashMap::new();
    let ids: HashSet<SortieId> = sorties.iter().map(|s| s.id).collect();

    for sortie in sorties {
        in_degree.entry(sortie.id).or_insert(0);
        for dep in &sortie.dependencies {
            if !ids.contains(dep) {
                continue;
            }
            *in_degree.entry(sortie.id).or_insert(0) += 1;
            dependents.entry(*dep).or_default().push(sortie.id);
        }
    }

    let mut queue: VecDeque<SortieId> = in_degree.iter().filter(|(_, &d)| d == 0).map(|(id, _)| *id).collect();
    let mut order = Vec::with_capacity(sorties.len());

    while let Some(id) = queue.pop_front() {
        order.push(id);
        if let Some(children) = dependents.get(&id) {
            for child in children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*child);
                    }
                }
            }
        }
    }

    if order.len() == sorties.len() {
        Some(order)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "dag_tests.rs"]
mod tests;
