//! Dependency ordering: producers before consumers, with cycle members
//! exempted rather than erroring.
//!
//! The graph is an index-based adjacency list over one partition's movable
//! elements. Both passes use an explicit stack so deep graphs cannot blow
//! the call stack.

use ordfix_types::element::Element;
use std::collections::{HashMap, HashSet};

/// True if `consumer`'s value reads one of `producer`'s declared names.
pub(crate) fn depends_on(consumer: &Element, producer: &Element) -> bool {
    consumer
        .dependencies
        .iter()
        .any(|name| producer.dependency_names.contains(name))
}

#[derive(Debug)]
pub(crate) struct DepGraph {
    /// producers[consumer] lists the local indices the consumer reads.
    producers: Vec<Vec<usize>>,
}

impl DepGraph {
    /// Build the edge lists for `members` (original indices); node ids in
    /// the graph are positions within `members`.
    pub fn build(elements: &[Element], members: &[usize]) -> Self {
        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (local, &index) in members.iter().enumerate() {
            for name in &elements[index].dependency_names {
                by_name.entry(name.as_str()).or_default().push(local);
            }
        }

        let producers = members
            .iter()
            .map(|&index| {
                let mut out = Vec::new();
                for dependency in &elements[index].dependencies {
                    if let Some(found) = by_name.get(dependency.as_str()) {
                        for &producer in found {
                            if !out.contains(&producer) {
                                out.push(producer);
                            }
                        }
                    }
                }
                out
            })
            .collect();

        Self { producers }
    }

    /// Nodes on any dependency cycle, found with a three-color depth-first
    /// traversal. A self-dependency is a cycle of length one and needs no
    /// special casing.
    pub fn cyclic_members(&self) -> HashSet<usize> {
        const UNVISITED: u8 = 0;
        const VISITING: u8 = 1;
        const VISITED: u8 = 2;

        let count = self.producers.len();
        let mut color = vec![UNVISITED; count];
        let mut cyclic = HashSet::new();

        for start in 0..count {
            if color[start] != UNVISITED {
                continue;
            }
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            let mut path: Vec<usize> = vec![start];
            color[start] = VISITING;

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                if frame.1 < self.producers[node].len() {
                    let child = self.producers[node][frame.1];
                    frame.1 += 1;
                    match color[child] {
                        UNVISITED => {
                            color[child] = VISITING;
                            stack.push((child, 0));
                            path.push(child);
                        }
                        VISITING => {
                            // Everything on the current path from the
                            // revisited node onward closes the cycle.
                            if let Some(position) = path.iter().position(|&p| p == child) {
                                cyclic.extend(path[position..].iter().copied());
                            }
                        }
                        _ => {}
                    }
                } else {
                    color[node] = VISITED;
                    stack.pop();
                    path.pop();
                }
            }
        }

        cyclic
    }

    /// Reorder `sorted` (comparator order, node ids) so producers precede
    /// consumers. Exempt nodes keep their comparator position: their edges
    /// are not followed and edges into them are skipped.
    pub fn order(&self, sorted: &[usize], exempt: &HashSet<usize>) -> Vec<usize> {
        let count = self.producers.len();
        let mut position = vec![0usize; count];
        for (rank, &node) in sorted.iter().enumerate() {
            position[node] = rank;
        }

        let children: Vec<Vec<usize>> = (0..count)
            .map(|node| {
                if exempt.contains(&node) {
                    return Vec::new();
                }
                let mut out: Vec<usize> = self.producers[node]
                    .iter()
                    .copied()
                    .filter(|producer| *producer != node && !exempt.contains(producer))
                    .collect();
                out.sort_by_key(|&producer| position[producer]);
                out
            })
            .collect();

        const UNVISITED: u8 = 0;
        const VISITING: u8 = 1;
        const PLACED: u8 = 2;

        let mut state = vec![UNVISITED; count];
        let mut result = Vec::with_capacity(count);

        for &start in sorted {
            if state[start] != UNVISITED {
                continue;
            }
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            state[start] = VISITING;

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                if frame.1 < children[node].len() {
                    let child = children[node][frame.1];
                    frame.1 += 1;
                    if state[child] == UNVISITED {
                        state[child] = VISITING;
                        stack.push((child, 0));
                    }
                } else {
                    state[node] = PLACED;
                    result.push(node);
                    stack.pop();
                }
            }
        }

        result
    }
}
