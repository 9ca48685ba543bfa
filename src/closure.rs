// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::graph::ModuleGraph;
use crate::module::Module;

use core::fmt;
use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

/// Length of a shortest path. `Infinite` orders after every finite distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Distance {
    Finite(u32),
    Infinite,
}

impl Distance {
    pub fn is_finite(self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// Sum of two distances; anything plus infinity stays infinite.
    pub fn plus(self, other: Distance) -> Distance {
        match (self, other) {
            (Distance::Finite(a), Distance::Finite(b)) => match a.checked_add(b) {
                Some(d) => Distance::Finite(d),
                None => Distance::Infinite,
            },
            _ => Distance::Infinite,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{d}"),
            Distance::Infinite => f.write_str("∞"),
        }
    }
}

/// All-pairs shortest hop counts over a fixed list of modules of a
/// [`ModuleGraph`] snapshot (Floyd–Warshall).
///
/// Access counts are ignored: every edge is one hop. The distance from a
/// module to itself is the length of its shortest cycle, not zero.
#[derive(Debug, Clone)]
pub struct TransitiveClosure {
    vertices: Vec<Module>,
    index: BTreeMap<Module, usize>,
    // Row-major n * n.
    adjacent: Vec<bool>,
    distance: Vec<Distance>,
}

impl TransitiveClosure {
    /// Computes the closure of `graph` restricted to `vertices`. Edges to or
    /// from modules outside `vertices` are ignored.
    pub fn new(graph: &ModuleGraph, vertices: &[Module]) -> Self {
        let mut index = BTreeMap::new();
        let mut unique = Vec::with_capacity(vertices.len());
        for v in vertices {
            if !index.contains_key(v) {
                index.insert(v.clone(), unique.len());
                unique.push(v.clone());
            }
        }

        let n = unique.len();
        let mut adjacent = vec![false; n * n];
        let mut distance = vec![Distance::Infinite; n * n];

        // Map graph vertex indices onto closure indices.
        let to_local: Vec<Option<usize>> = graph
            .modules()
            .iter()
            .map(|m| index.get(m).copied())
            .collect();
        for (s, d) in graph.edge_indices() {
            if let (Some(i), Some(j)) = (to_local[s], to_local[d]) {
                adjacent[i * n + j] = true;
                distance[i * n + j] = Distance::Finite(1);
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = distance[i * n + k];
                if !dik.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let through = dik.plus(distance[k * n + j]);
                    if through < distance[i * n + j] {
                        distance[i * n + j] = through;
                    }
                }
            }
        }

        debug!("transitive closure over {n} modules");
        Self {
            vertices: unique,
            index,
            adjacent,
            distance,
        }
    }

    pub fn vertices(&self) -> &[Module] {
        &self.vertices
    }

    fn at(&self, i: usize, j: usize) -> Distance {
        self.distance[i * self.vertices.len() + j]
    }

    fn is_edge(&self, i: usize, j: usize) -> bool {
        self.adjacent[i * self.vertices.len() + j]
    }

    /// `None` if either module is not a vertex of this closure.
    pub fn minimum_distance(&self, source: &Module, dest: &Module) -> Option<Distance> {
        let i = *self.index.get(source)?;
        let j = *self.index.get(dest)?;
        Some(self.at(i, j))
    }

    pub fn is_reachable(&self, source: &Module, dest: &Module) -> bool {
        self.minimum_distance(source, dest)
            .is_some_and(Distance::is_finite)
    }

    /// One shortest path from `source` to `dest`, both ends included.
    ///
    /// The path is empty when `dest` is unreachable and `None` when either
    /// module is not a vertex of this closure. When several shortest paths
    /// exist, which one is returned is unspecified.
    pub fn minimum_distance_path(&self, source: &Module, dest: &Module) -> Option<Vec<Module>> {
        let i = *self.index.get(source)?;
        let j = *self.index.get(dest)?;
        Some(self.path(i, j))
    }

    fn path(&self, i: usize, j: usize) -> Vec<Module> {
        let Distance::Finite(mut remaining) = self.at(i, j) else {
            return vec![];
        };

        let n = self.vertices.len();
        let mut path = vec![self.vertices[i].clone()];
        let mut current = i;
        while remaining > 0 {
            // Step to a successor that is exactly one hop closer to `j`.
            let next = (0..n).find(|&s| {
                self.is_edge(current, s)
                    && match remaining {
                        1 => s == j,
                        r => self.at(s, j) == Distance::Finite(r - 1),
                    }
            });
            match next {
                Some(s) => {
                    path.push(self.vertices[s].clone());
                    current = s;
                    remaining -= 1;
                }
                // Unreachable for a consistent distance matrix.
                None => return vec![],
            }
        }
        path
    }

    /// True if consecutive modules of `path` are joined by direct edges.
    pub fn is_walk(&self, path: &[Module]) -> bool {
        path.windows(2).all(|w| {
            match (self.index.get(&w[0]), self.index.get(&w[1])) {
                (Some(i), Some(j)) => self.is_edge(*i, *j),
                _ => false,
            }
        })
    }
}
