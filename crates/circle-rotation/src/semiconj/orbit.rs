//! Word Enumeration
//!
//! Breadth-first enumeration of a finitely generated group by word length.
//! Shell `r` holds the elements whose shortest word in the generators and
//! their inverses has length exactly `r`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use crate::foundation::Group;

/// Iterator over `(radius, shell)` pairs, starting with `(0, [e])`.
///
/// Ends when a shell comes out empty, which happens only for finite groups.
#[derive(Debug)]
pub struct WordShells<G> {
    generators: Vec<G>,
    visited: HashMap<G, Reached<G>>,
    queue: VecDeque<G>,
    radius: usize,
}

/// Word length of a reached element and the edge it was first reached by.
#[derive(Debug)]
struct Reached<G> {
    radius: usize,
    parent: Option<(G, usize)>,
}

impl<G: Group + Hash> WordShells<G> {
    /// Enumerate the subgroup generated by `generators`.
    pub fn new(generators: &[G]) -> Self {
        let identity = G::identity();
        let mut symmetric: Vec<G> = Vec::with_capacity(2 * generators.len());
        for s in generators {
            for candidate in [s.clone(), s.inverse()] {
                if candidate != identity && !symmetric.contains(&candidate) {
                    symmetric.push(candidate);
                }
            }
        }

        let mut visited = HashMap::new();
        visited.insert(identity.clone(), Reached { radius: 0, parent: None });
        let mut queue = VecDeque::new();
        queue.push_back(identity);

        Self {
            generators: symmetric,
            visited,
            queue,
            radius: 0,
        }
    }

    /// Generators closed under inversion, identity removed.
    pub fn symmetric_generators(&self) -> &[G] {
        &self.generators
    }

    /// Number of distinct elements reached so far, including the shell
    /// that will be produced next.
    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    /// The pair `(g, i)` with `element = g · symmetric_generators()[i]` and
    /// `g` one shell closer to the identity. `None` for the identity and for
    /// elements not reached yet.
    pub fn predecessor(&self, element: &G) -> Option<(&G, usize)> {
        let (g, i) = self.visited.get(element)?.parent.as_ref()?;
        Some((g, *i))
    }

    fn radius_of(&self, element: &G) -> Option<usize> {
        self.visited.get(element).map(|reached| reached.radius)
    }
}

impl<G: Group + Hash> Iterator for WordShells<G> {
    type Item = (usize, Vec<G>);

    fn next(&mut self) -> Option<Self::Item> {
        let radius = self.radius;
        let mut shell = Vec::new();

        while self.queue.front().is_some_and(|g| self.radius_of(g) == Some(radius)) {
            let Some(current) = self.queue.pop_front() else { break };
            for (index, s) in self.generators.iter().enumerate() {
                let next = current.op(s);
                if let Entry::Vacant(e) = self.visited.entry(next.clone()) {
                    e.insert(Reached {
                        radius: radius + 1,
                        parent: Some((current.clone(), index)),
                    });
                    self.queue.push_back(next);
                }
            }
            shell.push(current);
        }

        if shell.is_empty() {
            return None;
        }
        self.radius += 1;
        Some((radius, shell))
    }
}
