//! Module dependency graph derived from symbol references.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use layercheck_core::{Cancelled, ModelContext, ModuleId, Reference, SymbolId};
use tracing::debug;

/// A deduplicated module-to-module dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Depending module.
    pub from: ModuleId,
    /// Depended-upon module.
    pub to: ModuleId,
    /// Symbol whose reference first produced this edge.
    pub via: SymbolId,
    /// That reference.
    pub target: Reference,
}

/// A dependency cycle between modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Modules on the cycle, rotated to start at the smallest id.
    pub modules: Vec<ModuleId>,
    /// Back edge that closed the cycle during traversal, as `(from, to)`.
    pub closing: (ModuleId, ModuleId),
}

impl fmt::Display for Cycle {
    /// Renders `A -> B -> A`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for module in &self.modules {
            write!(f, "{module} -> ")?;
        }
        match self.modules.first() {
            Some(first) => write!(f, "{first}"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Colour {
    White,
    Grey,
    Black,
}

/// Directed graph over modules. Nodes and successors iterate in id order.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    nodes: BTreeSet<ModuleId>,
    edges: BTreeMap<(ModuleId, ModuleId), DependencyEdge>,
    successors: BTreeMap<ModuleId, BTreeSet<ModuleId>>,
}

impl ModuleGraph {
    /// Derives the graph from every reference that crosses a module boundary.
    ///
    /// Symbols are visited in id order and references in declared order; the
    /// first reference producing an edge is kept as its cause.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the run is cancelled between modules.
    pub fn build(ctx: &ModelContext<'_>) -> Result<Self, Cancelled> {
        let mut graph = Self::default();

        for module in ctx.model.modules() {
            ctx.checkpoint()?;
            graph.nodes.insert(module.id().clone());

            for symbol in module.symbols() {
                for reference in symbol.references() {
                    let Some(target) = ctx.model.target_module(reference) else {
                        continue;
                    };
                    if target.id() == module.id() {
                        continue;
                    }
                    graph.add_edge(DependencyEdge {
                        from: module.id().clone(),
                        to: target.id().clone(),
                        via: symbol.id().clone(),
                        target: reference.clone(),
                    });
                }
            }
        }

        debug!(
            "Built module graph: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    fn add_edge(&mut self, edge: DependencyEdge) {
        let key = (edge.from.clone(), edge.to.clone());
        if self.edges.contains_key(&key) {
            return;
        }
        self.nodes.insert(edge.from.clone());
        self.nodes.insert(edge.to.clone());
        self.successors
            .entry(edge.from.clone())
            .or_default()
            .insert(edge.to.clone());
        self.edges.insert(key, edge);
    }

    /// All edges, ordered by `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values()
    }

    /// Outgoing edges of one module, ordered by target.
    pub fn edges_from<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a DependencyEdge> {
        self.successors
            .get(from)
            .into_iter()
            .flatten()
            .filter_map(move |to| self.edge(from, to.as_str()))
    }

    /// Looks up the edge between two modules.
    #[must_use]
    pub fn edge(&self, from: &str, to: &str) -> Option<&DependencyEdge> {
        self.edges
            .get(&(ModuleId::new(from), ModuleId::new(to)))
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether `to` is reachable from `from` along one or more edges.
    #[must_use]
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([from]);

        while let Some(node) = queue.pop_front() {
            for next in self.successors.get(node).into_iter().flatten() {
                if next.as_str() == to {
                    return true;
                }
                if seen.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }
        false
    }

    /// Finds dependency cycles with a three-colour depth-first traversal.
    ///
    /// Roots and successors are visited in id order. Every back edge closes
    /// one cycle; cycles are canonicalised and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the run is cancelled between roots.
    pub fn cycles(&self, ctx: &ModelContext<'_>) -> Result<Vec<Cycle>, Cancelled> {
        let empty = BTreeSet::new();
        let mut colour: BTreeMap<&ModuleId, Colour> =
            self.nodes.iter().map(|n| (n, Colour::White)).collect();
        let mut seen: BTreeSet<Vec<ModuleId>> = BTreeSet::new();
        let mut cycles = Vec::new();

        for root in &self.nodes {
            ctx.checkpoint()?;
            if colour.get(root) != Some(&Colour::White) {
                continue;
            }

            colour.insert(root, Colour::Grey);
            let mut stack = vec![(root, self.successors.get(root).unwrap_or(&empty).iter())];

            while let Some((node, successors)) = stack.last_mut() {
                let node: &ModuleId = *node;
                let Some(next) = successors.next() else {
                    colour.insert(node, Colour::Black);
                    stack.pop();
                    continue;
                };

                match colour.get(next).copied().unwrap_or(Colour::Black) {
                    Colour::White => {
                        colour.insert(next, Colour::Grey);
                        stack.push((next, self.successors.get(next).unwrap_or(&empty).iter()));
                    }
                    Colour::Grey => {
                        let start = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                        let path: Vec<ModuleId> =
                            stack[start..].iter().map(|(n, _)| (*n).clone()).collect();
                        let canonical = canonicalise(path);
                        if seen.insert(canonical.clone()) {
                            cycles.push(Cycle {
                                modules: canonical,
                                closing: (node.clone(), next.clone()),
                            });
                        }
                    }
                    Colour::Black => {}
                }
            }
        }

        debug!("Found {} dependency cycle(s)", cycles.len());
        Ok(cycles)
    }
}

/// Rotates a cycle so it starts at its smallest module id.
fn canonicalise(mut path: Vec<ModuleId>) -> Vec<ModuleId> {
    if let Some(min) = path
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(i, _)| i)
    {
        path.rotate_left(min);
    }
    path
}
