//! Type dependency graph.
//!
//! Nodes are named types reachable from the run's roots. An edge `A -> B`
//! records that A's definition mentions B. Edges come in two flavors:
//!
//! - **hard**: B is held by value (directly, in an array, or inside an
//!   anonymous struct). A's copy code needs B's copy code, and a hard cycle
//!   is a type that contains itself.
//! - **lazy**: B sits behind a pointer, slice or map. Copying recurses at
//!   run time, so lazy edges never form cycles; they only steer the order
//!   in which types are emitted.

use std::collections::VecDeque;

use deepcopy_ir::{TypeId, TypeKind, Universe};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::stack::ensure_sufficient_stack;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Edges {
    hard: Vec<TypeId>,
    lazy: Vec<TypeId>,
}

impl Edges {
    fn add(&mut self, target: TypeId, behind_reference: bool) {
        let list = if behind_reference {
            &mut self.lazy
        } else {
            &mut self.hard
        };
        if !list.contains(&target) {
            list.push(target);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// Nodes in discovery order.
    nodes: Vec<TypeId>,
    edges: FxHashMap<TypeId, Edges>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

impl DependencyGraph {
    /// Build the graph of everything reachable from `roots`.
    ///
    /// Discovery is breadth-first in root order, so node order is stable for
    /// a given input.
    pub fn build(universe: &Universe, roots: impl IntoIterator<Item = TypeId>) -> Self {
        let mut graph = Self::default();
        let mut queue: VecDeque<TypeId> = roots.into_iter().collect();
        let mut seen = FxHashSet::default();

        while let Some(ty) = queue.pop_front() {
            if !seen.insert(ty) {
                continue;
            }
            let edges = definition_edges(universe, ty);
            queue.extend(edges.hard.iter().chain(&edges.lazy).copied());
            graph.nodes.push(ty);
            graph.edges.insert(ty, edges);
        }
        graph
    }

    /// Types `ty` holds by value.
    pub fn hard_edges(&self, ty: TypeId) -> &[TypeId] {
        self.edges.get(&ty).map_or(&[], |e| e.hard.as_slice())
    }

    /// Types `ty` reaches through a pointer, slice or map.
    pub fn lazy_refs(&self, ty: TypeId) -> &[TypeId] {
        self.edges.get(&ty).map_or(&[], |e| e.lazy.as_slice())
    }

    /// Every cycle through hard edges, each as a path that starts and ends
    /// at the same type.
    pub fn find_cycles(&self) -> Vec<Vec<TypeId>> {
        let mut marks = FxHashMap::default();
        let mut stack = Vec::new();
        let mut cycles = Vec::new();
        for &node in &self.nodes {
            if !marks.contains_key(&node) {
                self.visit(node, &mut marks, &mut stack, &mut cycles);
            }
        }
        cycles
    }

    fn visit(
        &self,
        node: TypeId,
        marks: &mut FxHashMap<TypeId, Mark>,
        stack: &mut Vec<TypeId>,
        cycles: &mut Vec<Vec<TypeId>>,
    ) {
        marks.insert(node, Mark::InProgress);
        stack.push(node);
        for &dep in self.hard_edges(node) {
            match marks.get(&dep).copied() {
                None => ensure_sufficient_stack(|| self.visit(dep, marks, stack, cycles)),
                Some(Mark::InProgress) => {
                    let start = stack.iter().position(|&t| t == dep).unwrap_or(0);
                    let mut cycle = stack[start..].to_vec();
                    cycle.push(dep);
                    cycles.push(cycle);
                }
                Some(Mark::Done) => {}
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
    }

    /// Emission order for `candidates` (one package's generated types, in
    /// declaration order).
    ///
    /// A depth-first post-order rooted at each candidate in turn, following
    /// hard edges and then lazy references to other candidates. Dependencies
    /// come before their users, and otherwise-independent types keep their
    /// declaration order. Lazy cycles are cut at the back edge.
    pub fn generation_order(&self, candidates: &[TypeId]) -> Vec<TypeId> {
        let wanted: FxHashSet<TypeId> = candidates.iter().copied().collect();
        let mut visited = FxHashSet::default();
        let mut order = Vec::with_capacity(candidates.len());
        for &root in candidates {
            self.post_order(root, &wanted, &mut visited, &mut order);
        }
        order
    }

    fn post_order(
        &self,
        node: TypeId,
        wanted: &FxHashSet<TypeId>,
        visited: &mut FxHashSet<TypeId>,
        order: &mut Vec<TypeId>,
    ) {
        if !visited.insert(node) {
            return;
        }
        for &dep in self.hard_edges(node).iter().chain(self.lazy_refs(node)) {
            if wanted.contains(&dep) {
                ensure_sufficient_stack(|| self.post_order(dep, wanted, visited, order));
            }
        }
        order.push(node);
    }
}

/// Edges out of a named type's definition.
fn definition_edges(universe: &Universe, ty: TypeId) -> Edges {
    let mut edges = Edges::default();
    match universe.kind(ty) {
        TypeKind::Struct { fields } => {
            for field in fields {
                walk(universe, field.ty, false, &mut edges);
            }
        }
        TypeKind::Alias { underlying } => walk(universe, *underlying, false, &mut edges),
        _ => {}
    }
    edges
}

fn walk(universe: &Universe, ty: TypeId, behind_reference: bool, edges: &mut Edges) {
    let node = universe.node(ty);
    if node.is_named() {
        let is_interface = matches!(
            universe.kind(universe.underlying(ty)),
            TypeKind::Interface
        );
        if !ty.is_predeclared() && !is_interface {
            edges.add(ty, behind_reference);
        }
        return;
    }

    ensure_sufficient_stack(|| match &node.kind {
        TypeKind::Pointer { elem } | TypeKind::Slice { elem } => {
            walk(universe, *elem, true, edges);
        }
        TypeKind::Map { key, value } => {
            walk(universe, *key, true, edges);
            walk(universe, *value, true, edges);
        }
        TypeKind::Array { elem, .. } => walk(universe, *elem, behind_reference, edges),
        TypeKind::Struct { fields } => {
            for field in fields {
                walk(universe, field.ty, behind_reference, edges);
            }
        }
        _ => {}
    });
}

#[cfg(test)]
mod tests;
