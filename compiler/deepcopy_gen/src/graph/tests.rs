use super::*;
use deepcopy_ir::{Field, PackageId};
use pretty_assertions::assert_eq;

struct Fixture {
    universe: Universe,
    pkg: PackageId,
}

impl Fixture {
    fn new() -> Self {
        let mut universe = Universe::new();
        let pkg = universe.add_package("example.com/api", "api");
        Self { universe, pkg }
    }

    fn declare(&mut self, name: &str) -> TypeId {
        self.universe.declare(self.pkg, name)
    }

    fn structure(&mut self, ty: TypeId, fields: Vec<(&str, TypeId)>) {
        let fields = fields
            .into_iter()
            .map(|(name, ty)| Field::new(name, ty))
            .collect();
        self.universe.define(ty, TypeKind::Struct { fields });
    }
}

#[test]
fn value_fields_are_hard_and_indirections_are_lazy() {
    let mut f = Fixture::new();
    let a = f.declare("A");
    let b = f.declare("B");
    let c = f.declare("C");
    let ptr_c = f.universe.pointer(c);
    let arr_b = f.universe.array(2, b);
    f.structure(a, vec![("B", b), ("Bs", arr_b), ("C", ptr_c)]);
    f.structure(b, vec![("N", TypeId::INT)]);
    f.structure(c, vec![]);

    let graph = DependencyGraph::build(&f.universe, [a]);
    assert_eq!(graph.hard_edges(a), &[b]);
    assert_eq!(graph.lazy_refs(a), &[c]);
}

#[test]
fn interfaces_and_builtins_are_not_nodes() {
    let mut f = Fixture::new();
    let a = f.declare("A");
    let iface = f.declare("Iface");
    f.universe.define(iface, TypeKind::Interface);
    f.structure(a, vec![("I", iface), ("E", TypeId::ERROR), ("S", TypeId::STRING)]);

    let graph = DependencyGraph::build(&f.universe, [a]);
    assert!(graph.hard_edges(a).is_empty());
    assert!(graph.lazy_refs(a).is_empty());
}

#[test]
fn anonymous_structs_propagate_value_containment() {
    let mut f = Fixture::new();
    let a = f.declare("A");
    let b = f.declare("B");
    let inline = f.universe.anonymous_struct(vec![Field::new("B", b)]);
    f.structure(a, vec![("Inner", inline)]);
    f.structure(b, vec![]);

    let graph = DependencyGraph::build(&f.universe, [a]);
    assert_eq!(graph.hard_edges(a), &[b]);
}

#[test]
fn self_reference_through_pointer_is_not_a_cycle() {
    let mut f = Fixture::new();
    let node = f.declare("Node");
    let ptr = f.universe.pointer(node);
    let slice = f.universe.slice(node);
    let map = f.universe.map(TypeId::STRING, node);
    f.structure(node, vec![("Next", ptr), ("Children", slice), ("ByName", map)]);

    let graph = DependencyGraph::build(&f.universe, [node]);
    assert!(graph.find_cycles().is_empty());
    assert_eq!(graph.generation_order(&[node]), vec![node]);
}

#[test]
fn mutual_value_containment_is_a_cycle_with_its_path() {
    let mut f = Fixture::new();
    let a = f.declare("A");
    let b = f.declare("B");
    f.structure(a, vec![("B", b)]);
    f.structure(b, vec![("A", a)]);

    let graph = DependencyGraph::build(&f.universe, [a, b]);
    assert_eq!(graph.find_cycles(), vec![vec![a, b, a]]);
}

#[test]
fn cycles_through_aliases_are_found() {
    let mut f = Fixture::new();
    let a = f.declare("A");
    let wrapper = f.declare("Wrapper");
    let arr = f.universe.array(1, a);
    f.universe
        .define(wrapper, TypeKind::Alias { underlying: arr });
    f.structure(a, vec![("W", wrapper)]);

    let graph = DependencyGraph::build(&f.universe, [a]);
    assert_eq!(graph.find_cycles(), vec![vec![a, wrapper, a]]);
}

#[test]
fn order_puts_dependencies_first() {
    let mut f = Fixture::new();
    let config = f.declare("Config");
    let sub = f.declare("Sub");
    let ptr = f.universe.pointer(sub);
    f.structure(config, vec![("Nested", ptr)]);
    f.structure(sub, vec![("Value", TypeId::INT)]);

    let graph = DependencyGraph::build(&f.universe, [config, sub]);
    assert_eq!(graph.generation_order(&[config, sub]), vec![sub, config]);
}

#[test]
fn independent_types_keep_declaration_order() {
    let mut f = Fixture::new();
    let x = f.declare("X");
    let y = f.declare("Y");
    let z = f.declare("Z");
    for ty in [x, y, z] {
        f.structure(ty, vec![]);
    }
    let graph = DependencyGraph::build(&f.universe, [x, y, z]);
    assert_eq!(graph.generation_order(&[z, x, y]), vec![z, x, y]);
    assert_eq!(graph.generation_order(&[x, y, z]), vec![x, y, z]);
}

#[test]
fn order_ignores_types_outside_the_candidates() {
    let mut f = Fixture::new();
    let a = f.declare("A");
    let b = f.declare("B");
    f.structure(a, vec![("B", b)]);
    f.structure(b, vec![]);

    let graph = DependencyGraph::build(&f.universe, [a]);
    assert_eq!(graph.generation_order(&[a]), vec![a]);
}

#[test]
fn lazy_cycles_are_cut() {
    let mut f = Fixture::new();
    let a = f.declare("A");
    let b = f.declare("B");
    let pa = f.universe.pointer(a);
    let pb = f.universe.pointer(b);
    f.structure(a, vec![("B", pb)]);
    f.structure(b, vec![("A", pa)]);

    let graph = DependencyGraph::build(&f.universe, [a, b]);
    assert!(graph.find_cycles().is_empty());
    assert_eq!(graph.generation_order(&[a, b]), vec![b, a]);
}
