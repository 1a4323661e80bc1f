use super::*;
use pretty_assertions::assert_eq;

#[test]
fn predeclared_types_are_interned_in_index_order() {
    let universe = Universe::new();
    assert_eq!(universe.len(), TypeId::PREDECLARED_COUNT as usize);
    assert_eq!(
        universe.lookup(&QualifiedName::predeclared("string")),
        Some(TypeId::STRING)
    );
    assert_eq!(
        universe.lookup(&QualifiedName::predeclared("error")),
        Some(TypeId::ERROR)
    );
    assert_eq!(universe.kind(TypeId::ERROR), &TypeKind::Interface);
    assert!(universe.node(TypeId::ERROR).method("Error").is_some());
    assert_eq!(universe.kind(TypeId::EMPTY_INTERFACE), &TypeKind::Interface);
    assert!(!universe.node(TypeId::EMPTY_INTERFACE).is_named());
}

#[test]
fn shapes_are_interned_structurally() {
    let mut universe = Universe::new();
    let a = universe.slice(TypeId::STRING);
    let b = universe.slice(TypeId::STRING);
    let c = universe.slice(TypeId::INT);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let m1 = universe.map(TypeId::STRING, a);
    let m2 = universe.map(TypeId::STRING, b);
    assert_eq!(m1, m2);

    let arr3 = universe.array(3, TypeId::INT);
    let arr4 = universe.array(4, TypeId::INT);
    assert_ne!(arr3, arr4);
}

#[test]
fn declare_is_idempotent_and_ordered() {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let config = universe.declare(pkg, "Config");
    let sub = universe.declare(pkg, "Sub");
    assert_eq!(universe.declare(pkg, "Config"), config);
    assert_eq!(universe.package(pkg).types, vec![config, sub]);
    assert_eq!(universe.kind(config), &TypeKind::Unresolved);
    assert_eq!(universe.package_of(sub), Some(pkg));
    assert_eq!(universe.add_package("example.com/api", "ignored"), pkg);
}

#[test]
fn external_references_are_not_listed_in_packages() {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let time = universe.reference_external(QualifiedName::new("time", "Time"));
    assert_eq!(
        universe.reference_external(QualifiedName::new("time", "Time")),
        time
    );
    assert!(universe.package(pkg).types.is_empty());
    assert_eq!(universe.package_of(time), None);
}

#[test]
fn underlying_follows_alias_chains() {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let labels = universe.declare(pkg, "Labels");
    let tags = universe.declare(pkg, "Tags");
    let map = universe.map(TypeId::STRING, TypeId::STRING);
    universe.define(labels, TypeKind::Alias { underlying: map });
    universe.define(tags, TypeKind::Alias { underlying: labels });

    assert_eq!(universe.underlying(tags), map);
    assert!(universe.is_reference(tags));
    assert!(!universe.is_reference(TypeId::INT));
}

#[test]
fn alias_cycles_do_not_hang() {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let a = universe.declare(pkg, "A");
    let b = universe.declare(pkg, "B");
    universe.define(a, TypeKind::Alias { underlying: b });
    universe.define(b, TypeKind::Alias { underlying: a });
    assert_eq!(universe.underlying(a), a);
}

#[test]
fn display_spells_shapes_in_go_syntax() {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let sub = universe.declare(pkg, "Sub");
    let ptr = universe.pointer(sub);
    let slice = universe.slice(ptr);
    let map = universe.map(TypeId::STRING, slice);
    let arr = universe.array(2, TypeId::BYTE);
    let inline = universe.anonymous_struct(vec![
        Field::new("A", TypeId::INT),
        Field::new("Sub", sub).embedded(),
    ]);

    assert_eq!(universe.display(map), "map[string][]*example.com/api.Sub");
    assert_eq!(universe.display(arr), "[2]byte");
    assert_eq!(
        universe.display(inline),
        "struct{ A int; example.com/api.Sub }"
    );
    assert_eq!(universe.display(TypeId::EMPTY_INTERFACE), "interface{}");
}
