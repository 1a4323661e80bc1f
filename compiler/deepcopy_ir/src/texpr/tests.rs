#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::FieldFlags;
use pretty_assertions::assert_eq;

fn setup() -> (Universe, PackageId, TypeId) {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let sub = universe.declare(pkg, "Sub");
    (universe, pkg, sub)
}

fn parse(universe: &mut Universe, pkg: PackageId, expr: &str) -> Result<TypeId, ModelError> {
    let scope = TypeScope {
        package: pkg,
        type_params: &[],
    };
    parse_type_expr(universe, scope, expr)
}

#[test]
fn builtins_and_aliases() {
    let (mut universe, pkg, _) = setup();
    assert_eq!(parse(&mut universe, pkg, "string").unwrap(), TypeId::STRING);
    assert_eq!(parse(&mut universe, pkg, " byte ").unwrap(), TypeId::BYTE);
    assert_eq!(parse(&mut universe, pkg, "any").unwrap(), TypeId::EMPTY_INTERFACE);
    assert_eq!(
        parse(&mut universe, pkg, "interface{}").unwrap(),
        TypeId::EMPTY_INTERFACE
    );
    assert_eq!(parse(&mut universe, pkg, "error").unwrap(), TypeId::ERROR);
}

#[test]
fn unqualified_names_resolve_in_enclosing_package() {
    let (mut universe, pkg, sub) = setup();
    assert_eq!(parse(&mut universe, pkg, "Sub").unwrap(), sub);
    assert_eq!(
        parse(&mut universe, pkg, "example.com/api.Sub").unwrap(),
        sub
    );
}

#[test]
fn composite_shapes_intern_to_the_same_id() {
    let (mut universe, pkg, sub) = setup();
    let parsed = parse(&mut universe, pkg, "map[string][]*Sub").unwrap();
    let ptr = universe.pointer(sub);
    let slice = universe.slice(ptr);
    let expected = universe.map(TypeId::STRING, slice);
    assert_eq!(parsed, expected);

    let arr = parse(&mut universe, pkg, "[4]int").unwrap();
    assert_eq!(
        universe.kind(arr),
        &TypeKind::Array {
            len: 4,
            elem: TypeId::INT
        }
    );
}

#[test]
fn external_packages_become_external_references() {
    let (mut universe, pkg, _) = setup();
    let time = parse(&mut universe, pkg, "time.Time").unwrap();
    assert_eq!(
        universe.name(time),
        Some(&QualifiedName::new("time", "Time"))
    );
    assert_eq!(universe.kind(time), &TypeKind::Unresolved);

    let quantity = parse(
        &mut universe,
        pkg,
        "*k8s.io/apimachinery/pkg/api/resource.Quantity",
    )
    .unwrap();
    assert_eq!(
        universe.display(quantity),
        "*k8s.io/apimachinery/pkg/api/resource.Quantity"
    );
}

#[test]
fn unknown_names_in_known_packages_are_errors() {
    let (mut universe, pkg, _) = setup();
    let err = parse(&mut universe, pkg, "[]Missing").unwrap_err();
    assert!(matches!(
        err,
        ModelError::UnknownType { ref name, .. } if name == "Missing"
    ));
}

#[test]
fn type_parameters_resolve_before_package_names() {
    let (mut universe, pkg, _) = setup();
    let params = vec!["T".to_string()];
    let scope = TypeScope {
        package: pkg,
        type_params: &params,
    };
    let ty = parse_type_expr(&mut universe, scope, "[]T").unwrap();
    let TypeKind::Slice { elem } = *universe.kind(ty) else {
        panic!("expected slice");
    };
    assert_eq!(
        universe.kind(elem),
        &TypeKind::TypeParam {
            name: "T".to_string()
        }
    );
}

#[test]
fn struct_literals_with_embedded_fields_and_tags() {
    let (mut universe, pkg, sub) = setup();
    let ty = parse(
        &mut universe,
        pkg,
        "struct{ A, B int `json:\"a\"`; Sub\n C *string }",
    )
    .unwrap();
    let fields = universe.fields(ty).to_vec();
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "Sub", "C"]);
    assert_eq!(fields[2].ty, sub);
    assert!(fields[2].flags.contains(FieldFlags::EMBEDDED));
    assert!(!fields[3].is_embedded());
}

#[test]
fn nested_inline_struct_is_anonymous() {
    let (mut universe, pkg, _) = setup();
    let ty = parse(&mut universe, pkg, "struct{ Inner struct{ N int } }").unwrap();
    let inner = universe.fields(ty)[0].ty;
    assert!(!universe.node(inner).is_named());
    assert_eq!(universe.fields(inner)[0].ty, TypeId::INT);
}

#[test]
fn func_and_chan_keep_their_shape() {
    let (mut universe, pkg, _) = setup();
    let func = parse(&mut universe, pkg, "func(a int) (string, error)").unwrap();
    assert_eq!(
        universe.kind(func),
        &TypeKind::Func {
            signature: "func(a int) (string, error)".to_string()
        }
    );
    let chan = parse(&mut universe, pkg, "<-chan int").unwrap();
    assert_eq!(universe.kind(chan), &TypeKind::Chan { elem: TypeId::INT });
}

#[test]
fn malformed_expressions_report_offsets() {
    let (mut universe, pkg, _) = setup();
    let err = parse(&mut universe, pkg, "map[string").unwrap_err();
    assert!(matches!(err, ModelError::TypeExpr { offset: 10, .. }));
    assert!(parse(&mut universe, pkg, "[x]int").is_err());
    assert!(parse(&mut universe, pkg, "int int").is_err());
    assert!(parse(&mut universe, pkg, "interface{ M() }").is_err());
}
