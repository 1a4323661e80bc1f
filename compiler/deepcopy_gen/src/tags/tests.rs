#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use deepcopy_ir::TypeKind;
use pretty_assertions::assert_eq;

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(ToString::to_string).collect()
}

/// A universe with one struct `T` carrying the given comment lines.
fn with_type(comments: &[&str]) -> (Universe, TypeId) {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let ty = universe.declare(pkg, "T");
    universe.define(ty, TypeKind::Struct { fields: Vec::new() });
    universe.set_comments(ty, lines(comments), Vec::new());
    (universe, ty)
}

#[test]
fn extract_collects_values_in_order() {
    let tags = CommentTags::extract([
        "T is a type.",
        "+k8s:deepcopy-gen:interfaces=a/b.X",
        "// +k8s:deepcopy-gen:interfaces=c/d.Y",
        "+marker",
    ]);
    assert_eq!(
        tags.values(INTERFACES_TAG),
        &["a/b.X".to_string(), "c/d.Y".to_string()]
    );
    assert_eq!(tags.values("marker"), &[String::new()]);
    assert!(tags.values(ENABLED_TAG).is_empty());
    assert!(tags.mentions_generator());
}

#[test]
fn package_default_values() {
    assert_eq!(package_default("p", ["+k8s:deepcopy-gen=package"]), Ok(true));
    assert_eq!(package_default("p", ["nothing here"]), Ok(false));
    assert_eq!(
        package_default("p", ["+k8s:deepcopy-gen=package,register"]),
        Ok(true)
    );
}

#[test]
fn package_default_rejects_bad_values() {
    assert!(matches!(
        package_default("p", ["+k8s:deepcopy-gen=true"]),
        Err(GenError::DirectiveSyntax { ref subject, .. }) if subject == "p"
    ));
    assert!(package_default(
        "p",
        ["+k8s:deepcopy-gen=package", "+k8s:deepcopy-gen=package"]
    )
    .is_err());
}

#[test]
fn type_override_beats_package_default() {
    let (universe, ty) = with_type(&["+k8s:deepcopy-gen=false"]);
    let policy = type_policy(&universe, ty, true).unwrap();
    assert!(!policy.enabled);
    assert!(policy.is_opted_out());

    let (universe, ty) = with_type(&["+k8s:deepcopy-gen=true"]);
    let policy = type_policy(&universe, ty, false).unwrap();
    assert!(policy.enabled);
    assert_eq!(policy.explicit, Some(true));
}

#[test]
fn package_default_applies_without_override() {
    let (universe, ty) = with_type(&[]);
    assert!(type_policy(&universe, ty, true).unwrap().enabled);
    assert!(!type_policy(&universe, ty, false).unwrap().enabled);
}

#[test]
fn unexported_types_need_an_explicit_opt_in() {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let hidden = universe.declare(pkg, "hidden");
    universe.define(hidden, TypeKind::Struct { fields: Vec::new() });
    assert!(!type_policy(&universe, hidden, true).unwrap().enabled);

    universe.set_comments(hidden, lines(&["+k8s:deepcopy-gen=true"]), Vec::new());
    assert!(type_policy(&universe, hidden, true).unwrap().enabled);
}

#[test]
fn second_closest_comments_are_read() {
    let (mut universe, ty) = with_type(&[]);
    universe.set_comments(ty, Vec::new(), lines(&["+k8s:deepcopy-gen=false"]));
    assert!(!type_policy(&universe, ty, true).unwrap().enabled);
}

#[test]
fn conflicting_type_directives_are_errors() {
    let (universe, ty) = with_type(&["+k8s:deepcopy-gen=true", "+k8s:deepcopy-gen=false"]);
    assert!(matches!(
        type_policy(&universe, ty, true),
        Err(GenError::DirectiveSyntax { ref subject, .. }) if subject == "example.com/api.T"
    ));

    let (universe, ty) = with_type(&["+k8s:deepcopy-gen=package"]);
    assert!(type_policy(&universe, ty, true).is_err());
}

#[test]
fn interfaces_are_split_deduplicated_and_sorted() {
    let (universe, ty) = with_type(&[
        "+k8s:deepcopy-gen:interfaces=z/runtime.Object,,a/api.Named",
        "+k8s:deepcopy-gen:interfaces=z/runtime.Object",
    ]);
    let policy = type_policy(&universe, ty, true).unwrap();
    assert_eq!(
        policy.interfaces,
        vec![
            QualifiedName::new("a/api", "Named"),
            QualifiedName::new("z/runtime", "Object"),
        ]
    );
    assert_eq!(policy.receiver, InterfaceReceiver::Pointer);
}

#[test]
fn malformed_interface_lists_are_errors() {
    let (universe, ty) = with_type(&["+k8s:deepcopy-gen:interfaces=Object"]);
    assert!(type_policy(&universe, ty, true).is_err());
}

#[test]
fn interface_short_name_collisions_are_errors() {
    let (universe, ty) = with_type(&["+k8s:deepcopy-gen:interfaces=a/x.Object,b/y.Object"]);
    let err = type_policy(&universe, ty, true).unwrap_err();
    assert!(err.to_string().contains("DeepCopyObject"));
}

#[test]
fn nonpointer_interfaces_flip_the_receiver() {
    let (universe, ty) = with_type(&[
        "+k8s:deepcopy-gen:interfaces=a/x.Object",
        "+k8s:deepcopy-gen:nonpointer-interfaces=true",
    ]);
    let policy = type_policy(&universe, ty, true).unwrap();
    assert_eq!(policy.receiver, InterfaceReceiver::Value);

    let (universe, ty) = with_type(&[
        "+k8s:deepcopy-gen:nonpointer-interfaces=true",
        "+k8s:deepcopy-gen:nonpointer-interfaces=false",
    ]);
    assert!(type_policy(&universe, ty, true).is_err());
}

#[test]
fn interfaces_on_non_struct_types_are_ignored() {
    let mut universe = Universe::new();
    let pkg = universe.add_package("example.com/api", "api");
    let labels = universe.declare(pkg, "Labels");
    let map = universe.map(TypeId::STRING, TypeId::STRING);
    universe.define(labels, TypeKind::Alias { underlying: map });
    universe.set_comments(
        labels,
        lines(&["+k8s:deepcopy-gen:interfaces=a/x.Object"]),
        Vec::new(),
    );
    let policy = type_policy(&universe, labels, true).unwrap();
    assert!(policy.enabled);
    assert!(policy.interfaces.is_empty());
}

#[test]
fn has_directives_checks_package_and_types() {
    let (universe, _) = with_type(&["+k8s:deepcopy-gen=true"]);
    let pkg = universe.package_by_path("example.com/api").unwrap();
    assert!(has_directives(&universe, pkg));

    let (universe, _) = with_type(&["plain comment"]);
    let pkg = universe.package_by_path("example.com/api").unwrap();
    assert!(!has_directives(&universe, pkg));
}
