//! Property tests for emission order and determinism.
//!
//! 1. Order fixed by dependencies does not depend on declaration order
//! 2. Independent types are emitted in declaration order
//! 3. Generating twice from the same model yields identical text

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use deepcopy_gen::{default_targets, generate, GenConfig};
use deepcopy_ir::load_model;
use proptest::prelude::*;

/// Declaration of `T{index}`; `next` is the type it holds, if any.
fn declaration(index: usize, next: Option<usize>, by_pointer: bool) -> String {
    let field = match next {
        Some(next) if by_pointer => format!(r#"{{ "name": "Next", "type": "*T{next}" }}"#),
        Some(next) => format!(r#"{{ "name": "Next", "type": "T{next}" }}"#),
        None => r#"{ "name": "Tags", "type": "[]string" }"#.to_string(),
    };
    format!(r#"{{ "name": "T{index}", "kind": "struct", "fields": [{field}] }}"#)
}

fn model(declarations: &[String]) -> String {
    format!(
        r#"{{ "packages": [ {{
            "path": "example.com/chain",
            "comments": ["+k8s:deepcopy-gen=package"],
            "types": [{}]
        }} ] }}"#,
        declarations.join(", ")
    )
}

fn render(model: &str) -> String {
    let universe = load_model(model).unwrap();
    let report = generate(&universe, &default_targets(&universe), &GenConfig::default());
    assert!(report.is_success(), "{:?}", report.failures);
    report.outputs[0].contents.clone()
}

/// Type names in the order their `DeepCopyInto` appears.
fn emitted(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.strip_prefix("func (in *"))
        .filter_map(|rest| rest.split_once(") DeepCopyInto("))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// A chain `T0 -> T1 -> ... -> Tn` in a shuffled declaration order.
fn chain_strategy() -> impl Strategy<Value = (usize, Vec<usize>, bool)> {
    (2usize..8, any::<bool>()).prop_flat_map(|(len, by_pointer)| {
        (
            Just(len),
            Just((0..len).collect::<Vec<_>>()).prop_shuffle(),
            Just(by_pointer),
        )
    })
}

fn chain(len: usize, order: &[usize], by_pointer: bool) -> String {
    let declarations: Vec<String> = order
        .iter()
        .map(|&i| declaration(i, (i + 1 < len).then_some(i + 1), by_pointer))
        .collect();
    model(&declarations)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Dependencies come first, however the chain is declared.
    #[test]
    fn prop_dependency_order_ignores_declaration_order(
        (len, order, by_pointer) in chain_strategy()
    ) {
        let identity: Vec<usize> = (0..len).collect();
        let expected = render(&chain(len, &identity, by_pointer));
        let shuffled = render(&chain(len, &order, by_pointer));
        prop_assert_eq!(&shuffled, &expected);

        let names = emitted(&shuffled);
        let reversed: Vec<String> = (0..len).rev().map(|i| format!("T{i}")).collect();
        prop_assert_eq!(names, reversed);
    }

    /// Unrelated types keep their declaration order.
    #[test]
    fn prop_independent_types_track_declaration_order(
        order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let declarations: Vec<String> =
            order.iter().map(|&i| declaration(i, None, false)).collect();
        let text = render(&model(&declarations));
        let expected: Vec<String> = order.iter().map(|i| format!("T{i}")).collect();
        prop_assert_eq!(emitted(&text), expected);
    }

    /// Rendering is a pure function of the model.
    #[test]
    fn prop_generation_is_idempotent((len, order, by_pointer) in chain_strategy()) {
        let model = chain(len, &order, by_pointer);
        prop_assert_eq!(render(&model), render(&model));
    }
}
