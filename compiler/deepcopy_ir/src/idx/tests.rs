use super::*;

#[test]
fn predeclared_indices_are_dense() {
    assert_eq!(TypeId::BOOL.raw(), 0);
    assert_eq!(TypeId::RUNE.raw(), 18);
    assert_eq!(TypeId::ERROR.raw(), 19);
    assert_eq!(TypeId::EMPTY_INTERFACE.raw(), 20);
    assert_eq!(TypeId::PREDECLARED_COUNT, 21);
}

#[test]
fn predeclared_lookup_by_spelling() {
    assert_eq!(TypeId::predeclared("string"), Some(TypeId::STRING));
    assert_eq!(TypeId::predeclared("uint8"), Some(TypeId::UINT8));
    assert_eq!(TypeId::predeclared("byte"), Some(TypeId::BYTE));
    assert_eq!(TypeId::predeclared("error"), Some(TypeId::ERROR));
    assert_eq!(TypeId::predeclared("any"), Some(TypeId::EMPTY_INTERFACE));
    assert_eq!(TypeId::predeclared("Config"), None);
}

#[test]
fn dynamic_ids_are_not_predeclared() {
    assert!(TypeId::INT.is_predeclared());
    assert!(TypeId::EMPTY_INTERFACE.is_predeclared());
    assert!(!TypeId::from_raw(TypeId::PREDECLARED_COUNT).is_predeclared());
}

#[test]
fn debug_names_predeclared_types() {
    assert_eq!(format!("{:?}", TypeId::STRING), "TypeId::STRING");
    assert_eq!(format!("{:?}", TypeId::ERROR), "TypeId::ERROR");
    assert_eq!(format!("{:?}", TypeId::from_raw(99)), "TypeId(99)");
}
