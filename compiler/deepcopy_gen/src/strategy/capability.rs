//! What copy methods a named type has, or will have.

use deepcopy_ir::{TypeId, TypeKind, Universe};

use crate::context::RunContext;
use crate::GenError;

/// Shape of a `DeepCopy` method's result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CloneReturn {
    /// `DeepCopy() *T`
    Pointer,
    /// `DeepCopy() T`, used by named map and slice types.
    Value,
}

/// Copy methods available on a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CopyMethods {
    /// `DeepCopyInto(*T)` exists.
    pub into: bool,
    /// `DeepCopy()` exists, with this result shape.
    pub clone: Option<CloneReturn>,
}

impl CopyMethods {
    /// The methods a generator run produces, and the convention assumed for
    /// types generated elsewhere: `DeepCopyInto(*T)` plus `DeepCopy()`
    /// returning `*T`, or `T` for reference types.
    pub fn conventional(universe: &Universe, ty: TypeId) -> Self {
        Self {
            into: true,
            clone: Some(if universe.is_reference(ty) {
                CloneReturn::Value
            } else {
                CloneReturn::Pointer
            }),
        }
    }
}

/// Copy capability of a named, non-interface type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    /// This run emits the methods (possibly alongside hand-written ones).
    Generated { methods: CopyMethods, hand_written: bool },
    /// The methods exist already: hand-written, or assumed by convention.
    Predefined(CopyMethods),
    /// `+k8s:deepcopy-gen=false` and nothing hand-written.
    OptedOut,
    /// No methods are declared or will be generated. `assumable` tells
    /// whether conventional methods may still be assumed: the type is
    /// defined in the model and its package is a target or in bounds.
    Missing { assumable: bool },
}

/// Hand-written copy methods of `ty`, validated against the expected
/// signatures.
pub fn hand_written_methods(
    universe: &Universe,
    ty: TypeId,
) -> Result<Option<CopyMethods>, GenError> {
    let node = universe.node(ty);
    let into = node.method("DeepCopyInto");
    let clone = node.method("DeepCopy");
    if into.is_none() && clone.is_none() {
        return Ok(None);
    }

    let points_to_self =
        |id: TypeId| matches!(universe.kind(id), TypeKind::Pointer { elem } if *elem == ty);
    let signature_error = |method: &str, reason: String| GenError::MethodSignature {
        ty: universe.display(ty),
        method: method.to_string(),
        reason,
    };

    if let Some(method) = into {
        let valid = method.params.len() == 1
            && points_to_self(method.params[0])
            && method.results.is_empty();
        if !valid {
            return Err(signature_error(
                "DeepCopyInto",
                format!(
                    "expected DeepCopyInto(*{}) with no results",
                    universe.display(ty)
                ),
            ));
        }
    }

    let clone = match clone {
        None => None,
        Some(method) => {
            let result = match method.results.as_slice() {
                [result] if method.params.is_empty() => Some(*result),
                _ => None,
            };
            match result {
                Some(result) if result == ty => Some(CloneReturn::Value),
                Some(result) if points_to_self(result) => Some(CloneReturn::Pointer),
                _ => {
                    return Err(signature_error(
                        "DeepCopy",
                        format!(
                            "expected DeepCopy() returning {0} or *{0}",
                            universe.display(ty)
                        ),
                    ));
                }
            }
        }
    };

    Ok(Some(CopyMethods {
        into: into.is_some(),
        clone,
    }))
}

impl RunContext<'_> {
    /// Capability of a named type, memoized for the run.
    pub(crate) fn capability(&mut self, ty: TypeId) -> Result<Capability, GenError> {
        if let Some(&capability) = self.capabilities.get(&ty) {
            return Ok(capability);
        }
        let universe = self.universe;
        let hand = hand_written_methods(universe, ty)?;

        let capability = if self.is_generated(ty) {
            let conventional = CopyMethods::conventional(universe, ty);
            Capability::Generated {
                methods: CopyMethods {
                    into: true,
                    clone: hand.and_then(|h| h.clone).or(conventional.clone),
                },
                hand_written: hand.is_some(),
            }
        } else if let Some(methods) = hand {
            Capability::Predefined(methods)
        } else if self.policy(ty).is_some_and(|p| p.is_opted_out()) {
            Capability::OptedOut
        } else if matches!(universe.kind(ty), TypeKind::Unresolved) {
            Capability::Missing { assumable: false }
        } else {
            let package = universe.name(ty).map_or("", |n| n.package.as_str());
            let in_target = universe
                .package_of(ty)
                .is_some_and(|pkg| self.is_target(pkg));
            Capability::Missing {
                assumable: in_target || self.config.in_bounds(package),
            }
        };

        self.capabilities.insert(ty, capability);
        Ok(capability)
    }

    /// Whether a Go assignment of `ty` already yields a deep copy.
    pub(crate) fn is_plain_assignable(&mut self, ty: TypeId) -> bool {
        if let Some(&known) = self.assignable.get(&ty) {
            return known;
        }
        // Guards value-recursive definitions, which the cycle check reports.
        self.assignable.insert(ty, false);
        let universe = self.universe;
        let assignable = match universe.kind(ty) {
            TypeKind::Builtin => true,
            TypeKind::Alias { underlying } => self.is_plain_assignable(*underlying),
            TypeKind::Array { elem, .. } => self.is_plain_assignable(*elem),
            TypeKind::Struct { fields } => fields.iter().all(|f| self.is_plain_assignable(f.ty)),
            _ => false,
        };
        self.assignable.insert(ty, assignable);
        assignable
    }
}
