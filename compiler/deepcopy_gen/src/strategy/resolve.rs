//! Strategy resolution for fields and container elements.

use deepcopy_ir::{Receiver, TypeId, TypeKind};
use tracing::debug;

use super::{
    hand_written_methods, BodyPlan, Capability, CloneReturn, CopyMethods, CopyStrategy,
    FieldPlan, InterfaceCall, InterfaceMethod, TypePlan,
};
use crate::context::RunContext;
use crate::stack::ensure_sufficient_stack;
use crate::GenError;

/// Resolves strategies on behalf of one field of one owning type, so
/// errors can name both.
struct Resolver<'r, 'a> {
    ctx: &'r mut RunContext<'a>,
    owner: TypeId,
    field: &'r str,
}

impl Resolver<'_, '_> {
    fn unresolved(&self, reason: String) -> GenError {
        GenError::UnresolvedType {
            ty: self.ctx.universe.display(self.owner),
            field: self.field.to_string(),
            reason,
        }
    }

    /// Resolve the strategy for a value of type `ty`. `behind_pointer` is
    /// set when the value is the pointee of a pointer.
    fn resolve(&mut self, ty: TypeId, behind_pointer: bool) -> Result<CopyStrategy, GenError> {
        ensure_sufficient_stack(|| self.resolve_inner(ty, behind_pointer))
    }

    fn resolve_inner(
        &mut self,
        ty: TypeId,
        behind_pointer: bool,
    ) -> Result<CopyStrategy, GenError> {
        let universe = self.ctx.universe;
        let underlying = universe.underlying(ty);

        if matches!(universe.kind(underlying), TypeKind::Interface) {
            if underlying == TypeId::EMPTY_INTERFACE {
                return self.reflective(ty, "holds an empty interface");
            }
            return self.interface_call(ty, underlying);
        }

        if universe.node(ty).is_named() && !ty.is_predeclared() {
            return self.resolve_named(ty, behind_pointer);
        }

        if self.ctx.is_plain_assignable(ty) {
            return Ok(CopyStrategy::DirectAssign);
        }

        self.resolve_shape(ty)
    }

    /// Strategy for an anonymous shape, or for the underlying shape of a
    /// named type (`ty` stays the container type).
    fn resolve_shape(&mut self, ty: TypeId) -> Result<CopyStrategy, GenError> {
        let universe = self.ctx.universe;
        let underlying = universe.underlying(ty);
        if self.ctx.is_plain_assignable(underlying) {
            return Ok(CopyStrategy::DirectAssign);
        }

        match universe.kind(underlying) {
            TypeKind::Pointer { elem } => {
                if universe.node(ty).is_named() {
                    return Err(self.unresolved(format!(
                        "named pointer type {} cannot be deep-copied",
                        universe.display(ty)
                    )));
                }
                let strategy = self.resolve(*elem, true)?;
                Ok(CopyStrategy::walk(CopyStrategy::Pointer, *elem, strategy))
            }
            TypeKind::Slice { elem } => {
                let strategy = self.resolve(*elem, false)?;
                Ok(CopyStrategy::walk(CopyStrategy::Slice, *elem, strategy))
            }
            TypeKind::Array { elem, .. } => {
                let strategy = self.resolve(*elem, false)?;
                Ok(CopyStrategy::walk(CopyStrategy::Array, *elem, strategy))
            }
            TypeKind::Map { key, value } => {
                if !self.ctx.is_plain_assignable(*key) {
                    return Err(self.unresolved(format!(
                        "map key type {} is not plain-assignable",
                        universe.display(*key)
                    )));
                }
                let strategy = self.resolve(*value, false)?;
                Ok(CopyStrategy::walk(CopyStrategy::Map, *value, strategy))
            }
            TypeKind::Struct { .. } => {
                self.reflective(ty, "is an anonymous struct with reference fields")
            }
            TypeKind::TypeParam { .. } => self.reflective(ty, "is a type parameter"),
            TypeKind::Unresolved => self.reflective(ty, "has no known definition"),
            TypeKind::Func { .. } => Err(self.unresolved(format!(
                "func type {} cannot be deep-copied",
                universe.display(ty)
            ))),
            TypeKind::Chan { .. } => Err(self.unresolved(format!(
                "chan type {} cannot be deep-copied",
                universe.display(ty)
            ))),
            TypeKind::Builtin | TypeKind::Alias { .. } | TypeKind::Interface => {
                Ok(CopyStrategy::DirectAssign)
            }
        }
    }

    fn resolve_named(
        &mut self,
        ty: TypeId,
        behind_pointer: bool,
    ) -> Result<CopyStrategy, GenError> {
        let universe = self.ctx.universe;
        match self.ctx.capability(ty)? {
            Capability::Generated {
                methods,
                hand_written,
            } => {
                if universe.is_reference(ty) && !hand_written {
                    // Named maps and slices are copied in place, as their
                    // own DeepCopyInto does.
                    return self.resolve_shape(ty);
                }
                Ok(CopyStrategy::RecurseIntoGenerated(methods))
            }
            Capability::Predefined(methods) => Ok(CopyStrategy::RecurseIntoPredefined(methods)),
            Capability::OptedOut => {
                if behind_pointer {
                    Ok(CopyStrategy::RecurseIntoPredefined(CopyMethods::conventional(
                        universe, ty,
                    )))
                } else {
                    Err(self.unresolved(format!(
                        "{} opts out of deep-copy generation and declares no DeepCopyInto, \
                         but is held by value",
                        universe.display(ty)
                    )))
                }
            }
            Capability::Missing { assumable } => {
                if self.ctx.is_plain_assignable(ty) {
                    return Ok(CopyStrategy::DirectAssign);
                }
                let is_alias = matches!(universe.kind(ty), TypeKind::Alias { .. });
                if is_alias && !universe.is_struct_like(ty) {
                    return self.resolve_shape(ty);
                }
                if matches!(universe.kind(ty), TypeKind::Unresolved) {
                    return self.reflective(ty, "is not defined in the model");
                }
                if assumable {
                    debug!(
                        ty = %universe.display(ty),
                        "assuming conventional deep-copy methods"
                    );
                    return Ok(CopyStrategy::RecurseIntoPredefined(
                        CopyMethods::conventional(universe, ty),
                    ));
                }
                self.reflective(
                    ty,
                    "is outside the bounding dirs and declares no deep-copy methods",
                )
            }
        }
    }

    fn interface_call(&self, ty: TypeId, underlying: TypeId) -> Result<CopyStrategy, GenError> {
        let universe = self.ctx.universe;
        let short = universe.name(ty).map_or("", |n| n.name.as_str());
        let method = format!("DeepCopy{short}");
        let declared = universe.node(underlying).method(&method).is_some()
            || universe.node(ty).method(&method).is_some();
        if !declared {
            return Err(GenError::MissingInterfaceMethod {
                ty: universe.display(self.owner),
                field: self.field.to_string(),
                interface: universe.display(ty),
                method,
            });
        }
        Ok(CopyStrategy::Interface(InterfaceCall { method }))
    }

    fn reflective(&self, ty: TypeId, reason: &str) -> Result<CopyStrategy, GenError> {
        let universe = self.ctx.universe;
        if self.ctx.config.reflective_clone.is_some() {
            debug!(
                owner = %universe.display(self.owner),
                field = self.field,
                ty = %universe.display(ty),
                "falling back to reflective clone"
            );
            return Ok(CopyStrategy::ReflectiveClone);
        }
        Err(self.unresolved(format!(
            "type {} {reason}, and the reflective clone fallback is disabled",
            universe.display(ty)
        )))
    }
}

/// Decide everything needed to emit the copy methods of a generated type.
pub fn plan_type(ctx: &mut RunContext<'_>, ty: TypeId) -> Result<TypePlan, GenError> {
    let universe = ctx.universe;
    let node = universe.node(ty);
    let hand = hand_written_methods(universe, ty)?.unwrap_or(CopyMethods {
        into: false,
        clone: None,
    });
    let reference = universe.is_reference(ty);
    let receiver = if reference {
        Receiver::Value
    } else {
        Receiver::Pointer
    };
    let clone_return = hand.clone.unwrap_or(if reference {
        CloneReturn::Value
    } else {
        CloneReturn::Pointer
    });

    let body = if hand.into {
        None
    } else if hand.clone.is_some() {
        Some(BodyPlan::DelegateToClone)
    } else if universe.is_struct_like(ty) {
        let mut fixups = Vec::new();
        for field in universe.fields(ty) {
            let mut resolver = Resolver {
                ctx: &mut *ctx,
                owner: ty,
                field: &field.name,
            };
            let strategy = resolver.resolve(field.ty, false)?;
            debug!(
                ty = %universe.display(ty),
                field = %field.name,
                strategy = ?strategy.kind(),
                "resolved field"
            );
            if strategy != CopyStrategy::DirectAssign {
                fixups.push(FieldPlan {
                    name: field.name.clone(),
                    ty: field.ty,
                    strategy,
                });
            }
        }
        Some(BodyPlan::Struct { fields: fixups })
    } else {
        let mut resolver = Resolver {
            ctx: &mut *ctx,
            owner: ty,
            field: "",
        };
        Some(BodyPlan::Shape(resolver.resolve_shape(ty)?))
    };

    let mut interfaces = Vec::new();
    if let Some(policy) = ctx.policy(ty) {
        for interface in &policy.interfaces {
            let method = format!("DeepCopy{}", interface.name);
            if node.method(&method).is_some() {
                debug!(
                    ty = %universe.display(ty),
                    method = %method,
                    "interface method is hand-written"
                );
                continue;
            }
            interfaces.push(InterfaceMethod {
                interface: interface.clone(),
                method,
                receiver: policy.receiver,
            });
        }
    }

    Ok(TypePlan {
        ty,
        receiver,
        body,
        emit_clone: hand.clone.is_none(),
        clone_return,
        interfaces,
    })
}
