//! Copy strategies.
//!
//! For every field of a generated type (and every element of a walked
//! container) the resolver picks one [`CopyStrategy`], in priority order:
//!
//! 1. `DirectAssign` for plain-assignable types without copy methods
//! 2. `RecurseIntoGenerated` for named types generated in this run
//! 3. `RecurseIntoPredefined` for named types whose copy methods exist
//!    elsewhere (hand-written, disabled, or in other packages)
//! 4. a walk (`Pointer`, `Slice`, `Map`, `Array`) for indirections, with the
//!    element resolved recursively
//! 5. `Interface` for interface values, calling their own `DeepCopy<Name>`
//! 6. `ReflectiveClone` as the last resort
//!
//! Decisions are made once, at generation time.

mod capability;
mod resolve;

pub use capability::{hand_written_methods, Capability, CloneReturn, CopyMethods};
pub use resolve::plan_type;

use deepcopy_ir::{QualifiedName, Receiver, TypeId};

use crate::tags::InterfaceReceiver;

/// How one value is copied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyStrategy {
    /// The Go assignment is already a deep copy.
    DirectAssign,
    /// Call copy methods produced by this run.
    RecurseIntoGenerated(CopyMethods),
    /// Call copy methods that exist outside this run.
    RecurseIntoPredefined(CopyMethods),
    /// Call the interface's own `DeepCopy<Name>` method.
    Interface(InterfaceCall),
    /// Hand the value to the configured structural clone function.
    ReflectiveClone,
    /// Allocate a fresh pointee and copy the element into it.
    Pointer(Box<Element>),
    /// Allocate a slice of the same length and copy each element.
    Slice(Box<Element>),
    /// Allocate a map of the same size and copy each value.
    Map(Box<Element>),
    /// Copy each element of a fixed-size array.
    Array(Box<Element>),
}

/// Five-way classification used for reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    DirectAssign,
    RecurseIntoGenerated,
    RecurseIntoPredefined,
    Interface,
    ReflectiveClone,
}

impl CopyStrategy {
    /// Classification of the innermost element strategy.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::DirectAssign => StrategyKind::DirectAssign,
            Self::RecurseIntoGenerated(_) => StrategyKind::RecurseIntoGenerated,
            Self::RecurseIntoPredefined(_) => StrategyKind::RecurseIntoPredefined,
            Self::Interface(_) => StrategyKind::Interface,
            Self::ReflectiveClone => StrategyKind::ReflectiveClone,
            Self::Pointer(elem) | Self::Slice(elem) | Self::Map(elem) | Self::Array(elem) => {
                elem.strategy.kind()
            }
        }
    }

    pub(crate) fn walk(
        make: fn(Box<Element>) -> Self,
        ty: TypeId,
        strategy: CopyStrategy,
    ) -> Self {
        make(Box::new(Element { ty, strategy }))
    }
}

/// The element of a walked container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub ty: TypeId,
    pub strategy: CopyStrategy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceCall {
    /// `DeepCopy<Name>`.
    pub method: String,
}

/// Everything decided about one generated type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypePlan {
    pub ty: TypeId,
    /// Receiver of `DeepCopyInto` and `DeepCopy`: value for named map and
    /// slice types, pointer otherwise.
    pub receiver: Receiver,
    /// `None` when `DeepCopyInto` is hand-written.
    pub body: Option<BodyPlan>,
    /// Emit `DeepCopy`; false when it is hand-written.
    pub emit_clone: bool,
    /// What `DeepCopy` returns (hand-written or generated).
    pub clone_return: CloneReturn,
    pub interfaces: Vec<InterfaceMethod>,
}

impl TypePlan {
    /// Whether any method is left to emit once hand-written ones are skipped.
    pub fn emits_code(&self) -> bool {
        self.body.is_some() || self.emit_clone || !self.interfaces.is_empty()
    }

    /// Types whose generated methods the emitted body calls.
    pub fn generated_callees(&self) -> Vec<TypeId> {
        let mut callees = Vec::new();
        match &self.body {
            Some(BodyPlan::Struct { fields }) => {
                for field in fields {
                    collect_generated(field.ty, &field.strategy, &mut callees);
                }
            }
            Some(BodyPlan::Shape(strategy)) => collect_generated(self.ty, strategy, &mut callees),
            Some(BodyPlan::DelegateToClone) | None => {}
        }
        callees
    }
}

fn collect_generated(ty: TypeId, strategy: &CopyStrategy, callees: &mut Vec<TypeId>) {
    match strategy {
        CopyStrategy::RecurseIntoGenerated(_) => {
            if !callees.contains(&ty) {
                callees.push(ty);
            }
        }
        CopyStrategy::Pointer(elem)
        | CopyStrategy::Slice(elem)
        | CopyStrategy::Map(elem)
        | CopyStrategy::Array(elem) => collect_generated(elem.ty, &elem.strategy, callees),
        CopyStrategy::DirectAssign
        | CopyStrategy::RecurseIntoPredefined(_)
        | CopyStrategy::Interface(_)
        | CopyStrategy::ReflectiveClone => {}
    }
}

/// Body of a generated `DeepCopyInto`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyPlan {
    /// `*out = *in` followed by fixups for the fields listed, in declaration
    /// order. Fields copied by the assignment are not listed.
    Struct { fields: Vec<FieldPlan> },
    /// A named non-struct type copied through its underlying shape.
    Shape(CopyStrategy),
    /// Only `DeepCopy` is hand-written; delegate to it.
    DelegateToClone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPlan {
    pub name: String,
    pub ty: TypeId,
    pub strategy: CopyStrategy,
}

/// One generated `DeepCopy<Name>` method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub interface: QualifiedName,
    pub method: String,
    pub receiver: InterfaceReceiver,
}
