//! Per-run state.
//!
//! A [`RunContext`] is created for each generation run and dropped with it.
//! It holds the resolved policies and the memoized per-type answers the
//! strategy resolver asks repeatedly, so nothing is cached process-wide.

use deepcopy_ir::{PackageId, TypeId, TypeKind, Universe};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::strategy::Capability;
use crate::tags::GenerationPolicy;
use crate::GenConfig;

pub struct RunContext<'a> {
    pub universe: &'a Universe,
    pub config: &'a GenConfig,
    targets: FxHashSet<PackageId>,
    policies: FxHashMap<TypeId, GenerationPolicy>,
    generated: FxHashSet<TypeId>,
    pub(crate) assignable: FxHashMap<TypeId, bool>,
    pub(crate) capabilities: FxHashMap<TypeId, Capability>,
}

impl<'a> RunContext<'a> {
    pub fn new(universe: &'a Universe, config: &'a GenConfig, targets: &[PackageId]) -> Self {
        Self {
            universe,
            config,
            targets: targets.iter().copied().collect(),
            policies: FxHashMap::default(),
            generated: FxHashSet::default(),
            assignable: FxHashMap::default(),
            capabilities: FxHashMap::default(),
        }
    }

    pub fn is_target(&self, package: PackageId) -> bool {
        self.targets.contains(&package)
    }

    /// Record the resolved policy of a declared type.
    ///
    /// Must happen for every target type before any strategy is resolved.
    pub fn set_policy(&mut self, ty: TypeId, policy: GenerationPolicy) {
        if policy.enabled {
            if is_copyable(self.universe, ty) {
                self.generated.insert(ty);
            } else if policy.explicit == Some(true) {
                warn!(
                    ty = %self.universe.display(ty),
                    kind = self.universe.kind(self.universe.underlying(ty)).describe(),
                    "deep-copy generation requested for a type that cannot carry copy methods"
                );
            } else {
                debug!(ty = %self.universe.display(ty), "skipping non-copyable type");
            }
        }
        self.policies.insert(ty, policy);
    }

    pub fn policy(&self, ty: TypeId) -> Option<&GenerationPolicy> {
        self.policies.get(&ty)
    }

    /// Whether copy methods for `ty` are emitted by this run.
    pub fn is_generated(&self, ty: TypeId) -> bool {
        self.generated.contains(&ty)
    }

    /// Generated types of `package`, in declaration order.
    pub fn generated_in(&self, package: PackageId) -> Vec<TypeId> {
        self.universe
            .package(package)
            .types
            .iter()
            .copied()
            .filter(|&ty| self.is_generated(ty))
            .collect()
    }
}

/// Whether a declared type can carry `DeepCopyInto`/`DeepCopy` methods.
///
/// Structs always can. Named non-struct types can when they wrap a map,
/// slice, array or struct; a named scalar only when it already declares one
/// of the methods by hand.
pub fn is_copyable(universe: &Universe, ty: TypeId) -> bool {
    match universe.kind(ty) {
        TypeKind::Struct { .. } => true,
        TypeKind::Alias { .. } => {
            let node = universe.node(ty);
            let declares =
                node.method("DeepCopy").is_some() || node.method("DeepCopyInto").is_some();
            match universe.kind(universe.underlying(ty)) {
                TypeKind::Map { .. }
                | TypeKind::Slice { .. }
                | TypeKind::Array { .. }
                | TypeKind::Struct { .. } => true,
                TypeKind::Builtin => declares,
                _ => false,
            }
        }
        _ => false,
    }
}
