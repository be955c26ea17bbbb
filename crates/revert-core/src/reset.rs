//! Reset engine
//!
//! Walks an instance's class chain from most-derived to least-derived and
//! reapplies each class's declared members onto the instance. Method and
//! accessor declarations are restored verbatim, wiping instance overrides.
//! Data declarations only restore descriptor flags; the value the instance
//! currently holds survives. Members the instance added under names no class
//! declares are never touched.

use crate::object::{Class, Instance, Property, PropertyKind};
use crate::registry::ClassRegistry;
use crate::{ResetError, ResetResult};
use rustc_hash::FxHashSet;

/// Restore an instance to the shape declared by its class chain
///
/// Fails with [`ResetError::NotAnInstance`] when the target has no class in
/// the registry, and with [`ResetError::SealedTarget`] when its member table
/// is sealed. Both are checked up front; on error the instance is untouched.
///
/// Each member name is resolved at most once, by the most-derived class that
/// declares it, so a subclass redeclaration always wins over its ancestors.
/// The root class is never processed: its built-ins stay on the chain.
pub fn reset(instance: &mut Instance, registry: &ClassRegistry) -> ResetResult<()> {
    let class_id = instance.class_id().ok_or(ResetError::NotAnInstance)?;
    if registry.get(class_id).is_none() {
        return Err(ResetError::NotAnInstance);
    }
    if instance.is_sealed() {
        return Err(ResetError::SealedTarget);
    }

    let mut finished: FxHashSet<String> = FxHashSet::default();
    let mut current = Some(class_id);
    while let Some(id) = current {
        if registry.is_root(id) {
            break;
        }
        let class = registry.get(id).ok_or(ResetError::NotAnInstance)?;
        apply_class(class, instance, registry, &mut finished);
        current = class.parent_id;
    }
    Ok(())
}

/// Reapply one class's declared members onto the instance
///
/// A name already in `finished` was resolved by a more-derived class and is
/// skipped; every visited name is marked finished whether or not it is
/// applied, so ancestors further up never reconsider it.
fn apply_class(
    class: &Class,
    instance: &mut Instance,
    registry: &ClassRegistry,
    finished: &mut FxHashSet<String>,
) {
    for (name, declared) in class.members() {
        if !finished.insert(name.to_string()) {
            continue;
        }
        // hand-locked instance state stays as-is
        if instance
            .get_own_property(name)
            .is_some_and(|own| !own.configurable)
        {
            continue;
        }

        let restored = match &declared.kind {
            PropertyKind::Accessor { .. } | PropertyKind::Method(_) => declared.clone(),
            PropertyKind::Data(default) => {
                // full read: an own accessor override contributes its getter
                // result, a missing own member falls back to the declared
                // default through the chain
                let value = instance
                    .get(name, registry)
                    .unwrap_or_else(|| default.clone());
                Property {
                    kind: PropertyKind::Data(value),
                    ..declared.clone()
                }
            }
        };
        instance.define_property(name, restored);
    }
}
