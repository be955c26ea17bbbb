//! Class registry: the one place class descriptors live
//!
//! The registry owns the universal root class. Every registered class chain
//! terminates at the root; the reset engine never processes the root's own
//! members, while ordinary member lookup still reaches them.

use crate::object::{Class, Instance, Property, PropertyKind};
use crate::value::Value;
use rustc_hash::FxHashMap;

/// Class identifier (index into the registry)
pub type ClassId = usize;

/// Registry of class descriptors, indexed by ID
#[derive(Debug)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
}

/// ID of the universal root class, present in every registry
pub const ROOT_CLASS_ID: ClassId = 0;

impl ClassRegistry {
    /// Create a registry holding only the root class
    pub fn new() -> Self {
        let mut registry = Self {
            classes: Vec::new(),
            name_to_id: FxHashMap::default(),
        };

        let mut root = Class::new(ROOT_CLASS_ID, "Object");
        // the root is the chain terminator and must not parent itself
        root.parent_id = None;
        root.define(
            "toString",
            Property::method_fn(|_, _| Value::from("[object Object]")),
        );
        registry.register(root);
        registry
    }

    /// Register a class descriptor, returning its ID
    ///
    /// The class must have been built with the ID returned by
    /// [`next_class_id`](Self::next_class_id); IDs double as Vec indexes.
    pub fn register(&mut self, class: Class) -> ClassId {
        debug_assert_eq!(class.id, self.classes.len(), "class ID out of sequence");
        let id = class.id;
        let name = class.name.clone();

        self.classes.push(class);
        self.name_to_id.insert(name, id);

        id
    }

    /// Get class by ID
    pub fn get(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Get class by name
    pub fn get_by_name(&self, name: &str) -> Option<&Class> {
        self.name_to_id.get(name).and_then(|id| self.classes.get(*id))
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> ClassId {
        self.classes.len()
    }

    /// ID of the universal root class
    pub fn root_id(&self) -> ClassId {
        ROOT_CLASS_ID
    }

    /// Check whether an ID names the universal root class
    pub fn is_root(&self, id: ClassId) -> bool {
        id == ROOT_CLASS_ID
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate()
    }

    /// Build a fresh instance of a class
    ///
    /// Data members declared along the ancestry are installed as own members
    /// with their declared defaults and flags, most-derived declaration
    /// winning. Methods and accessors stay on the class chain and dispatch
    /// through it. Returns `None` for an unknown class ID.
    pub fn instantiate(&self, class_id: ClassId) -> Option<Instance> {
        self.get(class_id)?;
        let mut instance = Instance::new(class_id);

        let mut current = Some(class_id);
        while let Some(id) = current {
            if self.is_root(id) {
                break;
            }
            let class = self.get(id)?;
            for (name, property) in class.members() {
                if matches!(property.kind, PropertyKind::Data(_))
                    && instance.get_own_property(name).is_none()
                {
                    instance.define_property(name, property.clone());
                }
            }
            current = class.parent_id;
        }
        Some(instance)
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_holds_root() {
        let registry = ClassRegistry::new();
        assert_eq!(registry.next_class_id(), 1);
        assert!(registry.is_root(registry.root_id()));

        let root = registry.get(ROOT_CLASS_ID).unwrap();
        assert_eq!(root.name, "Object");
        assert!(root.member("toString").is_some());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ClassRegistry::new();
        let id = registry.register(Class::new(registry.next_class_id(), "Point"));

        assert_eq!(registry.get(id).unwrap().name, "Point");
        assert_eq!(registry.get_by_name("Point").unwrap().id, id);
        assert_eq!(registry.next_class_id(), id + 1);
    }

    #[test]
    fn test_register_keeps_ids_in_sequence() {
        let mut registry = ClassRegistry::new();
        let a = registry.register(Class::new(registry.next_class_id(), "A"));
        let b = registry.register(Class::new(registry.next_class_id(), "B"));

        assert_eq!(a + 1, b);
        assert_eq!(registry.get(a).unwrap().name, "A");
        assert_eq!(registry.get(b).unwrap().name, "B");
    }

    #[test]
    fn test_instantiate_installs_data_members() {
        let mut registry = ClassRegistry::new();

        let mut base = Class::new(registry.next_class_id(), "Base");
        base.define("value", Property::data(Value::from("base-default")));
        base.define("greet", Property::method_fn(|_, _| Value::from("hi")));
        let base_id = registry.register(base);

        let mut sub = Class::with_parent(registry.next_class_id(), "Sub", base_id);
        sub.define("value", Property::data(Value::from("sub-default")));
        sub.define("extra", Property::data(Value::Int(1)));
        let sub_id = registry.register(sub);

        let instance = registry.instantiate(sub_id).unwrap();
        // most-derived data declaration wins; methods stay off the instance
        assert_eq!(instance.own_value("value"), Some(Value::from("sub-default")));
        assert_eq!(instance.own_value("extra"), Some(Value::Int(1)));
        assert!(instance.get_own_property("greet").is_none());
        assert_eq!(instance.own_count(), 2);
    }

    #[test]
    fn test_instantiate_unknown_class() {
        let registry = ClassRegistry::new();
        assert!(registry.instantiate(99).is_none());
    }
}
