//! Object model and class system
//!
//! Classes are static descriptors: an ordered member table plus a single
//! parent link toward the root class. Instances carry their own mutable member
//! table; methods and accessors normally dispatch through the class chain and
//! only appear in the instance table when written there (an override, or a
//! reset installing the declared member back).

use crate::registry::{ClassId, ClassRegistry, ROOT_CLASS_ID};
use crate::value::{GetterFn, NativeFn, SetterFn, Value};
use std::fmt;
use std::rc::Rc;

/// Member kind: exactly one of accessor, method, or data
///
/// The kind is decided once, when the descriptor is built, not re-derived from
/// the stored value at use sites.
#[derive(Clone)]
pub enum PropertyKind {
    /// Computed member with an optional getter and optional setter
    Accessor {
        /// Read side of the accessor
        getter: Option<GetterFn>,
        /// Write side of the accessor
        setter: Option<SetterFn>,
    },
    /// Callable member (identity-compared)
    Method(NativeFn),
    /// Plain stored value
    Data(Value),
}

fn slot_eq<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for PropertyKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyKind::Data(a), PropertyKind::Data(b)) => a == b,
            (PropertyKind::Method(a), PropertyKind::Method(b)) => Rc::ptr_eq(a, b),
            (
                PropertyKind::Accessor { getter: g1, setter: s1 },
                PropertyKind::Accessor { getter: g2, setter: s2 },
            ) => slot_eq(g1, g2) && slot_eq(s1, s2),
            _ => false,
        }
    }
}

impl fmt::Debug for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Accessor { getter, setter } => f
                .debug_struct("Accessor")
                .field("getter", &getter.is_some())
                .field("setter", &setter.is_some())
                .finish(),
            PropertyKind::Method(func) => write!(f, "Method({:p})", Rc::as_ptr(func)),
            PropertyKind::Data(value) => f.debug_tuple("Data").field(value).finish(),
        }
    }
}

/// Member descriptor: a kind plus visibility/mutability flags
///
/// `writable` is meaningful for the data and method kinds only; accessor
/// members always carry `writable: false`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Accessor, method, or data payload
    pub kind: PropertyKind,
    /// Whether the member shows up in enumeration
    pub enumerable: bool,
    /// Whether the stored value accepts assignment
    pub writable: bool,
    /// Whether the member's descriptor may be redefined
    pub configurable: bool,
}

impl Property {
    /// Create a data member (enumerable, writable, configurable)
    pub fn data(value: Value) -> Self {
        Self {
            kind: PropertyKind::Data(value),
            enumerable: true,
            writable: true,
            configurable: true,
        }
    }

    /// Create a method member (non-enumerable, writable, configurable)
    pub fn method(func: NativeFn) -> Self {
        Self {
            kind: PropertyKind::Method(func),
            enumerable: false,
            writable: true,
            configurable: true,
        }
    }

    /// Create a method member from a closure
    pub fn method_fn<F>(func: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Value + 'static,
    {
        Self::method(Rc::new(func))
    }

    /// Create an accessor member (non-enumerable, configurable)
    pub fn accessor(getter: Option<GetterFn>, setter: Option<SetterFn>) -> Self {
        Self {
            kind: PropertyKind::Accessor { getter, setter },
            enumerable: false,
            writable: false,
            configurable: true,
        }
    }

    /// Create a getter-only accessor member from a closure
    pub fn getter<G>(getter: G) -> Self
    where
        G: Fn(&Instance) -> Value + 'static,
    {
        Self::accessor(Some(Rc::new(getter)), None)
    }

    /// Create a getter/setter accessor member from closures
    pub fn getter_setter<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&Instance) -> Value + 'static,
        S: Fn(&mut Instance, Value) + 'static,
    {
        Self::accessor(Some(Rc::new(getter)), Some(Rc::new(setter)))
    }

    /// Override the enumerable flag
    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// Override the writable flag
    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    /// Override the configurable flag
    pub fn configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    /// Check whether this is an accessor member
    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, PropertyKind::Accessor { .. })
    }

    /// Borrow the stored value, for data members
    pub fn value(&self) -> Option<&Value> {
        match &self.kind {
            PropertyKind::Data(value) => Some(value),
            _ => None,
        }
    }
}

/// Class descriptor: declared members plus a parent link
///
/// Built once at definition time and treated as immutable after registration.
#[derive(Debug, Clone)]
pub struct Class {
    /// Class ID (index into the class registry)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Parent class ID (None only for the root class)
    pub parent_id: Option<ClassId>,
    /// Declared members, in definition order
    members: Vec<(String, Property)>,
}

impl Class {
    /// Create a new class descriptor parented to the root class
    ///
    /// Every chain built this way stays connected to the root, so the root's
    /// builtins remain reachable through member lookup. Only the root class
    /// itself carries no parent.
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(ROOT_CLASS_ID),
            members: Vec::new(),
        }
    }

    /// Create a new class descriptor with an explicit parent
    pub fn with_parent(id: ClassId, name: impl Into<String>, parent_id: ClassId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(parent_id),
            members: Vec::new(),
        }
    }

    /// Declare a member
    ///
    /// Redeclaring an existing name replaces the descriptor in place, keeping
    /// its original position in enumeration order.
    pub fn define(&mut self, name: impl Into<String>, property: Property) {
        let name = name.into();
        match self.members.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = property,
            None => self.members.push((name, property)),
        }
    }

    /// Look up a declared member by name
    pub fn member(&self, name: &str) -> Option<&Property> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Iterate declared members in definition order
    pub fn members(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.members.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Get number of declared members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Object instance: a mutable member table tied to a class chain
#[derive(Debug, Clone)]
pub struct Instance {
    /// Class ID, or None for a detached object with no ancestry
    class: Option<ClassId>,
    /// Own members, in definition order
    properties: Vec<(String, Property)>,
    /// Whether the member table rejects structural changes
    sealed: bool,
}

impl Instance {
    /// Create a new empty instance of a class
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class: Some(class_id),
            properties: Vec::new(),
            sealed: false,
        }
    }

    /// Create a detached object with no class chain
    pub fn detached() -> Self {
        Self {
            class: None,
            properties: Vec::new(),
            sealed: false,
        }
    }

    /// Get the instance's class ID, if it has one
    pub fn class_id(&self) -> Option<ClassId> {
        self.class
    }

    /// Check whether the member table is sealed
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Seal the member table: no new members, existing members become
    /// non-configurable
    pub fn seal(&mut self) {
        self.sealed = true;
        for (_, property) in &mut self.properties {
            property.configurable = false;
        }
    }

    /// Look up an own member descriptor by name
    pub fn get_own_property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Iterate own members in definition order
    pub fn own_properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Get number of own members
    pub fn own_count(&self) -> usize {
        self.properties.len()
    }

    /// Install an own member descriptor, replacing any existing one in place
    ///
    /// This is the low-level slot write: seal and configurability policy is
    /// enforced by callers, not here.
    pub fn define_property(&mut self, name: impl Into<String>, property: Property) {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = property,
            None => self.properties.push((name, property)),
        }
    }

    /// Read an own data member's stored value
    pub fn own_value(&self, name: &str) -> Option<Value> {
        self.get_own_property(name)
            .and_then(|p| p.value())
            .cloned()
    }

    /// Read a member, searching the own table first and then the class chain
    ///
    /// Accessor members invoke their getter (a getter-less accessor reads as
    /// `Null`); method members read as callable values; data members yield the
    /// stored value (the class-declared default when read off the chain).
    pub fn get(&self, name: &str, registry: &ClassRegistry) -> Option<Value> {
        if let Some(property) = self.get_own_property(name) {
            return Some(self.read_property(property));
        }
        let mut current = self.class;
        while let Some(id) = current {
            let class = registry.get(id)?;
            if let Some(property) = class.member(name) {
                return Some(self.read_property(property));
            }
            current = class.parent_id;
        }
        None
    }

    fn read_property(&self, property: &Property) -> Value {
        match &property.kind {
            PropertyKind::Data(value) => value.clone(),
            PropertyKind::Method(func) => Value::Function(func.clone()),
            PropertyKind::Accessor { getter, .. } => match getter {
                Some(getter) => getter(self),
                None => Value::Null,
            },
        }
    }

    /// Assign to a member; returns whether the write took effect
    ///
    /// An own writable data/method slot is updated in place (becoming a data
    /// slot). An accessor, own or inherited, routes through its setter.
    /// Non-writable slots and setter-less accessors reject the write. A name
    /// not found anywhere becomes a fresh own data member, unless the instance
    /// is sealed.
    pub fn set(&mut self, name: &str, value: Value, registry: &ClassRegistry) -> bool {
        if let Some(idx) = self.properties.iter().position(|(n, _)| n == name) {
            let property = &self.properties[idx].1;
            return match &property.kind {
                PropertyKind::Accessor { setter, .. } => match setter.clone() {
                    Some(setter) => {
                        setter(self, value);
                        true
                    }
                    None => false,
                },
                PropertyKind::Data(_) | PropertyKind::Method(_) => {
                    if !property.writable {
                        return false;
                    }
                    self.properties[idx].1.kind = PropertyKind::Data(value);
                    true
                }
            };
        }

        let mut current = self.class;
        while let Some(id) = current {
            let Some(class) = registry.get(id) else { break };
            if let Some(property) = class.member(name) {
                match &property.kind {
                    PropertyKind::Accessor { setter, .. } => {
                        return match setter.clone() {
                            Some(setter) => {
                                setter(self, value);
                                true
                            }
                            None => false,
                        };
                    }
                    PropertyKind::Data(_) | PropertyKind::Method(_) => {
                        if !property.writable {
                            return false;
                        }
                        // inherited data/method slots shadow onto the instance
                        break;
                    }
                }
            }
            current = class.parent_id;
        }

        if self.sealed {
            return false;
        }
        self.properties.push((name.to_string(), Property::data(value)));
        true
    }

    /// Invoke a callable member; `None` if the name is absent or not callable
    pub fn call(
        &mut self,
        name: &str,
        args: &[Value],
        registry: &ClassRegistry,
    ) -> Option<Value> {
        match self.get(name, registry)? {
            Value::Function(func) => Some(func(self, args)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassRegistry;

    #[test]
    fn test_property_default_flags() {
        let data = Property::data(Value::Int(1));
        assert!(data.enumerable && data.writable && data.configurable);

        let method = Property::method_fn(|_, _| Value::Null);
        assert!(!method.enumerable && method.writable && method.configurable);

        let accessor = Property::getter(|_| Value::Null);
        assert!(!accessor.enumerable && !accessor.writable && accessor.configurable);
        assert!(accessor.is_accessor());
    }

    #[test]
    fn test_property_flag_overrides() {
        let property = Property::data(Value::Null)
            .enumerable(false)
            .writable(false)
            .configurable(false);
        assert!(!property.enumerable && !property.writable && !property.configurable);
    }

    #[test]
    fn test_class_member_order_and_redefine() {
        let mut class = Class::new(1, "Point");
        class.define("x", Property::data(Value::Int(0)));
        class.define("y", Property::data(Value::Int(0)));
        class.define("x", Property::data(Value::Int(7)));

        let names: Vec<&str> = class.members().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(class.member("x").unwrap().value(), Some(&Value::Int(7)));
        assert_eq!(class.member_count(), 2);
    }

    #[test]
    fn test_new_class_chains_to_root() {
        let mut registry = ClassRegistry::new();
        let class = Class::new(registry.next_class_id(), "Config");
        assert_eq!(class.parent_id, Some(registry.root_id()));

        let id = registry.register(class);
        let mut instance = Instance::new(id);
        assert_eq!(
            instance.call("toString", &[], &registry),
            Some(Value::from("[object Object]"))
        );
    }

    #[test]
    fn test_instance_define_and_own_lookup() {
        let mut instance = Instance::new(1);
        instance.define_property("a", Property::data(Value::from("one")));
        instance.define_property("a", Property::data(Value::from("two")));

        assert_eq!(instance.own_count(), 1);
        assert_eq!(instance.own_value("a"), Some(Value::from("two")));
        assert!(instance.get_own_property("b").is_none());
    }

    #[test]
    fn test_instance_get_walks_chain() {
        let mut registry = ClassRegistry::new();
        let mut class = Class::new(registry.next_class_id(), "Config");
        class.define("limit", Property::data(Value::Int(10)));
        class.define("double", Property::method_fn(|_, _| Value::Int(2)));
        let id = registry.register(class);

        let mut instance = registry.instantiate(id).unwrap();
        assert_eq!(instance.get("limit", &registry), Some(Value::Int(10)));
        assert!(instance.get("double", &registry).unwrap().is_callable());
        assert_eq!(instance.call("double", &[], &registry), Some(Value::Int(2)));
        assert_eq!(instance.get("missing", &registry), None);
    }

    #[test]
    fn test_instance_set_semantics() {
        let mut registry = ClassRegistry::new();
        let mut class = Class::new(registry.next_class_id(), "Cell");
        class.define("frozen", Property::data(Value::Int(0)).writable(false));
        let id = registry.register(class);

        let mut instance = registry.instantiate(id).unwrap();
        assert!(instance.set("fresh", Value::Int(1), &registry));
        assert_eq!(instance.own_value("fresh"), Some(Value::Int(1)));

        // non-writable own data slot rejects assignment
        assert!(!instance.set("frozen", Value::Int(9), &registry));
        assert_eq!(instance.own_value("frozen"), Some(Value::Int(0)));
    }

    #[test]
    fn test_accessor_set_routes_through_setter() {
        let mut registry = ClassRegistry::new();
        let mut class = Class::new(registry.next_class_id(), "Box");
        class.define(
            "content",
            Property::getter_setter(
                |inst| inst.own_value("_content").unwrap_or(Value::Null),
                |inst, value| inst.define_property("_content", Property::data(value)),
            ),
        );
        let id = registry.register(class);

        let mut instance = Instance::new(id);
        assert!(instance.set("content", Value::from("stored"), &registry));
        assert_eq!(instance.get("content", &registry), Some(Value::from("stored")));
    }

    #[test]
    fn test_seal_blocks_additions_and_locks_members() {
        let registry = ClassRegistry::new();
        let mut instance = Instance::new(registry.root_id());
        instance.define_property("a", Property::data(Value::Int(1)));
        instance.seal();

        assert!(instance.is_sealed());
        assert!(!instance.get_own_property("a").unwrap().configurable);
        assert!(!instance.set("b", Value::Int(2), &registry));
        // existing writable slots still accept value writes
        assert!(instance.set("a", Value::Int(3), &registry));
        assert_eq!(instance.own_value("a"), Some(Value::Int(3)));
    }
}
