// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deep structural equivalence of values and object graphs.
//!
//! Two values are equivalent when they hold the same variant and equivalent
//! contents. Dictionaries compare by key regardless of order, lists compare
//! element-wise in order and schema objects compare by schema and fields.
//! Object identity does not matter.
//!
//! Object graphs may contain cycles. Pairs of objects already being compared
//! further up the walk are assumed equivalent, so the walk always ends.
//! Pairs found equivalent are remembered for the rest of the walk, so an
//! object shared many times is compared once per partner.

use crate::dictionary::Dictionary;
use crate::object::{ObjectRef, SchemaObject};
use crate::value::Value;
use std::collections::HashSet;

/// One equivalence walk over a pair of graphs
#[derive(Debug, Default)]
pub struct Equivalence {
    in_progress: HashSet<(usize, usize)>,
    proven: HashSet<(usize, usize)>,
}

impl Equivalence {
    /// Start a new walk
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare two values
    pub fn values(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Empty, Value::Empty) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::TimeRange(a), Value::TimeRange(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => self.dictionaries(a, b),
            (Value::List(a), Value::List(b)) => self.lists(a, b),
            (Value::Object(a), Value::Object(b)) => self.object_refs(a, b),
            _ => false,
        }
    }

    /// Compare two dictionaries, ignoring key order
    pub fn dictionaries(&mut self, a: &Dictionary, b: &Dictionary) -> bool {
        a.len() == b.len()
            && a.iter().all(|(key, value)| match b.get(key) {
                Some(other) => self.values(value, other),
                None => false,
            })
    }

    /// Compare two lists element by element
    pub fn lists(&mut self, a: &[Value], b: &[Value]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(a, b)| self.values(a, b))
    }

    /// Compare two schema objects by schema and fields
    pub fn objects(&mut self, a: &SchemaObject, b: &SchemaObject) -> bool {
        a.schema_name() == b.schema_name()
            && a.schema_version() == b.schema_version()
            && a.wire_schema() == b.wire_schema()
            && self.dictionaries(&a.to_fields(), &b.to_fields())
    }

    /// Compare the objects behind two shared handles
    pub fn object_refs(&mut self, a: &ObjectRef, b: &ObjectRef) -> bool {
        if a.ptr_eq(b) {
            return true;
        }
        let pair = (a.addr(), b.addr());
        if self.proven.contains(&pair) || !self.in_progress.insert(pair) {
            return true;
        }
        let equivalent = self.objects(&a.borrow(), &b.borrow());
        self.in_progress.remove(&pair);
        if equivalent {
            self.proven.insert(pair);
        } else {
            // pairs proven so far may rest on an assumption that just failed
            self.proven.clear();
        }
        equivalent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use crate::media_reference::ExternalReference;
    use ordoplay_editor_time::{RationalTime, TimeRange};

    fn effect_with_metadata(entries: &[(&str, i64)]) -> ObjectRef {
        let metadata: Dictionary = entries.iter().copied().collect();
        ObjectRef::new(Effect::new("blur it", "blur").with_metadata(metadata))
    }

    #[test]
    fn test_identity_does_not_matter() {
        let a = effect_with_metadata(&[("x", 1), ("y", 2)]);
        let b = effect_with_metadata(&[("y", 2), ("x", 1)]);
        assert!(!a.ptr_eq(&b));
        assert!(a.is_equivalent_to(&b));
        assert!(b.is_equivalent_to(&a));

        b.borrow_mut().metadata_mut().unwrap().insert("x", 3_i64);
        assert!(!a.is_equivalent_to(&b));
        assert!(!b.is_equivalent_to(&a));
    }

    #[test]
    fn test_different_schemas_differ() {
        let effect = ObjectRef::new(Effect::default());
        let reference = ObjectRef::new(ExternalReference::default());
        assert!(!effect.is_equivalent_to(&reference));
    }

    #[test]
    fn test_dynamic_fields_take_part() {
        let a = ObjectRef::new(Effect::default());
        let b = ObjectRef::new(Effect::default());
        a.borrow_mut().dynamic_fields_mut().insert("vendor", "x");
        assert!(!a.is_equivalent_to(&b));
        b.borrow_mut().dynamic_fields_mut().insert("vendor", "x");
        assert!(a.is_equivalent_to(&b));
    }

    #[test]
    fn test_int_and_double_differ() {
        let mut walk = Equivalence::new();
        assert!(!walk.values(&Value::Int(1), &Value::Double(1.0)));
        assert!(walk.values(&Value::Double(1.0), &Value::Double(1.0)));
        assert!(!walk.values(&Value::Empty, &Value::Bool(false)));
    }

    #[test]
    fn test_cyclic_graphs_terminate() {
        let a = ObjectRef::new(Effect::new("loop", "blur"));
        let b = ObjectRef::new(Effect::new("loop", "blur"));
        a.borrow_mut()
            .metadata_mut()
            .unwrap()
            .insert("self", Value::Object(a.clone()));
        b.borrow_mut()
            .metadata_mut()
            .unwrap()
            .insert("self", Value::Object(b.clone()));

        assert!(a.is_equivalent_to(&b));

        b.borrow_mut().as_effect_mut().unwrap().effect_name = "sharpen".to_string();
        assert!(!a.is_equivalent_to(&b));

        a.borrow_mut().metadata_mut().unwrap().clear();
        b.borrow_mut().metadata_mut().unwrap().clear();
    }

    #[test]
    fn test_time_equivalence_is_symmetric() {
        let mut walk = Equivalence::new();
        let pairs = [
            (RationalTime::new(29.0, 7.0), RationalTime::new(29.0, 7.0).rescaled_to(1.0)),
            (RationalTime::new(5.0, 24.0), RationalTime::new(0.0, 0.0)),
            (RationalTime::new(12.0, 24.0), RationalTime::new(6.0, 12.0)),
        ];
        for (a, b) in pairs {
            let (a, b) = (Value::from(a), Value::from(b));
            assert_eq!(walk.values(&a, &b), walk.values(&b, &a));
        }

        let a = Value::from(TimeRange::new(RationalTime::new(5.0, 24.0), RationalTime::new(1.0, 24.0)));
        let b = Value::from(TimeRange::new(RationalTime::new(0.0, 0.0), RationalTime::new(1.0, 24.0)));
        assert!(!walk.values(&a, &b));
        assert!(!walk.values(&b, &a));
    }

    /// Chain where every level references the next level twice
    fn diamond_chain(depth: usize) -> ObjectRef {
        let mut node = ObjectRef::new(Effect::new("leaf", "e"));
        for level in 0..depth {
            let metadata: Dictionary = [
                ("left", Value::Object(node.clone())),
                ("right", Value::Object(node.clone())),
            ]
            .into_iter()
            .collect();
            node = ObjectRef::new(Effect::new(format!("level {level}"), "e").with_metadata(metadata));
        }
        node
    }

    #[test]
    fn test_shared_subgraphs_compare_once() {
        let a = diamond_chain(48);
        let b = diamond_chain(48);
        assert!(!a.ptr_eq(&b));
        assert!(a.is_equivalent_to(&b));

        let c = diamond_chain(47);
        assert!(!a.is_equivalent_to(&c));
    }

    #[test]
    fn test_failed_assumption_is_not_remembered() {
        // a1 -> a2 -> a1 against b1 -> b2 -> b1, where only the first
        // level differs; a2~b2 holds only while a1~b1 is assumed
        let a1 = ObjectRef::new(Effect::new("a", "e"));
        let a2 = ObjectRef::new(Effect::new("b", "e"));
        a1.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(a2.clone()));
        a1.borrow_mut().metadata_mut().unwrap().insert("tag", 1_i64);
        a2.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(a1.clone()));

        let b1 = ObjectRef::new(Effect::new("a", "e"));
        let b2 = ObjectRef::new(Effect::new("b", "e"));
        b1.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(b2.clone()));
        b1.borrow_mut().metadata_mut().unwrap().insert("tag", 2_i64);
        b2.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(b1.clone()));

        let mut walk = Equivalence::new();
        assert!(!walk.object_refs(&a1, &b1));
        assert!(!walk.object_refs(&a2, &b2));

        for object in [&a1, &a2, &b1, &b2] {
            object.borrow_mut().metadata_mut().unwrap().clear();
        }
    }

    #[test]
    fn test_mutual_cycle() {
        let a1 = ObjectRef::new(Effect::new("a", "e"));
        let a2 = ObjectRef::new(Effect::new("b", "e"));
        a1.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(a2.clone()));
        a2.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(a1.clone()));

        let b1 = ObjectRef::new(Effect::new("a", "e"));
        let b2 = ObjectRef::new(Effect::new("b", "e"));
        b1.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(b2.clone()));
        b2.borrow_mut().metadata_mut().unwrap().insert("next", Value::Object(b1.clone()));

        assert!(a1.is_equivalent_to(&b1));
        assert!(!a1.is_equivalent_to(&b2));

        for object in [&a1, &a2, &b1, &b2] {
            object.borrow_mut().metadata_mut().unwrap().clear();
        }
    }
}
