//! Structural change detection between a submitted spec and the spec that was
//! last applied successfully.
//!
//! Reconciliation and admission both need to know whether a user *actually*
//! edited a resource, not merely whether two specs compare unequal: a spec
//! round-tripped through the API server carries plenty of fields the user
//! never touched. [`Diff::mask_unchanged`] walks a spec field by field,
//! resets every field that matches the recorded baseline back to its unset
//! value, and reports whether anything real remained.

use std::{
    collections::{BTreeMap, HashMap},
    hash::Hash,
};

pub use oradb_operator_derive::Diff;

/// A type that can be compared field by field against a previously applied
/// version of itself.
///
/// Most users will want to implement this for spec types using [the
/// associated derive macro](`derive@Diff`).
///
/// # Example
///
/// ```
/// # use oradb_operator::diff::Diff;
/// #[derive(Diff, Debug, PartialEq, Eq)]
/// struct DatabaseSpec {
///     display_name: Option<String>,
///     cpu_core_count: Option<i32>,
/// }
///
/// let mut submitted = DatabaseSpec {
///     display_name: Some("main".to_string()),
///     cpu_core_count: Some(4),
/// };
/// let changed = submitted.mask_unchanged(&DatabaseSpec {
///     display_name: Some("main".to_string()),
///     cpu_core_count: Some(2),
/// });
///
/// assert!(changed);
/// assert_eq!(submitted, DatabaseSpec {
///     // identical to the baseline, masked out
///     display_name: None,
///     // a real edit, preserved
///     cpu_core_count: Some(4),
/// });
/// ```
///
/// # Options
///
/// A field should be [`Option`]al if it is [`Atomic`] (for example: [`i32`])
/// or an enum (which is always compared as one unit). Composite objects
/// (such as regular structs) should generally *not* be optional; they are
/// recursed into instead of being compared as a whole.
///
/// # Leaf rule
///
/// For every leaf field, with "unset" meaning [`None`], the default value of
/// a bare scalar, or an empty map/list:
///
/// * an unset candidate field is never a change, no matter what the baseline
///   holds;
/// * a set candidate field with an unset baseline is a change and is
///   preserved;
/// * two set values are a change iff they compare unequal; equal values are
///   reset to unset.
///
/// Note the asymmetry of the first rule: clearing a previously set field
/// back to its unset value is indistinguishable from never having set it,
/// and is therefore not detected as a change.
pub trait Diff {
    /// Masks every field of `self` (the candidate) that does not differ from
    /// `last_applied`, and returns true iff at least one field differed.
    fn mask_unchanged(&mut self, last_applied: &Self) -> bool;
}

impl<T: Diff> Diff for Box<T> {
    fn mask_unchanged(&mut self, last_applied: &Self) -> bool {
        T::mask_unchanged(self, last_applied)
    }
}

// Maps are leaves with deep equality semantics, they are never recursed into.
impl<K: Ord, V: PartialEq> Diff for BTreeMap<K, V> {
    fn mask_unchanged(&mut self, last_applied: &Self) -> bool {
        if self.is_empty() {
            return false;
        }
        if !last_applied.is_empty() && *self == *last_applied {
            self.clear();
            return false;
        }
        true
    }
}

impl<K: Hash + Eq, V: PartialEq> Diff for HashMap<K, V> {
    fn mask_unchanged(&mut self, last_applied: &Self) -> bool {
        if self.is_empty() {
            return false;
        }
        if !last_applied.is_empty() && *self == *last_applied {
            self.clear();
            return false;
        }
        true
    }
}

// List-valued fields (access control lists, subnet ids, ...) are compared as
// one unit as well.
impl<T: PartialEq> Diff for Vec<T> {
    fn mask_unchanged(&mut self, last_applied: &Self) -> bool {
        if self.is_empty() {
            return false;
        }
        if !last_applied.is_empty() && *self == *last_applied {
            self.clear();
            return false;
        }
        true
    }
}

/// Moving version of [`Diff::mask_unchanged`], to produce slightly nicer
/// test output.
pub fn mask_unchanged<T: Diff>(mut candidate: T, last_applied: &T) -> (T, bool) {
    let changed = candidate.mask_unchanged(last_applied);
    (candidate, changed)
}

/// A marker trait for types that are compared atomically (as one single
/// value) rather than field by field.
pub trait Atomic: Clone + PartialEq {}

macro_rules! atomic_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Atomic for $ty {}

            impl Diff for $ty {
                fn mask_unchanged(&mut self, last_applied: &Self) -> bool {
                    let unset = <$ty>::default();
                    if *self == unset {
                        return false;
                    }
                    if *last_applied != unset && *self == *last_applied {
                        *self = unset;
                        return false;
                    }
                    true
                }
            }
        )*
    };
}

atomic_leaf!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, String,
);

impl<T: Atomic> Diff for Option<T> {
    fn mask_unchanged(&mut self, last_applied: &Self) -> bool {
        if self.is_none() {
            return false;
        }
        if last_applied.is_some() && *self == *last_applied {
            *self = None;
            return false;
        }
        true
    }
}
