//! Field-list diff shared by struct, interface and signature comparison.

use crate::canonical::Field;
use crate::compat::equivalence::{drops_direction, equivalent};
use std::collections::HashMap;

/// How entries of a field list are matched across revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keying {
    /// Struct members and interface methods: by name, embedded members by the
    /// name of their type.
    Members,
    /// Parameters and results: by position.
    Positional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FieldKey<'a> {
    Named(&'a str),
    Embedded(&'a str),
    Position(usize),
}

fn key(keying: Keying, position: usize, field: &Field) -> FieldKey<'_> {
    if keying == Keying::Positional {
        return FieldKey::Position(position);
    }
    match (&field.name, field.ty.embedded_name()) {
        (Some(name), _) => FieldKey::Named(name),
        (None, Some(embedded)) => FieldKey::Embedded(embedded),
        (None, None) => FieldKey::Position(position),
    }
}

#[derive(Debug, Default)]
pub struct FieldDiff<'a> {
    pub added: Vec<&'a Field>,
    pub removed: Vec<&'a Field>,
    /// Matched pairs whose types are not equivalent, `(before, after)`.
    pub changed: Vec<(&'a Field, &'a Field)>,
    /// Matched pairs whose channel type only lost its direction, `(before, after)`.
    pub relaxed: Vec<(&'a Field, &'a Field)>,
}

impl FieldDiff<'_> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
            && self.relaxed.is_empty()
    }
}

/// Matches every `before` entry against `after`; whatever is left in `after`
/// is reported as added, in `after` order.
pub fn diff_fields<'a>(before: &'a [Field], after: &'a [Field], keying: Keying) -> FieldDiff<'a> {
    let mut index: HashMap<FieldKey<'a>, &'a Field> = after
        .iter()
        .enumerate()
        .map(|(position, field)| (key(keying, position, field), field))
        .collect();

    let mut diff = FieldDiff::default();
    for (position, field) in before.iter().enumerate() {
        match index.remove(&key(keying, position, field)) {
            Some(matched) if equivalent(&field.ty, &matched.ty) => {}
            Some(matched) if drops_direction(&field.ty, &matched.ty) => {
                diff.relaxed.push((field, matched))
            }
            Some(matched) => diff.changed.push((field, matched)),
            None => diff.removed.push(field),
        }
    }

    diff.added = after
        .iter()
        .enumerate()
        .filter(|&(position, field)| index.contains_key(&key(keying, position, field)))
        .map(|(_, field)| field)
        .collect();

    diff
}
