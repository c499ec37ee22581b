//! Structural equivalence and the shape-specific comparison rules.
//!
//! Every comparator takes the `before` shape first and answers with a `Verdict`.

use crate::canonical::{ChanDir, Field, FuncSignature, PublicSurface, TypeDescriptor};
use crate::compat::fields::{Keying, diff_fields};
use crate::compat::types::Verdict;

/// The two surfaces a comparison runs between. Interface widening needs their
/// interface indexes to resolve named parameter types to method sets.
#[derive(Debug, Clone, Copy)]
pub struct Surfaces<'a> {
    pub before: &'a PublicSurface,
    pub after: &'a PublicSurface,
}

impl<'a> Surfaces<'a> {
    pub fn new(before: &'a PublicSurface, after: &'a PublicSurface) -> Self {
        Self { before, after }
    }
}

/// Whether two descriptors denote the same type.
///
/// Descriptors are fully normalized at extraction (qualified names, sorted
/// method sets, no parameter names), so sameness is structural equality.
pub fn equivalent(before: &TypeDescriptor, after: &TypeDescriptor) -> bool {
    before == after
}

/// A channel type whose only difference is a dropped direction constraint.
/// Wherever a field list is diffed this counts as relaxed rather than changed.
pub fn drops_direction(before: &TypeDescriptor, after: &TypeDescriptor) -> bool {
    match (before, after) {
        (
            TypeDescriptor::Channel { elem: be, dir: bd },
            TypeDescriptor::Channel {
                elem: ae,
                dir: ChanDir::Both,
            },
        ) => *bd != ChanDir::Both && equivalent(be, ae),
        _ => false,
    }
}

const RELAXED_CHANNEL: &str = "removed channel's direction";

/// Compares two type descriptors by shape.
pub fn compare_types(before: &TypeDescriptor, after: &TypeDescriptor, surfaces: Surfaces<'_>) -> Verdict {
    use TypeDescriptor as T;

    match (before, after) {
        (T::Named(b), T::Named(a)) if b == a => Verdict::none(),
        (T::Named(_), T::Named(_)) => Verdict::breaking("changed type"),
        (T::Pointer(b), T::Pointer(a)) | (T::Variadic(b), T::Variadic(a)) => {
            if equivalent(b, a) {
                Verdict::none()
            } else {
                Verdict::breaking("changed type")
            }
        }
        (T::Array { len: bl, elem: be }, T::Array { len: al, elem: ae }) => {
            if bl != al {
                Verdict::breaking("changed array's length")
            } else if !equivalent(be, ae) {
                Verdict::breaking("changed array's element's type")
            } else {
                Verdict::none()
            }
        }
        (T::Array { .. }, T::Slice(_)) | (T::Slice(_), T::Array { .. }) => {
            Verdict::breaking("changed array's length")
        }
        (T::Slice(b), T::Slice(a)) => {
            if equivalent(b, a) {
                Verdict::none()
            } else {
                Verdict::breaking("changed slice's element's type")
            }
        }
        (T::Map { key: bk, value: bv }, T::Map { key: ak, value: av }) => {
            if !equivalent(bk, ak) {
                Verdict::breaking("changed map's key's type")
            } else if !equivalent(bv, av) {
                Verdict::breaking("changed map's value's type")
            } else {
                Verdict::none()
            }
        }
        (T::Channel { elem: be, dir: bd }, T::Channel { elem: ae, dir: ad }) => {
            compare_channel(be, *bd, ae, *ad)
        }
        (T::Struct(b), T::Struct(a)) => compare_struct(b, a),
        (T::Interface(b), T::Interface(a)) => compare_interface(b, a),
        (T::Func(b), T::Func(a)) => compare_func(b, a, surfaces),
        _ => Verdict::breaking("changed type"),
    }
}

/// Dropping a direction constraint keeps every existing use valid; any other
/// direction change does not.
pub fn compare_channel(
    before_elem: &TypeDescriptor,
    before_dir: ChanDir,
    after_elem: &TypeDescriptor,
    after_dir: ChanDir,
) -> Verdict {
    if !equivalent(before_elem, after_elem) {
        return Verdict::breaking("changed channel's type");
    }
    match (before_dir, after_dir) {
        (b, a) if b == a => Verdict::none(),
        (_, ChanDir::Both) => Verdict::non_breaking(RELAXED_CHANNEL),
        _ => Verdict::breaking("changed channel's direction"),
    }
}

/// Structs tolerate added members. Members that were not exported before never
/// count against the change.
pub fn compare_struct(before: &[Field], after: &[Field]) -> Verdict {
    let diff = diff_fields(before, after, Keying::Members);

    if diff.removed.iter().any(|field| field.exported) {
        Verdict::breaking("members removed")
    } else if diff.changed.iter().any(|(field, _)| field.exported) {
        Verdict::breaking("members changed types")
    } else if !diff.added.is_empty() {
        Verdict::non_breaking("members added")
    } else if diff.relaxed.iter().any(|(field, _)| field.exported) {
        Verdict::non_breaking(RELAXED_CHANNEL)
    } else {
        Verdict::none()
    }
}

/// Interfaces tolerate removed methods: every existing implementation still
/// satisfies the smaller method set. Added methods break implementers.
pub fn compare_interface(before: &[Field], after: &[Field]) -> Verdict {
    let diff = diff_fields(before, after, Keying::Members);

    if !diff.added.is_empty() {
        Verdict::breaking("members added")
    } else if !diff.changed.is_empty() || !diff.relaxed.is_empty() {
        Verdict::breaking("members changed types")
    } else if !diff.removed.is_empty() {
        Verdict::non_breaking("members removed")
    } else {
        Verdict::none()
    }
}

pub fn compare_func(before: &FuncSignature, after: &FuncSignature, surfaces: Surfaces<'_>) -> Verdict {
    let params = compare_params(&before.params, &after.params, surfaces);
    if params.is_breaking() {
        return params;
    }
    params.merge(compare_results(before, after))
}

fn compare_params(before: &[Field], after: &[Field], surfaces: Surfaces<'_>) -> Verdict {
    let diff = diff_fields(before, after, Keying::Positional);
    let relaxed = if diff.relaxed.is_empty() {
        Verdict::none()
    } else {
        Verdict::non_breaking(RELAXED_CHANNEL)
    };

    let verdict = match (diff.added.as_slice(), diff.removed.as_slice(), diff.changed.as_slice()) {
        ([], [], []) => Verdict::none(),
        ([added], [], []) if matches!(added.ty, TypeDescriptor::Variadic(_)) => {
            Verdict::non_breaking("added a variadic parameter")
        }
        ([], [], [(b, a)]) if is_variadic_of(&a.ty, &b.ty) => {
            Verdict::non_breaking("changed parameter to variadic")
        }
        ([], [], changed) if changed.iter().all(|(b, a)| interface_widened(&b.ty, &a.ty, surfaces)) => {
            Verdict::non_breaking("compatible interface change")
        }
        _ => Verdict::breaking("parameters types changed"),
    };
    verdict.merge(relaxed)
}

/// A first result list may be added; an existing one must stay exactly as it was.
fn compare_results(before: &FuncSignature, after: &FuncSignature) -> Verdict {
    match (before.has_results(), after.has_results()) {
        (false, false) => Verdict::none(),
        (false, true) => Verdict::non_breaking("added return parameters"),
        (true, false) => Verdict::breaking("removed return parameter"),
        (true, true) => {
            let before = before.results.as_deref().unwrap_or_default();
            let after = after.results.as_deref().unwrap_or_default();
            let diff = diff_fields(before, after, Keying::Positional);
            if !diff.added.is_empty() || !diff.removed.is_empty() || !diff.changed.is_empty() {
                Verdict::breaking("return parameters changed")
            } else if !diff.relaxed.is_empty() {
                Verdict::non_breaking(RELAXED_CHANNEL)
            } else {
                Verdict::none()
            }
        }
    }
}

fn is_variadic_of(after: &TypeDescriptor, before: &TypeDescriptor) -> bool {
    matches!(after, TypeDescriptor::Variadic(elem) if equivalent(elem, before))
}

/// Method set of an interface-typed parameter, looked up in `surface` for named types.
fn method_set<'a>(ty: &'a TypeDescriptor, surface: &'a PublicSurface) -> Option<&'a [Field]> {
    match ty {
        TypeDescriptor::Interface(methods) => Some(methods),
        TypeDescriptor::Named(name) => surface.interfaces.get(name).map(Vec::as_slice),
        _ => None,
    }
}

/// A parameter retyped from one interface to another that asks for no more
/// methods accepts every argument it accepted before.
fn interface_widened(before: &TypeDescriptor, after: &TypeDescriptor, surfaces: Surfaces<'_>) -> bool {
    let (Some(before), Some(after)) = (
        method_set(before, surfaces.before),
        method_set(after, surfaces.after),
    ) else {
        return false;
    };
    !compare_interface(before, after).is_breaking()
}
