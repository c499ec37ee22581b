//! Per-declaration comparators: one handler per `NormalizedDeclaration` variant.

use crate::canonical::{NormalizedDeclaration, TypeDescriptor, ValueKind};
use crate::compat::equivalence::{
    Surfaces, compare_func, compare_interface, compare_struct, compare_types,
};
use crate::compat::types::Verdict;

/// Compares two declarations sharing one id.
pub fn compare_declarations(
    before: &NormalizedDeclaration,
    after: &NormalizedDeclaration,
    surfaces: Surfaces<'_>,
) -> Verdict {
    use NormalizedDeclaration as D;

    match (before, after) {
        (
            D::ConstOrVar {
                value_kind: bk,
                ty: bt,
                initializer: bi,
                ..
            },
            D::ConstOrVar {
                value_kind: ak,
                ty: at,
                initializer: ai,
                ..
            },
        ) => compare_values((*bk, bt.as_ref(), bi.as_deref()), (*ak, at.as_ref(), ai.as_deref()), surfaces),
        (
            D::TypeAlias {
                alias: ba,
                underlying: bu,
                ..
            },
            D::TypeAlias {
                alias: aa,
                underlying: au,
                ..
            },
        ) => compare_type_alias(*ba, bu, *aa, au, surfaces),
        (D::StructType { fields: b, .. }, D::StructType { fields: a, .. }) => compare_struct(b, a),
        (D::InterfaceType { methods: b, .. }, D::InterfaceType { methods: a, .. }) => {
            compare_interface(b, a)
        }
        (D::Function { signature: b, .. }, D::Function { signature: a, .. }) => {
            compare_func(b, a, surfaces)
        }
        (b, a) if b.is_type_declaration() && a.is_type_declaration() => {
            Verdict::breaking("changed kind of type declaration")
        }
        (D::Function { .. }, _) | (_, D::Function { .. }) => Verdict::breaking("changed declaration"),
        _ => Verdict::breaking("changed spec"),
    }
}

type Value<'a> = (ValueKind, Option<&'a TypeDescriptor>, Option<&'a str>);

fn compare_values(before: Value<'_>, after: Value<'_>, surfaces: Surfaces<'_>) -> Verdict {
    let (before_kind, before_ty, before_init) = before;
    let (after_kind, after_ty, after_init) = after;

    if before_kind != after_kind {
        return Verdict::breaking("changed between const and var");
    }

    match (before_ty, after_ty) {
        (Some(b), Some(a)) => compare_types(b, a, surfaces),
        // Nothing to compare but the initializer text.
        (None, None) if before_init == after_init => Verdict::none(),
        _ => Verdict::unknown("cannot currently determine type"),
    }
}

fn compare_type_alias(
    before_alias: bool,
    before: &TypeDescriptor,
    after_alias: bool,
    after: &TypeDescriptor,
    surfaces: Surfaces<'_>,
) -> Verdict {
    if before_alias != after_alias {
        return Verdict::breaking("changed between alias and defined type");
    }
    match (before, after) {
        (TypeDescriptor::Named(b), TypeDescriptor::Named(a)) if b != a => {
            Verdict::breaking("alias changed its underlying type")
        }
        _ => compare_types(before, after, surfaces),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{Field, FuncSignature, PublicSurface};
    use crate::compat::severity::Severity;

    fn value(kind: ValueKind, ty: Option<&str>, init: Option<&str>) -> NormalizedDeclaration {
        NormalizedDeclaration::ConstOrVar {
            name: "V".to_string(),
            value_kind: kind,
            ty: ty.map(TypeDescriptor::named),
            initializer: init.map(str::to_string),
        }
    }

    fn compare(before: &NormalizedDeclaration, after: &NormalizedDeclaration) -> Verdict {
        let empty = PublicSurface::default();
        compare_declarations(before, after, Surfaces::new(&empty, &empty))
    }

    #[test]
    fn test_untyped_values() {
        let unchanged = compare(
            &value(ValueKind::Var, None, Some("errors.New(\"x\")")),
            &value(ValueKind::Var, None, Some("errors.New(\"x\")")),
        );
        assert!(unchanged.is_none());

        let changed = compare(
            &value(ValueKind::Var, None, Some("errors.New(\"x\")")),
            &value(ValueKind::Var, None, Some("errors.New(\"y\")")),
        );
        assert_eq!(changed, Verdict::unknown("cannot currently determine type"));

        let half = compare(
            &value(ValueKind::Var, Some("int"), None),
            &value(ValueKind::Var, None, Some("1")),
        );
        assert_eq!(half.severity, Severity::Unknown);
    }

    #[test]
    fn test_const_to_var_is_breaking() {
        let verdict = compare(
            &value(ValueKind::Const, Some("int"), None),
            &value(ValueKind::Var, Some("int"), None),
        );
        assert_eq!(verdict, Verdict::breaking("changed between const and var"));
    }

    #[test]
    fn test_changed_declaration_kind() {
        let func = NormalizedDeclaration::Function {
            name: "V".to_string(),
            receiver: None,
            signature: FuncSignature::default(),
        };
        let strukt = NormalizedDeclaration::StructType {
            name: "V".to_string(),
            fields: vec![Field::named("A", TypeDescriptor::named("int"), true)],
        };
        let iface = NormalizedDeclaration::InterfaceType {
            name: "V".to_string(),
            methods: Vec::new(),
        };
        let var = value(ValueKind::Var, Some("int"), None);

        assert_eq!(compare(&var, &func).reason, "changed declaration");
        assert_eq!(compare(&var, &strukt).reason, "changed spec");
        assert_eq!(compare(&strukt, &iface).reason, "changed kind of type declaration");
    }

    #[test]
    fn test_alias_underlying_change() {
        let alias = |alias: bool, underlying: &str| NormalizedDeclaration::TypeAlias {
            name: "ID".to_string(),
            alias,
            underlying: TypeDescriptor::named(underlying),
        };

        assert!(compare(&alias(false, "int"), &alias(false, "int")).is_none());
        assert_eq!(
            compare(&alias(false, "int"), &alias(false, "int64")),
            Verdict::breaking("alias changed its underlying type")
        );
        assert_eq!(
            compare(&alias(false, "int"), &alias(true, "int")),
            Verdict::breaking("changed between alias and defined type")
        );
    }
}
