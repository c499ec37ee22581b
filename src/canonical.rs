use serde::{Deserialize, Serialize};

// Note: BTreeMap keeps declaration ids sorted so that serialization (and
// therefore the fingerprint) is independent of input order.
use std::collections::BTreeMap;
use std::fmt;

/// Stable key matching a declaration across revisions: `Name`, or
/// `Receiver.Method` for methods.
pub type DeclarationId = String;

//==============================================================================
// Type Descriptors
//==============================================================================

/// Direction constraint of a channel type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Send,
    Recv,
    Both,
}

/// A fully normalized type expression.
///
/// Named types carry their qualified name (`text/template.Template`), so the local
/// import alias a file happened to use never shows up here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    Named(String),
    Pointer(Box<TypeDescriptor>),
    Slice(Box<TypeDescriptor>),
    Array {
        len: String,
        elem: Box<TypeDescriptor>,
    },
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Channel {
        elem: Box<TypeDescriptor>,
        dir: ChanDir,
    },
    Struct(Vec<Field>),
    Interface(Vec<Field>),
    Func(FuncSignature),
    Variadic(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn named(name: &str) -> Self {
        TypeDescriptor::Named(name.to_string())
    }

    /// Variant name, used in reasons when two descriptors differ in shape.
    pub fn shape(&self) -> &'static str {
        match self {
            TypeDescriptor::Named(_) => "named",
            TypeDescriptor::Pointer(_) => "pointer",
            TypeDescriptor::Slice(_) => "slice",
            TypeDescriptor::Array { .. } => "array",
            TypeDescriptor::Map { .. } => "map",
            TypeDescriptor::Channel { .. } => "channel",
            TypeDescriptor::Struct(_) => "struct",
            TypeDescriptor::Interface(_) => "interface",
            TypeDescriptor::Func(_) => "func",
            TypeDescriptor::Variadic(_) => "variadic",
        }
    }

    /// The name an embedded member of this type is addressed by: `Buffer` for
    /// both `bytes.Buffer` and `*bytes.Buffer`.
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Named(qualified) => {
                Some(qualified.rsplit('.').next().unwrap_or(qualified.as_str()))
            }
            TypeDescriptor::Pointer(inner) => inner.embedded_name(),
            _ => None,
        }
    }
}

/// A member of a field list. Parameters and results never carry a name after
/// normalization; embedded struct members and unresolved embedded interfaces
/// don't either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    pub exported: bool,
}

impl Field {
    pub fn named(name: &str, ty: TypeDescriptor, exported: bool) -> Self {
        Self {
            name: Some(name.to_string()),
            ty,
            exported,
        }
    }

    pub fn positional(ty: TypeDescriptor) -> Self {
        Self {
            name: None,
            ty,
            exported: true,
        }
    }
}

/// Parameter and result lists of a function, names stripped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FuncSignature {
    pub params: Vec<Field>,
    /// `None` when no result list was declared at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Field>>,
}

impl FuncSignature {
    pub fn has_results(&self) -> bool {
        self.results.as_ref().is_some_and(|r| !r.is_empty())
    }
}

//==============================================================================
// Declarations
//==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Const,
    Var,
}

/// One exported (or reachable) declaration in canonical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedDeclaration {
    ConstOrVar {
        name: String,
        value_kind: ValueKind,
        /// Declared or inferred type; `None` when neither was available.
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        ty: Option<TypeDescriptor>,
        /// Initializer source text, kept for untyped values only.
        #[serde(skip_serializing_if = "Option::is_none")]
        initializer: Option<String>,
    },
    TypeAlias {
        name: String,
        /// `type A = B` rather than `type A B`.
        alias: bool,
        underlying: TypeDescriptor,
    },
    StructType {
        name: String,
        fields: Vec<Field>,
    },
    InterfaceType {
        name: String,
        methods: Vec<Field>,
    },
    Function {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        receiver: Option<String>,
        signature: FuncSignature,
    },
}

impl NormalizedDeclaration {
    pub fn name(&self) -> &str {
        match self {
            NormalizedDeclaration::ConstOrVar { name, .. }
            | NormalizedDeclaration::TypeAlias { name, .. }
            | NormalizedDeclaration::StructType { name, .. }
            | NormalizedDeclaration::InterfaceType { name, .. }
            | NormalizedDeclaration::Function { name, .. } => name,
        }
    }

    /// Stable identifier used to match this declaration across revisions.
    pub fn id(&self) -> DeclarationId {
        match self {
            NormalizedDeclaration::Function {
                name,
                receiver: Some(receiver),
                ..
            } => format!("{receiver}.{name}"),
            other => other.name().to_string(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NormalizedDeclaration::ConstOrVar {
                value_kind: ValueKind::Const,
                ..
            } => "const",
            NormalizedDeclaration::ConstOrVar { .. } => "var",
            NormalizedDeclaration::TypeAlias { .. } => "type",
            NormalizedDeclaration::StructType { .. } => "struct",
            NormalizedDeclaration::InterfaceType { .. } => "interface",
            NormalizedDeclaration::Function {
                receiver: Some(_), ..
            } => "method",
            NormalizedDeclaration::Function { .. } => "func",
        }
    }

    /// Value declarations versus type declarations versus functions.
    pub fn is_type_declaration(&self) -> bool {
        matches!(
            self,
            NormalizedDeclaration::TypeAlias { .. }
                | NormalizedDeclaration::StructType { .. }
                | NormalizedDeclaration::InterfaceType { .. }
        )
    }
}

/// The public surface of one package at one revision.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicSurface {
    pub import_path: String,
    pub declarations: BTreeMap<DeclarationId, NormalizedDeclaration>,
    /// Method sets of every interface type visible to the package: its own
    /// (exported or not), resolved imports, and `error`. Used for interface
    /// widening only, so it stays out of the fingerprint.
    #[serde(skip)]
    pub interfaces: BTreeMap<String, Vec<Field>>,
}

impl PublicSurface {
    pub fn get(&self, id: &str) -> Option<&NormalizedDeclaration> {
        self.declarations.get(id)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

//==============================================================================
// Rendering
//==============================================================================

fn write_list(f: &mut fmt::Formatter<'_>, fields: &[Field], sep: &str) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{field}")?;
    }
    Ok(())
}

fn write_members(f: &mut fmt::Formatter<'_>, keyword: &str, members: &[Field]) -> fmt::Result {
    if members.is_empty() {
        return write!(f, "{keyword}{{}}");
    }
    write!(f, "{keyword}{{ ")?;
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str("; ")?;
        }
        match (&member.name, &member.ty) {
            (Some(name), TypeDescriptor::Func(sig)) if keyword == "interface" => {
                write!(f, "{name}{sig}")?
            }
            _ => write!(f, "{member}")?,
        }
    }
    f.write_str(" }")
}

impl fmt::Display for FuncSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_list(f, &self.params, ", ")?;
        f.write_str(")")?;
        match self.results.as_deref() {
            None | Some([]) => Ok(()),
            Some([single]) => write!(f, " {single}"),
            Some(results) => {
                f.write_str(" (")?;
                write_list(f, results, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} {}", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Named(name) => f.write_str(name),
            TypeDescriptor::Pointer(inner) => write!(f, "*{inner}"),
            TypeDescriptor::Slice(elem) => write!(f, "[]{elem}"),
            TypeDescriptor::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeDescriptor::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeDescriptor::Channel { elem, dir } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeDescriptor::Struct(fields) => write_members(f, "struct", fields),
            TypeDescriptor::Interface(methods) => write_members(f, "interface", methods),
            TypeDescriptor::Func(sig) => write!(f, "func{sig}"),
            TypeDescriptor::Variadic(elem) => write!(f, "...{elem}"),
        }
    }
}

impl fmt::Display for NormalizedDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedDeclaration::ConstOrVar {
                name,
                value_kind,
                ty,
                initializer,
            } => {
                let keyword = match value_kind {
                    ValueKind::Const => "const",
                    ValueKind::Var => "var",
                };
                write!(f, "{keyword} {name}")?;
                if let Some(ty) = ty {
                    write!(f, " {ty}")?;
                }
                if let Some(initializer) = initializer {
                    write!(f, " = {initializer}")?;
                }
                Ok(())
            }
            NormalizedDeclaration::TypeAlias {
                name,
                alias: true,
                underlying,
            } => write!(f, "type {name} = {underlying}"),
            NormalizedDeclaration::TypeAlias {
                name, underlying, ..
            } => write!(f, "type {name} {underlying}"),
            NormalizedDeclaration::StructType { name, fields } => {
                write!(f, "type {name} ")?;
                write_members(f, "struct", fields)
            }
            NormalizedDeclaration::InterfaceType { name, methods } => {
                write!(f, "type {name} ")?;
                write_members(f, "interface", methods)
            }
            NormalizedDeclaration::Function {
                name,
                receiver,
                signature,
            } => match receiver {
                Some(receiver) => write!(f, "func ({receiver}) {name}{signature}"),
                None => write!(f, "func {name}{signature}"),
            },
        }
    }
}
