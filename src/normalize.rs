//! Converts a package's raw declaration tree into its `PublicSurface`.
//!
//! Everything that would make two equivalent declarations look different is
//! removed here, once: grouped specs are split, parameter names are dropped,
//! import aliases are replaced by import paths and embedded interfaces are
//! replaced by their method sets. The comparator never sees raw syntax.

use crate::canonical::{
    ChanDir, DeclarationId, Field, FuncSignature, NormalizedDeclaration, PublicSurface,
    TypeDescriptor, ValueKind,
};
use crate::error::ExtractionError;
use crate::raw::{
    RawChanDir, RawDecl, RawExpr, RawField, RawFile, RawFuncType, RawPackage, RawSpec, RawValue,
    Token,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

type Result<T> = std::result::Result<T, ExtractionError>;

/// Exported identifiers start with an upper-case letter (category Lu).
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(is_upper_letter)
}

/// Code points with the Other_Uppercase property. `char::is_uppercase` accepts
/// them, but they are numerals or symbols, not letters, and cannot start an exported name.
const OTHER_UPPERCASE: [(char, char); 5] = [
    ('\u{2160}', '\u{216F}'),
    ('\u{24B6}', '\u{24CF}'),
    ('\u{1F130}', '\u{1F149}'),
    ('\u{1F150}', '\u{1F169}'),
    ('\u{1F170}', '\u{1F189}'),
];

fn is_upper_letter(c: char) -> bool {
    c.is_uppercase()
        && !OTHER_UPPERCASE
            .iter()
            .any(|&(first, last)| (first..=last).contains(&c))
}

/// Extracts the public surface of every file in `package`.
pub fn extract_public_surface(package: &RawPackage) -> Result<PublicSurface> {
    let files: Vec<&RawFile> = package.files.iter().collect();
    extract_files(package, &files)
}

/// Extracts the public surface of `package` restricted to `files`.
///
/// Files are normalized in parallel. Reachability promotion runs afterwards over
/// the complete declaration pool.
pub fn extract_files(package: &RawPackage, files: &[&RawFile]) -> Result<PublicSurface> {
    let extractor = Extractor::new(package, files);

    let per_file: Vec<Vec<Entry>> = (0..files.len())
        .into_par_iter()
        .map(|index| extractor.file_entries(index))
        .collect::<Result<_>>()?;

    let mut surface = PublicSurface {
        import_path: package.import_path.clone(),
        ..Default::default()
    };
    surface
        .interfaces
        .insert("error".to_string(), error_methods());

    let mut hidden: HashMap<DeclarationId, NormalizedDeclaration> = HashMap::new();
    let mut wanted: BTreeSet<String> = BTreeSet::new();

    for entry in per_file.into_iter().flatten() {
        if let Some(methods) = entry.interface {
            surface
                .interfaces
                .insert(entry.decl.name().to_string(), methods);
        }

        let id = entry.decl.id();
        if !entry.exported {
            // Private redeclarations (init funcs, build-tag variants) keep the last one.
            hidden.insert(id, entry.decl);
            continue;
        }
        wanted.extend(entry.returns);
        // Build-tag variants redeclare exported names too; the last file wins.
        if let Some(previous) = surface.declarations.get(&id) {
            if *previous != entry.decl {
                warn!(
                    package = %package.import_path,
                    declaration = %previous,
                    "conflicting redeclaration, keeping the later one"
                );
            }
        }
        surface.declarations.insert(id, entry.decl);
    }

    for name in package.external_interfaces.keys() {
        if surface.interfaces.contains_key(name) {
            continue;
        }
        if let Some(methods) = extractor.external_methods(name, &mut Expansion::default())? {
            surface.interfaces.insert(name.clone(), methods);
        }
    }

    let promoted = promote(&mut surface.declarations, hidden, &wanted);

    debug!(
        package = %package.import_path,
        files = files.len(),
        declarations = surface.declarations.len(),
        promoted,
        "extracted public surface"
    );

    Ok(surface)
}

/// Moves unexported types returned by exported functions into the visible map,
/// together with their exported methods. One pass, no recursion through the
/// promoted types' own members.
fn promote(
    declarations: &mut BTreeMap<DeclarationId, NormalizedDeclaration>,
    mut hidden: HashMap<DeclarationId, NormalizedDeclaration>,
    wanted: &BTreeSet<String>,
) -> usize {
    let mut promoted = 0;

    for name in wanted {
        let is_type = hidden
            .get(name)
            .is_some_and(NormalizedDeclaration::is_type_declaration);
        if !is_type {
            continue;
        }
        if let Some(decl) = hidden.remove(name) {
            debug!(name = %name, "promoting reachable unexported type");
            declarations.insert(name.clone(), decl);
            promoted += 1;
        }
    }

    for (id, decl) in hidden {
        let NormalizedDeclaration::Function {
            name,
            receiver: Some(receiver),
            ..
        } = &decl
        else {
            continue;
        };
        if is_exported(name) && wanted.contains(receiver) && declarations.contains_key(receiver) {
            declarations.insert(id, decl);
            promoted += 1;
        }
    }

    promoted
}

/// One normalized top-level declaration, before visibility is decided.
struct Entry {
    decl: NormalizedDeclaration,
    exported: bool,
    /// Unexported type names returned by this function.
    returns: Vec<String>,
    /// Method set, when this declares an interface type.
    interface: Option<Vec<Field>>,
}

impl Entry {
    fn new(decl: NormalizedDeclaration, exported: bool) -> Self {
        Self {
            decl,
            exported,
            returns: Vec::new(),
            interface: None,
        }
    }
}

/// Where identifiers in an expression are resolved.
#[derive(Clone, Copy)]
enum Scope<'s> {
    /// A source file of the package being extracted, by index.
    File(usize),
    /// A method set supplied for an imported interface; the string is the
    /// import path of the package that declares it.
    External(&'s str),
}

/// Interfaces whose method sets are being expanded, outermost first.
///
/// Names before `boundary` were entered from an enclosing method set through a
/// method signature. Embedding one of those again is legal Go and stays a named
/// reference; embedding a name after `boundary` is an embedding cycle.
#[derive(Debug, Default)]
struct Expansion {
    names: Vec<String>,
    boundary: usize,
}

impl Expansion {
    fn root(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            boundary: 0,
        }
    }

    fn encloses(&self, name: &str) -> bool {
        self.names[..self.boundary].iter().any(|n| n == name)
    }

    fn embeds(&self, name: &str) -> bool {
        self.names[self.boundary..].iter().any(|n| n == name)
    }

    /// Runs `f` on a method's type; everything expanding so far becomes enclosing.
    fn in_signature<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let boundary = std::mem::replace(&mut self.boundary, self.names.len());
        let result = f(self);
        self.boundary = boundary;
        result
    }
}

struct Extractor<'a> {
    package: &'a RawPackage,
    files: Vec<&'a RawFile>,
    /// Local import name to import path, per file.
    imports: Vec<HashMap<String, String>>,
    /// Every type spec in the package with the index of its file.
    types: HashMap<&'a str, (&'a RawExpr, usize)>,
}

impl<'a> Extractor<'a> {
    fn new(package: &'a RawPackage, files: &[&'a RawFile]) -> Self {
        let imports = files.iter().map(|file| import_map(file)).collect();

        let mut types = HashMap::new();
        for (index, file) in files.iter().copied().enumerate() {
            for decl in &file.decls {
                let RawDecl::Gen {
                    token: Token::Type,
                    specs,
                } = decl
                else {
                    continue;
                };
                for spec in specs {
                    if let RawSpec::Type { name, ty, .. } = spec {
                        types.insert(name.as_str(), (ty, index));
                    }
                }
            }
        }

        Self {
            package,
            files: files.to_vec(),
            imports,
            types,
        }
    }

    fn unsupported(&self, index: usize, decl: &RawDecl) -> ExtractionError {
        ExtractionError::UnsupportedDeclaration {
            file: self.files[index].name.clone(),
            decl: decl.to_string(),
        }
    }

    fn file_entries(&self, index: usize) -> Result<Vec<Entry>> {
        let scope = Scope::File(index);
        let mut entries = Vec::new();

        for decl in &self.files[index].decls {
            match decl {
                RawDecl::Gen {
                    token: Token::Import,
                    specs,
                } => {
                    if specs.iter().any(|s| !matches!(s, RawSpec::Import { .. })) {
                        return Err(self.unsupported(index, decl));
                    }
                }
                RawDecl::Gen {
                    token: token @ (Token::Const | Token::Var),
                    specs,
                } => {
                    let kind = match token {
                        Token::Const => ValueKind::Const,
                        _ => ValueKind::Var,
                    };
                    self.value_entries(scope, kind, specs, &mut entries)
                        .map_err(|e| e.unwrap_or_else(|| self.unsupported(index, decl)))?;
                }
                RawDecl::Gen {
                    token: Token::Type,
                    specs,
                } => {
                    for spec in specs {
                        let RawSpec::Type { name, alias, ty } = spec else {
                            return Err(self.unsupported(index, decl));
                        };
                        entries.push(self.type_entry(scope, name, *alias, ty)?);
                    }
                }
                RawDecl::Func { recv, name, ty } => {
                    entries.push(self.func_entry(scope, recv.as_ref(), name, ty)?);
                }
                RawDecl::Bad { .. } => return Err(self.unsupported(index, decl)),
            }
        }

        Ok(entries)
    }

    /// Splits value specs into one declaration per name. A `None` error means the
    /// spec list held something other than value specs.
    fn value_entries(
        &self,
        scope: Scope<'_>,
        kind: ValueKind,
        specs: &[RawSpec],
        entries: &mut Vec<Entry>,
    ) -> std::result::Result<(), Option<ExtractionError>> {
        // Constants without type and values repeat the previous spec (iota).
        let mut previous: Option<(Option<&RawExpr>, &[RawValue])> = None;

        for spec in specs {
            let RawSpec::Value { names, ty, values } = spec else {
                return Err(None);
            };
            let (ty, values) = match previous {
                Some(inherited) if kind == ValueKind::Const && ty.is_none() && values.is_empty() => {
                    inherited
                }
                _ => (ty.as_ref(), values.as_slice()),
            };
            previous = Some((ty, values));

            for (position, name) in names.iter().enumerate() {
                if name == "_" {
                    continue;
                }
                let value = values.get(position);
                let declared = ty.or_else(|| value.and_then(|v| v.ty.as_ref()));
                let descriptor = declared
                    .map(|expr| self.descriptor(scope, expr, &mut Expansion::default()))
                    .transpose()
                    .map_err(Some)?;
                let initializer = match descriptor {
                    Some(_) => None,
                    None => value.map(|v| v.source.clone()),
                };

                entries.push(Entry::new(
                    NormalizedDeclaration::ConstOrVar {
                        name: name.clone(),
                        value_kind: kind,
                        ty: descriptor,
                        initializer,
                    },
                    is_exported(name),
                ));
            }
        }
        Ok(())
    }

    fn type_entry(&self, scope: Scope<'_>, name: &str, alias: bool, ty: &RawExpr) -> Result<Entry> {
        let mut expanding = Expansion::root(name);
        let mut interface = None;

        let decl = match (alias, unparen(ty)) {
            (false, RawExpr::Struct(fields)) => {
                let fields = expanding
                    .in_signature(|expanding| self.struct_fields(scope, fields, expanding))?;
                NormalizedDeclaration::StructType {
                    name: name.to_string(),
                    fields,
                }
            }
            (false, RawExpr::Interface(fields)) => {
                let methods = self.interface_methods(scope, fields, &mut expanding)?;
                interface = Some(methods.clone());
                NormalizedDeclaration::InterfaceType {
                    name: name.to_string(),
                    methods,
                }
            }
            (_, inner) => {
                let underlying =
                    expanding.in_signature(|expanding| self.descriptor(scope, inner, expanding))?;
                interface = match (&underlying, inner) {
                    (TypeDescriptor::Interface(methods), _) => Some(methods.clone()),
                    (_, RawExpr::Ident(_) | RawExpr::Selector { .. }) => {
                        self.embedded_methods(scope, inner, &mut expanding)?
                    }
                    _ => None,
                };
                NormalizedDeclaration::TypeAlias {
                    name: name.to_string(),
                    alias,
                    underlying,
                }
            }
        };

        Ok(Entry {
            interface,
            ..Entry::new(decl, is_exported(name))
        })
    }

    fn func_entry(
        &self,
        scope: Scope<'_>,
        recv: Option<&RawField>,
        name: &str,
        ty: &RawFuncType,
    ) -> Result<Entry> {
        let receiver = match recv {
            None => None,
            Some(field) => Some(
                receiver_name(&field.ty)
                    .ok_or_else(|| ExtractionError::UnsupportedReceiver {
                        receiver: field.to_string(),
                    })?
                    .to_string(),
            ),
        };
        let signature = self.signature(scope, ty, &mut Expansion::default())?;
        let exported = is_exported(name) && receiver.as_deref().is_none_or(is_exported);

        let returns = ty
            .results
            .iter()
            .flatten()
            .filter_map(|result| receiver_name(&result.ty))
            .filter(|returned| !is_exported(returned))
            .map(str::to_string)
            .collect();

        Ok(Entry {
            returns,
            ..Entry::new(
                NormalizedDeclaration::Function {
                    name: name.to_string(),
                    receiver,
                    signature,
                },
                exported,
            )
        })
    }

    fn qualify(&self, scope: Scope<'_>, package: &str, name: &str) -> String {
        match scope {
            Scope::File(index) => match self.imports[index].get(package) {
                Some(path) => format!("{path}.{name}"),
                None => {
                    debug!(package, name, "selector refers to an unknown import");
                    format!("{package}.{name}")
                }
            },
            Scope::External(_) => format!("{package}.{name}"),
        }
    }

    fn descriptor(
        &self,
        scope: Scope<'_>,
        expr: &RawExpr,
        expanding: &mut Expansion,
    ) -> Result<TypeDescriptor> {
        let descriptor = match expr {
            RawExpr::Ident(name) => match scope {
                Scope::External(home) if is_exported(name) => {
                    TypeDescriptor::Named(format!("{home}.{name}"))
                }
                _ => TypeDescriptor::Named(name.clone()),
            },
            RawExpr::Selector { package, name } => {
                TypeDescriptor::Named(self.qualify(scope, package, name))
            }
            RawExpr::Star(inner) => {
                TypeDescriptor::Pointer(Box::new(self.descriptor(scope, inner, expanding)?))
            }
            RawExpr::Array { len: None, elem } => {
                TypeDescriptor::Slice(Box::new(self.descriptor(scope, elem, expanding)?))
            }
            RawExpr::Array {
                len: Some(len),
                elem,
            } => TypeDescriptor::Array {
                len: len.clone(),
                elem: Box::new(self.descriptor(scope, elem, expanding)?),
            },
            RawExpr::Map { key, value } => TypeDescriptor::Map {
                key: Box::new(self.descriptor(scope, key, expanding)?),
                value: Box::new(self.descriptor(scope, value, expanding)?),
            },
            RawExpr::Chan { dir, elem } => TypeDescriptor::Channel {
                elem: Box::new(self.descriptor(scope, elem, expanding)?),
                dir: match dir {
                    RawChanDir::Send => ChanDir::Send,
                    RawChanDir::Recv => ChanDir::Recv,
                    RawChanDir::Both => ChanDir::Both,
                },
            },
            RawExpr::Struct(fields) => {
                TypeDescriptor::Struct(self.struct_fields(scope, fields, expanding)?)
            }
            RawExpr::Interface(fields) => {
                TypeDescriptor::Interface(self.interface_methods(scope, fields, expanding)?)
            }
            RawExpr::Func(sig) => TypeDescriptor::Func(self.signature(scope, sig, expanding)?),
            RawExpr::Paren(inner) => return self.descriptor(scope, inner, expanding),
            RawExpr::Ellipsis(_) => {
                return Err(ExtractionError::MisplacedVariadic {
                    signature: expr.to_string(),
                });
            }
            RawExpr::Bad(source) => {
                return Err(ExtractionError::UnsupportedExpression {
                    expr: source.clone(),
                });
            }
        };
        Ok(descriptor)
    }

    /// Parameter and result names are dropped; `a, b int` becomes two entries.
    fn signature(
        &self,
        scope: Scope<'_>,
        sig: &RawFuncType,
        expanding: &mut Expansion,
    ) -> Result<FuncSignature> {
        let total: usize = sig.params.iter().map(|p| p.names.len().max(1)).sum();
        let mut params = Vec::with_capacity(total);

        for field in &sig.params {
            for _ in 0..field.names.len().max(1) {
                let ty = match unparen(&field.ty) {
                    RawExpr::Ellipsis(elem) if params.len() + 1 == total => {
                        TypeDescriptor::Variadic(Box::new(self.descriptor(scope, elem, expanding)?))
                    }
                    RawExpr::Ellipsis(_) => {
                        return Err(ExtractionError::MisplacedVariadic {
                            signature: RawExpr::Func(sig.clone()).to_string(),
                        });
                    }
                    other => self.descriptor(scope, other, expanding)?,
                };
                params.push(Field::positional(ty));
            }
        }

        let results = match &sig.results {
            None => None,
            Some(results) => {
                let mut fields = Vec::new();
                for field in results {
                    let ty = self.descriptor(scope, &field.ty, expanding)?;
                    for _ in 0..field.names.len().max(1) {
                        fields.push(Field::positional(ty.clone()));
                    }
                }
                Some(fields)
            }
        };

        Ok(FuncSignature { params, results })
    }

    /// Unexported named fields are dropped; embedded fields are kept whatever
    /// their visibility and carry no name.
    fn struct_fields(
        &self,
        scope: Scope<'_>,
        fields: &[RawField],
        expanding: &mut Expansion,
    ) -> Result<Vec<Field>> {
        let mut normalized = Vec::new();
        for field in fields {
            if field.names.is_empty() {
                let base = embedded_base(&field.ty).ok_or_else(|| {
                    ExtractionError::UnsupportedEmbeddedField {
                        field: field.to_string(),
                    }
                })?;
                normalized.push(Field {
                    name: None,
                    ty: self.descriptor(scope, &field.ty, expanding)?,
                    exported: is_exported(base),
                });
                continue;
            }

            let ty = self.descriptor(scope, &field.ty, expanding)?;
            for name in field.names.iter().filter(|name| is_exported(name)) {
                normalized.push(Field::named(name, ty.clone(), true));
            }
        }
        Ok(normalized)
    }

    /// Method set of an interface literal with every embedding substituted.
    /// Methods come out sorted by name; embeddings that cannot be resolved are
    /// kept as unnamed members at the end.
    fn interface_methods(
        &self,
        scope: Scope<'_>,
        fields: &[RawField],
        expanding: &mut Expansion,
    ) -> Result<Vec<Field>> {
        let mut methods: BTreeMap<String, Field> = BTreeMap::new();
        let mut unresolved = Vec::new();

        for field in fields {
            if !field.names.is_empty() {
                let ty = expanding
                    .in_signature(|expanding| self.descriptor(scope, &field.ty, expanding))?;
                for name in &field.names {
                    methods.insert(name.clone(), Field::named(name, ty.clone(), is_exported(name)));
                }
                continue;
            }

            match self.embedded_methods(scope, &field.ty, expanding)? {
                Some(embedded) => {
                    for method in embedded {
                        match &method.name {
                            Some(name) => {
                                methods.entry(name.clone()).or_insert(method);
                            }
                            None => unresolved.push(method),
                        }
                    }
                }
                None => {
                    debug!(embedded = %field.ty, "embedded interface left unresolved");
                    unresolved.push(Field {
                        name: None,
                        ty: self.descriptor(scope, &field.ty, expanding)?,
                        exported: true,
                    });
                }
            }
        }

        let mut resolved: Vec<Field> = methods.into_values().collect();
        resolved.extend(unresolved);
        Ok(resolved)
    }

    /// Method set of an embedded interface reference, `None` when it is not known
    /// to be an interface.
    fn embedded_methods(
        &self,
        scope: Scope<'_>,
        expr: &RawExpr,
        expanding: &mut Expansion,
    ) -> Result<Option<Vec<Field>>> {
        match (scope, unparen(expr)) {
            (Scope::File(_), RawExpr::Ident(name)) => match self.types.get(name.as_str()) {
                Some(&(ty, file)) => self.resolve_local(name, Scope::File(file), ty, expanding),
                None => Ok(builtin_interface(name)),
            },
            (Scope::External(home), RawExpr::Ident(name)) if is_exported(name) => {
                self.external_methods(&format!("{home}.{name}"), expanding)
            }
            (Scope::External(_), RawExpr::Ident(name)) => Ok(builtin_interface(name)),
            (_, RawExpr::Selector { package, name }) => {
                let qualified = self.qualify(scope, package, name);
                if self.package.external_interfaces.contains_key(&qualified) {
                    self.external_methods(&qualified, expanding)
                } else {
                    self.external_methods(&format!("{package}.{name}"), expanding)
                }
            }
            (_, RawExpr::Interface(fields)) => {
                self.interface_methods(scope, fields, expanding).map(Some)
            }
            (_, other) => Err(ExtractionError::UnsupportedEmbeddedField {
                field: other.to_string(),
            }),
        }
    }

    fn resolve_local(
        &self,
        name: &str,
        scope: Scope<'_>,
        ty: &RawExpr,
        expanding: &mut Expansion,
    ) -> Result<Option<Vec<Field>>> {
        if expanding.encloses(name) {
            debug!(name, "interface embeds an enclosing interface, kept by name");
            return Ok(None);
        }
        if expanding.embeds(name) {
            return Err(ExtractionError::EmbeddingCycle {
                name: name.to_string(),
            });
        }
        expanding.names.push(name.to_string());
        let resolved = match unparen(ty) {
            RawExpr::Interface(fields) => self.interface_methods(scope, fields, expanding).map(Some),
            inner @ (RawExpr::Ident(_) | RawExpr::Selector { .. }) => {
                self.embedded_methods(scope, inner, expanding)
            }
            _ => Ok(None),
        };
        expanding.names.pop();
        resolved
    }

    fn external_methods(
        &self,
        qualified: &str,
        expanding: &mut Expansion,
    ) -> Result<Option<Vec<Field>>> {
        let Some(fields) = self.package.external_interfaces.get(qualified) else {
            return Ok(None);
        };
        if expanding.encloses(qualified) {
            return Ok(None);
        }
        if expanding.embeds(qualified) {
            return Err(ExtractionError::EmbeddingCycle {
                name: qualified.to_string(),
            });
        }
        let home = qualified.rsplit_once('.').map_or("", |(home, _)| home);

        expanding.names.push(qualified.to_string());
        let resolved = self.interface_methods(Scope::External(home), fields, expanding);
        expanding.names.pop();
        resolved.map(Some)
    }
}

fn import_map(file: &RawFile) -> HashMap<String, String> {
    let mut imports = HashMap::new();
    for decl in &file.decls {
        let RawDecl::Gen {
            token: Token::Import,
            specs,
        } = decl
        else {
            continue;
        };
        for spec in specs {
            let RawSpec::Import { path, name } = spec else {
                continue;
            };
            let local = match name.as_deref() {
                Some("_" | ".") => continue,
                Some(alias) => alias,
                None => path.rsplit('/').next().unwrap_or(path),
            };
            imports.insert(local.to_string(), path.clone());
        }
    }
    imports
}

fn unparen(expr: &RawExpr) -> &RawExpr {
    match expr {
        RawExpr::Paren(inner) => unparen(inner),
        other => other,
    }
}

/// `T` or `*T`, the only receiver forms; also used to spot returned type names.
fn receiver_name(expr: &RawExpr) -> Option<&str> {
    match unparen(expr) {
        RawExpr::Ident(name) => Some(name),
        RawExpr::Star(inner) => match unparen(inner) {
            RawExpr::Ident(name) => Some(name),
            _ => None,
        },
        _ => None,
    }
}

fn embedded_base(expr: &RawExpr) -> Option<&str> {
    match unparen(expr) {
        RawExpr::Ident(name) | RawExpr::Selector { name, .. } => Some(name),
        RawExpr::Star(inner) => match unparen(inner) {
            RawExpr::Ident(name) | RawExpr::Selector { name, .. } => Some(name),
            _ => None,
        },
        _ => None,
    }
}

fn error_methods() -> Vec<Field> {
    vec![Field::named(
        "Error",
        TypeDescriptor::Func(FuncSignature {
            params: Vec::new(),
            results: Some(vec![Field::positional(TypeDescriptor::named("string"))]),
        }),
        true,
    )]
}

fn builtin_interface(name: &str) -> Option<Vec<Field>> {
    match name {
        "error" => Some(error_methods()),
        "any" => Some(Vec::new()),
        _ => None,
    }
}
