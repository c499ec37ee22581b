//! The raw declaration tree handed to the core by the parser and type resolver.
//!
//! A revision is serialized as JSON, one document per revision. Nothing in here is
//! normalized yet: grouped specs, shorthand field lists (`a, b int`), import aliases
//! and embedded interfaces all appear exactly as they were written. `normalize`
//! turns this tree into the canonical form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One revision of a source tree: every package the source provider found.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRevision {
    /// Opaque revision token (commit reference, or "." for the working tree).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default)]
    pub packages: Vec<RawPackage>,
}

impl RawRevision {
    /// Parse a revision from its JSON document.
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// A single package at one revision.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawPackage {
    pub import_path: String,
    /// Package clause name (`package foo`).
    pub name: String,
    #[serde(default)]
    pub files: Vec<RawFile>,
    /// Method sets of imported interface types, keyed by qualified name
    /// (`io.Reader`). Provided by the type resolver.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub external_interfaces: BTreeMap<String, Vec<RawField>>,
}

/// A single source unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    #[serde(default)]
    pub decls: Vec<RawDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RawDecl {
    /// `const`, `var`, `type` or `import`, possibly grouped.
    Gen { token: Token, specs: Vec<RawSpec> },
    /// A function, or a method when `recv` is set.
    Func {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recv: Option<RawField>,
        name: String,
        #[serde(rename = "type")]
        ty: RawFuncType,
    },
    /// Something the parser could not make sense of.
    Bad { source: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    Const,
    Var,
    Type,
    Import,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Token::Const => "const",
            Token::Var => "var",
            Token::Type => "type",
            Token::Import => "import",
        };
        f.write_str(keyword)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RawSpec {
    Value {
        names: Vec<String>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        ty: Option<RawExpr>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        values: Vec<RawValue>,
    },
    Type {
        name: String,
        /// `type A = B` rather than `type A B`.
        #[serde(default)]
        alias: bool,
        #[serde(rename = "type")]
        ty: RawExpr,
    },
    Import {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

/// An initializer expression with the type the resolver inferred for it, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawValue {
    pub source: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<RawExpr>,
}

/// A field list entry: struct member, interface method, parameter or result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawField {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(rename = "type")]
    pub ty: RawExpr,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawFuncType {
    #[serde(default)]
    pub params: Vec<RawField>,
    /// `None` when the function declares no result list at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RawField>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RawChanDir {
    Send,
    Recv,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RawExpr {
    Ident(String),
    /// `pkg.Name`, where `package` is the local import name used in the file.
    Selector {
        package: String,
        name: String,
    },
    Star(Box<RawExpr>),
    /// Array when `len` is set, slice otherwise.
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        len: Option<String>,
        elem: Box<RawExpr>,
    },
    Map {
        key: Box<RawExpr>,
        value: Box<RawExpr>,
    },
    Chan {
        dir: RawChanDir,
        elem: Box<RawExpr>,
    },
    Struct(Vec<RawField>),
    Interface(Vec<RawField>),
    Func(RawFuncType),
    Ellipsis(Box<RawExpr>),
    Paren(Box<RawExpr>),
    Bad(String),
}

impl RawExpr {
    pub fn ident(name: &str) -> Self {
        RawExpr::Ident(name.to_string())
    }

    pub fn selector(package: &str, name: &str) -> Self {
        RawExpr::Selector {
            package: package.to_string(),
            name: name.to_string(),
        }
    }
}

//==============================================================================
// Source rendering
//==============================================================================

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[RawField], sep: &str) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{field}")?;
    }
    Ok(())
}

fn write_signature(f: &mut fmt::Formatter<'_>, sig: &RawFuncType) -> fmt::Result {
    f.write_str("(")?;
    write_fields(f, &sig.params, ", ")?;
    f.write_str(")")?;
    match sig.results.as_deref() {
        None | Some([]) => Ok(()),
        Some([single]) if single.names.is_empty() => write!(f, " {}", single.ty),
        Some(results) => {
            f.write_str(" (")?;
            write_fields(f, results, ", ")?;
            f.write_str(")")
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            return write!(f, "{}", self.ty);
        }
        write!(f, "{} {}", self.names.join(", "), self.ty)
    }
}

struct InterfaceMember<'a>(&'a RawField);

impl fmt::Display for InterfaceMember<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.0.ty, self.0.names.as_slice()) {
            (RawExpr::Func(sig), [name]) => {
                f.write_str(name)?;
                write_signature(f, sig)
            }
            _ => write!(f, "{}", self.0),
        }
    }
}

impl fmt::Display for RawExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawExpr::Ident(name) => f.write_str(name),
            RawExpr::Selector { package, name } => write!(f, "{package}.{name}"),
            RawExpr::Star(inner) => write!(f, "*{inner}"),
            RawExpr::Array { len: Some(len), elem } => write!(f, "[{len}]{elem}"),
            RawExpr::Array { len: None, elem } => write!(f, "[]{elem}"),
            RawExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            RawExpr::Chan { dir, elem } => match dir {
                RawChanDir::Both => write!(f, "chan {elem}"),
                RawChanDir::Send => write!(f, "chan<- {elem}"),
                RawChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            RawExpr::Struct(fields) if fields.is_empty() => f.write_str("struct{}"),
            RawExpr::Struct(fields) => {
                f.write_str("struct{ ")?;
                write_fields(f, fields, "; ")?;
                f.write_str(" }")
            }
            RawExpr::Interface(methods) if methods.is_empty() => f.write_str("interface{}"),
            RawExpr::Interface(methods) => {
                f.write_str("interface{ ")?;
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", InterfaceMember(method))?;
                }
                f.write_str(" }")
            }
            RawExpr::Func(sig) => {
                f.write_str("func")?;
                write_signature(f, sig)
            }
            RawExpr::Ellipsis(elem) => write!(f, "...{elem}"),
            RawExpr::Paren(inner) => write!(f, "({inner})"),
            RawExpr::Bad(source) => f.write_str(source),
        }
    }
}

impl fmt::Display for RawSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawSpec::Value { names, ty, values } => {
                f.write_str(&names.join(", "))?;
                if let Some(ty) = ty {
                    write!(f, " {ty}")?;
                }
                if !values.is_empty() {
                    let sources: Vec<&str> = values.iter().map(|v| v.source.as_str()).collect();
                    write!(f, " = {}", sources.join(", "))?;
                }
                Ok(())
            }
            RawSpec::Type { name, alias, ty } => {
                if *alias {
                    write!(f, "{name} = {ty}")
                } else {
                    write!(f, "{name} {ty}")
                }
            }
            RawSpec::Import { path, name: Some(name) } => write!(f, "{name} \"{path}\""),
            RawSpec::Import { path, name: None } => write!(f, "\"{path}\""),
        }
    }
}

impl fmt::Display for RawDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDecl::Gen { token, specs } => match specs.as_slice() {
                [single] => write!(f, "{token} {single}"),
                specs => {
                    writeln!(f, "{token} (")?;
                    for spec in specs {
                        writeln!(f, "\t{spec}")?;
                    }
                    f.write_str(")")
                }
            },
            RawDecl::Func { recv, name, ty } => {
                f.write_str("func ")?;
                if let Some(recv) = recv {
                    write!(f, "({recv}) ")?;
                }
                f.write_str(name)?;
                write_signature(f, ty)
            }
            RawDecl::Bad { source } => f.write_str(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_func_decl() {
        let decl = RawDecl::Func {
            recv: Some(RawField {
                names: vec!["r".to_string()],
                ty: RawExpr::Star(Box::new(RawExpr::ident("Reader"))),
            }),
            name: "Read".to_string(),
            ty: RawFuncType {
                params: vec![RawField {
                    names: vec!["p".to_string()],
                    ty: RawExpr::Array {
                        len: None,
                        elem: Box::new(RawExpr::ident("byte")),
                    },
                }],
                results: Some(vec![
                    RawField {
                        names: vec!["n".to_string()],
                        ty: RawExpr::ident("int"),
                    },
                    RawField {
                        names: vec!["err".to_string()],
                        ty: RawExpr::ident("error"),
                    },
                ]),
            },
        };
        assert_eq!(
            decl.to_string(),
            "func (r *Reader) Read(p []byte) (n int, err error)"
        );
    }

    #[test]
    fn test_render_interface_and_chan() {
        let iface = RawExpr::Interface(vec![
            RawField {
                names: vec![],
                ty: RawExpr::selector("io", "Reader"),
            },
            RawField {
                names: vec!["Close".to_string()],
                ty: RawExpr::Func(RawFuncType {
                    params: vec![],
                    results: Some(vec![RawField {
                        names: vec![],
                        ty: RawExpr::ident("error"),
                    }]),
                }),
            },
        ]);
        assert_eq!(iface.to_string(), "interface{ io.Reader; Close() error }");

        let chan = RawExpr::Chan {
            dir: RawChanDir::Recv,
            elem: Box::new(RawExpr::ident("int")),
        };
        assert_eq!(chan.to_string(), "<-chan int");
    }

    #[test]
    fn test_parse_revision_json() {
        let json = r#"{
            "packages": [{
                "import_path": "example.com/lib",
                "name": "lib",
                "files": [{
                    "name": "lib.go",
                    "decls": [
                        {"gen": {"token": "const", "specs": [
                            {"value": {"names": ["A", "B"], "type": {"ident": "int"},
                                       "values": [{"source": "1"}, {"source": "2"}]}}
                        ]}},
                        {"func": {"name": "F", "type": {"params": [
                            {"names": ["a"], "type": {"ellipsis": {"ident": "int"}}}
                        ]}}}
                    ]
                }]
            }]
        }"#;

        let revision = RawRevision::from_json_str(json).unwrap();
        let file = &revision.packages[0].files[0];
        assert_eq!(file.decls.len(), 2);
        assert_eq!(file.decls[0].to_string(), "const A, B int = 1, 2");
        assert_eq!(file.decls[1].to_string(), "func F(a ...int)");
    }
}
