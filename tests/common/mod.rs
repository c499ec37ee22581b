//! Builders for raw declaration trees used across the integration tests.
#![allow(dead_code)]

use api_compat::canonical::PublicSurface;
use api_compat::raw::{RawPackage, RawRevision};
use api_compat::{ClassifiedChange, classify, extract_public_surface};
use serde_json::{Value, json};

pub const PKG: &str = "example.com/lib";

pub fn ident(name: &str) -> Value {
    json!({ "ident": name })
}

pub fn selector(package: &str, name: &str) -> Value {
    json!({ "selector": { "package": package, "name": name } })
}

pub fn star(inner: Value) -> Value {
    json!({ "star": inner })
}

pub fn slice(elem: Value) -> Value {
    json!({ "array": { "elem": elem } })
}

pub fn ellipsis(elem: Value) -> Value {
    json!({ "ellipsis": elem })
}

pub fn chan(dir: &str, elem: Value) -> Value {
    json!({ "chan": { "dir": dir, "elem": elem } })
}

pub fn field(names: &[&str], ty: Value) -> Value {
    json!({ "names": names, "type": ty })
}

pub fn embedded(ty: Value) -> Value {
    json!({ "type": ty })
}

pub fn func_ty(params: Vec<Value>, results: Option<Vec<Value>>) -> Value {
    json!({ "func": { "params": params, "results": results } })
}

pub fn struct_ty(fields: Vec<Value>) -> Value {
    json!({ "struct": fields })
}

pub fn interface_ty(fields: Vec<Value>) -> Value {
    json!({ "interface": fields })
}

/// `Name(params) results` inside an interface literal.
pub fn method(name: &str, params: Vec<Value>, results: Option<Vec<Value>>) -> Value {
    field(&[name], func_ty(params, results))
}

pub fn import(path: &str, alias: Option<&str>) -> Value {
    json!({ "gen": { "token": "import", "specs": [{ "import": { "path": path, "name": alias } }] } })
}

pub fn type_decl(name: &str, ty: Value) -> Value {
    json!({ "gen": { "token": "type", "specs": [{ "type": { "name": name, "type": ty } }] } })
}

pub fn alias_decl(name: &str, ty: Value) -> Value {
    json!({ "gen": { "token": "type", "specs": [{ "type": { "name": name, "alias": true, "type": ty } }] } })
}

/// `const`/`var` with an optional declared type and initializer source.
pub fn value_decl(token: &str, name: &str, ty: Option<Value>, source: Option<&str>) -> Value {
    let values: Vec<Value> = source.map(|s| json!({ "source": s })).into_iter().collect();
    json!({ "gen": { "token": token, "specs": [{ "value": { "names": [name], "type": ty, "values": values } }] } })
}

pub fn func_decl(name: &str, params: Vec<Value>, results: Option<Vec<Value>>) -> Value {
    json!({ "func": { "name": name, "type": { "params": params, "results": results } } })
}

pub fn method_decl(recv: Value, name: &str, params: Vec<Value>, results: Option<Vec<Value>>) -> Value {
    json!({ "func": { "recv": field(&["r"], recv), "name": name, "type": { "params": params, "results": results } } })
}

pub fn package_with(path: &str, name: &str, decls: Vec<Value>, external: Value) -> RawPackage {
    serde_json::from_value(json!({
        "import_path": path,
        "name": name,
        "files": [{ "name": "lib.go", "decls": decls }],
        "external_interfaces": external,
    }))
    .expect("valid raw package")
}

pub fn package(decls: Vec<Value>) -> RawPackage {
    package_with(PKG, "lib", decls, json!({}))
}

pub fn revision(packages: Vec<RawPackage>) -> RawRevision {
    RawRevision {
        revision: None,
        packages,
    }
}

pub fn surface(decls: Vec<Value>) -> PublicSurface {
    extract_public_surface(&package(decls)).expect("extraction succeeds")
}

/// Extracts both declaration lists and classifies the difference.
pub fn changes(before: Vec<Value>, after: Vec<Value>) -> Vec<ClassifiedChange> {
    classify(&surface(before), &surface(after))
}

/// Method sets the type resolver would report for the `io` interfaces.
pub fn io_interfaces() -> Value {
    let bytes = || field(&["p"], slice(ident("byte")));
    let n_err = || Some(vec![field(&["n"], ident("int")), field(&["err"], ident("error"))]);
    json!({
        "io.Reader": [method("Read", vec![bytes()], n_err())],
        "io.Writer": [method("Write", vec![bytes()], n_err())],
        "io.Closer": [method("Close", vec![], Some(vec![embedded(ident("error"))]))],
        "io.ReadCloser": [embedded(ident("Reader")), embedded(ident("Closer"))],
    })
}
