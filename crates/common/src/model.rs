//! JSON declaration model.
//!
//! The model file stands in for the compiler's element and type utilities:
//! it lists the interfaces visible in a round (with their type parameters,
//! super-interfaces, constants and methods) and the declarations annotated
//! for generation. Loading links the raw file: every type expression is
//! parsed and every super-interface reference is checked.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

use crate::host::DeclarationSource;
use crate::types::{OBJECT, TypeParam, TypeParseError, TypeRef, parse_type, parse_type_param, type_param_name};

/// Error raised while linking a declaration model or querying it.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A declaration is structurally invalid (empty or duplicate names).
    #[error("malformed declaration: {0}")]
    Malformed(String),
    /// A referenced interface is not part of the model.
    #[error("unknown interface `{0}`")]
    UnknownInterface(String),
    /// A type or inheritance relation cannot be resolved.
    #[error("{0}")]
    TypeResolution(String),
    /// A type expression could not be parsed.
    #[error(transparent)]
    Parse(#[from] TypeParseError),
}

/// Error raised while reading a model file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read declaration model {}: {source}", path.display())]
    Io {
        /// Path of the model file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not a valid model document.
    #[error("failed to parse declaration model: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but does not link.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A declaration tagged for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDeclaration {
    /// Fully-qualified name of the annotated element.
    pub element: String,
    /// Interface that encloses the element. `None` never occurs for valid
    /// input.
    pub enclosing: Option<String>,
    /// The annotation's `url` option.
    pub url: Option<String>,
}

/// A linked interface declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    /// Fully-qualified name.
    pub name: String,
    /// Declared type parameters.
    pub type_params: Vec<TypeParam>,
    /// Direct super-interfaces, in declaration order.
    pub supertypes: Vec<TypeRef>,
    /// Constant fields.
    pub fields: Vec<String>,
    /// Declared methods, in declaration order.
    pub methods: Vec<MethodDecl>,
}

/// A linked method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Simple name.
    pub name: String,
    /// Method-level type parameters.
    pub type_params: Vec<TypeParam>,
    /// Parameters, in declaration order.
    pub params: Vec<Param>,
    /// Declared return type.
    pub return_type: TypeRef,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: TypeRef,
}

/// Linked declaration model of one processing round.
#[derive(Debug, Clone)]
pub struct DeclarationModel {
    pub(crate) root: InterfaceDecl,
    pub(crate) interfaces: Vec<InterfaceDecl>,
    pub(crate) index: HashMap<String, usize>,
    annotated: Vec<AnnotatedDeclaration>,
}

// =============================================================================
// Raw file format
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    #[serde(default)]
    root_type: Option<InterfaceSpec>,
    #[serde(default)]
    interfaces: Vec<InterfaceSpec>,
    #[serde(default)]
    annotated: Vec<AnnotatedSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InterfaceSpec {
    name: String,
    #[serde(default)]
    type_params: Vec<String>,
    #[serde(default, rename = "extends")]
    supertypes: Vec<String>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    methods: Vec<MethodSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MethodSpec {
    name: String,
    #[serde(default)]
    type_params: Vec<String>,
    #[serde(default)]
    params: Vec<ParamSpec>,
    #[serde(default = "void_type")]
    returns: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamSpec {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnnotatedSpec {
    element: String,
    /// Absent: the element encloses itself. Explicit `null`: no enclosing
    /// interface.
    #[serde(default, deserialize_with = "explicit_null")]
    enclosing: Option<Option<String>>,
    #[serde(default)]
    url: Option<String>,
}

fn void_type() -> String {
    "void".to_string()
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Linking
// =============================================================================

impl DeclarationModel {
    /// Parse and link a model document.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let file: ModelFile = serde_json::from_str(json)?;
        Ok(Self::link(file)?)
    }

    /// Read, parse and link a model file.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), len = contents.len(), "Read declaration model.");
        Self::from_json(&contents)
    }

    /// All interfaces of the model, in file order.
    pub fn interfaces(&self) -> &[InterfaceDecl] {
        &self.interfaces
    }

    fn link(file: ModelFile) -> Result<Self, ModelError> {
        let root = match file.root_type {
            Some(spec) => link_interface(spec)?,
            None => default_root_type(),
        };

        let mut interfaces = Vec::with_capacity(file.interfaces.len());
        let mut index = HashMap::new();
        for spec in file.interfaces {
            let decl = link_interface(spec)?;
            if decl.name == root.name || index.contains_key(&decl.name) {
                return Err(ModelError::Malformed(format!(
                    "interface `{}` is declared more than once",
                    decl.name
                )));
            }
            index.insert(decl.name.clone(), interfaces.len());
            interfaces.push(decl);
        }

        for decl in &interfaces {
            check_supertypes(decl, &interfaces, &index)?;
        }
        check_acyclic(&interfaces, &index)?;

        let annotated = file
            .annotated
            .into_iter()
            .map(link_annotated)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            root = %root.name,
            interfaces = interfaces.len(),
            annotated = annotated.len(),
            "Linked declaration model."
        );

        Ok(Self {
            root,
            interfaces,
            index,
            annotated,
        })
    }
}

impl DeclarationSource for DeclarationModel {
    fn annotated_declarations(&self) -> Vec<AnnotatedDeclaration> {
        self.annotated.clone()
    }
}

fn link_interface(spec: InterfaceSpec) -> Result<InterfaceDecl, ModelError> {
    if spec.name.trim().is_empty() {
        return Err(ModelError::Malformed("interface with an empty name".into()));
    }
    let name = spec.name;

    let scope: Vec<&str> = spec.type_params.iter().map(|p| type_param_name(p)).collect();
    let type_params = link_type_params(&spec.type_params, &scope)?;

    let supertypes = spec
        .supertypes
        .iter()
        .map(|text| {
            let ty = parse_type(text, &scope)?;
            match ty {
                TypeRef::Named { .. } => Ok(ty),
                _ => Err(ModelError::TypeResolution(format!(
                    "`{name}` extends `{text}`, which is not an interface type"
                ))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let methods = spec
        .methods
        .into_iter()
        .map(|m| link_method(&name, m, &scope))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InterfaceDecl {
        name,
        type_params,
        supertypes,
        fields: spec.fields,
        methods,
    })
}

fn link_type_params(params: &[String], scope: &[&str]) -> Result<Vec<TypeParam>, ModelError> {
    params
        .iter()
        .map(|text| parse_type_param(text, scope).map_err(ModelError::from))
        .collect()
}

fn link_method(owner: &str, spec: MethodSpec, outer_scope: &[&str]) -> Result<MethodDecl, ModelError> {
    if spec.name.trim().is_empty() {
        return Err(ModelError::Malformed(format!(
            "method with an empty name in `{owner}`"
        )));
    }

    let own: Vec<&str> = spec.type_params.iter().map(|p| type_param_name(p)).collect();
    let scope: Vec<&str> = outer_scope.iter().chain(own.iter()).copied().collect();
    let type_params = link_type_params(&spec.type_params, &scope)?;

    let params = spec
        .params
        .into_iter()
        .map(|p| {
            if p.name.trim().is_empty() {
                return Err(ModelError::Malformed(format!(
                    "parameter with an empty name in `{owner}.{}`",
                    spec.name
                )));
            }
            let ty = parse_type(&p.ty, &scope)?;
            if ty.is_void() {
                return Err(ModelError::TypeResolution(format!(
                    "parameter `{}` of `{owner}.{}` has type void",
                    p.name, spec.name
                )));
            }
            Ok(Param { name: p.name, ty })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let return_type = parse_type(&spec.returns, &scope)?;

    Ok(MethodDecl {
        name: spec.name,
        type_params,
        params,
        return_type,
    })
}

fn link_annotated(spec: AnnotatedSpec) -> Result<AnnotatedDeclaration, ModelError> {
    if spec.element.trim().is_empty() {
        return Err(ModelError::Malformed("annotated element with an empty name".into()));
    }
    let enclosing = match spec.enclosing {
        None => Some(spec.element.clone()),
        Some(explicit) => explicit,
    };
    Ok(AnnotatedDeclaration {
        element: spec.element,
        enclosing,
        url: spec.url,
    })
}

fn check_supertypes(
    decl: &InterfaceDecl,
    interfaces: &[InterfaceDecl],
    index: &HashMap<String, usize>,
) -> Result<(), ModelError> {
    for sup in &decl.supertypes {
        let TypeRef::Named { name, args } = sup else {
            continue;
        };
        let Some(&i) = index.get(name) else {
            return Err(ModelError::UnknownInterface(name.clone()));
        };
        let expected = interfaces[i].type_params.len();
        if !args.is_empty() && args.len() != expected {
            return Err(ModelError::TypeResolution(format!(
                "`{}` extends `{sup}` with {} type argument(s), expected {expected}",
                decl.name,
                args.len()
            )));
        }
    }
    Ok(())
}

fn check_acyclic(
    interfaces: &[InterfaceDecl],
    index: &HashMap<String, usize>,
) -> Result<(), ModelError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    fn visit(
        i: usize,
        interfaces: &[InterfaceDecl],
        index: &HashMap<String, usize>,
        marks: &mut [Mark],
    ) -> Result<(), ModelError> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(ModelError::TypeResolution(format!(
                    "cyclic inheritance involving `{}`",
                    interfaces[i].name
                )));
            }
            Mark::Unvisited => {}
        }
        marks[i] = Mark::InProgress;
        for sup in &interfaces[i].supertypes {
            if let TypeRef::Named { name, .. } = sup {
                if let Some(&j) = index.get(name) {
                    visit(j, interfaces, index, marks)?;
                }
            }
        }
        marks[i] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; interfaces.len()];
    for i in 0..interfaces.len() {
        visit(i, interfaces, index, &mut marks)?;
    }
    Ok(())
}

/// `java.lang.Object` with its public and protected methods.
fn default_root_type() -> InterfaceDecl {
    fn method(name: &str, params: &[(&str, TypeRef)], return_type: TypeRef) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            type_params: Vec::new(),
            params: params
                .iter()
                .map(|(n, ty)| Param {
                    name: (*n).to_string(),
                    ty: ty.clone(),
                })
                .collect(),
            return_type,
        }
    }

    let long = || TypeRef::named("long");
    let class = TypeRef::Named {
        name: "java.lang.Class".into(),
        args: vec![TypeRef::Wildcard(None)],
    };

    InterfaceDecl {
        name: OBJECT.to_string(),
        type_params: Vec::new(),
        supertypes: Vec::new(),
        fields: Vec::new(),
        methods: vec![
            method("clone", &[], TypeRef::object()),
            method("equals", &[("obj", TypeRef::object())], TypeRef::named("boolean")),
            method("finalize", &[], TypeRef::Void),
            method("getClass", &[], class),
            method("hashCode", &[], TypeRef::named("int")),
            method("notify", &[], TypeRef::Void),
            method("notifyAll", &[], TypeRef::Void),
            method("toString", &[], TypeRef::named("java.lang.String")),
            method("wait", &[], TypeRef::Void),
            method("wait", &[("timeoutMillis", long())], TypeRef::Void),
            method(
                "wait",
                &[("timeoutMillis", long()), ("nanos", TypeRef::named("int"))],
                TypeRef::Void,
            ),
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_link_minimal_model() {
        let model = DeclarationModel::from_json(
            r#"{
              "interfaces": [
                { "name": "com.example.Greeter",
                  "methods": [ { "name": "greet", "params": [{ "name": "name", "type": "java.lang.String" }], "returns": "java.lang.String" } ] }
              ],
              "annotated": [ { "element": "com.example.Greeter", "url": "https://api.example.com" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(model.root.name, OBJECT);
        assert_eq!(model.interfaces().len(), 1);
        let greet = &model.interfaces()[0].methods[0];
        assert_eq!(greet.return_type, TypeRef::named("java.lang.String"));
        assert_eq!(greet.params[0].name, "name");

        let annotated = model.annotated_declarations();
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].enclosing.as_deref(), Some("com.example.Greeter"));
        assert_eq!(annotated[0].url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_missing_returns_means_void() {
        let model = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.Pinger", "methods": [ { "name": "ping" } ] } ] }"#,
        )
        .unwrap();
        assert!(model.interfaces()[0].methods[0].return_type.is_void());
    }

    #[test]
    fn test_explicit_null_enclosing() {
        let model = DeclarationModel::from_json(
            r#"{ "annotated": [ { "element": "a.b", "enclosing": null }, { "element": "a.c", "enclosing": "a.C" } ] }"#,
        )
        .unwrap();
        let annotated = model.annotated_declarations();
        assert_eq!(annotated[0].enclosing, None);
        assert_eq!(annotated[1].enclosing.as_deref(), Some("a.C"));
    }

    #[test]
    fn test_type_variables_are_scoped() {
        let model = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.Repo", "type_params": ["T extends java.lang.Number"],
                 "methods": [ { "name": "map", "type_params": ["R"],
                                "params": [{ "name": "id", "type": "T" }], "returns": "java.util.List<R>" } ] } ] }"#,
        )
        .unwrap();
        let repo = &model.interfaces()[0];
        assert_eq!(repo.type_params[0].bounds, vec![TypeRef::named("java.lang.Number")]);
        let map = &repo.methods[0];
        assert_eq!(map.params[0].ty, TypeRef::Var("T".into()));
        assert_eq!(map.return_type.to_string(), "java.util.List<R>");
        assert!(matches!(&map.return_type, TypeRef::Named { args, .. } if args[0] == TypeRef::Var("R".into())));
    }

    #[test]
    fn test_unknown_supertype_is_rejected() {
        let err = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.A", "extends": ["a.Missing"] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Model(ModelError::UnknownInterface(name)) if name == "a.Missing"));
    }

    #[test]
    fn test_supertype_arity_is_checked() {
        let err = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.Base", "type_params": ["T"] },
                                 { "name": "a.A", "extends": ["a.Base<java.lang.String,java.lang.Long>"] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Model(ModelError::TypeResolution(_))));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let err = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.A", "extends": ["a.B"] }, { "name": "a.B", "extends": ["a.A"] } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cyclic inheritance"));
    }

    #[test]
    fn test_duplicate_interfaces_are_malformed() {
        let err = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.A" }, { "name": "a.A" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Model(ModelError::Malformed(_))));
    }

    #[test]
    fn test_bad_type_expression() {
        let err = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.A", "methods": [ { "name": "m", "returns": "java.util.List<" } ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Model(ModelError::Parse(_))));
    }

    #[test]
    fn test_void_parameter_is_rejected() {
        let err = DeclarationModel::from_json(
            r#"{ "interfaces": [ { "name": "a.A", "methods": [ { "name": "m", "params": [{ "name": "x", "type": "void" }] } ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Model(ModelError::TypeResolution(_))));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = DeclarationModel::from_json(r#"{ "interfacez": [] }"#).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = DeclarationModel::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
