//! Member resolution.
//!
//! Computes the operations a service interface exposes: every method
//! reachable through its hierarchy, viewed as a member of the subject so that
//! inherited generic signatures come out concrete, minus the methods of the
//! universal root type.

use std::collections::{HashMap, HashSet};
use std::fmt;

use restygen_common::types::bound_map;
use restygen_common::{InterfaceDecl, Member, Param, TypeModel, TypeParam, TypeRef};
use tracing::{debug, trace};

use crate::error::{GenerateError, Result};
use crate::group::DeclarationGroup;

/// One remote method to wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Method name.
    pub name: String,
    /// Method-level type parameters.
    pub type_params: Vec<TypeParam>,
    /// Parameters with resolved types, in declaration order.
    pub params: Vec<Param>,
    /// Resolved return type; `void` for no value.
    pub return_type: TypeRef,
    /// Interface that declares the method.
    pub declared_in: String,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(ToString::to_string).collect();
            write!(f, "<{}> ", params.join(", "))?;
        }
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", param.ty, param.name)?;
        }
        f.write_str(")")
    }
}

/// An annotated interface with its resolved operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDeclaration {
    /// Fully-qualified interface name.
    pub qualified_name: String,
    /// The annotation's `url` option as configured.
    pub base_url: Option<String>,
    /// Declared type the operations were resolved against.
    pub view: TypeRef,
    /// Resolved operations in discovery order.
    pub operations: Vec<Operation>,
}

impl ServiceDeclaration {
    /// The base URL, if configured and not blank.
    pub fn configured_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .filter(|url| !url.chars().all(is_java_whitespace))
    }
}

/// Java's `Character.isWhitespace`: Unicode separators other than the
/// no-break spaces, plus the ASCII control separators.
fn is_java_whitespace(c: char) -> bool {
    match c {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        _ => c.is_whitespace(),
    }
}

/// Declared type a service interface is resolved against. A generic
/// interface is viewed with each type parameter bound to its erasure, so the
/// generated wrapper never mentions unbound type variables.
pub fn subject_view(decl: &InterfaceDecl) -> TypeRef {
    let bounds = bound_map(&decl.type_params);
    TypeRef::Named {
        name: decl.name.clone(),
        args: decl.type_params.iter().map(|p| p.erasure(&bounds)).collect(),
    }
}

/// Names of the root type's methods. Any method with one of these names is
/// never wrapped.
pub fn root_exclusions<M: TypeModel + ?Sized>(model: &M) -> HashSet<String> {
    model
        .root_type()
        .methods
        .iter()
        .map(|m| m.name.clone())
        .collect()
}

/// Resolve the operations exposed by `view`, in the model's member order.
pub fn resolve_operations<M: TypeModel + ?Sized>(model: &M, view: &TypeRef) -> Result<Vec<Operation>> {
    let excluded = root_exclusions(model);
    let mut operations = Vec::new();

    for member in model.all_members(view)? {
        let Member::Method(method) = member else {
            continue;
        };
        let Some(decl) = model.method(&method) else {
            return Err(GenerateError::TypeResolutionFailure(format!(
                "`{}` has no method at index {}",
                method.declaring, method.index
            )));
        };
        if excluded.contains(&decl.name) {
            trace!(method = %decl.name, declaring = %method.declaring, "Skipping root-type method.");
            continue;
        }

        let resolved = model.resolve_member(view, &method)?;
        operations.push(Operation {
            name: resolved.name,
            type_params: resolved.type_params,
            params: resolved.params,
            return_type: resolved.return_type,
            declared_in: resolved.declaring,
        });
    }

    check_overload_ambiguity(&operations)?;
    Ok(operations)
}

/// Two operations whose parameters erase to the same types cannot both be
/// wrapped.
fn check_overload_ambiguity(operations: &[Operation]) -> Result<()> {
    let mut seen: HashMap<(&str, Vec<TypeRef>), &Operation> = HashMap::new();
    for op in operations {
        let bounds = bound_map(&op.type_params);
        let erased = op.params.iter().map(|p| p.ty.erasure(&bounds)).collect();
        if let Some(previous) = seen.insert((op.name.as_str(), erased), op) {
            return Err(GenerateError::TypeResolutionFailure(format!(
                "ambiguous overloads `{previous}` ({}) and `{op}` ({}) have the same erasure",
                previous.declared_in, op.declared_in
            )));
        }
    }
    Ok(())
}

/// Build the service declaration for one group.
pub fn resolve_service<M: TypeModel + ?Sized>(
    model: &M,
    group: &DeclarationGroup,
) -> Result<ServiceDeclaration> {
    let decl = model.interface(&group.interface).ok_or_else(|| {
        GenerateError::TypeResolutionFailure(format!("unknown interface `{}`", group.interface))
    })?;
    let view = subject_view(decl);
    let operations = resolve_operations(model, &view)?;

    debug!(
        interface = %group.interface,
        view = %view,
        operations = operations.len(),
        "Resolved service operations."
    );

    Ok(ServiceDeclaration {
        qualified_name: group.interface.clone(),
        base_url: group.url().map(ToString::to_string),
        view,
        operations,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use restygen_common::{AnnotatedDeclaration, DeclarationModel};

    const MODEL: &str = r#"{
      "interfaces": [
        { "name": "com.example.Repo", "type_params": ["T"],
          "methods": [
            { "name": "fetch", "params": [{ "name": "id", "type": "T" }], "returns": "T" },
            { "name": "hashCode", "returns": "int" }
          ] },
        { "name": "com.example.Accounts", "extends": ["com.example.Repo<java.lang.Long>"],
          "fields": ["LIMIT"],
          "methods": [
            { "name": "open", "params": [{ "name": "owner", "type": "java.lang.String" }], "returns": "java.lang.Long" },
            { "name": "open", "params": [{ "name": "owner", "type": "java.lang.String" }, { "name": "limit", "type": "int" }], "returns": "java.lang.Long" },
            { "name": "ping" },
            { "name": "equals", "params": [{ "name": "other", "type": "java.lang.Object" }], "returns": "boolean" },
            { "name": "toString", "params": [{ "name": "verbose", "type": "boolean" }], "returns": "java.lang.String" }
          ] },
        { "name": "com.example.Bounded", "type_params": ["N extends java.lang.Number"],
          "methods": [ { "name": "sum", "params": [{ "name": "values", "type": "java.util.List<N>" }], "returns": "N" } ] },
        { "name": "com.example.Clash",
          "methods": [
            { "name": "put", "params": [{ "name": "v", "type": "java.util.List<java.lang.String>" }] },
            { "name": "put", "params": [{ "name": "v", "type": "java.util.List<java.lang.Integer>" }] }
          ] }
      ]
    }"#;

    fn model() -> DeclarationModel {
        DeclarationModel::from_json(MODEL).unwrap()
    }

    fn ops(model: &DeclarationModel, name: &str) -> Vec<Operation> {
        let view = subject_view(model.interface(name).unwrap());
        resolve_operations(model, &view).unwrap()
    }

    #[test]
    fn test_inherited_generic_operation_is_concrete() {
        let model = model();
        let ops = ops(&model, "com.example.Accounts");
        let fetch = ops.iter().find(|o| o.name == "fetch").unwrap();
        assert_eq!(fetch.to_string(), "java.lang.Long fetch(java.lang.Long id)");
        assert_eq!(fetch.declared_in, "com.example.Repo");
    }

    #[test]
    fn test_root_type_methods_are_excluded_even_when_redeclared() {
        let model = model();
        let names: Vec<_> = ops(&model, "com.example.Accounts")
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["open", "open", "ping", "fetch"]);
    }

    #[test]
    fn test_overloads_are_distinct_operations() {
        let model = model();
        let ops = ops(&model, "com.example.Accounts");
        let opens: Vec<_> = ops.iter().filter(|o| o.name == "open").collect();
        assert_eq!(opens.len(), 2);
        assert_eq!(opens[1].params.len(), 2);
    }

    #[test]
    fn test_void_and_zero_parameter_operations_survive() {
        let model = model();
        let ops = ops(&model, "com.example.Accounts");
        let ping = ops.iter().find(|o| o.name == "ping").unwrap();
        assert!(ping.params.is_empty());
        assert!(ping.return_type.is_void());
    }

    #[test]
    fn test_generic_subject_is_viewed_through_its_erasure() {
        let model = model();
        let bounded = model.interface("com.example.Bounded").unwrap();
        assert_eq!(
            subject_view(bounded).to_string(),
            "com.example.Bounded<java.lang.Number>"
        );
        let ops = ops(&model, "com.example.Bounded");
        assert_eq!(
            ops[0].to_string(),
            "java.lang.Number sum(java.util.List<java.lang.Number> values)"
        );
    }

    #[test]
    fn test_same_erasure_overloads_are_ambiguous() {
        let model = model();
        let view = subject_view(model.interface("com.example.Clash").unwrap());
        let err = resolve_operations(&model, &view).unwrap_err();
        assert!(matches!(err, GenerateError::TypeResolutionFailure(msg) if msg.contains("ambiguous")));
    }

    #[test]
    fn test_resolve_service_uses_group_url() {
        let model = model();
        let group = DeclarationGroup {
            interface: "com.example.Accounts".into(),
            declarations: vec![AnnotatedDeclaration {
                element: "com.example.Accounts".into(),
                enclosing: Some("com.example.Accounts".into()),
                url: Some("   ".into()),
            }],
        };
        let service = resolve_service(&model, &group).unwrap();
        assert_eq!(service.base_url.as_deref(), Some("   "));
        assert_eq!(service.configured_url(), None);
        assert_eq!(service.operations.len(), 4);
    }

    #[test]
    fn test_configured_url_blankness() {
        let service = |url: &str| ServiceDeclaration {
            qualified_name: "a.B".into(),
            base_url: Some(url.into()),
            view: TypeRef::named("a.B"),
            operations: Vec::new(),
        };
        assert_eq!(service("").configured_url(), None);
        assert_eq!(service(" \t\r\n\u{1F}\u{2003}").configured_url(), None);
        assert_eq!(service("\u{A0}\u{A0}").configured_url(), Some("\u{A0}\u{A0}"));
        assert_eq!(service("\u{202F}").configured_url(), Some("\u{202F}"));
        assert_eq!(service(" https://h ").configured_url(), Some(" https://h "));
    }

    #[test]
    fn test_resolve_service_unknown_interface() {
        let model = model();
        let group = DeclarationGroup {
            interface: "com.example.Missing".into(),
            declarations: Vec::new(),
        };
        assert!(matches!(
            resolve_service(&model, &group),
            Err(GenerateError::TypeResolutionFailure(_))
        ));
    }

    #[test]
    fn test_operation_display_with_type_params() {
        let op = Operation {
            name: "convert".into(),
            type_params: vec![TypeParam::new("X")],
            params: vec![Param {
                name: "value".into(),
                ty: TypeRef::Var("X".into()),
            }],
            return_type: TypeRef::Var("X".into()),
            declared_in: "a.B".into(),
        };
        assert_eq!(op.to_string(), "<X> X convert(X value)");
    }
}
