//! Wrapper AST construction.
//!
//! Builds the compilation unit for one service: the direct-call companion
//! interface followed by the promise-returning wrapper class.

use super::types::{
    ClassDef, ConstructorDef, Expr, FieldDef, InterfaceDef, JavaFile, MethodDef, Modifier,
    ParamDef, Stmt, TypeDecl,
};
use crate::naming::ArtifactNames;
use crate::normalize::{normalize_return, render_type};
use crate::resolve::{Operation, ServiceDeclaration};

const GWT: &str = "com.google.gwt.core.client.GWT";
const CALLBACK_PROMISE: &str = "com.newsrx.restygwt.util.CallbackPromise";
const PROMISE: &str = "elemental2.promise.Promise";
const RESTYGWT_CLIENT: [&str; 5] = [
    "org.fusesource.restygwt.client.DirectRestService",
    "org.fusesource.restygwt.client.Dispatcher",
    "org.fusesource.restygwt.client.REST",
    "org.fusesource.restygwt.client.Resource",
    "org.fusesource.restygwt.client.RestServiceProxy",
];

/// Singleton field on the companion interface.
const REST_FIELD: &str = "rest";
/// Singleton field on the wrapper class.
const INSTANCE_FIELD: &str = "INSTANCE";

/// Build the compilation unit for `service`.
pub fn codegen_artifact(service: &ServiceDeclaration, names: &ArtifactNames) -> JavaFile {
    JavaFile {
        package: names.package.clone(),
        imports: imports(names),
        types: vec![
            TypeDecl::Interface(companion(service, names)),
            TypeDecl::Class(wrapper(service, names)),
        ],
    }
}

fn imports(names: &ArtifactNames) -> Vec<Vec<String>> {
    let mut head = vec![GWT.to_string()];
    // A type in the default package cannot be imported.
    if names.package.is_some() {
        head.push(names.subject.clone());
    }
    vec![
        head,
        vec![CALLBACK_PROMISE.to_string(), PROMISE.to_string()],
        RESTYGWT_CLIENT.iter().map(ToString::to_string).collect(),
    ]
}

/// `<Companion>.rest`
fn rest_singleton(names: &ArtifactNames) -> Expr {
    Expr::ident(&names.companion_simple).field(REST_FIELD)
}

// =============================================================================
// Companion interface
// =============================================================================

fn companion(service: &ServiceDeclaration, names: &ArtifactNames) -> InterfaceDef {
    let proxy = || {
        Stmt::final_local(
            "RestServiceProxy",
            "restServiceProxy",
            Expr::Cast {
                ty: "RestServiceProxy".into(),
                expr: Box::new(rest_singleton(names)),
            },
        )
    };
    let delegate = |method: &str, param: &str| {
        Stmt::Expr(Expr::ident("restServiceProxy").method(method, vec![Expr::ident(param)]))
    };

    InterfaceDef {
        modifiers: Vec::new(),
        name: names.companion_simple.clone(),
        extends: vec![render_type(&service.view), "DirectRestService".into()],
        fields: vec![FieldDef {
            modifiers: Vec::new(),
            ty: names.companion_simple.clone(),
            name: REST_FIELD.into(),
            init: Expr::ident("GWT").method(
                "create",
                vec![Expr::ClassLit(names.companion_simple.clone())],
            ),
        }],
        methods: vec![
            default_method(
                "setBaseUrl",
                "String",
                "baseUrl",
                vec![
                    Stmt::final_local(
                        "Resource",
                        "resource",
                        Expr::New {
                            ty: "Resource".into(),
                            args: vec![Expr::ident("baseUrl")],
                        },
                    ),
                    Stmt::Expr(Expr::call("setResource", vec![Expr::ident("resource")])),
                ],
            ),
            default_method(
                "setResource",
                "Resource",
                "resource",
                vec![proxy(), delegate("setResource", "resource")],
            ),
            default_method(
                "setDispatcher",
                "Dispatcher",
                "dispatcher",
                vec![proxy(), delegate("setDispatcher", "dispatcher")],
            ),
        ],
    }
}

fn default_method(name: &str, param_ty: &str, param: &str, body: Vec<Stmt>) -> MethodDef {
    MethodDef {
        modifiers: vec![Modifier::Default],
        type_params: Vec::new(),
        return_type: "void".into(),
        name: name.into(),
        params: vec![ParamDef {
            ty: param_ty.into(),
            name: param.into(),
        }],
        body,
    }
}

// =============================================================================
// Wrapper class
// =============================================================================

fn wrapper(service: &ServiceDeclaration, names: &ArtifactNames) -> ClassDef {
    let class = &names.artifact_simple;

    let mut ctor_body = Vec::new();
    if let Some(url) = service.configured_url() {
        ctor_body.push(Stmt::Expr(
            rest_singleton(names).method("setBaseUrl", vec![Expr::Str(url.to_string())]),
        ));
    }

    ClassDef {
        modifiers: vec![Modifier::Public],
        name: class.clone(),
        fields: vec![FieldDef {
            modifiers: vec![Modifier::Public, Modifier::Static, Modifier::Final],
            ty: class.clone(),
            name: INSTANCE_FIELD.into(),
            init: Expr::New {
                ty: class.clone(),
                args: Vec::new(),
            },
        }],
        constructors: vec![ConstructorDef {
            modifiers: vec![Modifier::Private],
            name: class.clone(),
            body: ctor_body,
        }],
        methods: service
            .operations
            .iter()
            .map(|op| stub(op, names))
            .collect(),
    }
}

/// Promise-returning stub for one operation.
fn stub(op: &Operation, names: &ArtifactNames) -> MethodDef {
    let ret = normalize_return(&op.return_type);
    let companion = &names.companion_simple;

    let direct_call = Expr::ident("rest").method(
        &op.name,
        op.params.iter().map(|p| Expr::ident(&p.name)).collect(),
    );
    // A void call has no value to bind.
    let direct_call = if op.return_type.is_void() {
        Stmt::Expr(direct_call)
    } else {
        Stmt::local(ret.clone(), "ignored", direct_call)
    };

    MethodDef {
        modifiers: vec![Modifier::Public],
        type_params: op.type_params.iter().map(ToString::to_string).collect(),
        return_type: format!("Promise<{ret}>"),
        name: op.name.clone(),
        params: op
            .params
            .iter()
            .map(|p| ParamDef {
                ty: render_type(&p.ty),
                name: p.name.clone(),
            })
            .collect(),
        body: vec![
            Stmt::local(
                format!("CallbackPromise<{ret}>"),
                "callback",
                Expr::New {
                    ty: "CallbackPromise<>".into(),
                    args: Vec::new(),
                },
            ),
            Stmt::local(
                format!("REST<{ret}>"),
                "withCallback",
                Expr::ident("REST").method("withCallback", vec![Expr::ident("callback")]),
            ),
            Stmt::local(
                companion.clone(),
                "rest",
                Expr::ident("withCallback").method("call", vec![rest_singleton(names)]),
            ),
            direct_call,
            Stmt::Return(Expr::ident("callback").method("getPromise", Vec::new())),
        ],
    }
}
