//! Java source AST for the generated wrappers.
//!
//! Only the constructs the wrapper template needs are modelled:
//! - JavaFile: package clause, import groups and top-level types
//! - TypeDecl: package-private interfaces and classes
//! - Members: fields, constructors and methods
//! - Stmt / Expr: local declarations, calls, returns

/// A compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaFile {
    /// `package` clause; `None` for the default package.
    pub package: Option<String>,
    /// Import groups, separated by a blank line when emitted.
    pub imports: Vec<Vec<String>>,
    /// Top-level types, in order.
    pub types: Vec<TypeDecl>,
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl {
    /// `interface Name extends A, B { ... }`
    Interface(InterfaceDef),
    /// `public class Name { ... }`
    Class(ClassDef),
}

/// Interface declaration. Members are preceded by a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub extends: Vec<String>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

/// Class declaration. Members are followed by a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub constructors: Vec<ConstructorDef>,
    pub methods: Vec<MethodDef>,
}

/// Field with an initializer: `public static final T NAME = init;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub modifiers: Vec<Modifier>,
    pub ty: String,
    pub name: String,
    pub init: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDef {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub body: Vec<Stmt>,
}

/// Method with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub modifiers: Vec<Modifier>,
    /// Declared type parameters, already rendered (`T extends Foo`).
    pub type_params: Vec<String>,
    pub return_type: String,
    pub name: String,
    pub params: Vec<ParamDef>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Private,
    Static,
    Final,
    Default,
}

/// Statement inside a constructor or method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `[final] T name = init;`
    Local {
        is_final: bool,
        ty: String,
        name: String,
        init: Expr,
    },
    /// `expr;`
    Expr(Expr),
    /// `return expr;`
    Return(Expr),
}

/// Java expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Identifier: `callback`
    Ident(String),
    /// String literal, escaped on emission.
    Str(String),
    /// Method call, optionally qualified: `rest.op(a, b)`
    Call {
        target: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
    /// Field access: `Greeter_DirectRestService.rest`
    Field { object: Box<Expr>, name: String },
    /// Instance creation: `new CallbackPromise<>()`
    New { ty: String, args: Vec<Expr> },
    /// Cast: `(RestServiceProxy) expr`
    Cast { ty: String, expr: Box<Expr> },
    /// Class literal: `Greeter_DirectRestService.class`
    ClassLit(String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// Unqualified call: `setResource(resource)`
    pub fn call(method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: None,
            method: method.into(),
            args,
        }
    }

    /// Call on `self`: `rest.op(a, b)`
    pub fn method(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Some(Box::new(self)),
            method: method.into(),
            args,
        }
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Field {
            object: Box::new(self),
            name: name.into(),
        }
    }
}

impl Stmt {
    /// Non-final local declaration.
    pub fn local(ty: impl Into<String>, name: impl Into<String>, init: Expr) -> Self {
        Stmt::Local {
            is_final: false,
            ty: ty.into(),
            name: name.into(),
            init,
        }
    }

    pub fn final_local(ty: impl Into<String>, name: impl Into<String>, init: Expr) -> Self {
        Stmt::Local {
            is_final: true,
            ty: ty.into(),
            name: name.into(),
            init,
        }
    }
}
