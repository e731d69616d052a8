//! Java code emission via the Emit trait.
//!
//! Layout is fixed: four spaces per indentation level, a blank line between
//! import groups and between top-level types.

use super::types::{
    ClassDef, ConstructorDef, Expr, FieldDef, InterfaceDef, JavaFile, MethodDef, Modifier,
    ParamDef, Stmt, TypeDecl,
};
use super::utils::java_string_literal;

const INDENT: &str = "    ";

/// Trait for emitting Java source from AST nodes.
pub trait Emit {
    /// Convert the AST node to its Java source text.
    fn emit(&self) -> String;
}

fn join<T: Emit>(items: &[T], sep: &str) -> String {
    items.iter().map(Emit::emit).collect::<Vec<_>>().join(sep)
}

/// Modifiers followed by a space, or nothing.
fn modifier_prefix(modifiers: &[Modifier]) -> String {
    modifiers.iter().map(|m| format!("{} ", m.emit())).collect()
}

// =============================================================================
// Compilation unit
// =============================================================================

impl Emit for JavaFile {
    fn emit(&self) -> String {
        let mut output = String::new();

        if let Some(package) = &self.package {
            output.push_str(&format!("package {package};\n\n"));
        }

        for group in self.imports.iter().filter(|g| !g.is_empty()) {
            for import in group {
                output.push_str(&format!("import {import};\n"));
            }
            output.push('\n');
        }

        let types: Vec<String> = self.types.iter().map(Emit::emit).collect();
        output.push_str(&types.join("\n"));
        output
    }
}

impl Emit for TypeDecl {
    fn emit(&self) -> String {
        match self {
            TypeDecl::Interface(def) => def.emit(),
            TypeDecl::Class(def) => def.emit(),
        }
    }
}

impl Emit for InterfaceDef {
    fn emit(&self) -> String {
        let mut output = format!("{}interface {}", modifier_prefix(&self.modifiers), self.name);
        if !self.extends.is_empty() {
            output.push_str(&format!(" extends {}", self.extends.join(", ")));
        }
        output.push_str(" {\n");

        for field in &self.fields {
            output.push('\n');
            output.push_str(&field.emit_indented(1));
        }
        for method in &self.methods {
            output.push('\n');
            output.push_str(&method.emit_indented(1));
        }

        output.push_str("}\n");
        output
    }
}

impl Emit for ClassDef {
    fn emit(&self) -> String {
        let mut output = format!("{}class {} {{\n\n", modifier_prefix(&self.modifiers), self.name);

        for field in &self.fields {
            output.push_str(&field.emit_indented(1));
            output.push('\n');
        }
        for ctor in &self.constructors {
            output.push_str(&ctor.emit_indented(1));
            output.push('\n');
        }
        for method in &self.methods {
            output.push_str(&method.emit_indented(1));
            output.push('\n');
        }

        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Members
// =============================================================================

impl FieldDef {
    /// Emit at the given indentation level.
    pub fn emit_indented(&self, indent: usize) -> String {
        format!(
            "{}{}{} {} = {};\n",
            INDENT.repeat(indent),
            modifier_prefix(&self.modifiers),
            self.ty,
            self.name,
            self.init.emit()
        )
    }
}

impl ConstructorDef {
    /// Emit at the given indentation level.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        let mut output = format!("{prefix}{}{}() {{\n", modifier_prefix(&self.modifiers), self.name);
        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(indent + 1));
        }
        output.push_str(&format!("{prefix}}}\n"));
        output
    }
}

impl MethodDef {
    /// Emit at the given indentation level.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        let type_params = if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}> ", self.type_params.join(", "))
        };

        let mut output = format!(
            "{prefix}{}{type_params}{} {}({}) {{\n",
            modifier_prefix(&self.modifiers),
            self.return_type,
            self.name,
            join(&self.params, ", ")
        );
        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(indent + 1));
        }
        output.push_str(&format!("{prefix}}}\n"));
        output
    }
}

impl Emit for ParamDef {
    fn emit(&self) -> String {
        format!("{} {}", self.ty, self.name)
    }
}

impl Emit for Modifier {
    fn emit(&self) -> String {
        match self {
            Modifier::Public => "public".to_string(),
            Modifier::Private => "private".to_string(),
            Modifier::Static => "static".to_string(),
            Modifier::Final => "final".to_string(),
            Modifier::Default => "default".to_string(),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for Stmt {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl Stmt {
    /// Emit with specified indentation level (4 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = INDENT.repeat(indent);
        match self {
            Stmt::Local {
                is_final,
                ty,
                name,
                init,
            } => {
                let fin = if *is_final { "final " } else { "" };
                format!("{prefix}{fin}{ty} {name} = {};\n", init.emit())
            }
            Stmt::Expr(expr) => format!("{prefix}{};\n", expr.emit()),
            Stmt::Return(expr) => format!("{prefix}return {};\n", expr.emit()),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for Expr {
    fn emit(&self) -> String {
        match self {
            Expr::Ident(name) => name.clone(),
            Expr::Str(value) => java_string_literal(value),
            Expr::Call {
                target,
                method,
                args,
            } => {
                let args = join(args, ", ");
                match target {
                    Some(target) => format!("{}.{method}({args})", target.emit()),
                    None => format!("{method}({args})"),
                }
            }
            Expr::Field { object, name } => format!("{}.{name}", object.emit()),
            Expr::New { ty, args } => format!("new {ty}({})", join(args, ", ")),
            Expr::Cast { ty, expr } => format!("({ty}) {}", expr.emit()),
            Expr::ClassLit(ty) => format!("{ty}.class"),
        }
    }
}
