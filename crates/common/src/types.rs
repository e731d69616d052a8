//! Host type descriptors.
//!
//! `TypeRef` mirrors the pieces of a Java type mirror the generator needs:
//! declared types with generic arguments, type variables, arrays, wildcards
//! and `void`. Its `Display` output follows the javac rendering
//! (`java.util.Map<java.lang.String,java.lang.Integer>`), which is the text
//! the generated wrappers carry verbatim.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Fully-qualified name of the universal root type.
pub const OBJECT: &str = "java.lang.Object";

/// Erasure chains deeper than this are treated as cyclic bounds.
const MAX_ERASURE_DEPTH: usize = 16;

/// A resolved type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// The "no value" type.
    Void,
    /// Primitive or declared type, with its generic arguments.
    Named {
        /// Fully-qualified name, or the primitive keyword.
        name: String,
        /// Generic arguments; empty for raw and non-generic types.
        args: Vec<TypeRef>,
    },
    /// A type variable.
    Var(String),
    /// Array of the element type.
    Array(Box<TypeRef>),
    /// `?`, `? extends T` or `? super T`. Only valid as a generic argument.
    Wildcard(Option<WildcardBound>),
}

/// Bound of a wildcard type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    /// `? extends T`
    Extends(Box<TypeRef>),
    /// `? super T`
    Super(Box<TypeRef>),
}

/// A declared type parameter, e.g. `T extends java.lang.Number`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    /// Parameter name.
    pub name: String,
    /// Declared bounds, in order.
    pub bounds: Vec<TypeRef>,
}

/// Error produced while parsing a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type expression `{input}` at offset {offset}: {message}")]
pub struct TypeParseError {
    /// The expression being parsed.
    pub input: String,
    /// Character offset of the failure.
    pub offset: usize,
    /// What was expected.
    pub message: String,
}

impl TypeRef {
    /// Declared type without generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// `java.lang.Object`
    pub fn object() -> Self {
        Self::named(OBJECT)
    }

    /// True for `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// Replace type variables with their bindings. Unbound variables are kept.
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        match self {
            TypeRef::Void => TypeRef::Void,
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeRef::Var(var) => bindings
                .get(var)
                .cloned()
                .unwrap_or_else(|| TypeRef::Var(var.clone())),
            TypeRef::Array(elem) => TypeRef::Array(Box::new(elem.substitute(bindings))),
            TypeRef::Wildcard(bound) => TypeRef::Wildcard(bound.as_ref().map(|b| match b {
                WildcardBound::Extends(t) => WildcardBound::Extends(Box::new(t.substitute(bindings))),
                WildcardBound::Super(t) => WildcardBound::Super(Box::new(t.substitute(bindings))),
            })),
        }
    }

    /// Erased form of the type. `bounds` maps in-scope type variables to
    /// their first declared bound; unbounded variables erase to `Object`.
    pub fn erasure(&self, bounds: &HashMap<String, TypeRef>) -> TypeRef {
        self.erasure_at(bounds, 0)
    }

    fn erasure_at(&self, bounds: &HashMap<String, TypeRef>, depth: usize) -> TypeRef {
        match self {
            TypeRef::Void => TypeRef::Void,
            TypeRef::Named { name, .. } => TypeRef::named(name.clone()),
            TypeRef::Var(var) => match bounds.get(var) {
                Some(bound) if depth < MAX_ERASURE_DEPTH => bound.erasure_at(bounds, depth + 1),
                _ => TypeRef::object(),
            },
            TypeRef::Array(elem) => TypeRef::Array(Box::new(elem.erasure_at(bounds, depth))),
            TypeRef::Wildcard(Some(WildcardBound::Extends(t))) => t.erasure_at(bounds, depth),
            TypeRef::Wildcard(_) => TypeRef::object(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Var(var) => f.write_str(var),
            TypeRef::Array(elem) => write!(f, "{elem}[]"),
            TypeRef::Wildcard(None) => f.write_str("?"),
            TypeRef::Wildcard(Some(WildcardBound::Extends(t))) => write!(f, "? extends {t}"),
            TypeRef::Wildcard(Some(WildcardBound::Super(t))) => write!(f, "? super {t}"),
        }
    }
}

impl TypeParam {
    /// Unbounded type parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    /// Erasure of this parameter: its first bound's erasure, or `Object`.
    pub fn erasure(&self, bounds: &HashMap<String, TypeRef>) -> TypeRef {
        self.bounds
            .first()
            .map_or_else(TypeRef::object, |b| b.erasure(bounds))
    }

    /// Apply bindings to the bounds.
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeParam {
        TypeParam {
            name: self.name.clone(),
            bounds: self.bounds.iter().map(|b| b.substitute(bindings)).collect(),
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            let sep = if i == 0 { " extends " } else { " & " };
            write!(f, "{sep}{bound}")?;
        }
        Ok(())
    }
}

/// Map each parameter to its first bound, for use with [`TypeRef::erasure`].
pub fn bound_map<'a>(params: impl IntoIterator<Item = &'a TypeParam>) -> HashMap<String, TypeRef> {
    params
        .into_iter()
        .filter_map(|p| p.bounds.first().map(|b| (p.name.clone(), b.clone())))
        .collect()
}

/// Parse a type expression. Identifiers listed in `scope` become type
/// variables.
pub fn parse_type(input: &str, scope: &[&str]) -> Result<TypeRef, TypeParseError> {
    let mut parser = Parser::new(input, scope);
    let ty = parser.parse_type(false)?;
    parser.finish()?;
    Ok(ty)
}

/// Parse a type parameter declaration such as `T`, `T extends Foo` or
/// `T extends Foo & Bar`. `scope` lists every parameter declared alongside it
/// so that bounds like `T extends Comparable<T>` resolve.
pub fn parse_type_param(input: &str, scope: &[&str]) -> Result<TypeParam, TypeParseError> {
    let mut parser = Parser::new(input, scope);
    let name = parser.ident()?;
    if name.contains('.') {
        return Err(parser.error("type parameter names cannot be qualified"));
    }
    let mut bounds = Vec::new();
    if parser.eat_keyword("extends") {
        bounds.push(parser.parse_type(false)?);
        while parser.eat('&') {
            bounds.push(parser.parse_type(false)?);
        }
    }
    parser.finish()?;
    Ok(TypeParam { name, bounds })
}

/// Name part of a type parameter declaration (`T` in `T extends Foo`).
pub fn type_param_name(input: &str) -> &str {
    input
        .trim()
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or_default()
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
    scope: &'a [&'a str],
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, scope: &'a [&'a str]) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
            scope,
        }
    }

    fn error(&self, message: &str) -> TypeParseError {
        TypeParseError {
            input: self.input.to_string(),
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), TypeParseError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{c}`")))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let end = self.pos + keyword.chars().count();
        if end > self.chars.len() {
            return false;
        }
        let word: String = self.chars[self.pos..end].iter().collect();
        let boundary = self.chars.get(end).is_none_or(|c| !is_ident_char(*c));
        if word == keyword && boundary {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn finish(&mut self) -> Result<(), TypeParseError> {
        if self.peek().is_some() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(())
    }

    /// Dotted identifier: `java.util.List`.
    fn ident(&mut self) -> Result<String, TypeParseError> {
        self.skip_ws();
        let mut name = String::new();
        loop {
            let start = self.pos;
            while self.chars.get(self.pos).is_some_and(|c| is_ident_char(*c)) {
                self.pos += 1;
            }
            if start == self.pos {
                return Err(self.error("expected identifier"));
            }
            if self.chars[start].is_ascii_digit() {
                self.pos = start;
                return Err(self.error("identifiers cannot start with a digit"));
            }
            name.extend(&self.chars[start..self.pos]);
            if self.chars.get(self.pos) == Some(&'.') {
                self.pos += 1;
                name.push('.');
            } else {
                return Ok(name);
            }
        }
    }

    fn parse_type(&mut self, allow_wildcard: bool) -> Result<TypeRef, TypeParseError> {
        if self.peek() == Some('?') {
            if !allow_wildcard {
                return Err(self.error("wildcards are only allowed as type arguments"));
            }
            self.pos += 1;
            let bound = if self.eat_keyword("extends") {
                Some(WildcardBound::Extends(Box::new(self.parse_type(false)?)))
            } else if self.eat_keyword("super") {
                Some(WildcardBound::Super(Box::new(self.parse_type(false)?)))
            } else {
                None
            };
            return Ok(TypeRef::Wildcard(bound));
        }

        let name = self.ident()?;
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type(true)?);
                if self.eat(',') {
                    continue;
                }
                self.expect('>')?;
                break;
            }
        }

        let base = if name == "void" {
            if !args.is_empty() {
                return Err(self.error("`void` takes no type arguments"));
            }
            TypeRef::Void
        } else if self.scope.contains(&name.as_str()) {
            if !args.is_empty() {
                return Err(self.error("type variables take no type arguments"));
            }
            TypeRef::Var(name)
        } else {
            TypeRef::Named { name, args }
        };

        let mut ty = base;
        while self.eat('[') {
            self.expect(']')?;
            if ty.is_void() {
                return Err(self.error("`void` cannot be an array element"));
            }
            ty = TypeRef::Array(Box::new(ty));
        }
        Ok(ty)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse(input: &str) -> TypeRef {
        parse_type(input, &["T", "U"]).unwrap()
    }

    #[test]
    fn test_parse_and_display_declared() {
        let ty = parse("java.util.Map< java.lang.String , java.util.List<T> >");
        assert_eq!(ty.to_string(), "java.util.Map<java.lang.String,java.util.List<T>>");
        assert_eq!(parse("int[][]").to_string(), "int[][]");
        assert_eq!(parse("void"), TypeRef::Void);
    }

    #[test]
    fn test_scope_makes_type_variables() {
        assert_eq!(parse("T"), TypeRef::Var("T".into()));
        assert_eq!(parse("TT"), TypeRef::named("TT"));
        assert_eq!(parse("com.example.T"), TypeRef::named("com.example.T"));
    }

    #[test]
    fn test_wildcards() {
        let ty = parse("java.util.List<? extends java.lang.Number>");
        assert_eq!(ty.to_string(), "java.util.List<? extends java.lang.Number>");
        assert_eq!(parse("java.lang.Class<?>").to_string(), "java.lang.Class<?>");
        assert!(parse_type("?", &[]).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_type("", &[]).is_err());
        assert!(parse_type("java.util.List<", &[]).is_err());
        assert!(parse_type("java..List", &[]).is_err());
        assert!(parse_type("Foo Bar", &[]).is_err());
        assert!(parse_type("void[]", &[]).is_err());
        assert!(parse_type("T<String>", &["T"]).is_err());
        let err = parse_type("List<String", &[]).unwrap_err();
        assert_eq!(err.offset, 11);
    }

    #[test]
    fn test_substitute() {
        let ty = parse("java.util.Map<T,U[]>");
        let bindings = HashMap::from([
            ("T".to_string(), TypeRef::named("java.lang.Long")),
            ("U".to_string(), parse_type("java.util.List<java.lang.String>", &[]).unwrap()),
        ]);
        assert_eq!(
            ty.substitute(&bindings).to_string(),
            "java.util.Map<java.lang.Long,java.util.List<java.lang.String>[]>"
        );
    }

    #[test]
    fn test_erasure() {
        let bounds = HashMap::from([("T".to_string(), TypeRef::named("java.lang.Number"))]);
        assert_eq!(parse("java.util.List<T>").erasure(&bounds).to_string(), "java.util.List");
        assert_eq!(parse("T[]").erasure(&bounds).to_string(), "java.lang.Number[]");
        assert_eq!(parse("U").erasure(&bounds).to_string(), OBJECT);
    }

    #[test]
    fn test_cyclic_bounds_erase_to_object() {
        let bounds = HashMap::from([
            ("T".to_string(), TypeRef::Var("U".into())),
            ("U".to_string(), TypeRef::Var("T".into())),
        ]);
        assert_eq!(TypeRef::Var("T".into()).erasure(&bounds), TypeRef::object());
    }

    #[test]
    fn test_type_param() {
        let param = parse_type_param("T extends java.lang.Comparable<T> & java.io.Serializable", &["T"])
            .unwrap();
        assert_eq!(param.name, "T");
        assert_eq!(param.bounds.len(), 2);
        assert_eq!(
            param.to_string(),
            "T extends java.lang.Comparable<T> & java.io.Serializable"
        );
        assert_eq!(param.erasure(&bound_map([&param])).to_string(), "java.lang.Comparable");
        assert!(parse_type_param("a.B", &[]).is_err());
        assert_eq!(type_param_name("  K extends Foo"), "K");
    }
}
