//! Shared declaration model for restygen.
//!
//! This crate holds the host side of code generation: type descriptors, the
//! JSON declaration model and the query traits the generator consumes. It is
//! used by both `restygen-core` and the `restygen` CLI.

mod hierarchy;
pub mod host;
pub mod model;
pub mod types;

// Re-export commonly used types
pub use host::{DeclarationSource, Member, MethodRef, ResolvedSignature, TypeModel};
pub use model::{
    AnnotatedDeclaration, DeclarationModel, InterfaceDecl, LoadError, MethodDecl, ModelError, Param,
};
pub use types::{OBJECT, TypeParam, TypeParseError, TypeRef, WildcardBound};
