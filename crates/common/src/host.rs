//! Host-facing query surface consumed by the generator.
//!
//! The generator never discovers declarations or inspects types itself; it
//! asks a [`DeclarationSource`] for the annotated declarations of a round and a
//! [`TypeModel`] for inheritance-resolved members. [`crate::DeclarationModel`]
//! implements both on top of a JSON file.

use crate::model::{AnnotatedDeclaration, InterfaceDecl, MethodDecl, ModelError, Param};
use crate::types::{TypeParam, TypeRef};

/// Supplies the declarations tagged for generation in one processing round.
pub trait DeclarationSource {
    /// Annotated declarations in discovery order.
    fn annotated_declarations(&self) -> Vec<AnnotatedDeclaration>;
}

/// Reference to a method declared on some interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// Interface that declares the method.
    pub declaring: String,
    /// Position of the method in the declaring interface's method list.
    pub index: usize,
}

/// A member reachable from an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// An abstract or default method.
    Method(MethodRef),
    /// A constant field.
    Field {
        /// Interface that declares the field.
        declaring: String,
        /// Field name.
        name: String,
    },
}

/// A method signature viewed as a member of a concrete declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSignature {
    /// Method name.
    pub name: String,
    /// Method-level type parameters, bounds resolved.
    pub type_params: Vec<TypeParam>,
    /// Parameters with resolved types, in declaration order.
    pub params: Vec<Param>,
    /// Resolved return type.
    pub return_type: TypeRef,
    /// Interface that declares the method.
    pub declaring: String,
}

/// Type-model queries the member resolver needs.
pub trait TypeModel {
    /// Look up an interface by fully-qualified name.
    fn interface(&self, name: &str) -> Option<&InterfaceDecl>;

    /// The universal root type every interface implicitly extends.
    fn root_type(&self) -> &InterfaceDecl;

    /// All members reachable from `view`, inherited members included and
    /// overridden ones dropped. `view` must be a declared type.
    fn all_members(&self, view: &TypeRef) -> Result<Vec<Member>, ModelError>;

    /// Signature of `method` as a member of `view`, with the type arguments
    /// bound along the inheritance path substituted.
    fn resolve_member(
        &self,
        view: &TypeRef,
        method: &MethodRef,
    ) -> Result<ResolvedSignature, ModelError>;

    /// Declaration behind a method reference.
    fn method(&self, method: &MethodRef) -> Option<&MethodDecl> {
        let owner = if method.declaring == self.root_type().name {
            self.root_type()
        } else {
            self.interface(&method.declaring)?
        };
        owner.methods.get(method.index)
    }
}
