//! Java source generation for wrapper artifacts.
//!
//! Two layers:
//! 1. Codegen: ServiceDeclaration + ArtifactNames -> JavaFile (Java AST)
//! 2. Emission: JavaFile -> source text via the `Emit` trait
//!
//! ## Module Structure
//!
//! - `types`: Java AST (JavaFile, TypeDecl, members, Stmt, Expr)
//! - `codegen`: wrapper template expressed as AST
//! - `emit`: AST to source text
//! - `utils`: literal escaping

mod codegen;
mod emit;
mod types;
pub mod utils;

pub use codegen::codegen_artifact;
pub use emit::Emit;
pub use types::JavaFile;
