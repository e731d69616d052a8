//! Generator for promise-returning RestyGWT service wrappers.
//!
//! For every interface annotated for generation, a round emits one Java
//! source artifact `<Interface>_REST` containing a direct-call companion
//! interface and a singleton class that exposes each remote operation as a
//! `Promise`-returning method.
//!
//! The pipeline for one round:
//! 1. [`group_declarations`]: partition annotated declarations by enclosing
//!    interface.
//! 2. [`ArtifactNames::derive`]: derive wrapper and companion names.
//! 3. [`resolve_operations`]: collect the interface's operations, inherited
//!    ones included, viewed as members of the interface.
//! 4. [`render_artifact`]: build the Java AST and emit source text.
//! 5. [`ArtifactSink`]: persist the artifact.
//!
//! [`Generator`] drives the whole round.

pub mod error;
pub mod generator;
pub mod group;
mod java;
pub mod naming;
pub mod normalize;
pub mod render;
pub mod resolve;
pub mod sink;

pub use error::{GenerateError, Result};
pub use generator::{ArtifactSummary, Generator, ResolvedService, RoundReport};
pub use group::{group_declarations, DeclarationGroup};
pub use naming::{ArtifactNames, ARTIFACT_SUFFIX, COMPANION_SUFFIX};
pub use normalize::{normalize_return, render_type, VOID_PLACEHOLDER};
pub use render::{render_artifact, write_artifact, GeneratedArtifact};
pub use resolve::{resolve_operations, Operation, ServiceDeclaration};
pub use sink::{artifact_path, ArtifactSink, FsSink, MemorySink};
