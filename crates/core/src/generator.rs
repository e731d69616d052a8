//! Generation driver.
//!
//! One round: group the annotated declarations, then for every group derive
//! the artifact names, resolve the operations, render the wrapper and write
//! it to the sink. The first error aborts the round.

use restygen_common::{DeclarationSource, TypeModel};
use tracing::{debug, info};

use crate::error::Result;
use crate::group::{group_declarations, DeclarationGroup};
use crate::naming::ArtifactNames;
use crate::render::{render_artifact, write_artifact, GeneratedArtifact};
use crate::resolve::{self, ServiceDeclaration};
use crate::sink::ArtifactSink;

/// A service ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    /// Names derived from the subject.
    pub names: ArtifactNames,
    /// The subject and its operations.
    pub service: ServiceDeclaration,
}

/// One artifact written during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    /// Fully-qualified name of the annotated interface.
    pub subject: String,
    /// Fully-qualified name of the generated wrapper.
    pub artifact: String,
    /// Number of stubs in the wrapper.
    pub operations: usize,
}

/// Outcome of a successful round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// Written artifacts in processing order.
    pub artifacts: Vec<ArtifactSummary>,
}

impl RoundReport {
    /// Total number of stubs across all artifacts.
    pub fn operation_count(&self) -> usize {
        self.artifacts.iter().map(|a| a.operations).sum()
    }
}

/// Drives generation against one type model.
#[derive(Debug)]
pub struct Generator<'m, M: TypeModel + ?Sized> {
    model: &'m M,
}

impl<'m, M: TypeModel + ?Sized> Generator<'m, M> {
    /// Generator resolving against `model`.
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    /// Derive names and resolve operations for one group.
    pub fn resolve_service(&self, group: &DeclarationGroup) -> Result<ResolvedService> {
        let names = ArtifactNames::derive(&group.interface)?;
        let service = resolve::resolve_service(self.model, group)?;
        Ok(ResolvedService { names, service })
    }

    /// Render a resolved service without writing it.
    pub fn render_service(&self, resolved: &ResolvedService) -> GeneratedArtifact {
        render_artifact(&resolved.service, &resolved.names)
    }

    /// Group the round's declarations and resolve every group, in order.
    pub fn resolve_round<D: DeclarationSource + ?Sized>(
        &self,
        source: &D,
    ) -> Result<Vec<ResolvedService>> {
        let declarations = source.annotated_declarations();
        let groups = group_declarations(&declarations)?;
        debug!(
            declarations = declarations.len(),
            groups = groups.len(),
            "Grouped annotated declarations."
        );
        groups.iter().map(|g| self.resolve_service(g)).collect()
    }

    /// Run one processing round, writing one artifact per group.
    pub fn run_round<D, S>(&self, source: &D, sink: &mut S) -> Result<RoundReport>
    where
        D: DeclarationSource + ?Sized,
        S: ArtifactSink + ?Sized,
    {
        let declarations = source.annotated_declarations();
        if declarations.is_empty() {
            info!("No annotated declarations; nothing to generate.");
            return Ok(RoundReport::default());
        }

        let groups = group_declarations(&declarations)?;
        debug!(
            declarations = declarations.len(),
            groups = groups.len(),
            "Grouped annotated declarations."
        );

        let mut report = RoundReport::default();
        for group in &groups {
            let resolved = self.resolve_service(group)?;
            let artifact = self.render_service(&resolved);
            write_artifact(sink, &artifact)?;

            let operations = resolved.service.operations.len();
            info!(
                subject = %resolved.names.subject,
                artifact = %artifact.qualified_name,
                operations,
                "Generated wrapper."
            );
            report.artifacts.push(ArtifactSummary {
                subject: resolved.names.subject,
                artifact: artifact.qualified_name,
                operations,
            });
        }

        Ok(report)
    }
}
