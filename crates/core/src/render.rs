//! Artifact rendering and writing.

use std::io::Write;

use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::java::{codegen_artifact, Emit, JavaFile};
use crate::naming::ArtifactNames;
use crate::resolve::ServiceDeclaration;
use crate::sink::ArtifactSink;

/// Rendered source of one wrapper artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Fully-qualified name the artifact is written under.
    pub qualified_name: String,
    /// Java source text.
    pub source: String,
}

/// Render the wrapper source for `service`.
pub fn render_artifact(service: &ServiceDeclaration, names: &ArtifactNames) -> GeneratedArtifact {
    let file: JavaFile = codegen_artifact(service, names);
    GeneratedArtifact {
        qualified_name: names.artifact_qualified.clone(),
        source: file.emit(),
    }
}

/// Create the artifact in `sink` and write its full source.
pub fn write_artifact<S: ArtifactSink + ?Sized>(sink: &mut S, artifact: &GeneratedArtifact) -> Result<()> {
    let name = &artifact.qualified_name;
    let mut writer = sink.create(name)?;
    writer
        .write_all(artifact.source.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| GenerateError::write_failure(name, e))?;
    debug!(artifact = %name, bytes = artifact.source.len(), "Wrote artifact.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::resolve::Operation;
    use crate::sink::MemorySink;
    use restygen_common::{Param, TypeRef};

    const GREETER: &str = r#"package com.example;

import com.google.gwt.core.client.GWT;
import com.example.Greeter;

import com.newsrx.restygwt.util.CallbackPromise;
import elemental2.promise.Promise;

import org.fusesource.restygwt.client.DirectRestService;
import org.fusesource.restygwt.client.Dispatcher;
import org.fusesource.restygwt.client.REST;
import org.fusesource.restygwt.client.Resource;
import org.fusesource.restygwt.client.RestServiceProxy;

interface Greeter_DirectRestService extends com.example.Greeter, DirectRestService {

    Greeter_DirectRestService rest = GWT.create(Greeter_DirectRestService.class);

    default void setBaseUrl(String baseUrl) {
        final Resource resource = new Resource(baseUrl);
        setResource(resource);
    }

    default void setResource(Resource resource) {
        final RestServiceProxy restServiceProxy = (RestServiceProxy) Greeter_DirectRestService.rest;
        restServiceProxy.setResource(resource);
    }

    default void setDispatcher(Dispatcher dispatcher) {
        final RestServiceProxy restServiceProxy = (RestServiceProxy) Greeter_DirectRestService.rest;
        restServiceProxy.setDispatcher(dispatcher);
    }
}

public class Greeter_REST {

    public static final Greeter_REST INSTANCE = new Greeter_REST();

    private Greeter_REST() {
    }

    public Promise<java.lang.String> greet(java.lang.String name) {
        CallbackPromise<java.lang.String> callback = new CallbackPromise<>();
        REST<java.lang.String> withCallback = REST.withCallback(callback);
        Greeter_DirectRestService rest = withCallback.call(Greeter_DirectRestService.rest);
        java.lang.String ignored = rest.greet(name);
        return callback.getPromise();
    }

}
"#;

    fn greeter(url: Option<&str>) -> ServiceDeclaration {
        ServiceDeclaration {
            qualified_name: "com.example.Greeter".into(),
            base_url: url.map(Into::into),
            view: TypeRef::named("com.example.Greeter"),
            operations: vec![Operation {
                name: "greet".into(),
                type_params: Vec::new(),
                params: vec![Param {
                    name: "name".into(),
                    ty: TypeRef::named("java.lang.String"),
                }],
                return_type: TypeRef::named("java.lang.String"),
                declared_in: "com.example.Greeter".into(),
            }],
        }
    }

    #[test]
    fn test_render_greeter_exactly() {
        let names = ArtifactNames::derive("com.example.Greeter").unwrap();
        let artifact = render_artifact(&greeter(None), &names);
        assert_eq!(artifact.qualified_name, "com.example.Greeter_REST");
        assert_eq!(artifact.source, GREETER);
    }

    #[test]
    fn test_render_with_url_escapes_literal() {
        let names = ArtifactNames::derive("com.example.Greeter").unwrap();
        let artifact = render_artifact(&greeter(Some("https://h/\"q\"")), &names);
        assert!(artifact.source.contains(
            "    private Greeter_REST() {\n        Greeter_DirectRestService.rest.setBaseUrl(\"https://h/\\\"q\\\"\");\n    }\n"
        ));
    }

    #[test]
    fn test_write_artifact_to_memory() {
        let names = ArtifactNames::derive("com.example.Greeter").unwrap();
        let artifact = render_artifact(&greeter(None), &names);
        let mut sink = MemorySink::new();
        write_artifact(&mut sink, &artifact).unwrap();
        assert_eq!(sink.get("com.example.Greeter_REST"), Some(GREETER));
    }

    #[test]
    fn test_write_same_artifact_twice_fails() {
        let names = ArtifactNames::derive("com.example.Greeter").unwrap();
        let artifact = render_artifact(&greeter(None), &names);
        let mut sink = MemorySink::new();
        write_artifact(&mut sink, &artifact).unwrap();
        let err = write_artifact(&mut sink, &artifact).unwrap_err();
        assert!(matches!(err, GenerateError::ArtifactWriteFailure { artifact, .. } if artifact == "com.example.Greeter_REST"));
    }
}
