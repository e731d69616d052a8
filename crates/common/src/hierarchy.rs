//! Inheritance-aware member queries over a [`DeclarationModel`].

use std::collections::{HashMap, HashSet};

use crate::host::{Member, MethodRef, ResolvedSignature, TypeModel};
use crate::model::{DeclarationModel, InterfaceDecl, MethodDecl, ModelError, Param};
use crate::types::{TypeParam, TypeRef, bound_map};

type Bindings = HashMap<String, TypeRef>;

/// An interface reached from a view, with the type arguments it was reached
/// with.
#[derive(Debug)]
struct Ancestor<'m> {
    decl: &'m InterfaceDecl,
    bindings: Bindings,
}

impl DeclarationModel {
    fn lookup(&self, name: &str) -> Result<&InterfaceDecl, ModelError> {
        self.interface(name)
            .ok_or_else(|| ModelError::UnknownInterface(name.to_string()))
    }

    /// The view itself followed by every super-interface, depth-first in
    /// declaration order, each visited once.
    fn ancestors(&self, view: &TypeRef) -> Result<Vec<Ancestor<'_>>, ModelError> {
        let TypeRef::Named { name, args } = view else {
            return Err(ModelError::TypeResolution(format!(
                "`{view}` is not a declared type"
            )));
        };
        let decl = self.lookup(name)?;
        let bindings = bind_arguments(decl, args)?;

        let mut out = Vec::new();
        let mut seen = HashMap::new();
        self.visit(decl, bindings, &mut out, &mut seen)?;
        Ok(out)
    }

    fn visit<'m>(
        &'m self,
        decl: &'m InterfaceDecl,
        bindings: Bindings,
        out: &mut Vec<Ancestor<'m>>,
        seen: &mut HashMap<&'m str, usize>,
    ) -> Result<(), ModelError> {
        if let Some(&i) = seen.get(decl.name.as_str()) {
            let earlier: &Ancestor<'m> = &out[i];
            if earlier.bindings != bindings {
                return Err(ModelError::TypeResolution(format!(
                    "`{}` is inherited with conflicting type arguments",
                    decl.name
                )));
            }
            return Ok(());
        }

        seen.insert(decl.name.as_str(), out.len());
        let supertypes: Vec<TypeRef> = decl
            .supertypes
            .iter()
            .map(|sup| sup.substitute(&bindings))
            .collect();
        out.push(Ancestor { decl, bindings });

        for sup in supertypes {
            let TypeRef::Named { name, args } = &sup else {
                continue;
            };
            let sup_decl = self.lookup(name)?;
            let sup_bindings = bind_arguments(sup_decl, args)?;
            self.visit(sup_decl, sup_bindings, out, seen)?;
        }
        Ok(())
    }
}

impl TypeModel for DeclarationModel {
    fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.index.get(name).map(|&i| &self.interfaces[i])
    }

    fn root_type(&self) -> &InterfaceDecl {
        &self.root
    }

    fn all_members(&self, view: &TypeRef) -> Result<Vec<Member>, ModelError> {
        let mut ancestors = self.ancestors(view)?;
        ancestors.push(Ancestor {
            decl: &self.root,
            bindings: Bindings::new(),
        });

        let mut members = Vec::new();
        let mut fields = HashSet::new();
        let mut signatures: Vec<Signature<'_>> = Vec::new();

        for ancestor in &ancestors {
            let decl = ancestor.decl;
            for field in &decl.fields {
                if fields.insert(field.as_str()) {
                    members.push(Member::Field {
                        declaring: decl.name.clone(),
                        name: field.clone(),
                    });
                }
            }
            for (index, method) in decl.methods.iter().enumerate() {
                // An override-equivalent signature seen earlier in the walk
                // hides this one.
                let signature = Signature::of(method, &ancestor.bindings);
                if signatures.iter().any(|s| s.override_equivalent(&signature)) {
                    continue;
                }
                signatures.push(signature);
                members.push(Member::Method(MethodRef {
                    declaring: decl.name.clone(),
                    index,
                }));
            }
        }

        Ok(members)
    }

    fn resolve_member(
        &self,
        view: &TypeRef,
        method: &MethodRef,
    ) -> Result<ResolvedSignature, ModelError> {
        let decl = self.method(method).ok_or_else(|| {
            ModelError::TypeResolution(format!(
                "`{}` has no method at index {}",
                method.declaring, method.index
            ))
        })?;

        let bindings = if method.declaring == self.root.name {
            Bindings::new()
        } else {
            self.ancestors(view)?
                .into_iter()
                .find(|a| a.decl.name == method.declaring)
                .map(|a| a.bindings)
                .ok_or_else(|| {
                    ModelError::TypeResolution(format!(
                        "`{}` is not a supertype of `{view}`",
                        method.declaring
                    ))
                })?
        };

        let scoped = method_bindings(decl, &bindings);
        Ok(ResolvedSignature {
            name: decl.name.clone(),
            type_params: decl.type_params.iter().map(|p| p.substitute(&scoped)).collect(),
            params: decl
                .params
                .iter()
                .map(|p| Param {
                    name: p.name.clone(),
                    ty: p.ty.substitute(&scoped),
                })
                .collect(),
            return_type: decl.return_type.substitute(&scoped),
            declaring: method.declaring.clone(),
        })
    }
}

/// A method signature as seen from a view. Method type parameters are
/// renamed by position, so `<T> T conv(T)` and `<U> U conv(U)` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Signature<'m> {
    name: &'m str,
    type_params: Vec<TypeParam>,
    params: Vec<TypeRef>,
}

impl<'m> Signature<'m> {
    fn of(method: &'m MethodDecl, bindings: &Bindings) -> Self {
        let mut scoped = bindings.clone();
        for (position, param) in method.type_params.iter().enumerate() {
            scoped.insert(param.name.clone(), TypeRef::Var(position.to_string()));
        }
        Self {
            name: &method.name,
            type_params: method
                .type_params
                .iter()
                .enumerate()
                .map(|(position, param)| TypeParam {
                    name: position.to_string(),
                    bounds: param.bounds.iter().map(|b| b.substitute(&scoped)).collect(),
                })
                .collect(),
            params: method.params.iter().map(|p| p.ty.substitute(&scoped)).collect(),
        }
    }

    fn erased(&self) -> Self {
        let bounds = bound_map(&self.type_params);
        Self {
            name: self.name,
            type_params: Vec::new(),
            params: self.params.iter().map(|p| p.erasure(&bounds)).collect(),
        }
    }

    /// Same signature, or one is the erasure of the other.
    fn override_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && (self == other || *self == other.erased() || self.erased() == *other)
    }
}

/// Bind an interface's type parameters to `args`. A raw reference (no
/// arguments on a generic interface) binds every parameter to its erasure.
fn bind_arguments(decl: &InterfaceDecl, args: &[TypeRef]) -> Result<Bindings, ModelError> {
    if args.is_empty() {
        let bounds = bound_map(&decl.type_params);
        return Ok(decl
            .type_params
            .iter()
            .map(|p| (p.name.clone(), p.erasure(&bounds)))
            .collect());
    }
    if args.len() != decl.type_params.len() {
        return Err(ModelError::TypeResolution(format!(
            "`{}` expects {} type argument(s), got {}",
            decl.name,
            decl.type_params.len(),
            args.len()
        )));
    }
    Ok(decl
        .type_params
        .iter()
        .zip(args)
        .map(|(p, arg)| (p.name.clone(), arg.clone()))
        .collect())
}

/// Interface bindings minus the names the method's own type parameters
/// shadow.
fn method_bindings(method: &MethodDecl, bindings: &Bindings) -> Bindings {
    let mut scoped = bindings.clone();
    for param in &method.type_params {
        scoped.remove(&param.name);
    }
    scoped
}
