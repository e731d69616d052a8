//! Grouping of annotated declarations by enclosing interface.

use std::collections::HashMap;

use restygen_common::AnnotatedDeclaration;

use crate::error::{GenerateError, Result};

/// Annotated declarations sharing one enclosing interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationGroup {
    /// Fully-qualified name of the enclosing interface.
    pub interface: String,
    /// Member declarations in first-seen order.
    pub declarations: Vec<AnnotatedDeclaration>,
}

impl DeclarationGroup {
    /// The configured `url` option, taken from the group's first declaration.
    pub fn url(&self) -> Option<&str> {
        self.declarations.first().and_then(|d| d.url.as_deref())
    }
}

/// Partition declarations by enclosing interface, keeping the first-seen
/// order of both groups and group members.
pub fn group_declarations(declarations: &[AnnotatedDeclaration]) -> Result<Vec<DeclarationGroup>> {
    let mut groups: Vec<DeclarationGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for decl in declarations {
        let Some(interface) = decl.enclosing.as_deref() else {
            return Err(GenerateError::MalformedDeclaration(format!(
                "`{}` has no enclosing interface",
                decl.element
            )));
        };

        if let Some(&i) = positions.get(interface) {
            groups[i].declarations.push(decl.clone());
        } else {
            positions.insert(interface, groups.len());
            groups.push(DeclarationGroup {
                interface: interface.to_string(),
                declarations: vec![decl.clone()],
            });
        }
    }

    Ok(groups)
}
