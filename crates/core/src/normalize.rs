//! Type normalization for emitted text.

use restygen_common::TypeRef;

/// Boxed stand-in for "no value" in generic positions.
pub const VOID_PLACEHOLDER: &str = "Void";

/// Canonical source text of a resolved type.
pub fn render_type(ty: &TypeRef) -> String {
    ty.to_string()
}

/// Text used for an operation's promise, callback, transport and result
/// types. `void` cannot be a type argument, so it becomes [`VOID_PLACEHOLDER`].
pub fn normalize_return(ty: &TypeRef) -> String {
    if ty.is_void() {
        VOID_PLACEHOLDER.to_string()
    } else {
        render_type(ty)
    }
}
