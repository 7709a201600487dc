//! Predicate for classes supplied by the platform runtime.
//!
//! Runtime classes are assumed always available and are never explored or
//! recorded as dependencies. The prefix list is static configuration.

const RUNTIME_PREFIXES: [&str; 4] = ["java.", "javax.", "jdk.", "sun."];

const PRIMITIVE_TOKENS: &str = "ZBCSIFDJ";

/// True iff `type_name` belongs to the platform runtime or denotes a
/// primitive type, and therefore stays out of the dependency graph.
pub fn is_runtime_type(type_name: &str) -> bool {
    RUNTIME_PREFIXES
        .iter()
        .any(|prefix| type_name.starts_with(prefix))
        || is_primitive_token(type_name)
}

/// Single-letter descriptor tokens for primitive types.
pub fn is_primitive_token(type_name: &str) -> bool {
    type_name.len() == 1 && PRIMITIVE_TOKENS.contains(type_name)
}
