//! Utility functions for code generation

/// Convert a type name to snake_case.
///
/// Must agree with `lifeboat::naming::pascal_to_snake`, which derives the
/// same default at runtime for hand-written definitions.
pub fn snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}
