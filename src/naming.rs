//! Identifier casing used by the attribute-mapping protocol.
//!
//! Attribute names are snake_case by convention. Accessors and mutators are
//! addressed by a derived method name (`getFullNameAttribute`), and model
//! schemas default to the snake_case form of the definition's type name.

/// Which half of the accessor protocol a method name addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
}

impl AccessorKind {
    fn prefix(self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
        }
    }
}

const ACCESSOR_SUFFIX: &str = "Attribute";

/// Convert snake_case to PascalCase.
///
/// The input is lower-cased first, so `FIRST_NAME` and `first_name` both
/// become `FirstName`. Empty segments (leading or doubled underscores) vanish.
pub fn snake_to_pascal(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut result = String::with_capacity(lowered.len());
    for segment in lowered.split('_') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.extend(chars);
        }
    }
    result
}

/// Convert PascalCase or camelCase to snake_case.
///
/// The first character is lower-cased, then every ASCII upper-case letter is
/// replaced by `_` and its lower-case form. Acronyms are not detected:
/// `HTTPLog` becomes `h_t_t_p_log`.
pub fn pascal_to_snake(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if i == 0 {
            result.push(c.to_ascii_lowercase());
        } else if c.is_ascii_uppercase() {
            result.push('_');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Method name of the accessor or mutator for `attribute`.
///
/// ```
/// use lifeboat::naming::{accessor_method, AccessorKind};
///
/// assert_eq!(accessor_method(AccessorKind::Get, "full_name"), "getFullNameAttribute");
/// assert_eq!(accessor_method(AccessorKind::Set, "email"), "setEmailAttribute");
/// ```
pub fn accessor_method(kind: AccessorKind, attribute: &str) -> String {
    format!("{}{}{}", kind.prefix(), snake_to_pascal(attribute), ACCESSOR_SUFFIX)
}

/// Reverse of [`accessor_method`].
///
/// Returns `None` unless `method` has the `{get,set}<Name>Attribute` shape
/// with a non-empty `<Name>`.
pub fn parse_accessor_method(method: &str) -> Option<(AccessorKind, String)> {
    let body = method.strip_suffix(ACCESSOR_SUFFIX)?;
    let (kind, name) = if let Some(name) = body.strip_prefix("get") {
        (AccessorKind::Get, name)
    } else if let Some(name) = body.strip_prefix("set") {
        (AccessorKind::Set, name)
    } else {
        return None;
    };
    if name.is_empty() {
        return None;
    }
    Some((kind, pascal_to_snake(name)))
}

/// Unqualified name of `T` without generic arguments.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
