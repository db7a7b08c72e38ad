//! Output naming helpers.

/// Python-style capitalize: first character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `birth_date` → `birthDate`.
///
/// The first segment is kept as written; every following segment is
/// capitalized. Names without `sep` are returned unchanged.
pub fn to_camel_case(name: &str, sep: char) -> String {
    let mut segments = name.split(sep);
    let head = segments.next().unwrap_or_default();
    let mut out = String::with_capacity(name.len());
    out.push_str(head);
    for segment in segments {
        out.push_str(&capitalize(segment));
    }
    out
}

/// Output name for an attribute under the camel-case toggle.
pub fn output_name(attribute: &str, camel_case: bool) -> String {
    if camel_case {
        to_camel_case(attribute, '_')
    } else {
        attribute.to_string()
    }
}

/// Model name registered for a nested relationship: `addresses` → `NestedAddresses`.
pub fn nested_model_name(relationship: &str) -> String {
    format!("Nested{}", capitalize(relationship))
}
