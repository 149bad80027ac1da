//! Small string helpers shared by the command parser and the serializer.

/// Uppercases only the first character; the rest is untouched.
pub fn capitalise_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Formats a variable name for display, capitalising each
/// underscore-separated segment: `enrolment_date` -> `Enrolment_Date`.
pub fn format_attr_name(name: &str) -> String {
    let name = capitalise_first(name);
    if name.contains('_') {
        name.split('_')
            .map(capitalise_first)
            .collect::<Vec<_>>()
            .join("_")
    } else {
        name
    }
}

/// Splits on `sep` occurrences that sit outside parentheses, so attribute
/// names like `type(d)` survive comma splitting in one piece.
pub fn split_outside_parens(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in input.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + sep.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}
