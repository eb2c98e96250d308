//! Case conversion between DSL field names and plist keys.

/// Convert a DSL name to plist key spelling.
///
/// The first character is upper-cased, any character following `-`, `_`, `.`
/// or whitespace is upper-cased with the separator dropped, and `+` becomes `x`.
/// `sock_path_name` becomes `SockPathName`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') || c.is_whitespace() {
            upper_next = true;
            continue;
        }
        if c == '+' {
            out.push('x');
            upper_next = false;
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Convert a plist key to DSL spelling.
///
/// Runs of capitals are kept together, so `LowPriorityIO` becomes
/// `low_priority_io` and `CPU` becomes `cpu`.
pub fn snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}
