/// 1) Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// 2) Cleaned cell text, or `None` for an empty cell.
pub fn non_empty(raw: &str) -> Option<String> {
    let cleaned = clean_str(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// 3) Parse a money-style number: tolerates a leading currency symbol,
///    thousands separators and a wrapping pair of parentheses for negatives.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = clean_str(raw);
    let (negative, body) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, cleaned.as_str()),
    };
    let body = body.trim_start_matches(['$', '€', '£']).trim();
    if body.is_empty() {
        return None;
    }
    let digits: String = body.chars().filter(|c| *c != ',').collect();
    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// 4) Parse an integer count; whole floats such as `"3.0"` are accepted.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let cleaned = clean_str(raw);
    if let Ok(v) = cleaned.parse::<i64>() {
        return Some(v);
    }
    let v = parse_number(&cleaned)?;
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}
