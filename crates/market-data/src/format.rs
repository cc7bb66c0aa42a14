/// Render a USD amount the way the overview table shows it: `$1.80T`,
/// `$375.30B`, `$890.00M`.
pub fn format_compact_usd(amount: f64) -> String {
    if amount >= 1e12 {
        format!("${:.2}T", amount / 1e12)
    } else if amount >= 1e9 {
        format!("${:.2}B", amount / 1e9)
    } else {
        format!("${:.2}M", amount / 1e6)
    }
}

/// Inverse of [`format_compact_usd`]. Anything unparseable is 0.
pub fn parse_compact_usd(text: &str) -> f64 {
    let trimmed = text.trim().trim_start_matches('$').replace(',', "");
    let (number, multiplier) = match trimmed.chars().last() {
        Some('T') | Some('t') => (&trimmed[..trimmed.len() - 1], 1e12),
        Some('B') | Some('b') => (&trimmed[..trimmed.len() - 1], 1e9),
        Some('M') | Some('m') => (&trimmed[..trimmed.len() - 1], 1e6),
        _ => (trimmed.as_str(), 1.0),
    };
    number
        .trim()
        .parse::<f64>()
        .map(|n| n * multiplier)
        .unwrap_or(0.0)
}
