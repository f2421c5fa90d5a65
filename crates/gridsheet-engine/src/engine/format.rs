/// Format a number for display.
///
/// Integral values print without a fraction, everything else prints the
/// shortest decimal that round-trips.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // Covers -0.0.
        "0".to_string()
    } else {
        format!("{}", n)
    }
}
