//! Formula-like line detection.
//!
//! A fixed-symbol test, not a math parser: a trimmed line longer than three
//! characters that contains any math indicator counts as a formula.

/// Minimum length (in characters) a line must exceed.
const MIN_FORMULA_CHARS: usize = 3;

/// Substrings that mark a line as math.
pub const MATH_INDICATORS: &[&str] = &[
    "=", "∑", "∫", "√", "π", "\\\\", "^", // operators, pi, TeX line break
    "α", "β", "γ", "δ", "ε", "ζ", "η", "θ", "ι", "κ", "λ", "μ", "ν", "ξ", "ο", "ρ", "σ", "τ",
    "υ", "φ", "χ", "ψ", "ω", // Greek lowercase
    "Γ", "Δ", "Θ", "Λ", "Ξ", "Π", "Σ", "Φ", "Ψ", "Ω", // Greek uppercase
];

/// Check whether a single (untrimmed) line is formula-like.
pub fn is_formula(line: &str) -> bool {
    let line = line.trim();
    line.chars().count() > MIN_FORMULA_CHARS && MATH_INDICATORS.iter().any(|m| line.contains(m))
}

/// Formula-like lines of a page, trimmed, in text order.
pub fn extract_formulas(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| is_formula(line))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Markdown document wrapping each formula in a display math block.
pub fn formulas_markdown(formulas: &[String]) -> String {
    let blocks: Vec<String> = formulas.iter().map(|f| format!("$$\n{}\n$$", f)).collect();
    format!("# Formulas\n\n{}", blocks.join("\n\n"))
}
