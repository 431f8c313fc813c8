//! Label normalization for revenue family and client codes.

/// Folds an accented Latin letter to its ASCII base.
const fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

/// Lowercases, strips accents, turns punctuation into spaces and collapses
/// runs of whitespace.
///
/// `"Lanç. Administrativo"` becomes `"lanc administrativo"`.
#[must_use]
pub fn normalize_label(value: &str) -> String {
    let mapped: String = value
        .chars()
        .map(|c| fold_accent(c).to_ascii_lowercase())
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for administrative ledger entries that are not advisor revenue.
#[must_use]
pub fn is_admin_family(family: &str) -> bool {
    let n = normalize_label(family);
    n == "lanc administrativo" || n.starts_with("lanc adm")
}

/// Longest run of digits in a client code, or empty.
///
/// Codes arrive as `"XP 123456"`, `"123456-7"` or plain digits. The first
/// longest run wins on ties.
#[must_use]
pub fn extract_code_digits(code: &str) -> String {
    let mut best = "";
    for run in code.split(|c: char| !c.is_ascii_digit()) {
        if run.len() > best.len() {
            best = run;
        }
    }
    best.to_string()
}
