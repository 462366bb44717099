//! Case folding, accent stripping and tokenization for keyword matching.

/// Lower-case the text and fold common Portuguese accented letters.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        for lc in ch.to_lowercase() {
            out.push(fold(lc));
        }
    }
    out
}

/// Split text into maximal runs of Unicode letters and digits.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn fold(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ã' | 'â' => 'a',
        'é' | 'ê' => 'e',
        'í' => 'i',
        'ó' | 'õ' | 'ô' => 'o',
        'ú' => 'u',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_accents() {
        assert_eq!(normalize("Tá Aí?"), "ta ai?");
        assert_eq!(normalize("ÁÀÃÂ éê í óõô ú Ç"), "aaaa ee i ooo u c");
        assert_eq!(normalize("Adicione o NÚMERO"), "adicione o numero");
    }

    #[test]
    fn test_normalize_is_total() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("🚀 !BTC"), "🚀 !btc");
    }

    #[test]
    fn test_tokenize_runs_of_letters_and_digits() {
        assert_eq!(tokenize("bom dia, time!"), vec!["bom", "dia", "time"]);
        assert_eq!(tokenize("e aí? 5511999990000"), vec!["e", "aí", "5511999990000"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!... ").is_empty());
    }
}
