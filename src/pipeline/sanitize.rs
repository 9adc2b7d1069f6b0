use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

// A digit, a dot, then anything but whitespace or another digit ("1.Test").
// Decimals such as "3.14" are left intact.
static DIGIT_DOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\.([^\s\d])").expect("DIGIT_DOT is a valid regex"));

fn ascii_punctuation(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{2039}'
        | '\u{203A}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' => "\"",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2212}' => "-",
        '\u{2014}' | '\u{2015}' => "--",
        '\u{2026}' => "...",
        '\u{2022}' => "*",
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => " ",
        _ => return None,
    };
    Some(replacement)
}

/// Reduces text to characters the built-in PDF fonts can show.
///
/// Deterministic and idempotent: `sanitize_text(sanitize_text(s)) == sanitize_text(s)`.
pub fn sanitize_text(input: &str) -> String {
    // NFKD folds compatibility forms (superscript digits, ligatures) and
    // splits accents off their base letters.
    let mut folded = String::with_capacity(input.len());
    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        match ascii_punctuation(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }

    DIGIT_DOT.replace_all(&folded, "$1. $2").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_typographic_punctuation() {
        assert_eq!(
            sanitize_text("\u{201C}Quoted\u{201D} \u{2018}single\u{2019} a\u{2013}b c\u{2014}d"),
            "\"Quoted\" 'single' a-b c--d"
        );
    }

    #[test]
    fn strips_accents() {
        assert_eq!(sanitize_text("café naïve Ångström"), "cafe naive Angstrom");
    }

    #[test]
    fn folds_sub_and_superscript_digits() {
        assert_eq!(sanitize_text("H\u{2082}O and x\u{00B2}"), "H2O and x2");
    }

    #[test]
    fn spaces_digit_dot_sequences() {
        assert_eq!(sanitize_text("1.Test"), "1. Test");
        assert_eq!(sanitize_text("Step 2.)"), "Step 2. )");
        assert_eq!(sanitize_text("pi is 3.14"), "pi is 3.14");
        assert_eq!(sanitize_text("end 4."), "end 4.");
    }

    #[test]
    fn sanitizing_is_idempotent() {
        let samples = [
            "1.Test \u{201C}x\u{201D}",
            "ﬁnal café \u{2014} 2.b",
            "already plain text",
            "x\u{00B2}.y",
            "",
        ];
        for sample in samples {
            let once = sanitize_text(sample);
            assert_eq!(sanitize_text(&once), once, "sample {:?}", sample);
        }
    }
}
