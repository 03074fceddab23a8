//! IRI baking: turning free text into something usable as an RDF resource.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters RFC 3987 forbids anywhere in an IRI, plus whitespace.
static UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\s<>"{}|\\^`\x00-\x1F\x7F]"#).expect("static regex"));

/// Bake `text` into an IRI.
///
/// Text that is already a valid IRI comes back unchanged; every forbidden
/// character in anything else is replaced by `_`.
pub fn to_iri(text: &str) -> String {
    UNSAFE.replace_all(text.trim(), "_").into_owned()
}

/// Whether `text` contains none of the characters [`to_iri`] replaces.
pub fn is_safe(text: &str) -> bool {
    !UNSAFE.is_match(text)
}

/// Append `local` to a base IRI, adding a `/` separator unless the base
/// already ends in `/` or `#`.
pub fn mint(base: &str, local: &str) -> String {
    let local = to_iri(local);
    if base.ends_with('/') || base.ends_with('#') {
        format!("{}{}", base, local)
    } else {
        format!("{}/{}", base, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_iri_unchanged() {
        let iri = "http://data.socialhistory.org/vocab/hisco/occupation";
        assert!(is_safe(iri));
        assert_eq!(to_iri(iri), iri);
    }

    #[test]
    fn test_unsafe_characters_replaced() {
        assert_eq!(
            to_iri("http://example.org/my variable"),
            "http://example.org/my_variable"
        );
        assert_eq!(to_iri("a<b>c\"d{e}f|g\\h^i`j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(to_iri("tab\there\nnewline"), "tab_here_newline");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(to_iri("  occupation  "), "occupation");
    }

    #[test]
    fn test_mint_separators() {
        assert_eq!(mint("http://ex.org/vocab/", "age"), "http://ex.org/vocab/age");
        assert_eq!(mint("http://ex.org/vocab#", "age"), "http://ex.org/vocab#age");
        assert_eq!(mint("http://ex.org/vocab", "birth year"), "http://ex.org/vocab/birth_year");
    }
}
