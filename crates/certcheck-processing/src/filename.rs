//! Filename sanitization for stored uploads

use unicode_normalization::UnicodeNormalization;

const MAX_FILENAME_LENGTH: usize = 255;

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// The name is NFKD-normalized so accented letters keep their base letter,
/// then non-ASCII characters are dropped. `/` and whitespace runs become `_`,
/// anything outside `[A-Za-z0-9_.-]` (including `\`) is removed, and leading
/// or trailing `.`/`_` are trimmed. Returns `None` when nothing usable remains.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let separated: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' { ' ' } else { c })
        .collect();

    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");

    let stripped: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = stripped.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return None;
    }

    Some(trimmed.chars().take(MAX_FILENAME_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(sanitize_filename("cert.png").as_deref(), Some("cert.png"));
        assert_eq!(sanitize_filename("scan-01_v2.JPG").as_deref(), Some("scan-01_v2.JPG"));
    }

    #[test]
    fn test_path_components_flattened() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("etc_passwd")
        );
        assert_eq!(sanitize_filename("/tmp/cert.png").as_deref(), Some("tmp_cert.png"));
    }

    #[test]
    fn test_backslash_is_not_a_separator() {
        assert_eq!(sanitize_filename("C:\\x\\cert.png").as_deref(), Some("Cxcert.png"));
        assert_eq!(
            sanitize_filename("C:\\Users\\me\\cert.png").as_deref(),
            Some("CUsersmecert.png")
        );
    }

    #[test]
    fn test_whitespace_and_unsafe_characters() {
        assert_eq!(
            sanitize_filename("my  cert (final).png").as_deref(),
            Some("my_cert_final.png")
        );
        assert_eq!(sanitize_filename("cert;rm -rf.png").as_deref(), Some("certrm_-rf.png"));
    }

    #[test]
    fn test_accents_keep_base_letter() {
        assert_eq!(sanitize_filename("résumé.png").as_deref(), Some("resume.png"));
        assert_eq!(sanitize_filename("Ångström scan.jpg").as_deref(), Some("Angstrom_scan.jpg"));
        assert_eq!(sanitize_filename("ﬁle.png").as_deref(), Some("file.png"));
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename("///"), None);
        assert_eq!(sanitize_filename("证书"), None);
    }

    #[test]
    fn test_length_capped() {
        let long = format!("{}.png", "a".repeat(400));
        assert_eq!(sanitize_filename(&long).map(|s| s.len()), Some(255));
    }
}
