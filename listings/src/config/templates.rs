//! Built-in language table.

use once_cell::sync::Lazy;

use super::language::LanguageInfo;

/// Built-in language configurations, lazily initialized.
static BUILTIN_LANGUAGES: Lazy<Vec<LanguageInfo>> = Lazy::new(|| {
    vec![
        LanguageInfo::new("python", ".py", "#"),
        LanguageInfo::new("rust", ".rs", "//"),
        LanguageInfo::new("go", ".go", "//"),
        // Program output
        LanguageInfo::plain("text", ".txt"),
    ]
});

/// Returns the list of built-in language configurations.
pub fn builtin_languages() -> &'static [LanguageInfo] {
    &BUILTIN_LANGUAGES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let names: Vec<&str> = builtin_languages().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["python", "rust", "go", "text"]);
    }

    #[test]
    fn test_comment_tokens() {
        let langs = builtin_languages();
        assert_eq!(langs[0].comment.as_deref(), Some("#"));
        assert_eq!(langs[1].comment.as_deref(), Some("//"));
        assert_eq!(langs[2].comment.as_deref(), Some("//"));
        assert_eq!(langs[3].comment, None);
        assert!(!langs[3].requires_file_name);
    }
}
