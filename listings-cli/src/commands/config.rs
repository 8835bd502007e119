//! Config command implementation.

use listings::errors::Result;
use listings::interface::Context;
use listings::Config;

/// Prints the effective configuration.
pub fn config(ctx: &Context) -> Result<()> {
    print!("{}", render_config(&ctx.config)?);
    Ok(())
}

fn render_config(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| {
        listings::ListingsError::Other(format!("Failed to serialize config: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_config_prints() {
        let dir = tempdir().unwrap();
        let ctx = Context::default_for_dir(dir.path().to_path_buf()).unwrap();
        config(&ctx).unwrap();

        let text = render_config(&ctx.config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, ctx.config);
        assert!(text.contains("source_patterns"));
    }

    #[test]
    fn test_config_output_parses_back() {
        let mut original = Config::default();
        original
            .search_roots
            .insert("go".to_string(), std::path::PathBuf::from("code/go"));
        let text = render_config(&original).unwrap();
        assert!(text.contains("code/go"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, original);
    }
}
