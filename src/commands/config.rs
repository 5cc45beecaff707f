use crate::FimContext;
use crate::output;
use anyhow::Result;
use colored::Colorize;

/// Execute config command to show or set configuration values
///
/// With no key, prints every setting. With a key, prints its value; with a key and a
/// value, validates the value and writes the configuration file.
///
/// # Errors
///
/// Returns an error if:
/// - The key is unknown or the value is invalid
/// - The configuration file cannot be written
pub fn execute(ctx: &mut FimContext, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let Some(key) = key else {
        show_all_config(ctx);
        return Ok(());
    };

    if let Some(value) = value {
        ctx.config.set(key, value)?;
        ctx.config.save(&ctx.config_path)?;
        output::success(&format!("Set {key} = {value}"));
    } else if let Some(value) = ctx.config.get(key) {
        println!("{value}");
    } else {
        anyhow::bail!("Unknown configuration key: {key}");
    }

    Ok(())
}

/// Show all configuration values
fn show_all_config(ctx: &FimContext) {
    output::verbose(&format!("Config file: {}", ctx.config_path.display()));

    println!("{}", "[core]".bold());
    println!("  database = {}", ctx.config.core.database.display());
    println!("  fingerprint = {}", ctx.config.core.fingerprint);

    println!("\n{}", "[scan]".bold());
    println!("  follow_symlinks = {}", ctx.config.scan.follow_symlinks);
    println!(
        "  ignore_patterns = [{}]",
        ctx.config.scan.ignore_patterns.join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::utils::hash::FingerprintAlgorithm;
    use tempfile::tempdir;

    #[test]
    fn test_set_writes_config_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fim/config.toml");
        let mut ctx = FimContext::from_config(path.clone(), Config::default());

        execute(&mut ctx, Some("core.fingerprint"), Some("rolling"))?;

        assert_eq!(
            Config::load(&path)?.core.fingerprint,
            FingerprintAlgorithm::Rolling
        );
        Ok(())
    }

    #[test]
    fn test_invalid_value_leaves_file_absent() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        let mut ctx = FimContext::from_config(path.clone(), Config::default());

        assert!(execute(&mut ctx, Some("core.fingerprint"), Some("crc32")).is_err());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let mut ctx = FimContext::from_config("unused.toml".into(), Config::default());
        assert!(execute(&mut ctx, Some("core.nope"), None).is_err());
    }
}
