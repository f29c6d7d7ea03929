//! Configuration display command.

use console::style;

use crate::config::Config;

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    match &config.source_path {
        Some(path) => eprintln!("{} Loaded from {}", style("→").dim(), path.display()),
        None => eprintln!("{} No config file found, using defaults", style("→").dim()),
    }

    println!("{}", config.to_toml()?);

    let var = &config.gemini.credentials_env;
    if credentials_present(var) {
        eprintln!("{} {} is set", style("✓").green(), var);
    } else {
        eprintln!("{} {} is not set", style("✗").red(), var);
    }
    Ok(())
}

fn credentials_present(var: &str) -> bool {
    std::env::var(var).is_ok_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_present_unset() {
        assert!(!credentials_present("PLAINPOLICY_TEST_CONFIG_UNSET_VAR"));
    }
}
