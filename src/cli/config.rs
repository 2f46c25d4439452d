//! Configuration commands

use otpclock_core::config::toml_config::{get_config_path, load_config_or_default, save_config, TomlConfig};
use otpclock_core::error::{ConfigError, OtpClockError};

/// Print the effective configuration as TOML
pub fn run_config_show() -> Result<(), OtpClockError> {
    let path = get_config_path()?;
    let config = load_config_or_default()?;

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

/// Write a default configuration file
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn run_config_init(force: bool) -> Result<(), OtpClockError> {
    let path = get_config_path()?;
    if path.exists() && !force {
        return Err(OtpClockError::Config(ConfigError::ValidationError {
            message: format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ),
        }));
    }

    let path = save_config(&TomlConfig::default())?;
    println!("Wrote {}", path.display());

    Ok(())
}
