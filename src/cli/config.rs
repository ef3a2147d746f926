use crate::core::settings::Settings;
use anyhow::{Context, Result};

pub fn run(settings: &Settings) -> Result<()> {
    let rendered =
        toml::to_string_pretty(settings).context("Failed to render settings as TOML")?;

    match Settings::config_path() {
        Some(path) => println!("# default config path: {}", path.display()),
        None => println!("# no default config directory on this platform"),
    }
    print!("{}", rendered);
    Ok(())
}
