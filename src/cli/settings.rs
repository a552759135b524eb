use std::error::Error;

use crate::core::config::{path_display, Config, SettingError};

pub fn handle_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    if value.trim().is_empty() {
        let config = Config::load()?;
        config.print_all();
        return Ok(());
    }
    update_config(|config| config.set_value(key, value))
}

pub fn handle_unset(key: &str) -> Result<(), Box<dyn Error>> {
    update_config(|config| config.unset_value(key))
}

pub fn handle_config() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path_display(&path));
    }
    config.print_all();
    Ok(())
}

fn update_config<F>(change: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut config = Config::load()?;
    match change(&mut config) {
        Ok(message) => {
            config.save()?;
            println!("✅ {message}");
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}
