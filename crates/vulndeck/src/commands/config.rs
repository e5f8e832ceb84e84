use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_from(&path)?;

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let deck = config
        .deck()
        .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
    let rows = [
        ("defaults.windowed", config.windowed().to_string()),
        ("defaults.background", config.background().to_string()),
        ("defaults.transition", config.transition().name().to_string()),
        ("defaults.deck", deck),
    ];
    for (key, value) in rows {
        println!("  {:<22} {}", key.cyan(), value);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    let mut config = Config::load_from(&path)?;
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Set".green().bold(),
        key,
        value,
        path.display().to_string().dimmed()
    );
    Ok(())
}
