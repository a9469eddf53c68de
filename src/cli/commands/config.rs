use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    if *print_config {
        info(format!("Configuration ({})", Config::config_file().display()));
        println!("{}", cfg.to_yaml()?);
    }

    if *edit_config {
        let path = Config::config_file();
        if !path.exists() {
            // Give the editor something to open: the effective settings.
            fs::create_dir_all(Config::config_dir())?;
            fs::write(&path, cfg.to_yaml()?)?;
            info(format!("Created {} with the current settings", path.display()));
        }
        edit(&path, editor.as_deref())?;
    }

    Ok(())
}

/// `--editor`, then `$EDITOR` / `$VISUAL`, then the platform default.
fn editor_chain(requested: Option<&str>) -> Vec<String> {
    let platform = if cfg!(target_os = "windows") {
        "notepad"
    } else {
        "nano"
    };

    let mut chain: Vec<String> = requested.map(str::to_string).into_iter().collect();
    chain.extend(["EDITOR", "VISUAL"].iter().filter_map(|v| std::env::var(v).ok()));
    chain.push(platform.to_string());
    chain.dedup();
    chain
}

fn edit(path: &Path, requested: Option<&str>) -> AppResult<()> {
    for editor in editor_chain(requested) {
        match Command::new(&editor).arg(path).status() {
            Ok(status) if status.success() => {
                success(format!("Configuration saved ({editor})"));
                return Ok(());
            }
            Ok(status) => warning(format!("'{editor}' exited with {status}, trying the next editor")),
            Err(e) => warning(format!("'{editor}' is not available ({e}), trying the next editor")),
        }
    }

    Err(AppError::Config(format!(
        "no editor could open {}",
        path.display()
    )))
}
