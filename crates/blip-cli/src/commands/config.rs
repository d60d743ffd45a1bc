//! Settings file management.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use blip_config::{AudioConfig, find_config, user_config_path};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the settings in effect
    Show {
        /// Settings file (default: search blip.toml, then the user file)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a settings file with every default spelled out
    Init {
        /// Where to write (default: the user settings file)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print where settings are read from
    Path,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { config } => {
            match find_config(config.as_deref()) {
                Some(path) => println!("# {}", path.display()),
                None => println!("# defaults (no settings file found)"),
            }
            let settings = super::common::load_config(config.as_deref())?;
            print!("{}", settings.to_toml()?);
        }

        ConfigCommand::Init { path, force } => {
            let path = path.unwrap_or_else(user_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "'{}' already exists (use --force to overwrite)",
                    path.display()
                );
            }
            AudioConfig::default().save(&path)?;
            println!("Wrote {}", path.display());
        }

        ConfigCommand::Path => {
            println!("User settings: {}", user_config_path().display());
            match find_config(None) {
                Some(path) => println!("In use:        {}", path.display()),
                None => println!("In use:        none (defaults)"),
            }
        }
    }

    Ok(())
}
