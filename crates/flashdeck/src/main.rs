//! `flashdeck` - CLI entry point
//!
//! Parses arguments, loads configuration and dispatches to the study shell
//! or one of the one-shot commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;

use flashdeck::cli::{Cli, Command, ConfigCommand, SignupCommand};
use flashdeck::{init_logging, App, Config, Shell};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Study => handle_study(&config),
        Command::Signup(signup_cmd) => handle_signup(&config, &signup_cmd),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_app(config: &Config) -> anyhow::Result<App> {
    App::open(config).with_context(|| {
        format!(
            "opening {} and {}",
            config.users_path().display(),
            config.flashcards_path().display()
        )
    })
}

fn handle_study(config: &Config) -> anyhow::Result<()> {
    let mut app = open_app(config)?;
    let stdin = io::stdin();
    let mut shell = Shell::new(&mut app, stdin.lock(), io::stdout());
    shell.run().context("terminal I/O failed")?;
    Ok(())
}

fn handle_signup(config: &Config, cmd: &SignupCommand) -> anyhow::Result<()> {
    let app = open_app(config)?;
    match app.signup(&cmd.username, &cmd.password) {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", e.user_message()),
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let status = open_app(config)?.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("flashdeck status");
        println!("----------------");
        println!("Users file:      {}", status.users_file.display());
        println!("Flashcards file: {}", status.flashcards_file.display());
        println!("Users:           {}", status.user_count);
        println!("Flashcards:      {}", status.card_count);
        println!("Subjects:        {}", status.subjects.join(", "));
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:   {}", config.data_dir().display());
                println!("  Users file:       {}", config.users_path().display());
                println!("  Flashcards file:  {}", config.flashcards_path().display());
                println!();
                println!("[Flashcards]");
                println!("  Seed examples:    {}", config.flashcards.seed_examples);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
