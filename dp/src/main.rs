//! dayplanner - daily task planner
//!
//! CLI entry point for the relay and for planning from the command line.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use dayplanner::cli::{Cli, Command, OutputFormat, get_log_path};
use dayplanner::config::Config;
use dayplanner::domain::{PlannerResponse, TaskList};
use dayplanner::image::ImageService;
use dayplanner::planner::Planner;
use dayplanner::server;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "dayplanner loaded config: provider={} mock={}",
        config.llm.provider, config.mock.schedule
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Serve { port }) => {
            if let Some(port) = port {
                debug!(%port, "main: port override from CLI");
                config.server.port = port;
            }
            println!(
                "{} http://{}:{}",
                "Relay listening on".green(),
                config.server.host,
                config.server.port
            );
            server::serve(&config).await
        }
        Some(Command::Plan {
            tasks,
            mock,
            images,
            format,
        }) => {
            debug!(task_count = %tasks.len(), %mock, %images, ?format, "main: matched Plan command");
            cmd_plan(&config, &tasks, mock, images, format).await
        }
        Some(Command::Image { description }) => {
            debug!(%description, "main: matched Image command");
            cmd_image(&config, &description).await
        }
        Some(Command::Config) => {
            debug!("main: matched Config command");
            cmd_config(&config)
        }
        None => {
            debug!("main: no command, printing help");
            Cli::command().print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}

async fn cmd_plan(config: &Config, tasks: &[String], mock: bool, images: bool, format: OutputFormat) -> Result<()> {
    let list: TaskList = tasks.iter().collect();
    if list.is_empty() {
        eyre::bail!("No tasks provided. Please add at least one task.");
    }

    let mut api = config.api_config();
    api.use_mock_responses |= mock;

    let planner = Planner::from_config(config, api).context("Failed to create planner")?;
    let mut response = planner.generate_schedule(list.tasks()).await?;

    if images {
        let service = ImageService::from_config(config, &config.image_api_key())?;
        planner.attach_images(&mut response, &service).await;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => print_schedule(&response),
    }
    Ok(())
}

fn print_schedule(response: &PlannerResponse) {
    println!("{}", "Explanation".bold());
    println!("  {}", response.explanation);
    println!();
    println!("{}", "Schedule".bold());
    if response.schedule.is_empty() {
        println!("  {}", "(no entries)".dimmed());
    }
    for item in &response.schedule {
        println!("  {:>9}  {}", item.time.cyan(), item.task_description);
        if let Some(url) = &item.image_url {
            println!("  {:>9}  {}", "", url.dimmed());
        }
    }
}

async fn cmd_image(config: &Config, description: &str) -> Result<()> {
    let service = ImageService::from_config(config, &config.image_api_key())?;
    let result = service.generate_image(description).await?;
    if result.is_mock {
        println!("{} {}", result.image_url, "(mock)".yellow());
    } else {
        println!("{}", result.image_url);
    }
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    let api = config.api_config();
    let key_status = if api.has_key() {
        "configured".green()
    } else {
        "missing".red()
    };

    println!("{}", serde_yaml::to_string(config).context("Failed to render config")?);
    println!("{} {} ({})", "API key:".bold(), key_status, api.api_provider);
    println!("{} {}", "Logs:".bold(), get_log_path().display());
    Ok(())
}
