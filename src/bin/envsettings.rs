// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolves application settings and prints them.

use clap::{Parser, ValueEnum};
use envsettings::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Resolve settings the way the application would at startup
#[derive(Parser, Debug)]
#[command(name = "envsettings")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application base directory
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Local settings file (default: <base-dir>/.env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the secret key and database password
    #[arg(long)]
    show_secrets: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> std::result::Result<String, Box<dyn std::error::Error>> {
    let mut loader = SettingsLoader::new(&cli.base_dir);
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    let settings = loader.with_google_cloud()?.load()?;
    let settings = if cli.show_secrets {
        settings
    } else {
        settings.redacted()
    };

    Ok(match cli.format {
        Format::Text => render_text(&settings),
        Format::Json => serde_json::to_string_pretty(&settings)?,
        Format::Yaml => serde_yaml::to_string(&settings)?,
    })
}

fn render_text(settings: &Settings) -> String {
    let mut lines = vec![
        format!("source:           {}", settings.source),
        format!(
            "project:          {}",
            settings.project_id.as_deref().unwrap_or("-")
        ),
        format!("secret_key:       {}", settings.secret_key),
        format!("debug:            {}", settings.debug),
        format!(
            "allowed_hosts:    {}",
            settings
                .hosts
                .allowed_hosts
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        ),
        format!(
            "trusted_origins:  {}",
            settings.hosts.csrf_trusted_origins.join(" ")
        ),
        format!("ssl_redirect:     {}", settings.hosts.secure_ssl_redirect),
        format!("db.engine:        {}", settings.database.engine),
        format!("db.name:          {}", settings.database.name),
        format!("db.user:          {}", settings.database.user),
        format!("db.password:      {}", settings.database.password),
        format!("db.host:          {}", settings.database.host),
        format!("db.port:          {}", settings.database.port),
    ];
    match &settings.storage.backend {
        envsettings::settings::StorageBackend::GoogleCloudStorage { bucket, default_acl } => {
            lines.push(format!("storage:          gs://{} ({})", bucket, default_acl));
        }
        envsettings::settings::StorageBackend::FileSystem {
            static_root,
            media_root,
        } => {
            lines.push(format!("static_root:      {}", static_root.display()));
            lines.push(format!("media_root:       {}", media_root.display()));
        }
    }
    lines.push(format!("language_code:    {}", settings.language_code));
    lines.push(format!("time_zone:        {}", settings.time_zone));
    lines.join("\n")
}
