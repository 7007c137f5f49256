/// Version injected at compile time via GCP_IMPORT_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("GCP_IMPORT_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use gcp_import::config::Config;
use gcp_import::context::GeneratorArgs;
use gcp_import::gcp::auth::GcpCredentials;
use gcp_import::gcp::client::{format_gcp_error, GcpClient};
use gcp_import::resource::{
    self, generate_all, GenerateError, GenerationJob, Generator, ListError, ResourceDescriptor,
    ResourceFilter, ResourceKind, RestPageSource,
};
use serde::Serialize;
use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Import live GCP resources as normalized resource descriptors
#[derive(Parser, Debug)]
#[command(name = "gcp-import", version, about, long_about = None)]
struct Args {
    /// GCP project to import from
    #[arg(short, long)]
    project: Option<String>,

    /// GCP region to import from
    #[arg(short, long)]
    region: Option<String>,

    /// Resource kinds to import (comma separated, see --list-resources)
    #[arg(long, value_delimiter = ',')]
    resources: Vec<String>,

    /// Keep only matching objects: <field>=<value>[:<value>...], field "id" is the local id
    #[arg(long, value_parser = parse_filter)]
    filter: Vec<ResourceFilter>,

    /// Dump format for the descriptors
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Page size requested from list APIs
    #[arg(long)]
    page_size: Option<u32>,

    /// Use this access token instead of Application Default Credentials
    #[arg(long, env = "GCP_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Send requests to this endpoint instead of googleapis.com (emulators, proxies)
    #[arg(long, hide = true)]
    endpoint: Option<String>,

    /// List the supported resource kinds and exit
    #[arg(long)]
    list_resources: bool,

    /// Save project and region as defaults for the next run
    #[arg(long)]
    remember: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_filter(s: &str) -> Result<ResourceFilter, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcp-import {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcp-import").join("gcp-import.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcp-import").join("gcp-import.log");
    }
    PathBuf::from("gcp-import.log")
}

/// Descriptors of one resource kind, as dumped on stdout
#[derive(Serialize)]
struct KindOutput<'a> {
    kind: &'a str,
    resource_type: &'a str,
    resources: Vec<ResourceDescriptor>,
}

fn resolve_kinds(requested: &[String]) -> Result<Vec<&'static ResourceKind>> {
    let keys: Vec<&str> = if requested.is_empty() {
        resource::get_all_resource_keys()
    } else {
        requested.iter().map(String::as_str).collect()
    };

    keys.into_iter()
        .map(|key| match resource::get_resource(key) {
            Some(kind) => Ok(kind),
            None => bail!(
                "Unknown resource kind '{}'. Supported: {}",
                key,
                resource::get_all_resource_keys().join(", ")
            ),
        })
        .collect()
}

fn describe_failure(err: &GenerateError) -> String {
    match err {
        GenerateError::List(ListError::Page { source, .. }) => {
            format!("{}: {}", err, format_gcp_error(source))
        },
        _ => err.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if args.list_resources {
        for key in resource::get_all_resource_keys() {
            if let Some(kind) = resource::get_resource(key) {
                println!("{:<20} {:<36} {}", key, kind.resource_type, kind.display_name);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load();
    let project = args
        .project
        .clone()
        .unwrap_or_else(|| config.effective_project());
    let region = args
        .region
        .clone()
        .unwrap_or_else(|| config.effective_region());

    if project.is_empty() {
        bail!("No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag");
    }

    let requested = if args.resources.is_empty() {
        config.resources.clone()
    } else {
        args.resources.clone()
    };
    let kinds = resolve_kinds(&requested)?;

    tracing::info!(
        "Importing {} kind(s) from project: {}, region: {}",
        kinds.len(),
        project,
        region
    );

    let credentials = match &args.access_token {
        Some(token) => GcpCredentials::from_access_token(token.clone()),
        None => GcpCredentials::new().await?,
    };
    let mut client = GcpClient::with_credentials(credentials)?;
    if let Some(endpoint) = &args.endpoint {
        client = client.with_endpoint(endpoint)?;
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, stopping listing");
                cancel.cancel();
            }
        });
    }

    let generator_args = GeneratorArgs::new(&project, &region);
    let mut jobs = Vec::with_capacity(kinds.len());
    for kind in &kinds {
        let mut source = RestPageSource::new(client.clone(), (*kind).clone());
        if let Some(size) = args.page_size {
            source = source.with_page_size(size);
        }
        jobs.push(GenerationJob {
            generator: Generator::new(kind, generator_args.clone())?
                .with_filters(args.filter.clone()),
            source: Box::new(source),
        });
    }

    let results = generate_all(&jobs, &cancel).await;

    let mut outputs = Vec::new();
    let mut failed = false;
    for (kind, result) in kinds.iter().zip(results) {
        match result {
            Ok(resources) => outputs.push(KindOutput {
                kind: &kind.key,
                resource_type: &kind.resource_type,
                resources,
            }),
            Err(err) => {
                failed = true;
                tracing::error!("{}: {}", kind.key, err_chain(&err));
                eprintln!("Error: {}", describe_failure(&err));
            },
        }
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outputs)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&outputs)?),
    }

    if args.remember {
        config.remember(&project, &region)?;
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Render an error and its sources on one line for the log file
fn err_chain(err: &GenerateError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
