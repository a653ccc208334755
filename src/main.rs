//! CLI entry point for the symptom heatmap tool.
//!
//! Provides subcommands for storing uploaded tables, listing the upload
//! store, and generating the heat layers plus the rendered map.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use symptom_heatmap::{
    decode::TableKind,
    fetch::{BasicClient, load_source},
    heat::aggregate::ColumnSpan,
    heat::pipeline::{PipelineConfig, generate},
    output::{append_report, write_json},
    render::map_html,
    select::FilenameConvention,
    store::{FsStore, UploadStore},
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "symptom_heatmap")]
#[command(about = "Builds symptom heat layers from uploaded site and survey tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store source tables (files or URLs) in the upload store
    Upload {
        /// Paths or URLs of tables to store
        #[arg(value_name = "FILE_OR_URL", required = true)]
        sources: Vec<String>,

        /// Directory backing the upload store
        #[arg(short, long, default_value = "uploads")]
        store_dir: String,
    },
    /// List the stored tables per kind
    ListUploads {
        /// Directory backing the upload store
        #[arg(short, long, default_value = "uploads")]
        store_dir: String,
    },
    /// Generate the heat layers and render the map
    Heatmap {
        /// Directory backing the upload store
        #[arg(short, long, default_value = "uploads")]
        store_dir: String,

        /// HTML file to write the rendered map to
        #[arg(short, long, default_value = "heatmap.html")]
        output: String,

        /// Optional: also write the full bundle as pretty JSON
        #[arg(long)]
        json: Option<String>,

        /// CSV file to append the run report to
        #[arg(long, default_value = "runs.csv")]
        report_log: String,

        /// First survey column summed for sites with a filter
        #[arg(long, default_value_t = 31)]
        with_start_col: usize,

        /// First survey column summed for sites without a filter
        #[arg(long, default_value_t = 18)]
        without_start_col: usize,

        /// Number of survey columns summed per site
        #[arg(long, default_value_t = 7)]
        span: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/symptom_heatmap.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("symptom_heatmap.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { sources, store_dir } => {
            upload_tables(&store_dir, &sources).await?;
        }
        Commands::ListUploads { store_dir } => {
            list_uploads(&store_dir).await?;
        }
        Commands::Heatmap {
            store_dir,
            output,
            json,
            report_log,
            with_start_col,
            without_start_col,
            span,
        } => {
            let config = PipelineConfig {
                with_span: ColumnSpan::new(with_start_col, span),
                without_span: ColumnSpan::new(without_start_col, span),
            };
            run_heatmap(&store_dir, &output, json.as_deref(), &report_log, &config).await?;
        }
    }

    Ok(())
}

/// Fetches each source and saves it into the store under its inferred kind.
#[tracing::instrument(skip(sources), fields(store_dir, count = sources.len()))]
async fn upload_tables(store_dir: &str, sources: &[String]) -> Result<()> {
    let store = FsStore::new(store_dir);
    let client = BasicClient::new();

    for source in sources {
        let bytes = load_source(&client, source).await?;
        let name = source_name(source);
        let kind = TableKind::for_name(&name);

        let saved = store.save(&name, bytes, kind).await?;
        info!(
            name = %saved.name,
            kind = %saved.kind,
            seq = saved.seq,
            bytes = saved.bytes.len(),
            "Table stored"
        );
    }

    Ok(())
}

#[tracing::instrument]
async fn list_uploads(store_dir: &str) -> Result<()> {
    let store = FsStore::new(store_dir);

    let mut counts = [0usize; 2];
    for (i, kind) in [TableKind::Csv, TableKind::Excel].into_iter().enumerate() {
        let tables = store.list(kind).await?;
        counts[i] = tables.len();

        for table in &tables {
            info!(
                kind = %kind,
                seq = table.seq,
                name = %table.name,
                bytes = table.bytes.len(),
                "Upload"
            );
        }
    }

    info!(
        csv = counts[0],
        excel = counts[1],
        "Upload store summary"
    );

    Ok(())
}

/// Runs the pipeline and writes the HTML map, optional JSON bundle, and run log.
#[tracing::instrument(skip(config), fields(store_dir, output))]
async fn run_heatmap(
    store_dir: &str,
    output: &str,
    json: Option<&str>,
    report_log: &str,
    config: &PipelineConfig,
) -> Result<()> {
    let store = FsStore::new(store_dir);

    let bundle = generate(&store, &FilenameConvention, config).await?;

    let html = map_html(&bundle)?;
    std::fs::write(output, html)?;
    info!(path = output, "Heatmap written");

    if let Some(json_path) = json {
        write_json(json_path, &bundle)?;
        info!(path = json_path, "Bundle JSON written");
    }

    append_report(report_log, &bundle.report)?;

    info!(
        sites = bundle.report.site_rows,
        with_points = bundle.report.with_points,
        without_points = bundle.report.without_points,
        dropped = bundle.report.with_dropped + bundle.report.without_dropped,
        flagged = bundle.report.flagged_markers,
        "Heatmap generation complete"
    );

    Ok(())
}

/// Derives the stored name from a source path or URL.
fn source_name(source: &str) -> String {
    let without_query = source.split(['?', '#']).next().unwrap_or(source);
    let name = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query);

    if name.is_empty() {
        "table".to_string()
    } else {
        name.to_string()
    }
}
