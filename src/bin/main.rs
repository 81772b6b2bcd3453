//! semview CLI - Compose semantic-layer views to SQL
//!
//! Usage:
//!   semview [--config <file>] build <view> [--project <file>]
//!   semview head <view> [-n <rows>]
//!   semview count <view>
//!   semview list [--output json]
//!   semview validate
//!
//! Examples:
//!   semview build sales_view --project datasets.toml
//!   semview head sales_view -n 20 --project datasets.toml
//!   RUST_LOG=semview=debug semview build sales_view

use clap::{Args, Parser, Subcommand, ValueEnum};
use semview::config::{DatasetKind, Project, ProjectResult, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "semview")]
#[command(about = "semview - Compose semantic-layer views into a single SQL query")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to SEMVIEW_CONFIG, ./semview.toml, ~/.config/semview/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProjectArg {
    /// Project file listing datasets (defaults to `project` in settings)
    #[arg(short, long)]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full query for a dataset or view
    Build {
        view: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Print a preview query capped at a number of rows
    Head {
        view: String,
        /// Number of rows (defaults to preview.rows in settings)
        #[arg(short = 'n', long)]
        rows: Option<u64>,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Print a row count query for a dataset or view
    Count {
        view: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// List datasets in a project
    List {
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Load a project and check every dataset composes
    Validate {
        #[command(flatten)]
        project: ProjectArg,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// One dataset per line
    Text,
    /// JSON array of {name, kind}
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Build { view, project } => with_project(&settings, project, |p| {
            print_sql(p.build_query(&view))
        }),
        Commands::Head {
            view,
            rows,
            project,
        } => {
            let rows = rows.unwrap_or(settings.preview.rows);
            with_project(&settings, project, |p| print_sql(p.head_query(&view, rows)))
        }
        Commands::Count { view, project } => with_project(&settings, project, |p| {
            print_sql(p.row_count_query(&view))
        }),
        Commands::List { output, project } => {
            with_project(&settings, project, |p| cmd_list(p, output))
        }
        Commands::Validate { project } => with_project(&settings, project, cmd_validate),
    }
}

fn with_project<F>(settings: &Settings, arg: ProjectArg, f: F) -> ExitCode
where
    F: FnOnce(&Project) -> ExitCode,
{
    let path = match arg.project {
        Some(path) => path,
        None => match settings.project_path() {
            Ok(Some(path)) => path,
            Ok(None) => {
                eprintln!("No project file given. Pass --project or set `project` in settings.");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Error resolving project path: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match Project::from_file(&path) {
        Ok(project) => f(&project.with_max_view_depth(settings.composition.max_view_depth)),
        Err(e) => {
            eprintln!("Error loading project '{}': {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_sql(result: ProjectResult<String>) -> ExitCode {
    match result {
        Ok(sql) => {
            println!("{}", sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_list(project: &Project, output: OutputFormat) -> ExitCode {
    let datasets = project.datasets();

    match output {
        OutputFormat::Text => {
            if datasets.is_empty() {
                println!("No datasets defined.");
            }
            for (name, kind) in datasets {
                println!("{:<32} {}", name, kind.as_str());
            }
            ExitCode::SUCCESS
        }
        OutputFormat::Json => {
            let entries: Vec<_> = datasets
                .into_iter()
                .map(|(name, kind)| serde_json::json!({ "name": name, "kind": kind }))
                .collect();
            match serde_json::to_string_pretty(&entries) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing datasets: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn cmd_validate(project: &Project) -> ExitCode {
    let datasets = project.datasets();
    let mut failures = 0;
    for &(name, kind) in &datasets {
        if kind == DatasetKind::Local {
            continue;
        }
        if let Err(e) = project.build_query(name) {
            eprintln!("✗ {}: {}", name, e);
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("{} dataset(s) failed to compose", failures);
        ExitCode::FAILURE
    } else {
        println!("✓ {} dataset(s) compose", datasets.len());
        ExitCode::SUCCESS
    }
}
