use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use querylens_diagnostics::project;
use querylens_interface::{page_links, PageLink};
use querylens_locations::{DirectorySnapshot, ResolvableLocation};
use querylens_results::{
    interpretation, results_header, CompletedQuery, QueryInfo, QueryStatus, ResultsPaths,
    ALERTS_PER_RUN_LIMIT, PAGE_SIZE,
};
use querylens_store::{
    CellValue, EngineClient, QueryMetadata, ResultStore, SortDirection, SortSpec, SourceInfo,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "querylens")]
#[command(about = "Browse analysis-engine result stores from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the result-store engine binary
    #[arg(long, global = true, default_value = "qlengine")]
    engine: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the result sets in a results file
    Info(InfoArgs),
    /// Print one page of one result set
    Page(PageArgs),
    /// Interpret results as alerts and print them
    Alerts(AlertsArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// The results file to describe
    results: PathBuf,
}

#[derive(Args)]
struct PageArgs {
    /// The results file to read
    results: PathBuf,

    /// Result set to page through
    #[arg(long, default_value = "#select")]
    set: String,

    /// Page number, starting at 0
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Sort by this column index before paging
    #[arg(long)]
    sort_column: Option<usize>,

    /// Sort descending instead of ascending
    #[arg(long)]
    descending: bool,
}

#[derive(Args)]
struct AlertsArgs {
    /// The results file to interpret
    results: PathBuf,

    /// Result kind from the query metadata, e.g. "problem"
    #[arg(long)]
    kind: String,

    /// Query id from the query metadata
    #[arg(long)]
    id: Option<String>,

    /// Unpacked source snapshot to resolve alert locations against
    #[arg(long)]
    source_archive: Option<PathBuf>,

    /// Path prefix the analysis ran under
    #[arg(long, default_value = "")]
    source_prefix: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let engine = EngineClient::new(&cli.engine);
    match cli.command {
        Commands::Info(args) => run_info(&engine, args).await,
        Commands::Page(args) => run_page(&engine, args).await,
        Commands::Alerts(args) => run_alerts(&engine, args).await,
    }
}

async fn run_info(engine: &EngineClient, args: InfoArgs) -> Result<()> {
    let info = engine
        .info(&args.results, PAGE_SIZE)
        .await
        .with_context(|| format!("describing {}", args.results.display()))?;
    for set in &info.result_sets {
        let columns: Vec<String> = set
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                column
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("[{index}]"))
            })
            .collect();
        println!("{}\t{} rows\t({})", set.name, set.rows, columns.join(", "));
    }
    Ok(())
}

async fn run_page(engine: &EngineClient, args: PageArgs) -> Result<()> {
    let paths = ResultsPaths::for_results(args.results.clone());
    let status = QueryStatus::Success { evaluation_ms: 0 };
    let header = results_header(engine, &status, &paths).await?;
    let rows = header
        .as_ref()
        .and_then(|header| header.result_set(&args.set))
        .map(|schema| schema.rows)
        .unwrap_or(0);

    let query = CompletedQuery::new(
        QueryInfo {
            run_id: 0,
            query_name: query_name(&args.results),
            database_name: String::new(),
            time: String::new(),
            metadata: None,
            paths,
        },
        status,
        header,
    );

    let sort = args.sort_column.map(|column_index| SortSpec {
        column_index,
        direction: if args.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
    });
    let Some(page) = query
        .get_page(engine, &args.set, args.page, sort.as_ref())
        .await?
    else {
        bail!("no page {} in result set {}", args.page, args.set);
    };

    for (index, tuple) in page.tuples.iter().enumerate() {
        let cells: Vec<String> = tuple.iter().map(render_cell).collect();
        println!("{}\t{}", args.page * PAGE_SIZE + index + 1, cells.join("\t"));
    }

    let total_pages = if rows == 0 { 1 } else { (rows - 1) / PAGE_SIZE + 1 };
    println!("{}", render_page_strip(total_pages, args.page));
    Ok(())
}

async fn run_alerts(engine: &EngineClient, args: AlertsArgs) -> Result<()> {
    let paths = ResultsPaths::for_results(args.results.clone());
    let metadata = QueryMetadata {
        kind: Some(args.kind.clone()),
        id: args.id.clone(),
        ..QueryMetadata::default()
    };
    let source_info = args.source_archive.as_ref().map(|archive| SourceInfo {
        source_archive: archive.clone(),
        source_location_prefix: args.source_prefix.clone(),
    });

    let interpretation = interpretation(
        engine,
        Some(&metadata),
        &paths,
        source_info.as_ref(),
        &args.source_prefix,
        ALERTS_PER_RUN_LIMIT,
    )
    .await?;

    let results = interpretation
        .log
        .runs
        .first()
        .and_then(|run| run.results.as_ref());
    match results {
        None => println!("no alerts"),
        Some(results) => {
            for result in results {
                let message = result.message.text.as_deref().unwrap_or("<no message>");
                println!("warning: {message}");
            }
        }
    }
    if interpretation.num_truncated_results > 0 {
        println!(
            "({} results truncated)",
            interpretation.num_truncated_results
        );
    }

    if let Some(archive) = &args.source_archive {
        let snapshot = DirectorySnapshot::new(archive);
        let diagnostics = project(&interpretation, &snapshot);
        for (file, entries) in &diagnostics {
            println!("{}: {} diagnostic(s)", file.display(), entries.len());
            for diagnostic in entries {
                println!(
                    "  {}:{}: {}",
                    diagnostic.range.start.line + 1,
                    diagnostic.range.start.column + 1,
                    diagnostic.message
                );
            }
        }
    }
    Ok(())
}

fn query_name(results: &std::path::Path) -> String {
    results
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Renders a cell the way the results table would: entities become links
/// when their location is resolvable, plain labels otherwise.
fn render_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Entity(entity) => {
            let label = match entity.label.as_deref() {
                None | Some("") => "[empty string]",
                Some(label) => label,
            };
            match entity.location.as_ref().and_then(|loc| loc.resolvable()) {
                Some(ResolvableLocation::LineColumn {
                    uri,
                    line_start,
                    col_start,
                    ..
                }) => format!("{label} ({uri}:{line_start}:{col_start})"),
                Some(ResolvableLocation::WholeFile { uri }) => format!("{label} ({uri})"),
                None => label.to_string(),
            }
        }
        other => other.to_string(),
    }
}

fn render_page_strip(total_pages: usize, selected: usize) -> String {
    let rendered: Vec<String> = page_links(total_pages, selected)
        .into_iter()
        .map(|link| match link {
            PageLink::Link(index) => (index + 1).to_string(),
            PageLink::Current(index) => format!("[{}]", index + 1),
            PageLink::Gap => "...".to_string(),
        })
        .collect();
    format!("pages: {}", rendered.join(" "))
}
