//! weft — the Weft CLI
//!
//! Run fluent queries against a configured database and weave related
//! records into the output.
//!
//! # Usage
//!
//! ```bash
//! # Fetch rows
//! weft User --select id,name --where "id > 1" --limit 10
//!
//! # Dry run (show SQL only)
//! weft User --where "active = true" --dry-run
//!
//! # Resolve relationships
//! weft User --limit 10 --with Post:has_many:posts
//!
//! # Paginate
//! weft User --limit 10 --page 3
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use weft::prelude::*;

#[derive(Parser)]
#[command(name = "weft")]
#[command(author = "Weft Contributors")]
#[command(version)]
#[command(about = "A minimal ORM CLI — fetch flat, weave in memory", long_about = None)]
#[command(after_help = "EXAMPLES:
    weft User --select id,name --where 'id > 1' --limit 10
    weft User --limit 10 --page 3 --with Post:has_many:posts
    weft Post --one --where 'id = 7' --with User:belongs_to:author")]
struct Cli {
    /// The model to query (declared in weft.toml)
    model: Option<String>,

    /// Columns to select, comma-separated
    #[arg(short, long)]
    select: Option<String>,

    /// Filter expression, e.g. "id > 1" (repeat to combine; end an
    /// expression with "and"/"or" to choose the connective)
    #[arg(short = 'w', long = "where")]
    wheres: Vec<String>,

    /// Ordering expression, e.g. "created_at desc"
    #[arg(short, long)]
    order: Option<String>,

    /// Maximum number of rows
    #[arg(short, long)]
    limit: Option<u64>,

    /// Page number (requires --limit)
    #[arg(short, long)]
    page: Option<u64>,

    /// Fetch a single record instead of a collection
    #[arg(long)]
    one: bool,

    /// Relationship to resolve, as model:kind:property (repeatable)
    #[arg(long = "with")]
    with: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Database connection URL
    #[arg(long, env = "WEFT_DATABASE_URL")]
    database_url: Option<String>,

    /// Don't execute, just show the generated SQL
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and explain a filter expression
    Explain {
        /// The filter expression to explain
        expr: String,
    },
    /// List the models declared in weft.toml
    Models,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("weft=debug")),
            )
            .init();
    }

    let result = match &cli.command {
        Some(Commands::Explain { expr }) => explain_expr(expr),
        Some(Commands::Models) => list_models(),
        None => run_query(&cli).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run_query(cli: &Cli) -> anyhow::Result<()> {
    let Some(model_name) = &cli.model else {
        println!("{}", "weft — fetch flat, weave in memory".cyan().bold());
        println!();
        println!("Usage: weft <MODEL> [OPTIONS]");
        println!();
        println!("Try: weft --help");
        return Ok(());
    };

    let config = Config::load()?;
    let registry = config.registry();

    let mut query = Query::new();
    if let Some(select) = &cli.select {
        query.select(select.split(',').map(str::trim));
    }
    for expr in &cli.wheres {
        parse_where(expr)?.apply(&mut query);
    }
    if let Some(order) = &cli.order {
        query.order(order.clone());
    }
    if let Some(limit) = cli.limit {
        query.limit(limit);
    }

    let specs = cli
        .with
        .iter()
        .map(|s| s.parse::<RelationSpec>())
        .collect::<WeftResult<Vec<_>>>()?;

    let db_url = cli
        .database_url
        .clone()
        .or_else(|| config.database_url().map(str::to_string));

    // Dry run or no database URL - just show SQL
    if cli.dry_run || db_url.is_none() {
        let def = registry.get(model_name)?;
        show_sql(def, &query, cli.one);

        if db_url.is_none() && !cli.dry_run {
            println!();
            println!(
                "{}",
                "⚠ No database URL. Use --database-url, set WEFT_DATABASE_URL, or add [database] to weft.toml"
                    .yellow()
            );
        }
        return Ok(());
    }

    let store = AnyStore::shared(&db_url.unwrap()).await?;
    let mut model = Model::new(&registry, model_name, store)?;

    let paginate = match cli.page {
        Some(page) => Some(Paginate::new(&model, &mut query, page).await?),
        None => None,
    };

    let model = model.execute(query);
    if cli.one {
        model.find().await?;
    } else {
        model.all().await?;
    }

    let fetched = if specs.is_empty() || model.get().is_none() {
        model.take_results()
    } else {
        Some(model.make_relations_with(&specs).await?)
    };

    match fetched {
        Some(fetched) => format_output(&fetched, &cli.format),
        None => println!("{}", "(no results)".dimmed()),
    }

    if let Some(paginate) = paginate {
        println!();
        print_links(&paginate);
    }

    Ok(())
}

fn show_sql(def: &ModelDef, query: &Query, one: bool) {
    let sql = if one {
        weft::statement::find_statement(&def.table, query)
    } else {
        weft::statement::select_statement(&def.table, query)
    };

    println!("{}", "Generated SQL:".green().bold());
    println!("{}", sql.white());

    if !query.binds().is_empty() {
        println!();
        println!("{}", "Bindings:".cyan());
        for (name, value) in query.binds() {
            println!("  :{} = {}", name, value.to_string().yellow());
        }
    }
}

fn format_output(fetched: &Fetched, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&fetched.to_json()).unwrap_or_default()
            );
        }
        OutputFormat::Table => {
            let records = match fetched {
                Fetched::One(record) => std::slice::from_ref(record),
                Fetched::Many(records) => records.as_slice(),
            };
            format_table(records);
        }
    }
}

fn format_table(records: &[Record]) {
    if records.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    // Column layout comes from the first record
    let columns: Vec<&String> = records[0].attributes().keys().collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for record in records {
        for (i, column) in columns.iter().enumerate() {
            let len = cell(record, column).len();
            widths[i] = widths[i].max(len);
        }
    }

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
        .collect();
    println!("{}", header.join(" │ ").white().bold());

    let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", sep.join("─┼─").dimmed());

    for record in records {
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", cell(record, c), width = widths[i]))
            .collect();
        println!("{}", cells.join(" │ "));
    }

    println!();
    println!("{} record(s) returned", records.len().to_string().cyan());
}

/// Render one attribute for a table cell.
fn cell(record: &Record, column: &str) -> String {
    match record.get(column) {
        Some(Attr::Value(value)) => value.to_string(),
        Some(Attr::Record(related)) => format!("<{}>", related.entity()),
        Some(Attr::Records(related)) => format!("[{} records]", related.len()),
        None => String::new(),
    }
}

fn print_links(paginate: &Paginate) {
    let links = paginate.links(5);
    if links.is_empty() {
        return;
    }

    let rendered: Vec<String> = links
        .iter()
        .map(|link| {
            if link.current {
                format!("[{}]", link.page).white().bold().to_string()
            } else {
                link.page.to_string().dimmed().to_string()
            }
        })
        .collect();
    println!(
        "{} {} {}",
        "Page".cyan(),
        rendered.join(" "),
        format!("of {}", paginate.pages()).dimmed()
    );
}

fn explain_expr(expr: &str) -> anyhow::Result<()> {
    println!("{}", "Filter Explanation".cyan().bold());
    println!();
    println!("{} {}", "Expression:".dimmed(), expr.yellow());
    println!();

    let parsed = parse_where(expr)?;
    println!("{}", "Parsed Structure:".green().bold());
    println!("  {} {}", "Field:".dimmed(), parsed.field.white());
    println!("  {} {}", "Operator:".dimmed(), parsed.operator.cyan());
    println!(
        "  {} {}",
        "Value:".dimmed(),
        parsed.value.to_string().yellow()
    );
    if let Some(connective) = parsed.connective {
        println!("  {} {}", "Connective:".dimmed(), connective.to_string().cyan());
    }

    let mut query = Query::new();
    parsed.apply(&mut query);
    println!();
    println!("{}", "Generated fragment:".green().bold());
    println!(
        "  {}",
        query
            .fragment(Part::Where)
            .unwrap_or_default()
            .trim_start()
            .white()
    );

    Ok(())
}

fn list_models() -> anyhow::Result<()> {
    let config = Config::load()?;

    if config.models.is_empty() {
        println!("{}", "No models declared. Add [[models]] entries to weft.toml.".yellow());
        return Ok(());
    }

    println!("{}", "Declared models:".green().bold());
    for model in &config.models {
        let entity = model
            .entity
            .clone()
            .unwrap_or_else(|| format!("{}Entity", model.name));
        println!(
            "  {} {} {} {}",
            model.name.white().bold(),
            format!("({})", model.table).dimmed(),
            "→".dimmed(),
            entity.cyan()
        );
    }

    Ok(())
}
