//! codesearch: CLI entry point.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use codesearch::bulk::{default_lister, run_bulk_index};
use codesearch::query::files::{expand_patterns, files_from_search, search_request};
use codesearch::query::output::{should_show_path, write_file_hits, OutputOptions};
use codesearch::query::{query_files, QueryMode};
use codesearch::search::{format_results, SearchMode, SearchRequest};
use codesearch::store::{DocumentStore, TypesenseStore};
use codesearch::watcher::IndexMaintainer;
use codesearch::Config;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "codesearch",
    about = "Structural C# code search over a Typesense index"
)]
#[command(version, propagate_version = true)]
struct Cli {
    /// Config file (defaults to ./codesearch.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every tracked file under the source root
    Index {
        /// Drop and recreate the collection first
        #[arg(long)]
        reset: bool,

        /// Source root (overrides src_root from the config)
        #[arg(long)]
        src: Option<PathBuf>,
    },

    /// Keep the index in step with file changes until interrupted
    Watch {
        /// Source root (overrides src_root from the config)
        #[arg(long)]
        src: Option<PathBuf>,
    },

    /// Full-text search over the index
    Search {
        query: String,

        #[command(flatten)]
        mode: SearchModeArgs,

        /// Filter by extension (e.g. cs, h, py)
        #[arg(long)]
        ext: Option<String>,

        /// Filter by subsystem (first path segment)
        #[arg(long)]
        sub: Option<String>,

        #[arg(long, default_value = "10")]
        limit: usize,

        /// Show facet counts per subsystem and extension
        #[arg(long)]
        facets: bool,

        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Structural query over C# files
    Query {
        #[command(flatten)]
        mode: QueryModeArgs,

        /// Files, directories or glob patterns
        #[arg(value_name = "FILE_OR_PATTERN")]
        files: Vec<String>,

        /// Pick files with an index search instead of patterns
        #[arg(long, value_name = "QUERY")]
        search: Option<String>,

        #[arg(long, value_name = "SUBSYSTEM")]
        search_sub: Option<String>,

        #[arg(long, value_name = "EXT", default_value = "cs")]
        search_ext: String,

        #[arg(long, value_name = "N", default_value = "50")]
        search_limit: usize,

        /// Never prefix hits with the file path
        #[arg(long)]
        no_path: bool,

        /// Only print match counts per file and a total
        #[arg(long)]
        count: bool,

        /// Surrounding source lines per hit
        #[arg(long, value_name = "N", default_value = "0")]
        context: usize,
    },

    /// Show store health and document count
    Status,
}

#[derive(Args)]
#[group(multiple = false)]
struct SearchModeArgs {
    /// Search type and member names only
    #[arg(long)]
    symbols: bool,
    /// Types inheriting from or implementing the query
    #[arg(long)]
    implements: bool,
    /// Files calling the queried method
    #[arg(long)]
    callers: bool,
    /// Method signatures
    #[arg(long)]
    sig: bool,
    /// Files referencing the queried type
    #[arg(long)]
    uses: bool,
    /// Files decorated with the queried attribute
    #[arg(long)]
    attr: bool,
}

impl SearchModeArgs {
    fn mode(&self) -> SearchMode {
        if self.symbols {
            SearchMode::Symbols
        } else if self.implements {
            SearchMode::Implements
        } else if self.callers {
            SearchMode::Callers
        } else if self.sig {
            SearchMode::Sig
        } else if self.uses {
            SearchMode::Uses
        } else if self.attr {
            SearchMode::Attr
        } else {
            SearchMode::Text
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct QueryModeArgs {
    /// List type declarations
    #[arg(long)]
    classes: bool,
    /// List members
    #[arg(long)]
    methods: bool,
    /// List fields and properties
    #[arg(long)]
    fields: bool,
    /// Invocations of METHOD
    #[arg(long, value_name = "METHOD")]
    calls: Option<String>,
    /// Types inheriting from or implementing TYPE
    #[arg(long, value_name = "TYPE")]
    implements: Option<String>,
    /// References to TYPE
    #[arg(long, value_name = "TYPE")]
    uses: Option<String>,
    /// Fields and properties of exactly TYPE
    #[arg(long, value_name = "TYPE")]
    field_type: Option<String>,
    /// Parameters of exactly TYPE
    #[arg(long, value_name = "TYPE")]
    param_type: Option<String>,
    /// Casts to TYPE
    #[arg(long, value_name = "TYPE")]
    casts: Option<String>,
    /// Every occurrence of identifier NAME
    #[arg(long, value_name = "NAME")]
    ident: Option<String>,
    /// Attributes, optionally only NAME
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    attrs: Option<String>,
    /// Using directives
    #[arg(long)]
    usings: bool,
    /// Full source of declarations named NAME
    #[arg(long, value_name = "NAME")]
    find: Option<String>,
    /// Parameter list of METHOD
    #[arg(long, value_name = "METHOD")]
    params: Option<String>,
}

impl QueryModeArgs {
    fn into_mode(self) -> QueryMode {
        if self.classes {
            return QueryMode::Classes;
        }
        if self.methods {
            return QueryMode::Methods;
        }
        if self.fields {
            return QueryMode::Fields;
        }
        if self.usings {
            return QueryMode::Usings;
        }
        if let Some(name) = self.attrs {
            return QueryMode::Attrs(Some(name).filter(|n| !n.is_empty()));
        }
        let with_arg: [(Option<String>, fn(String) -> QueryMode); 9] = [
            (self.calls, QueryMode::Calls),
            (self.implements, QueryMode::Implements),
            (self.uses, QueryMode::Uses),
            (self.field_type, QueryMode::FieldType),
            (self.param_type, QueryMode::ParamType),
            (self.casts, QueryMode::Casts),
            (self.ident, QueryMode::Ident),
            (self.find, QueryMode::Find),
            (self.params, QueryMode::Params),
        ];
        with_arg
            .into_iter()
            .find_map(|(value, make)| value.map(make))
            .unwrap_or(QueryMode::Classes)
    }
}

fn open_store(config: &Config) -> anyhow::Result<TypesenseStore> {
    TypesenseStore::new(&config.store).context("Failed to create document store client")
}

fn cmd_index(config: Config, reset: bool) -> anyhow::Result<()> {
    let root = config.canonical_src_root()?;
    let store = open_store(&config)?;
    let lister = default_lister(&root);
    let report = run_bulk_index(&store, lister.as_ref(), &root, &config, reset)?;
    if report.failed_batches > 0 {
        bail!(
            "{} batch imports failed ({} errors)",
            report.failed_batches,
            report.errors
        );
    }
    Ok(())
}

fn cmd_watch(config: Config) -> anyhow::Result<()> {
    let root = config.canonical_src_root()?;
    let store: Arc<dyn DocumentStore> = Arc::new(open_store(&config)?);
    store.ensure_collection(false)?;

    let mut maintainer = IndexMaintainer::new(&root, Arc::new(config), store)?;
    maintainer.start()?;

    let mut signals = signal_hook::iterator::Signals::new([
        signal_hook::consts::SIGINT,
        signal_hook::consts::SIGTERM,
    ])
    .context("Failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!("Received signal {}, flushing and stopping", signal);
    }
    maintainer.stop();
    Ok(())
}

fn cmd_search(
    config: &Config,
    request: &SearchRequest,
    facets: bool,
    json: bool,
) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let response = store.search(&request.to_params())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", format_results(&response, request, facets));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_query(
    config: &Config,
    mode: QueryMode,
    patterns: &[String],
    search: Option<String>,
    search_sub: Option<String>,
    search_ext: String,
    search_limit: usize,
    no_path: bool,
    count: bool,
    context: usize,
) -> anyhow::Result<()> {
    let used_search = search.is_some();
    let files = match search {
        Some(query) => {
            let store = open_store(config)?;
            let request = search_request(&query, search_sub, Some(search_ext), search_limit);
            let files = files_from_search(&store, config.src_root.as_deref(), &request)?;
            if files.is_empty() {
                bail!("No matching files found in index.");
            }
            files
        }
        None => {
            if patterns.is_empty() {
                bail!("Give FILE_OR_PATTERN arguments or --search QUERY");
            }
            let files = expand_patterns(patterns);
            if files.is_empty() {
                bail!("No .cs files found: {}", patterns.join(" "));
            }
            files
        }
    };

    let has_glob = patterns.iter().any(|p| p.contains(['*', '?']));
    let options = OutputOptions {
        show_path: should_show_path(no_path, files.len(), has_glob || used_search),
        count_only: count,
        context,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut total = 0;
    for file in query_files(&files, &mode) {
        total += write_file_hits(&mut out, &file, &mode, &options)?;
    }
    if count {
        writeln!(out, "\nTotal: {}", total)?;
    } else if files.len() > 1 {
        eprintln!("\n({} matches across {} files)", total, files.len());
    }
    Ok(())
}

fn cmd_status(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config)?;
    println!("-- Codesearch Status --------------------------------------------");
    match store.health() {
        Ok(true) => println!("  Server  : [OK]  {}", config.store.base_url()),
        Ok(false) => println!("  Server  : [!!] {} failed its health check", config.store.base_url()),
        Err(e) => {
            println!("  Server  : [--] {}", e);
            println!("  Index   : (server unavailable)");
            return Ok(());
        }
    }
    match store.collection_stats()? {
        Some(stats) => println!("  Index   : {} documents in '{}'", stats.num_documents, stats.name),
        None => println!(
            "  Index   : collection '{}' not found - run: codesearch index --reset",
            store.collection()
        ),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "codesearch=debug" } else { "codesearch=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Index { reset, src } => cmd_index(config.with_src_root(src), reset)?,
        Commands::Watch { src } => cmd_watch(config.with_src_root(src))?,
        Commands::Search {
            query,
            mode,
            ext,
            sub,
            limit,
            facets,
            json,
        } => {
            let request = SearchRequest {
                mode: mode.mode(),
                extension: ext,
                subsystem: sub,
                limit,
                ..SearchRequest::new(query)
            };
            cmd_search(&config, &request, facets, json)?;
        }
        Commands::Query {
            mode,
            files,
            search,
            search_sub,
            search_ext,
            search_limit,
            no_path,
            count,
            context,
        } => cmd_query(
            &config,
            mode.into_mode(),
            &files,
            search,
            search_sub,
            search_ext,
            search_limit,
            no_path,
            count,
            context,
        )?,
        Commands::Status => cmd_status(&config)?,
    }
    Ok(())
}
