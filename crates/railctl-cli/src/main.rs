mod commands;

use clap::{Parser, Subcommand};
use railctl_core::{Category, Line, Station};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::issue::IssueArgs;
use commands::TrainArgs;

#[derive(Parser)]
#[command(name = "railctl", about = "Section-control decision desk", version)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log store and planner activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a decision store in the current directory
    Init,

    /// Issue a decision to stations (the decision form)
    Issue(IssueArgs),

    /// Report a track closure
    Close {
        /// Closed line ("Up Main", "Down Main", "Reverse")
        #[arg(long)]
        line: Line,

        /// Station the closure starts at
        #[arg(long)]
        from: Station,

        /// Station the closure ends at
        #[arg(long)]
        to: Option<Station>,

        #[arg(long)]
        author: Option<String>,
    },

    /// Show the decision feed, newest first
    List {
        /// Only decisions in effect now
        #[arg(long)]
        active: bool,

        /// Only decisions addressed to this station
        #[arg(long)]
        station: Option<Station>,

        /// With --station: only those it has not acknowledged
        #[arg(long, requires = "station")]
        pending: bool,

        /// Only track closures
        #[arg(long)]
        closures: bool,

        /// Only decisions in this category
        #[arg(long)]
        category: Option<Category>,

        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "50")]
        max_count: usize,
    },

    /// Show one decision by ID or prefix
    Show {
        /// Decision ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Acknowledge a decision for one station
    Ack {
        /// Decision ID (full or prefix)
        id: String,

        #[arg(long)]
        station: Station,
    },

    /// Withdraw (delete) a decision
    Withdraw {
        /// Decision ID (full or prefix)
        id: String,
    },

    /// Line loads and buckets as of now
    Status,

    /// Station, loop and line occupancy grid
    Occupancy {
        /// Only stations whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Offline strategy suggestions for a train
    Suggest(TrainArgs),

    /// Ask the model for strategies for a train
    Plan {
        #[command(flatten)]
        train: TrainArgs,

        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        #[arg(long, env = "GEMINI_MODEL", default_value = railctl_planner::gemini::DEFAULT_GEMINI_MODEL)]
        model: String,

        /// Upper bound on the upstream call
        #[arg(long, env = "RAILCTL_AI_TIMEOUT_SECS", default_value_t = railctl_planner::gemini::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
}

fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.verbose {
        init_logging();
    }

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Issue(args) => commands::issue::run(args, cli.json),
        Commands::Close {
            line,
            from,
            to,
            author,
        } => commands::close::run(line, from, to, author, cli.json),
        Commands::List {
            active,
            station,
            pending,
            closures,
            category,
            max_count,
        } => commands::list::run(
            commands::list::Filter {
                active,
                station,
                pending,
                closures,
                category,
            },
            max_count,
            cli.json,
        ),
        Commands::Show { id } => commands::show::run(id, cli.json),
        Commands::Ack { id, station } => commands::ack::run(id, station, cli.json),
        Commands::Withdraw { id } => commands::withdraw::run(id),
        Commands::Status => commands::status::run(cli.json),
        Commands::Occupancy { search } => commands::occupancy::run(search, cli.json),
        Commands::Suggest(train) => commands::suggest::run(train, cli.json),
        Commands::Plan {
            train,
            api_key,
            model,
            timeout_secs,
        } => commands::plan::run(train, api_key, model, timeout_secs, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railctl=debug,railctl_store=debug,railctl_planner=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
