use anyhow::Result;
use clap::{Parser, Subcommand};
use margo::commands::{self, annotate::AnnotateArgs};
use margo::config::BackendConfig;
use margo::{DatasetMatch, StatusFilter};

#[derive(Parser)]
#[command(name = "margo")]
#[command(
  about = "Dashboard annotation desk - review dashboard snapshots and record human insights"
)]
struct Cli {
  /// Backend project URL (or use SUPABASE_URL env var)
  #[arg(long, env = "SUPABASE_URL", global = true)]
  backend_url: Option<String>,

  /// Public anon key (or use SUPABASE_ANON_KEY env var)
  #[arg(long, env = "SUPABASE_ANON_KEY", global = true, hide_env_values = true)]
  anon_key: Option<String>,

  /// Storage bucket holding the screenshots (or use BUCKET_NAME env var)
  #[arg(long, env = "BUCKET_NAME", global = true)]
  bucket: Option<String>,

  /// Request timeout in seconds
  #[arg(long, env = "MARGO_TIMEOUT_SECS", global = true)]
  timeout_secs: Option<u64>,

  /// Log debug output to stderr (MARGO_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

impl Cli {
  fn backend_config(&self) -> Result<BackendConfig> {
    Ok(BackendConfig::new(
      self.backend_url.as_deref(),
      self.anon_key.as_deref(),
      self.bucket.as_deref(),
      self.timeout_secs,
    )?)
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Sign in with email and password
  Login {
    /// Account email (prompted when omitted)
    #[arg(short, long)]
    email: Option<String>,
  },
  /// Sign out and forget the stored session
  Logout,
  /// Show the signed-in reviewer
  Whoami,
  /// List dashboards, pending first
  List {
    /// all, pending or completed
    #[arg(short, long, default_value = "all")]
    status: StatusFilter,
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,
  },
  /// Show one dashboard with its screenshot URL and insight
  Show {
    /// Dashboard id
    id: String,
  },
  /// Write or edit the insight for a dashboard
  Annotate {
    /// Dashboard id
    id: String,
    /// Does the dashboard use the expected dataset (yes, no, unset)
    #[arg(short, long)]
    matches: Option<DatasetMatch>,
    /// Insight part 1
    #[arg(long = "insight-1")]
    insight_1: Option<String>,
    /// Insight part 2
    #[arg(long = "insight-2")]
    insight_2: Option<String>,
    /// Insight part 3
    #[arg(long = "insight-3")]
    insight_3: Option<String>,
  },
  /// Open the dashboard's external link in a browser
  Open {
    /// Dashboard id
    id: String,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  herald::init_tracing(cli.verbose);

  match &cli.command {
    Commands::Whoami => commands::whoami::handle().await,
    Commands::Login { email } => commands::login::handle(&cli.backend_config()?, email.clone()).await,
    Commands::Logout => commands::logout::handle(&cli.backend_config()?).await,
    Commands::List { status, page } => {
      commands::list::handle(&cli.backend_config()?, *status, *page).await
    }
    Commands::Show { id } => commands::show::handle(&cli.backend_config()?, id.clone()).await,
    Commands::Annotate { id, matches, insight_1, insight_2, insight_3 } => {
      let args = AnnotateArgs {
        id: id.clone(),
        matches: *matches,
        insights: [insight_1.clone(), insight_2.clone(), insight_3.clone()],
      };
      commands::annotate::handle(&cli.backend_config()?, args).await
    }
    Commands::Open { id } => commands::open::handle(&cli.backend_config()?, id.clone()).await,
  }
}
