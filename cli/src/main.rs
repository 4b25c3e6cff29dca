//! `sitegen`: command-line front end for the website builder API.
//!
//! Each subcommand is one page of the web app. The session survives between
//! invocations in the session file, so `sitegen login` followed by
//! `sitegen dashboard` behaves like navigating in a browser.

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

mod console;
mod pages;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use client::{ApiError, AuthError, ClientConfig, Route, SiteClient};

use crate::console::ConsoleNotifier;
use crate::pages::PageContext;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Validation(&'static str),
    #[error("sign in required")]
    LoginRequired,
    #[error("navigated to {0} before the request finished")]
    Stale(Route),
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("output encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Whether a notification already told the user about this failure.
    fn notified(&self) -> bool {
        matches!(self, Self::Api(_) | Self::Auth(_) | Self::Validation(_) | Self::LoginRequired)
    }

    fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::LoginRequired | Self::Auth(AuthError::NotSignedIn) => 3,
            _ => 1,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sitegen", about = "AI website generator from the command line")]
struct Cli {
    #[arg(long, env = "SITEGEN_API_URL")]
    base_url: Option<String>,

    /// Where the signed-in session is kept between runs.
    #[arg(long, env = "SITEGEN_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Keep the session in memory only; nothing is read or written on disk.
    #[arg(long, default_value_t = false, conflicts_with = "session_file")]
    ephemeral: bool,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Landing page: API status and featured templates.
    Home,
    Health,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SITEGEN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register(RegisterArgs),
    Logout,
    Profile(ProfileCommand),
    Templates(TemplatesCommand),
    /// Your websites and their stats.
    Dashboard,
    /// Website editor.
    Site(SiteCommand),
    /// Sites currently deployed on the integrated hosting.
    Hosting,
}

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub username: String,
    #[arg(long, env = "SITEGEN_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update(ProfileArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ProfileArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub avatar_url: Option<String>,
}

#[derive(Args, Debug)]
struct TemplatesCommand {
    #[command(subcommand)]
    command: TemplatesSubcommand,
}

#[derive(Subcommand, Debug)]
enum TemplatesSubcommand {
    List(TemplateListArgs),
    Show { template_id: String },
}

#[derive(Args, Debug)]
pub(crate) struct TemplateListArgs {
    /// `portfolio`, `business`, `blog`, `ecommerce`, `landing` or `all`.
    #[arg(long)]
    pub category: Option<String>,
    /// Case-insensitive match on name or description.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_enum, default_value_t = pages::templates::SortKey::Popular)]
    pub sort: pages::templates::SortKey,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub size: Option<u32>,
}

#[derive(Args, Debug)]
struct SiteCommand {
    #[command(subcommand)]
    command: SiteSubcommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum SiteSubcommand {
    Show {
        website_id: String,
    },
    Create(SiteFields),
    Update {
        website_id: String,
        #[command(flatten)]
        fields: SiteFields,
    },
    Delete {
        website_id: String,
    },
    /// Create a site and let the server fill in its content.
    Generate(SiteFields),
    /// Download the site as a zip archive.
    Export {
        website_id: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Deploy {
        website_id: String,
        #[arg(long)]
        subdomain: Option<String>,
    },
    Undeploy {
        website_id: String,
    },
    Redeploy {
        website_id: String,
    },
    /// Enable SSL on the hosted site.
    Ssl {
        website_id: String,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct SiteFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub template_id: Option<String>,
    #[arg(long)]
    pub meta_title: Option<String>,
    #[arg(long)]
    pub meta_description: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.api_url = base_url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = Some(path);
    }
    if cli.ephemeral {
        config.session_file = None;
    }

    let notifier = Arc::new(ConsoleNotifier::stderr());
    let client = match SiteClient::new(&config, notifier.clone()) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };
    let ctx = PageContext::new(client, notifier, cli.json);
    ctx.client.auth.initialize().await;

    match run(&ctx, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(%error, "command failed");
            if !error.notified() {
                eprintln!("error: {error}");
            }
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(ctx: &PageContext, command: Command) -> Result<(), CliError> {
    match command {
        Command::Home => pages::home::show(ctx).await,
        Command::Health => pages::home::health(ctx).await,
        Command::Login { email, password } => pages::account::login(ctx, &email, &password).await,
        Command::Register(args) => pages::account::register(ctx, args).await,
        Command::Logout => {
            pages::account::logout(ctx);
            Ok(())
        }
        Command::Profile(profile) => match profile.command {
            ProfileSubcommand::Show => pages::account::show_profile(ctx).await,
            ProfileSubcommand::Update(args) => pages::account::update_profile(ctx, args).await,
        },
        Command::Templates(templates) => match templates.command {
            TemplatesSubcommand::List(args) => pages::templates::list(ctx, args).await,
            TemplatesSubcommand::Show { template_id } => pages::templates::show(ctx, &template_id).await,
        },
        Command::Dashboard => pages::dashboard::show(ctx).await,
        Command::Site(site) => pages::editor::run(ctx, site.command).await,
        Command::Hosting => pages::hosting::show(ctx).await,
    }
}
