#![forbid(unsafe_code)]

mod cmd;
mod output;
mod session;
mod workspace;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sf: support ticketing workspace for agents and admins",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Workspace",
        about = "Initialize a support workspace",
        long_about = "Initialize a workspace in the current directory, seeded with the demo dataset.",
        after_help = "EXAMPLES:\n    # Initialize a workspace in the current directory\n    sf init\n\n    # Emit machine-readable output\n    sf init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Workspace",
        about = "Log in as a provisioned user",
        after_help = "EXAMPLES:\n    # Email match is case-insensitive\n    sf login agent@supportflow.com"
    )]
    Login(cmd::login::LoginArgs),

    #[command(next_help_heading = "Workspace", about = "Clear the stored session")]
    Logout,

    #[command(next_help_heading = "Workspace", about = "Show the logged-in user")]
    Whoami,

    #[command(
        next_help_heading = "Tickets",
        about = "Create a new ticket",
        after_help = "EXAMPLES:\n    sf create --subject \"Export hangs\" --requester jane@acme.dev \\\n        --message \"The CSV export never finishes.\" --priority high"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "List tickets in the inbox",
        long_about = "List tickets, most recently updated first, with optional filters and pagination.",
        after_help = "EXAMPLES:\n    # Open urgent tickets\n    sf list --status open --priority urgent\n\n    # Search subject and requester email\n    sf list --query 403\n\n    # Show two pages' worth\n    sf list --pages 2\n\n    # Re-apply the most recent saved view\n    sf list --view 1"
    )]
    List(cmd::list::ListArgs),

    #[command(next_help_heading = "Tickets", about = "Show one ticket with its timeline")]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Reply to the requester",
        long_about = "Append an agent reply. The ticket becomes Answered (reopening it if Closed) and the reply is logged to the outbox."
    )]
    Reply(cmd::reply::ReplyArgs),

    #[command(next_help_heading = "Tickets", about = "Add an internal note")]
    Note(cmd::note::NoteArgs),

    #[command(next_help_heading = "Triage", about = "Set ticket status")]
    Status(cmd::status::StatusArgs),

    #[command(next_help_heading = "Triage", about = "Set ticket priority")]
    Priority(cmd::priority::PriorityArgs),

    #[command(
        next_help_heading = "Triage",
        about = "Assign a ticket",
        after_help = "EXAMPLES:\n    # Assign to yourself\n    sf assign 105 me\n\n    # Assign to user 3\n    sf assign 105 3"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(next_help_heading = "Triage", about = "Clear a ticket's assignee")]
    Unassign(cmd::assign::UnassignArgs),

    #[command(next_help_heading = "Triage", about = "Delete a ticket (admin only)")]
    Delete(cmd::delete::DeleteArgs),

    #[command(next_help_heading = "Knowledge base", about = "Manage knowledge-base articles")]
    Kb(cmd::kb::KbArgs),

    #[command(next_help_heading = "Audit", about = "Show the outbound message log")]
    Outbox(cmd::outbox::OutboxArgs),

    #[command(next_help_heading = "Audit", about = "Manage your notifications")]
    Notifications(cmd::notify::NotifyArgs),

    #[command(next_help_heading = "Admin", about = "Manage users and roles")]
    Users(cmd::users::UsersArgs),

    #[command(next_help_heading = "Admin", about = "Workspace overview numbers")]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "AI",
        about = "AI enrichment: summaries, suggestions, drafts",
        after_help = "EXAMPLES:\n    sf ai summarize 101\n    sf ai suggest 102\n    sf ai draft 102\n\nRequires GEMINI_API_KEY (or enrich.api_key in config); degrades to\nfallback text when unavailable."
    )]
    Ai(cmd::ai::AiArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SF_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "supportflow=debug,info"
        } else {
            "supportflow=info,warn"
        })
    });

    let format = env::var("SF_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::Login(ref args) => cmd::login::run_login(args, output, &project_root),
        Commands::Logout => cmd::login::run_logout(output, &project_root),
        Commands::Whoami => cmd::login::run_whoami(output, &project_root),
        Commands::Create(ref args) => cmd::create::run_create(args, output, &project_root),
        Commands::List(ref args) => cmd::list::run_list(args, output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_root),
        Commands::Reply(ref args) => cmd::reply::run_reply(args, output, &project_root),
        Commands::Note(ref args) => cmd::note::run_note(args, output, &project_root),
        Commands::Status(ref args) => cmd::status::run_status(args, output, &project_root),
        Commands::Priority(ref args) => cmd::priority::run_priority(args, output, &project_root),
        Commands::Assign(ref args) => cmd::assign::run_assign(args, output, &project_root),
        Commands::Unassign(ref args) => cmd::assign::run_unassign(args, output, &project_root),
        Commands::Delete(ref args) => cmd::delete::run_delete(args, output, &project_root),
        Commands::Kb(ref args) => cmd::kb::run_kb(args, output, &project_root),
        Commands::Outbox(ref args) => cmd::outbox::run_outbox(args, output, &project_root),
        Commands::Notifications(ref args) => cmd::notify::run_notifications(args, output, &project_root),
        Commands::Users(ref args) => cmd::users::run_users(args, output, &project_root),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output, &project_root),
        Commands::Ai(ref args) => cmd::ai::run_ai(args, output, &project_root),
    }
}
