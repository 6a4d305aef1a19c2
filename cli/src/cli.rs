use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "tube-admin")]
#[command(about = "Moderate the users of a video platform instance", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Instance URL, e.g. https://videos.example.org
    #[arg(long, global = true, env = "TUBE_ADMIN_URL")]
    pub url: Option<String>,

    /// OAuth access token of the operator
    #[arg(long, global = true, env = "TUBE_ADMIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request timeout in seconds [env: TUBE_ADMIN_TIMEOUT_SECS]
    #[arg(long = "timeout", global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save the instance URL and access token
    Login,
    /// List and moderate users
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Show your notifications
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,

        /// Number of notifications to show
        #[arg(long, short = 'c', default_value = "15")]
        count: u32,
    },
    /// Show the live settings of a video
    Live {
        /// Video id, UUID or short UUID
        video_id: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List users, one page at a time
    List(ListArgs),
    /// Delete users
    Delete(BulkArgs),
    /// Ban users
    Ban(BulkArgs),
    /// Unban users
    Unban(BulkArgs),
    /// Mark the email of users as verified
    VerifyEmail(BulkArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Zero-based offset
    #[arg(long, default_value = "0")]
    pub start: u64,

    /// Page size (10, 20, 50 or 100)
    #[arg(long, short = 'c')]
    pub count: Option<u32>,

    /// Sort field, prefixed with `-` for descending (e.g. -createdAt)
    #[arg(long, short = 's', allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Search text; `banned:true` restricts to banned users
    #[arg(long, short = 'q')]
    pub search: Option<String>,

    /// Comma separated column ids to show
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Highlight banned users
    #[arg(long)]
    pub highlight_banned: bool,

    /// Pick users and a bulk action interactively
    #[arg(long, short = 'I')]
    pub interactive: bool,
}

#[derive(Args)]
pub struct BulkArgs {
    /// Usernames to act on
    #[arg(required = true)]
    pub usernames: Vec<String>,

    /// Search used to load the page holding the users (defaults to the
    /// username when acting on a single user)
    #[arg(long, short = 'q')]
    pub search: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Ban reason (ban only)
    #[arg(long)]
    pub reason: Option<String>,
}
