use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "lifedesk")]
#[command(version)]
#[command(about = "Personal tasks, notes and goals over a small REST API", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Base URL of the LifeDesk server
    #[arg(
        long,
        global = true,
        env = "LIFEDESK_SERVER",
        default_value = lifedesk_client::DEFAULT_SERVER_URL
    )]
    pub server: String,

    /// Where the login token is kept between runs
    #[arg(long, global = true, env = "LIFEDESK_SESSION_FILE")]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage tasks
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Manage notes
    #[command(subcommand)]
    Notes(NoteCommand),
    /// Manage daily goals
    #[command(subcommand)]
    Goals(GoalCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, env = "LIFEDESK_BIND", default_value = lifedesk_server::config::DEFAULT_BIND)]
    pub bind: String,

    /// SQLite database file
    #[arg(long, env = "LIFEDESK_DB", default_value = lifedesk_server::config::DEFAULT_DB_FILE_NAME)]
    pub db: PathBuf,

    /// Token signing secret; a random one is generated when unset
    #[arg(long, env = "LIFEDESK_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Token lifetime in seconds
    #[arg(long, env = "LIFEDESK_TOKEN_TTL_SECS", default_value_t = 432_000)]
    pub token_ttl_secs: u64,

    /// trace|debug|info|warn|error
    #[arg(long, env = "LIFEDESK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotating log files; stderr when unset
    #[arg(long, env = "LIFEDESK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// List tasks, newest first
    List {
        /// all|work|personal|study
        #[arg(long, default_value = "all")]
        category: String,
    },
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// work|personal|study
        #[arg(long)]
        category: Option<String>,
        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        due: Option<String>,
    },
    /// Flip a task between open and done
    Toggle { id: String },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    Rm { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    List,
    Add {
        title: String,
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    Rm { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum GoalCommand {
    /// List goals with completion progress
    List,
    Add { title: String },
    Toggle { id: String },
    Rm { id: String },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, GoalCommand, TaskCommand};
    use clap::Parser;

    #[test]
    fn serve_defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["lifedesk", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind, "127.0.0.1:5000");
        assert_eq!(args.db.to_str(), Some("lifedesk.sqlite3"));
        assert_eq!(args.token_ttl_secs, 432_000);
        assert_eq!(cli.client.server, "http://127.0.0.1:5000");
    }

    #[test]
    fn global_client_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lifedesk",
            "tasks",
            "add",
            "Buy milk",
            "--category",
            "work",
            "--server",
            "http://example.test:8080",
        ])
        .unwrap();
        assert_eq!(cli.client.server, "http://example.test:8080");
        let Command::Tasks(TaskCommand::Add {
            title, category, ..
        }) = cli.command
        else {
            panic!("expected tasks add");
        };
        assert_eq!(title, "Buy milk");
        assert_eq!(category.as_deref(), Some("work"));
    }

    #[test]
    fn goal_toggle_takes_an_id() {
        let cli = Cli::try_parse_from(["lifedesk", "goals", "toggle", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Goals(GoalCommand::Toggle { ref id }) if id == "abc"
        ));
        assert!(Cli::try_parse_from(["lifedesk", "goals", "toggle"]).is_err());
    }
}
