use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pinmap")]
#[command(about = "Drop geotagged notes on a map from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the client config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage pins
    #[command(alias = "pin")]
    Pins {
        #[command(subcommand)]
        command: PinCommands,
    },
    /// Manage pin folders
    Folders {
        #[command(subcommand)]
        command: FolderCommands,
    },
    /// Manage friends
    Friends {
        #[command(subcommand)]
        command: FriendCommands,
    },
    /// Search places by keyword
    Places {
        #[command(subcommand)]
        command: PlaceCommands,
    },
    /// Sign in, sign out, or register
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Configure the backend endpoints
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

/// Fields shared by `pins add` and `pins edit`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PinFields {
    /// Pin title
    #[arg(long)]
    pub title: Option<String>,
    /// Pin body text
    #[arg(long)]
    pub content: Option<String>,
    /// Visit date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
    /// Who can see the pin
    #[arg(long, value_enum)]
    pub visibility: Option<VisibilityArg>,
    /// Folder to file the pin under once saved
    #[arg(long, value_name = "ID")]
    pub folder: Option<i64>,
    /// Place keyword; the first search result becomes the pin location
    #[arg(long, value_name = "KEYWORD", conflicts_with_all = ["lat", "lng"])]
    pub place: Option<String>,
    /// Latitude, used together with --lng
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Longitude, used together with --lat
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
    /// Address label for --lat/--lng
    #[arg(long)]
    pub address: Option<String>,
    /// Image file to attach (repeatable)
    #[arg(long = "attach", value_name = "PATH")]
    pub attachments: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum VisibilityArg {
    Public,
    Private,
    Friends,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PinListScope {
    /// Your own pins
    Mine,
    /// Every pin the backend lists
    All,
}

#[derive(Subcommand)]
pub enum PinCommands {
    /// List pins
    List {
        #[arg(long, value_enum, default_value_t = PinListScope::Mine)]
        scope: PinListScope,
        /// Only pins in this folder
        #[arg(long, value_name = "ID", conflicts_with = "user")]
        folder: Option<i64>,
        /// Only pins by this user
        #[arg(long, value_name = "ID")]
        user: Option<i64>,
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,
        /// Page size
        #[arg(short, long, default_value = "10")]
        limit: u32,
        /// Oldest first
        #[arg(long)]
        oldest: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List pins around a position
    Near {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Radius in kilometres
        #[arg(long, default_value = "1.0")]
        distance: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single pin
    Show {
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a pin
    #[command(alias = "new")]
    Add {
        #[command(flatten)]
        fields: PinFields,
    },
    /// Edit an existing pin; omitted fields keep their current value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: PinFields,
    },
    /// Delete a pin
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum FolderCommands {
    /// List your folders
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a folder
    Add { name: String },
    /// Rename a folder
    Rename { id: i64, name: String },
    /// File a pin under a folder
    File { id: i64, pin_id: i64 },
    /// Take a pin out of a folder
    Unfile { id: i64, pin_id: i64 },
    /// Delete a folder
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum FriendCommands {
    /// List your friends
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List pending friend requests
    Requests {
        /// Requests you sent instead of received ones
        #[arg(long)]
        sent: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a friend request to a user
    Add { user_id: i64 },
    /// Accept a request from a user
    Accept { user_id: i64 },
    /// Unfriend a user, or withdraw a request sent to them
    Remove { user_id: i64 },
}

#[derive(Subcommand)]
pub enum PlaceCommands {
    /// Search places by keyword
    Search {
        keyword: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show who is signed in
    Status,
    /// Sign out and forget the session
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the client config file
    Init {
        /// Pinmap REST API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Kakao REST API key for place search
        #[arg(long, value_name = "KEY")]
        kakao_rest_api_key: Option<String>,
    },
    /// Print the effective config
    Show,
}
