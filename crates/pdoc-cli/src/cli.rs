use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pdoc",
    about = "pdoc -- query, edit, diff and merge property-list documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file (defaults to $PDOC_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the value at a path
    Get(GetArgs),
    /// List every path matching a sequence of selectors
    Find(FindArgs),
    /// Forced write: create or coerce containers along the path
    Set(SetArgs),
    /// Simple write into an existing container
    Put(PutArgs),
    /// Remove the value at a path
    Remove(RemoveArgs),
    /// Show structural differences between two documents
    Diff(DiffArgs),
    /// Merge the second document into the first
    Combine(CombineArgs),
    /// Print a document as JSON
    Json(JsonArgs),
    /// Convert a hex blob to base64
    HexToBase64(HexArgs),
    /// Convert a base64 blob to hex
    Base64ToHex(Base64Args),
    /// Per-application version ledger
    State(StateArgs),
}

#[derive(Args)]
pub struct GetArgs {
    pub file: PathBuf,
    /// Path steps: `[N]` is an array index, anything else a dict key
    pub steps: Vec<String>,
}

#[derive(Args)]
pub struct FindArgs {
    pub file: PathBuf,
    /// `*`, `[N]`, `[N,M,...]`, or a regular expression
    #[arg(required = true)]
    pub selectors: Vec<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub file: PathBuf,
    /// `KIND:SLOT`, e.g. `dict:name`, `array:add_if_missing`, `array-insert:0`
    #[arg(long = "step", required = true)]
    pub steps: Vec<String>,
    #[arg(long, default_value = "string")]
    pub kind: String,
    #[arg(long, default_value = "")]
    pub value: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub file: PathBuf,
    /// Parent steps followed by the final key or index
    #[arg(required = true)]
    pub steps: Vec<String>,
    #[arg(long, default_value = "string")]
    pub kind: String,
    #[arg(long, default_value = "")]
    pub value: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub file: PathBuf,
    #[arg(required = true)]
    pub steps: Vec<String>,
}

#[derive(Args)]
pub struct DiffArgs {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Deepest container level compared (0 = unlimited)
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Report only these change kinds
    #[arg(long = "only")]
    pub only: Vec<String>,
}

#[derive(Args)]
pub struct CombineArgs {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Where to write the result (defaults to the first document)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct JsonArgs {
    pub file: PathBuf,
    /// Convert containers only, leaving scalars as rendered text
    #[arg(long)]
    pub shallow: bool,
}

#[derive(Args)]
pub struct HexArgs {
    pub hex: String,
}

#[derive(Args)]
pub struct Base64Args {
    pub base64: String,
}

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    pub action: StateAction,
    /// Ledger file (defaults to `state_path` from the config)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum StateAction {
    Record {
        app: String,
        version: String,
        #[arg(long)]
        url: Option<String>,
    },
    Show {
        app: Option<String>,
    },
    Forget {
        app: String,
    },
}
