pub(crate) use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ledger-bridge",
    author,
    version,
    about = "Replays orchestrator prepare/commit/abort instructions against a demo ledger",
    long_about = None,
    after_help = "OUTPUT:\n    One JSON result per instruction, then a per-account diagnostic dump,\n    all on stdout. Use shell redirection to save:\n\n    ledger-bridge instructions.json > results.json"
)]
pub struct Args {
    /// Path to the input JSON instruction file
    #[arg(
        index = 1,
        value_name = "FILE",
        help = "JSON array of { op, flow, previous?, entry } instructions"
    )]
    pub input_file: PathBuf,
}
