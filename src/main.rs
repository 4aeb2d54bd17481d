//! curlback - browse captured HTTP request profiles, replay them as curl
//!
//! Bootstrap only: file logging, argument parsing, store/session wiring.
//! All behavior lives in the library modules.

use clap::Parser;

use curlback::cli::Args;
use curlback::constants::LOG_FILE;
use curlback::{CancelFlag, Exporter, FileStore, RecordStore, Session, TerminalInput};

fn main() -> anyhow::Result<()> {
    // Log to a file; stdout belongs to the interactive session.
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    tracing::info!(storage_dir = %args.storage_dir().display(), "session starting");

    let store = RecordStore::new(Box::new(FileStore::new(args.storage_dir())));
    let exporter = Exporter::new(&store, args.out_dir.clone());
    let cancel = CancelFlag::new();
    let mut input = TerminalInput::new(cancel.clone());

    let mut session = Session::new(&store, exporter, cancel);
    session.run(&args.criteria(), args.token.as_deref(), args.export, &mut input)
}
