use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use qpage::{Page, ReadStatus};

const DEFAULT_CAPACITY: usize = 1 << 20;

fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "tracing")]
    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let page = match Page::open(&cli.path, cli.capacity) {
        Ok(page) => page,
        Err(err) => {
            eprintln!("failed to open page at {}: {err}", cli.path.display());
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Push { message } => match page.push(message.as_bytes()) {
            Ok(frame_size) => {
                println!("{frame_size}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("push failed: {err}");
                ExitCode::FAILURE
            }
        },
        Command::Pop { cursor } => {
            let popped = page.pop(cursor);
            match popped.status {
                ReadStatus::Success => {
                    std::io::stdout()
                        .write_all(popped.data)
                        .expect("write message to stdout");
                    println!();
                    eprintln!("next-cursor: {}", cursor + popped.frame_size);
                    ExitCode::SUCCESS
                }
                ReadStatus::Empty => {
                    eprintln!("empty");
                    ExitCode::from(2)
                }
                ReadStatus::Finished => {
                    eprintln!("finished");
                    ExitCode::from(1)
                }
                ReadStatus::Error => {
                    eprintln!("read error at cursor {cursor}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// Path to the shared-memory page's backing file. Created if it doesn't exist.
    path: PathBuf,

    /// Capacity in bytes of the page's message buffer.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Enable tracing diagnostics on stderr, controlled by RUST_LOG.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append a message to the page.
    Push {
        /// The message to append.
        message: String,
    },
    /// Read the message at a byte cursor, printing it to stdout.
    Pop {
        /// Byte offset to read from.
        cursor: usize,
    },
}
