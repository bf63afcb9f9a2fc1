//! Drives a qpage page with several producer threads and several independent
//! consumer threads (each consumer scans the whole page from its own
//! cursor) and reports throughput once the producers are done.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use qpage::{Page, ReadStatus};

fn main() {
    let args = Args::parse();

    let _tempdir_guard;
    let path = match &args.path {
        Some(path) => path.clone(),
        None => {
            let dir = tempfile::tempdir().expect("create temp dir for the page");
            let path = dir.path().join("page");
            _tempdir_guard = Some(dir);
            path
        }
    };

    let page = Arc::new(Page::open(&path, args.capacity).expect("open page"));
    let message = vec![b'x'; args.message_size];

    let pushed = Arc::new(AtomicU64::new(0));
    let page_full = Arc::new(AtomicU64::new(0));
    let popped = Arc::new(AtomicU64::new(0));
    let read_errors = Arc::new(AtomicU64::new(0));
    let producers_done = Arc::new(AtomicBool::new(false));

    let start = Instant::now();

    let per_writer = args.messages / args.writers as u64;
    let producers: Vec<_> = (0..args.writers)
        .map(|writer_id| {
            spawn_producer(
                Arc::clone(&page),
                writer_id,
                per_writer,
                message.clone(),
                Arc::clone(&pushed),
                Arc::clone(&page_full),
            )
        })
        .collect();

    let consumers: Vec<_> = (0..args.readers)
        .map(|reader_id| {
            spawn_consumer(
                Arc::clone(&page),
                reader_id,
                Arc::clone(&popped),
                Arc::clone(&read_errors),
                Arc::clone(&producers_done),
            )
        })
        .collect();

    for producer in producers {
        producer.join().expect("producer thread panicked");
    }
    producers_done.store(true, Ordering::Relaxed);

    for consumer in consumers {
        consumer.join().expect("consumer thread panicked");
    }

    let elapsed = start.elapsed();
    println!(
        "writers={} readers={} pushed={} page_full={} popped={} read_errors={} elapsed={:?}",
        args.writers,
        args.readers,
        pushed.load(Ordering::Relaxed),
        page_full.load(Ordering::Relaxed),
        popped.load(Ordering::Relaxed),
        read_errors.load(Ordering::Relaxed),
        elapsed,
    );
}

fn spawn_producer(
    page: Arc<Page>,
    writer_id: usize,
    count: u64,
    message: Vec<u8>,
    pushed: Arc<AtomicU64>,
    page_full: Arc<AtomicU64>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for _ in 0..count {
            match page.push(&message) {
                Ok(_) => {
                    pushed.fetch_add(1, Ordering::Relaxed);
                }
                Err(_) => {
                    page_full.fetch_add(1, Ordering::Relaxed);
                    break;
                }
            }
        }
        let _ = writer_id;
    })
}

/// Scans the page from byte 0 until the producers have signaled they're
/// done and no further message is available, counting successful pops.
fn spawn_consumer(
    page: Arc<Page>,
    reader_id: usize,
    popped: Arc<AtomicU64>,
    read_errors: Arc<AtomicU64>,
    producers_done: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut cursor = 0;
        loop {
            let popped_msg = page.pop(cursor);
            match popped_msg.status {
                ReadStatus::Success => {
                    cursor += popped_msg.frame_size;
                    popped.fetch_add(1, Ordering::Relaxed);
                }
                ReadStatus::Finished => break,
                ReadStatus::Empty => {
                    if producers_done.load(Ordering::Relaxed) {
                        break;
                    }
                    std::thread::yield_now();
                }
                ReadStatus::Error => {
                    read_errors.fetch_add(1, Ordering::Relaxed);
                    break;
                }
            }
        }
        let _ = reader_id;
    })
}

#[derive(Parser)]
struct Args {
    /// Backing file for the page. Defaults to a fresh temp file.
    #[arg(long)]
    path: Option<PathBuf>,

    /// Capacity in bytes of the page's message buffer.
    #[arg(long, default_value_t = 64 << 20)]
    capacity: usize,

    /// Number of producer threads.
    #[arg(long, default_value_t = 4)]
    writers: usize,

    /// Number of independent consumer threads.
    #[arg(long, default_value_t = 1)]
    readers: usize,

    /// Total messages pushed across all producers.
    #[arg(long, default_value_t = 200_000)]
    messages: u64,

    /// Size in bytes of each pushed message.
    #[arg(long, default_value_t = 64)]
    message_size: usize,
}
