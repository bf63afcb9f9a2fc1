use std::sync::Arc;

use qpage::{Page, ReadStatus};

fn fresh_page(capacity: usize) -> (tempfile::TempPath, Page) {
    let file = tempfile::NamedTempFile::new().expect("create temp file");
    let path = file.into_temp_path();
    let page = Page::open(&path, capacity).expect("open page");
    (path, page)
}

#[test]
fn single_message_round_trips() {
    let (_path, page) = fresh_page(4096);

    let written = page.push(b"hi").expect("push");
    assert_eq!(written, 3);

    let popped = page.pop(0);
    assert_eq!(popped.status, ReadStatus::Success);
    assert_eq!(popped.data, b"hi");

    let next = page.pop(popped.frame_size);
    assert_eq!(next.status, ReadStatus::Empty);
}

#[test]
fn page_full_marks_end_of_page_for_readers() {
    let (_path, page) = fresh_page(16);

    let first = page.push(&[b'a'; 10]).expect("first push fits");
    assert_eq!(first, 11);

    let err = page.push(&[b'b'; 10]).expect_err("second push should not fit");
    let _ = err.to_string();

    let popped = page.pop(0);
    assert_eq!(popped.status, ReadStatus::Success);
    assert_eq!(popped.data, &[b'a'; 10]);

    let next = page.pop(first);
    assert_eq!(next.status, ReadStatus::Finished);
}

#[test]
fn zero_length_message_is_distinct_from_empty() {
    let (_path, page) = fresh_page(64);

    let written = page.push(b"").expect("push empty payload");
    assert_eq!(written, 1);

    let popped = page.pop(0);
    assert_eq!(popped.status, ReadStatus::Success);
    assert!(popped.data.is_empty());

    let next = page.pop(popped.frame_size);
    assert_eq!(next.status, ReadStatus::Empty);
}

#[test]
fn pop_before_any_push_is_empty() {
    let (_path, page) = fresh_page(64);
    let popped = page.pop(0);
    assert_eq!(popped.status, ReadStatus::Empty);
}

#[test]
fn cross_handle_messages_are_visible_through_a_second_open() {
    let file = tempfile::NamedTempFile::new().expect("create temp file");
    let path = file.into_temp_path();

    let writer = Page::open(&path, 4096).expect("open writer handle");
    writer.push(b"x").expect("push");

    let reader = Page::open(&path, 4096).expect("open independent handle on same file");
    let popped = reader.pop(0);
    assert_eq!(popped.status, ReadStatus::Success);
    assert_eq!(popped.data, b"x");
}

#[test]
fn many_concurrent_writers_produce_disjoint_nontearing_messages() {
    let (_path, page) = fresh_page(1 << 20);
    let page = Arc::new(page);

    const WRITERS: usize = 8;
    const PER_WRITER: usize = 200;

    let mut handles = Vec::new();
    for writer_id in 0..WRITERS {
        let page = Arc::clone(&page);
        handles.push(std::thread::spawn(move || {
            let mut pushed = Vec::new();
            for i in 0..PER_WRITER {
                let payload = format!("w{writer_id}-m{i}");
                if page.push(payload.as_bytes()).is_ok() {
                    pushed.push(payload);
                }
            }
            pushed
        }));
    }

    let mut expected: Vec<String> = Vec::new();
    for handle in handles {
        expected.extend(handle.join().expect("writer thread panicked"));
    }
    expected.sort();

    let mut observed = Vec::new();
    let mut cursor = 0;
    loop {
        let popped = page.pop(cursor);
        match popped.status {
            ReadStatus::Success => {
                observed.push(String::from_utf8(popped.data.to_vec()).expect("utf8 payload"));
                cursor += popped.frame_size;
            }
            ReadStatus::Empty | ReadStatus::Finished => break,
            ReadStatus::Error => panic!("unexpected read error at cursor {cursor}"),
        }
    }
    observed.sort();

    assert_eq!(observed, expected, "every successful push must be read back exactly once, byte for byte");
}

#[cfg(feature = "length-prefixed")]
#[test]
fn length_prefixed_round_trip() {
    let (_path, page) = fresh_page(4096);

    let written = page.push(b"abcd").expect("push");
    assert_eq!(written, std::mem::size_of::<usize>() + 4 + 1);

    let popped = page.pop(0);
    assert_eq!(popped.status, ReadStatus::Success);
    assert_eq!(popped.data, b"abcd");
}
