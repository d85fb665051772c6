use super::*;

#[test]
fn buffer_println_appends_newline() {
    let handler = buffer_handler();
    handler.println("hello");
    assert_eq!(handler.output(), "hello\n");
}

#[test]
fn buffer_print_and_println_interleave() {
    let handler = buffer_handler();
    handler.print("a");
    handler.print(", ");
    handler.println("b");
    assert_eq!(handler.output(), "a, b\n");
}

#[test]
fn take_output_drains_the_buffer() {
    let handler = buffer_handler();
    handler.println("once");
    assert_eq!(handler.take_output(), "once\n");
    assert_eq!(handler.output(), "");
}

#[test]
fn clear_empties_the_buffer() {
    let handler = buffer_handler();
    handler.print("x");
    handler.clear();
    assert!(handler.output().is_empty());
}

#[test]
fn silent_and_stdout_capture_nothing() {
    let silent = silent_handler();
    silent.println("gone");
    assert_eq!(silent.output(), "");
    assert_eq!(stdout_handler().take_output(), "");
}

#[test]
fn buffer_is_shared_across_threads() {
    let handler = buffer_handler();
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let handler = Arc::clone(&handler);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    handler.print("x");
                }
            })
        })
        .collect();
    for worker in workers {
        assert!(worker.join().is_ok());
    }
    assert_eq!(handler.output().len(), 100);
}
