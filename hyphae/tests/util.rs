#![allow(dead_code)]

pub fn trace_init() {
    use tracing_subscriber::filter::LevelFilter;
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}

/// Returns the payloads of `queue`, front to back, as owned strings.
pub fn values(queue: &hyphae::Queue) -> Vec<String> {
    queue.iter().map(String::from).collect()
}
