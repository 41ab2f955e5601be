pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // stdout carries the stdio transport, so logs go to stderr.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a metric line and feed the `metrics` facade.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::info!(tool = tool, metric = metric, value = value, "metric");
    let labels = [("tool", tool.to_owned())];
    if metric.ends_with("_total") {
        metrics::counter!(metric.to_owned(), &labels).increment(value as u64);
    } else {
        metrics::histogram!(metric.to_owned(), &labels).record(value);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }

    #[test]
    fn log_metric_without_recorder_is_a_noop() {
        super::log_metric("echo", "error_total", 1.0);
        super::log_metric("echo", "latency_ms", 3.0);
    }
}
