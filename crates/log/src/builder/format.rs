//! Format layer construction shared by every output format.

/// Apply [`DisplayConfig`](crate::config::DisplayConfig) to a fmt layer,
/// write to stderr and box it.
macro_rules! create_fmt_layer {
    ($layer:expr, $display:expr) => {{
        let display = $display;
        let layer = $layer
            .with_writer(std::io::stderr)
            .with_ansi(display.colors)
            .with_target(display.target)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_thread_ids(display.thread_ids);
        if display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    }};
}
