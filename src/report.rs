//! Pluggable error reporting.
//!
//! Non-fatal failures are pushed through an injectable sink instead of a
//! process-wide hook, so the core stays usable outside the CLI. The default
//! sink prints for the user and mirrors the message into the log.

/// Callback receiving human-readable error messages.
pub type ErrorSink<'a> = &'a dyn Fn(&str);

/// Default sink: log and print to stderr.
pub fn console_sink(msg: &str) {
    log::error!("{}", msg);
    eprintln!("[ERROR] {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn closures_work_as_sinks() {
        let seen = RefCell::new(Vec::new());
        let sink = |msg: &str| seen.borrow_mut().push(msg.to_string());
        let sink_ref: ErrorSink = &sink;

        sink_ref("first");
        sink_ref("second");

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }
}
