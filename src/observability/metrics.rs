//! Pipeline counters.
//!
//! # Metrics
//! - `log_entries_total` (counter): entries dispatched, by level
//! - `log_sink_failures_total` (counter): sink write or sync failures
//! - `console_writes_total` (counter): entries rendered to the console, by level
//! - `report_events_total` (counter): reports handed to the client, by kind
//! - `report_delivery_total` (counter): delivery attempts, by outcome
//! - `report_dropped_total` (counter): reports dropped before delivery
//! - `report_flush_total` (counter): flushes, by outcome

use metrics::counter;

use crate::logger::Level;

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "failed"
    }
}

/// Record an entry accepted by the logger.
pub fn record_entry(level: Level) {
    counter!("log_entries_total", "level" => level.as_str()).increment(1);
}

/// Record a sink failure, `op` being `write` or `sync`.
pub fn record_sink_failure(op: &'static str) {
    counter!("log_sink_failures_total", "op" => op).increment(1);
}

pub fn record_console_write(level: Level) {
    counter!("console_writes_total", "level" => level.as_str()).increment(1);
}

/// Record a report routed to the client (`exception`, `panic`, `message`).
pub fn record_report(kind: &'static str) {
    counter!("report_events_total", "kind" => kind).increment(1);
}

pub fn record_delivery(ok: bool) {
    counter!("report_delivery_total", "outcome" => outcome(ok)).increment(1);
}

pub fn record_dropped() {
    counter!("report_dropped_total").increment(1);
}

pub fn record_flush(ok: bool) {
    counter!("report_flush_total", "outcome" => outcome(ok)).increment(1);
}
