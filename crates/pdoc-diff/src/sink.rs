use tracing::info;

use crate::record::DiffRecord;

/// Destination for records as a diff finds them.
pub trait DiffSink {
    fn record(&mut self, record: DiffRecord);
}

impl DiffSink for Vec<DiffRecord> {
    fn record(&mut self, record: DiffRecord) {
        self.push(record);
    }
}

/// Emits each record as an `info` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiffSink for LogSink {
    fn record(&mut self, record: DiffRecord) {
        info!(
            kind = %record.kind,
            path = %record.path,
            first = record.first.as_deref().unwrap_or(""),
            second = record.second.as_deref().unwrap_or(""),
            "diff"
        );
    }
}
