/// Diagnostic sink used by the engine.
///
/// The only diagnostic today is the record truncation warning: a source
/// field without a destination counterpart stops the record copy.
pub trait Logger: Send + Sync {
    fn field_not_found(&self, record: &str, field: &str);
}

/// Discards everything. Default for [`Copier::new`](crate::Copier::new).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn field_not_found(&self, _record: &str, _field: &str) {}
}

/// Emits a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn field_not_found(&self, record: &str, field: &str) {
        tracing::warn!(record, field, "field not found, remaining fields skipped");
    }
}
