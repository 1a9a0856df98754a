/// Presentation hook fired once each time a session enters `Submitted`.
pub trait Celebration: Send + Sync {
    fn celebrate(&self, identity: &str);
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Quiet;

impl Celebration for Quiet {
    fn celebrate(&self, _identity: &str) {}
}

/// Logs the completed submission.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCelebration;

impl Celebration for LogCelebration {
    fn celebrate(&self, identity: &str) {
        tracing::info!("🎉 Survey completed by {}", identity);
    }
}
