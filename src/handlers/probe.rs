use crate::handlers::db::{ConnectionError, ConnectionSource, ProbeConnection};
use log::{error, info};

#[derive(Debug)]
pub enum ConnectionCheck {
    Open,
    // acquired, but the connection reported itself unusable
    Closed,
    Failed(ConnectionError),
}

impl ConnectionCheck {
    pub fn succeeded(&self) -> bool {
        !matches!(self, ConnectionCheck::Failed(_))
    }

    pub fn error(&self) -> Option<&ConnectionError> {
        match self {
            ConnectionCheck::Failed(e) => Some(e),
            _ => None,
        }
    }
}

pub trait ProbeReporter: Send + Sync {
    fn connected(&self);
    fn failed(&self, error: &ConnectionError);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProbeReporter for LogReporter {
    fn connected(&self) {
        info!("Database connection from pool successfully established");
    }

    fn failed(&self, error: &ConnectionError) {
        error!("Failed to establish database connection from pool: {}", error);
    }
}

/// One-shot database connectivity check, run once the host is ready to serve.
/// Failures end up in the reporter and never reach the caller.
pub struct StartupProbe<S, R = LogReporter> {
    source: S,
    reporter: R,
}

impl<S: ConnectionSource> StartupProbe<S> {
    pub fn with_log_reporter(source: S) -> Self {
        Self::new(source, LogReporter)
    }
}

impl<S, R> StartupProbe<S, R>
where
    S: ConnectionSource,
    R: ProbeReporter,
{
    pub fn new(source: S, reporter: R) -> Self {
        Self { source, reporter }
    }

    pub async fn run(&self) {
        let (check, connection) = self.checked().await;
        self.report(&check);
        // released only after the outcome has been reported
        drop(connection);
    }

    // Single acquisition; the connection comes back still held so the caller
    // decides when it is released.
    async fn checked(&self) -> (ConnectionCheck, Option<S::Connection>) {
        match self.source.acquire().await {
            Ok(mut connection) => {
                let check = match connection.is_open().await {
                    Ok(true) => ConnectionCheck::Open,
                    Ok(false) => ConnectionCheck::Closed,
                    Err(e) => ConnectionCheck::Failed(e),
                };
                (check, Some(connection))
            }
            Err(e) => (ConnectionCheck::Failed(e), None),
        }
    }

    fn report(&self, check: &ConnectionCheck) {
        match check {
            ConnectionCheck::Open => self.reporter.connected(),
            ConnectionCheck::Closed => {}
            ConnectionCheck::Failed(e) => self.reporter.failed(e),
        }
    }
}
