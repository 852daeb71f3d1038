// inflation_core/src/feed.rs

//! Asynchronous front for an `IndexSource`, standing in for a networked price-index feed.
//! The optional latency only delays completion; it never changes what is returned.

use futures::FutureExt;

use crate::converter;
use crate::error::CalcError;
use crate::index_table::IndexSource;

pub type LookupResult = Result<std::collections::BTreeMap<i32, f64>, CalcError>;

#[derive(Debug, Clone)]
pub struct SimulatedFeed<S> {
    source: std::sync::Arc<S>,
    latency: std::time::Duration,
}

impl<S> SimulatedFeed<S>
where
    S: IndexSource + Send + Sync + 'static,
{
    pub fn new(source: std::sync::Arc<S>) -> Self {
        Self { source, latency: std::time::Duration::ZERO }
    }

    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> std::time::Duration {
        self.latency
    }

    /// Resolves the requested years. The returned future completes exactly once.
    ///
    /// With a non-zero latency the lookup runs on a helper thread after sleeping;
    /// otherwise it resolves immediately.
    pub fn lookup_async(&self, years: &[i32]) -> futures::future::BoxFuture<'static, LookupResult> {
        if self.latency.is_zero() {
            let result = converter::guarded(|| self.source.lookup(years));
            return futures::future::ready(result).boxed();
        }

        let (sender, receiver) = futures::channel::oneshot::channel();
        let source = std::sync::Arc::clone(&self.source);
        let years = years.to_vec();
        let latency = self.latency;

        std::thread::spawn(move || {
            std::thread::sleep(latency);
            // The caller may have dropped the future; nothing to report then.
            let _ = sender.send(converter::guarded(|| source.lookup(&years)));
        });

        receiver
            .map(|received| match received {
                Ok(result) => result,
                Err(futures::channel::oneshot::Canceled) => Err(CalcError::Internal {
                    detail: "index lookup was dropped before completing".to_string(),
                }),
            })
            .boxed()
    }

    /// Same validation and arithmetic as `converter::calculate`, with the lookup awaited.
    pub async fn calculate(
        &self,
        amount: impl Into<converter::RawInput>,
        start_year: impl Into<converter::RawInput>,
        end_year: impl Into<converter::RawInput>,
    ) -> Result<converter::CalculationResult, CalcError> {
        let request = converter::CalculationRequest::parse(amount, start_year, end_year)
            .inspect_err(|e| log::warn!("Rejected calculation request: {}", e))?;

        log::debug!(
            "Awaiting index lookup for {} and {} (latency {:?})",
            request.start_year,
            request.end_year,
            self.latency,
        );
        let found = self.lookup_async(&[request.start_year, request.end_year]).await?;
        converter::derive(&request, &found)
    }
}
