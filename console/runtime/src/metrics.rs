use http::StatusCode;
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family, histogram::Histogram},
    registry::{Registry, Unit},
};
use tokio::time;

#[derive(Clone, Debug)]
pub struct ApiMetrics {
    requests: Family<Labels, Counter>,
    handled: Family<CodeLabels, Counter>,
    handling: Family<Labels, Histogram>,
}

/// Tracks a single request from routing until its outcome is known.
pub(crate) struct RequestObserver {
    start: time::Instant,
    labels: Labels,
    handling: Histogram,
    handled: Family<CodeLabels, Counter>,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct Labels {
    kind: &'static str,
    verb: &'static str,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct CodeLabels {
    kind: &'static str,
    verb: &'static str,
    code: String,
}

// === impl ApiMetrics ===

impl ApiMetrics {
    pub fn register(reg: &mut Registry) -> Self {
        let requests = Family::<Labels, Counter>::default();
        reg.register(
            "requests",
            "Total number of console API requests routed to a handler",
            requests.clone(),
        );

        let handled = Family::<CodeLabels, Counter>::default();
        reg.register(
            "handled",
            "Total number of console API requests completed, by response code",
            handled.clone(),
        );

        let handling = Family::<Labels, Histogram>::new_with_constructor(|| {
            // Listing large kinds across all namespaces can take seconds.
            Histogram::new([0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0])
        });
        reg.register_with_unit(
            "handling",
            "Histogram of console API request latency (seconds)",
            Unit::Seconds,
            handling.clone(),
        );

        Self {
            requests,
            handled,
            handling,
        }
    }

    pub(crate) fn request(&self, kind: &'static str, verb: &'static str) -> RequestObserver {
        let labels = Labels { kind, verb };
        self.requests.get_or_create(&labels).inc();
        RequestObserver {
            start: time::Instant::now(),
            handling: self.handling.get_or_create(&labels).clone(),
            handled: self.handled.clone(),
            labels,
        }
    }
}

// === impl RequestObserver ===

impl RequestObserver {
    pub(crate) fn handled(self, code: StatusCode) {
        self.handling
            .observe(self.start.elapsed().as_secs_f64());
        self.handled
            .get_or_create(&CodeLabels {
                kind: self.labels.kind,
                verb: self.labels.verb,
                code: code.as_u16().to_string(),
            })
            .inc();
    }
}
