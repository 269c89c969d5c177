//! Common types for metrics definitions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

impl MetricType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "Counter",
            MetricType::Gauge => "Gauge",
            MetricType::Histogram => "Histogram",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
    /// Label keys every emission of this metric carries, in order.
    pub labels: &'static [&'static str],
}

/// Registers the description of every metric with the installed recorder.
///
/// Exporters that support it (Prometheus) render the description as help text.
pub fn describe_metrics(defs: &[MetricDef]) {
    for def in defs {
        match def.metric_type {
            MetricType::Counter => metrics::describe_counter!(def.name, def.description),
            MetricType::Gauge => metrics::describe_gauge!(def.name, def.description),
            MetricType::Histogram => metrics::describe_histogram!(def.name, def.description),
        }
    }
}

#[macro_export]
macro_rules! counter {
    ($def:expr $(, $key:expr => $value:expr)* $(,)?) => {
        metrics::counter!($def.name $(, $key => $value)*)
    };
}

#[macro_export]
macro_rules! gauge {
    ($def:expr $(, $key:expr => $value:expr)* $(,)?) => {
        metrics::gauge!($def.name $(, $key => $value)*)
    };
}

#[macro_export]
macro_rules! histogram {
    ($def:expr $(, $key:expr => $value:expr)* $(,)?) => {
        metrics::histogram!($def.name $(, $key => $value)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    const TEST_COUNTER: MetricDef = MetricDef {
        name: "test_events_total",
        metric_type: MetricType::Counter,
        description: "Number of test events.",
        labels: &["kind"],
    };

    const TEST_GAUGE: MetricDef = MetricDef {
        name: "test_level",
        metric_type: MetricType::Gauge,
        description: "Current test level.",
        labels: &[],
    };

    #[test]
    fn test_macros_and_descriptions() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_metrics(&[TEST_COUNTER, TEST_GAUGE]);
            crate::counter!(TEST_COUNTER, "kind" => "a".to_string()).increment(3);
            crate::gauge!(TEST_GAUGE).set(7.0);
        });

        let rendered = handle.render();
        assert!(rendered.contains("# HELP test_events_total Number of test events."));
        assert!(rendered.contains(r#"test_events_total{kind="a"} 3"#));
        assert!(rendered.contains("# HELP test_level Current test level."));
        assert!(rendered.contains("test_level 7"));
    }

    #[test]
    fn test_metric_type_names() {
        assert_eq!(MetricType::Counter.as_str(), "Counter");
        assert_eq!(MetricType::Gauge.as_str(), "Gauge");
        assert_eq!(MetricType::Histogram.as_str(), "Histogram");
    }
}
