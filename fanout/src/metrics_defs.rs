use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS: MetricDef = MetricDef {
    name: "requests_total",
    metric_type: MetricType::Counter,
    description: "Number of requests.",
    labels: &["client", "method"],
};

pub const DOWNSTREAM_CALLS: MetricDef = MetricDef {
    name: "downstream_calls_total",
    metric_type: MetricType::Counter,
    description: "Number of calls made to forward targets. Tagged with target, method, status.",
    labels: &["target", "method", "status"],
};

pub const BUILDS: MetricDef = MetricDef {
    name: "builds_total",
    metric_type: MetricType::Counter,
    description: "Number of builds.",
    labels: &["manager", "id", "os", "arch", "vmarch"],
};

pub const JOB_POLLS: MetricDef = MetricDef {
    name: "job_poll_total",
    metric_type: MetricType::Counter,
    description: "Number of job polls.",
    labels: &["manager"],
};

pub const JOBS_DONE: MetricDef = MetricDef {
    name: "job_done_total",
    metric_type: MetricType::Counter,
    description: "Number of jobs completed.",
    labels: &["id", "manager", "build_id", "os", "arch", "vmarch"],
};

pub const BUILD_ERRORS: MetricDef = MetricDef {
    name: "build_error_total",
    metric_type: MetricType::Counter,
    description: "Number of job build errors.",
    labels: &["manager", "id", "os", "arch", "vmarch"],
};

pub const MANAGER_UPTIME: MetricDef = MetricDef {
    name: "manager_uptime_total",
    metric_type: MetricType::Gauge,
    description: "Manager uptime.",
    labels: &["manager"],
};

pub const MANAGER_CORPUS: MetricDef = MetricDef {
    name: "manager_corpus_total",
    metric_type: MetricType::Gauge,
    description: "Manager corpus total.",
    labels: &["manager"],
};

pub const MANAGER_PCS: MetricDef = MetricDef {
    name: "manager_pcs_total",
    metric_type: MetricType::Gauge,
    description: "Manager pcs total.",
    labels: &["manager"],
};

pub const MANAGER_COVERAGE: MetricDef = MetricDef {
    name: "manager_coverage_total",
    metric_type: MetricType::Gauge,
    description: "Manager coverage total.",
    labels: &["manager"],
};

pub const MANAGER_CRASHES: MetricDef = MetricDef {
    name: "manager_crashes_total",
    metric_type: MetricType::Counter,
    description: "Manager crashes total.",
    labels: &["manager"],
};

pub const MANAGER_SUPP_CRASHES: MetricDef = MetricDef {
    name: "manager_supp_crashes_total",
    metric_type: MetricType::Counter,
    description: "Manager suppressed crashes total.",
    labels: &["manager"],
};

pub const MANAGER_EXECS: MetricDef = MetricDef {
    name: "manager_execs_total",
    metric_type: MetricType::Counter,
    description: "Manager execs total.",
    labels: &["manager"],
};

pub const MANAGER_FUZZING_DUR: MetricDef = MetricDef {
    name: "manager_fuzzing_dur_total",
    metric_type: MetricType::Counter,
    description: "Manager fuzzing duration total.",
    labels: &["manager"],
};

pub const ALL_METRICS: &[MetricDef] = &[
    REQUESTS,
    DOWNSTREAM_CALLS,
    BUILDS,
    JOB_POLLS,
    JOBS_DONE,
    BUILD_ERRORS,
    MANAGER_UPTIME,
    MANAGER_CORPUS,
    MANAGER_PCS,
    MANAGER_COVERAGE,
    MANAGER_CRASHES,
    MANAGER_SUPP_CRASHES,
    MANAGER_EXECS,
    MANAGER_FUZZING_DUR,
];
