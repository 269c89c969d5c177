use async_trait::async_trait;
use dashapi::form;
use dashapi::types::*;
use dashapi::{ClientError, Dashboard};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::convert::Infallible;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

/// In-memory dashboard that records every invocation as `op(detail)`.
#[derive(Default)]
pub struct MockDashboard {
    invocations: Mutex<Vec<String>>,
    fail: bool,
}

impl MockDashboard {
    pub fn new() -> Arc<Self> {
        Arc::new(MockDashboard::default())
    }

    /// Records invocations like `new`, then fails every one of them.
    pub fn failing() -> Arc<Self> {
        Arc::new(MockDashboard {
            fail: true,
            ..Default::default()
        })
    }

    /// Operation names only, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|inv| match inv.split_once('(') {
                Some((op, _)) => op.to_string(),
                None => inv,
            })
            .collect()
    }

    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }

    fn record(&self, invocation: String) -> Result<(), ClientError> {
        self.invocations.lock().unwrap().push(invocation);
        if self.fail {
            return Err(ClientError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "mock failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Dashboard for MockDashboard {
    async fn upload_build(&self, build: &Build) -> Result<(), ClientError> {
        self.record(format!("upload_build({})", build.id))
    }

    async fn builder_poll(&self, manager: &str) -> Result<BuilderPollResp, ClientError> {
        self.record(format!("builder_poll({manager})"))
            .map(|_| BuilderPollResp::default())
    }

    async fn job_poll(&self, _req: &JobPollReq) -> Result<JobPollResp, ClientError> {
        self.record("job_poll".into()).map(|_| JobPollResp::default())
    }

    async fn job_done(&self, req: &JobDoneReq) -> Result<(), ClientError> {
        self.record(format!("job_done({})", req.id))
    }

    async fn report_build_error(&self, req: &BuildErrorReq) -> Result<(), ClientError> {
        self.record(format!("report_build_error({})", req.build.id))
    }

    async fn commit_poll(&self) -> Result<CommitPollResp, ClientError> {
        self.record("commit_poll".into())
            .map(|_| CommitPollResp::default())
    }

    async fn upload_commits(&self, commits: &[Commit]) -> Result<(), ClientError> {
        self.record(format!("upload_commits({})", commits.len()))
    }

    async fn report_crash(&self, crash: &Crash) -> Result<ReportCrashResp, ClientError> {
        self.record(format!("report_crash({})", crash.title))
            .map(|_| ReportCrashResp::default())
    }

    async fn need_repro(&self, crash: &CrashId) -> Result<NeedReproResp, ClientError> {
        self.record(format!("need_repro({})", crash.title))
            .map(|_| NeedReproResp::default())
    }

    async fn report_failed_repro(&self, crash: &CrashId) -> Result<(), ClientError> {
        self.record(format!("report_failed_repro({})", crash.title))
    }

    async fn log_error(&self, name: &str, text: &str) -> Result<(), ClientError> {
        self.record(format!("log_error({name}: {text})"))
    }

    async fn reporting_poll_bugs(&self, typ: &str) -> Result<PollBugsResponse, ClientError> {
        self.record(format!("reporting_poll_bugs({typ})"))
            .map(|_| PollBugsResponse::default())
    }

    async fn reporting_poll_notifications(
        &self,
        typ: &str,
    ) -> Result<PollNotificationsResponse, ClientError> {
        self.record(format!("reporting_poll_notifications({typ})"))
            .map(|_| PollNotificationsResponse::default())
    }

    async fn reporting_poll_closed(
        &self,
        ids: &[String],
    ) -> Result<PollClosedResponse, ClientError> {
        self.record(format!("reporting_poll_closed({})", ids.join(",")))
            .map(|_| PollClosedResponse::default())
    }

    async fn reporting_update(&self, update: &BugUpdate) -> Result<BugUpdateReply, ClientError> {
        self.record(format!("reporting_update({})", update.id))
            .map(|_| BugUpdateReply::default())
    }

    async fn upload_manager_stats(&self, stats: &ManagerStatsReq) -> Result<(), ClientError> {
        self.record(format!("upload_manager_stats({})", stats.name))
    }

    async fn bug_list(&self) -> Result<BugListResp, ClientError> {
        self.record("bug_list".into()).map(|_| BugListResp::default())
    }

    async fn load_bug(&self, id: &str) -> Result<LoadBugResp, ClientError> {
        self.record(format!("load_bug({id})"))
            .map(|_| LoadBugResp::default())
    }
}

/// Runs `future` to completion on this thread with a private Prometheus recorder
/// installed, and returns its output with the rendered exposition text.
pub fn run_with_recorder<F: Future>(future: F) -> (F::Output, String) {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let output = metrics::with_local_recorder(&recorder, || runtime.block_on(future));
    (output, handle.render())
}

/// Looks up one sample in Prometheus text output. Label order does not matter.
pub fn metric_value(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    let mut expected: Vec<String> = labels.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
    expected.sort();

    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (series, value) = line.rsplit_once(' ')?;
            let (series_name, series_labels) = match series.split_once('{') {
                Some((n, rest)) => (n, rest.strip_suffix('}')?),
                None => (series, ""),
            };
            if series_name != name {
                return None;
            }

            let mut found: Vec<String> = series_labels
                .split(',')
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            found.sort();

            (found == expected).then(|| value.parse().ok()).flatten()
        })
}

/// Form fields of every call a test dashboard received, in arrival order.
pub type ReceivedCalls = Arc<Mutex<Vec<Vec<(String, Vec<u8>)>>>>;

/// Starts an HTTP dashboard on an ephemeral port that records each call's
/// form fields and answers `200 {}`.
pub async fn start_dashboard_server() -> (Url, ReceivedCalls) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let received: ReceivedCalls = Arc::new(Mutex::new(Vec::new()));

    let server_received = received.clone();
    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let received = server_received.clone();

            tokio::spawn(async move {
                let handler = move |req: Request<Incoming>| {
                    let received = received.clone();
                    async move {
                        let body = req.into_body().collect().await.unwrap().to_bytes();
                        received.lock().unwrap().push(form::decode(&body));
                        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from("{}"))))
                    }
                };

                let _ = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                    .serve_connection(TokioIo::new(stream), service_fn(handler))
                    .await;
            });
        }
    });

    let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    (url, received)
}
