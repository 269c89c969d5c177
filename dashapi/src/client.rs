use crate::Dashboard;
use crate::codec::encode_payload;
use crate::errors::ClientError;
use crate::form;
use crate::types::*;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// HTTP client for one dashboard.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    api_url: Url,
    client: String,
    key: String,
}

impl Client {
    /// `addr` is the dashboard base address; calls go to `<addr>/api`.
    pub fn new(
        addr: &Url,
        client: impl Into<String>,
        key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let api_url = Url::parse(&format!("{}/api", addr.as_str().trim_end_matches('/')))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Client {
            http,
            api_url,
            client: client.into(),
            key: key.into(),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Sends one call and returns the raw reply body of a 200 response.
    async fn query<Req>(&self, method: &str, req: Option<&Req>) -> Result<Vec<u8>, ClientError>
    where
        Req: Serialize + Sync + ?Sized,
    {
        let payload = req.map(|r| encode_payload(r)).transpose()?;

        let mut fields = vec![
            ("client", self.client.as_bytes()),
            ("key", self.key.as_bytes()),
            ("method", method.as_bytes()),
        ];
        if let Some(payload) = &payload {
            fields.push(("payload", payload.as_slice()));
        }

        tracing::debug!(method, url = %self.api_url, "Sending dashboard call");
        let response = self
            .http
            .post(self.api_url.clone())
            .header(CONTENT_TYPE, form::CONTENT_TYPE)
            .body(form::encode(&fields))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn query_reply<Req, Resp>(
        &self,
        method: &str,
        req: Option<&Req>,
    ) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let body = self.query(method, req).await?;
        serde_json::from_slice(&body).map_err(ClientError::Reply)
    }
}

// Methods without a request record
const NO_PAYLOAD: Option<&()> = None;

#[async_trait]
impl Dashboard for Client {
    async fn upload_build(&self, build: &Build) -> Result<(), ClientError> {
        self.query("upload_build", Some(build)).await.map(drop)
    }

    async fn builder_poll(&self, manager: &str) -> Result<BuilderPollResp, ClientError> {
        let req = BuilderPollReq {
            manager: manager.to_string(),
            ..Default::default()
        };
        self.query_reply("builder_poll", Some(&req)).await
    }

    async fn job_poll(&self, req: &JobPollReq) -> Result<JobPollResp, ClientError> {
        self.query_reply("job_poll", Some(req)).await
    }

    async fn job_done(&self, req: &JobDoneReq) -> Result<(), ClientError> {
        self.query("job_done", Some(req)).await.map(drop)
    }

    async fn report_build_error(&self, req: &BuildErrorReq) -> Result<(), ClientError> {
        self.query("report_build_error", Some(req)).await.map(drop)
    }

    async fn commit_poll(&self) -> Result<CommitPollResp, ClientError> {
        self.query_reply("commit_poll", NO_PAYLOAD).await
    }

    async fn upload_commits(&self, commits: &[Commit]) -> Result<(), ClientError> {
        let req = CommitPollResultReq {
            commits: commits.to_vec(),
            ..Default::default()
        };
        self.query("upload_commits", Some(&req)).await.map(drop)
    }

    async fn report_crash(&self, crash: &Crash) -> Result<ReportCrashResp, ClientError> {
        self.query_reply("report_crash", Some(crash)).await
    }

    async fn need_repro(&self, crash: &CrashId) -> Result<NeedReproResp, ClientError> {
        self.query_reply("need_repro", Some(crash)).await
    }

    async fn report_failed_repro(&self, crash: &CrashId) -> Result<(), ClientError> {
        self.query("report_failed_repro", Some(crash)).await.map(drop)
    }

    async fn log_error(&self, name: &str, text: &str) -> Result<(), ClientError> {
        let req = LogEntry {
            name: name.to_string(),
            text: text.to_string(),
        };
        self.query("log_error", Some(&req)).await.map(drop)
    }

    async fn reporting_poll_bugs(&self, typ: &str) -> Result<PollBugsResponse, ClientError> {
        let req = PollBugsRequest {
            typ: typ.to_string(),
        };
        self.query_reply("reporting_poll_bugs", Some(&req)).await
    }

    async fn reporting_poll_notifications(
        &self,
        typ: &str,
    ) -> Result<PollNotificationsResponse, ClientError> {
        let req = PollNotificationsRequest {
            typ: typ.to_string(),
        };
        self.query_reply("reporting_poll_notifs", Some(&req)).await
    }

    async fn reporting_poll_closed(
        &self,
        ids: &[String],
    ) -> Result<PollClosedResponse, ClientError> {
        let req = PollClosedRequest { ids: ids.to_vec() };
        self.query_reply("reporting_poll_closed", Some(&req)).await
    }

    async fn reporting_update(&self, update: &BugUpdate) -> Result<BugUpdateReply, ClientError> {
        self.query_reply("reporting_update", Some(update)).await
    }

    async fn upload_manager_stats(&self, stats: &ManagerStatsReq) -> Result<(), ClientError> {
        self.query("manager_stats", Some(stats)).await.map(drop)
    }

    async fn bug_list(&self) -> Result<BugListResp, ClientError> {
        self.query_reply("bug_list", NO_PAYLOAD).await
    }

    async fn load_bug(&self, id: &str) -> Result<LoadBugResp, ClientError> {
        let req = LoadBugReq { id: id.to_string() };
        self.query_reply("load_bug", Some(&req)).await
    }
}
