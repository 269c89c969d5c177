//! Client side of the fuzzing dashboard API.
//!
//! Every dashboard operation is a `POST <addr>/api` carrying the form fields
//! `client`, `key`, `method` and, for operations with a request record, a
//! `payload` field holding the gzip-compressed JSON encoding of that record.
//!
//! The [`Dashboard`] trait is the surface the relay fans calls out to; [`Client`]
//! implements it over HTTP.

pub mod client;
pub mod codec;
pub mod errors;
pub mod form;
pub mod types;

pub use client::Client;
pub use errors::{ClientError, CodecError};

use async_trait::async_trait;
use types::*;

/// One dashboard's API surface. One method per remote operation.
#[async_trait]
pub trait Dashboard: Send + Sync {
    async fn upload_build(&self, build: &Build) -> Result<(), ClientError>;

    async fn builder_poll(&self, manager: &str) -> Result<BuilderPollResp, ClientError>;

    async fn job_poll(&self, req: &JobPollReq) -> Result<JobPollResp, ClientError>;

    async fn job_done(&self, req: &JobDoneReq) -> Result<(), ClientError>;

    async fn report_build_error(&self, req: &BuildErrorReq) -> Result<(), ClientError>;

    async fn commit_poll(&self) -> Result<CommitPollResp, ClientError>;

    async fn upload_commits(&self, commits: &[Commit]) -> Result<(), ClientError>;

    async fn report_crash(&self, crash: &Crash) -> Result<ReportCrashResp, ClientError>;

    async fn need_repro(&self, crash: &CrashId) -> Result<NeedReproResp, ClientError>;

    async fn report_failed_repro(&self, crash: &CrashId) -> Result<(), ClientError>;

    async fn log_error(&self, name: &str, text: &str) -> Result<(), ClientError>;

    async fn reporting_poll_bugs(&self, typ: &str) -> Result<PollBugsResponse, ClientError>;

    async fn reporting_poll_notifications(
        &self,
        typ: &str,
    ) -> Result<PollNotificationsResponse, ClientError>;

    async fn reporting_poll_closed(&self, ids: &[String])
    -> Result<PollClosedResponse, ClientError>;

    async fn reporting_update(&self, update: &BugUpdate) -> Result<BugUpdateReply, ClientError>;

    async fn upload_manager_stats(&self, stats: &ManagerStatsReq) -> Result<(), ClientError>;

    async fn bug_list(&self) -> Result<BugListResp, ClientError>;

    async fn load_bug(&self, id: &str) -> Result<LoadBugResp, ClientError>;
}
