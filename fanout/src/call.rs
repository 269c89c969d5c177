//! Decoded calls and the adapter operation each one maps to.

use crate::method::Method;
use crate::metrics_defs::{
    BUILD_ERRORS, BUILDS, JOB_POLLS, JOBS_DONE, MANAGER_CORPUS, MANAGER_COVERAGE,
    MANAGER_CRASHES, MANAGER_EXECS, MANAGER_FUZZING_DUR, MANAGER_PCS, MANAGER_SUPP_CRASHES,
    MANAGER_UPTIME,
};
use dashapi::codec::decode_payload;
use dashapi::types::*;
use dashapi::{ClientError, CodecError, Dashboard};
use shared::metrics_defs::MetricDef;
use shared::{counter, gauge};

/// A recognized method together with its decoded request record.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    UploadBuild(Build),
    BuilderPoll(BuilderPollReq),
    JobPoll(JobPollReq),
    JobDone(JobDoneReq),
    ReportBuildError(BuildErrorReq),
    CommitPoll,
    UploadCommits(CommitPollResultReq),
    ReportCrash(Crash),
    NeedRepro(CrashId),
    ReportFailedRepro(CrashId),
    LogError(LogEntry),
    ReportingPollBugs(PollBugsRequest),
    ReportingPollNotifs(PollNotificationsRequest),
    ReportingPollClosed(PollClosedRequest),
    ReportingUpdate(BugUpdate),
    ManagerStats(ManagerStatsReq),
    BugList,
    LoadBug(LoadBugReq),
}

impl Call {
    /// Decodes the payload `method` expects. Payload-free methods ignore `payload`.
    pub fn decode(method: Method, payload: Option<&[u8]>) -> Result<Call, CodecError> {
        let payload = payload.unwrap_or_default();

        let call = match method {
            Method::UploadBuild => Call::UploadBuild(decode_payload(payload)?),
            Method::BuilderPoll => Call::BuilderPoll(decode_payload(payload)?),
            Method::JobPoll => Call::JobPoll(decode_payload(payload)?),
            Method::JobDone => Call::JobDone(decode_payload(payload)?),
            Method::ReportBuildError => Call::ReportBuildError(decode_payload(payload)?),
            Method::CommitPoll => Call::CommitPoll,
            Method::UploadCommits => Call::UploadCommits(decode_payload(payload)?),
            Method::ReportCrash => Call::ReportCrash(decode_payload(payload)?),
            Method::NeedRepro => Call::NeedRepro(decode_payload(payload)?),
            Method::ReportFailedRepro => Call::ReportFailedRepro(decode_payload(payload)?),
            Method::LogError => Call::LogError(decode_payload(payload)?),
            Method::ReportingPollBugs => Call::ReportingPollBugs(decode_payload(payload)?),
            Method::ReportingPollNotifs => Call::ReportingPollNotifs(decode_payload(payload)?),
            Method::ReportingPollClosed => Call::ReportingPollClosed(decode_payload(payload)?),
            Method::ReportingUpdate => Call::ReportingUpdate(decode_payload(payload)?),
            Method::ManagerStats => Call::ManagerStats(decode_payload(payload)?),
            Method::BugList => Call::BugList,
            Method::LoadBug => Call::LoadBug(decode_payload(payload)?),
        };

        Ok(call)
    }

    pub fn method(&self) -> Method {
        match self {
            Call::UploadBuild(_) => Method::UploadBuild,
            Call::BuilderPoll(_) => Method::BuilderPoll,
            Call::JobPoll(_) => Method::JobPoll,
            Call::JobDone(_) => Method::JobDone,
            Call::ReportBuildError(_) => Method::ReportBuildError,
            Call::CommitPoll => Method::CommitPoll,
            Call::UploadCommits(_) => Method::UploadCommits,
            Call::ReportCrash(_) => Method::ReportCrash,
            Call::NeedRepro(_) => Method::NeedRepro,
            Call::ReportFailedRepro(_) => Method::ReportFailedRepro,
            Call::LogError(_) => Method::LogError,
            Call::ReportingPollBugs(_) => Method::ReportingPollBugs,
            Call::ReportingPollNotifs(_) => Method::ReportingPollNotifs,
            Call::ReportingPollClosed(_) => Method::ReportingPollClosed,
            Call::ReportingUpdate(_) => Method::ReportingUpdate,
            Call::ManagerStats(_) => Method::ManagerStats,
            Call::BugList => Method::BugList,
            Call::LoadBug(_) => Method::LoadBug,
        }
    }

    /// Failures of best-effort calls are logged and do not stop the fan-out.
    pub fn is_best_effort(&self) -> bool {
        matches!(self, Call::LogError(_))
    }

    /// Runs the matching operation against one dashboard. Replies are discarded.
    pub async fn invoke(&self, dashboard: &dyn Dashboard) -> Result<(), ClientError> {
        match self {
            Call::UploadBuild(build) => dashboard.upload_build(build).await,
            Call::BuilderPoll(req) => dashboard.builder_poll(&req.manager).await.map(drop),
            Call::JobPoll(req) => dashboard.job_poll(req).await.map(drop),
            Call::JobDone(req) => dashboard.job_done(req).await,
            Call::ReportBuildError(req) => dashboard.report_build_error(req).await,
            Call::CommitPoll => dashboard.commit_poll().await.map(drop),
            Call::UploadCommits(req) => dashboard.upload_commits(&req.commits).await,
            Call::ReportCrash(crash) => dashboard.report_crash(crash).await.map(drop),
            Call::NeedRepro(crash) => dashboard.need_repro(crash).await.map(drop),
            Call::ReportFailedRepro(crash) => dashboard.report_failed_repro(crash).await,
            Call::LogError(entry) => dashboard.log_error(&entry.name, &entry.text).await,
            Call::ReportingPollBugs(req) => dashboard.reporting_poll_bugs(&req.typ).await.map(drop),
            Call::ReportingPollNotifs(req) => dashboard
                .reporting_poll_notifications(&req.typ)
                .await
                .map(drop),
            Call::ReportingPollClosed(req) => {
                dashboard.reporting_poll_closed(&req.ids).await.map(drop)
            }
            Call::ReportingUpdate(update) => dashboard.reporting_update(update).await.map(drop),
            Call::ManagerStats(stats) => dashboard.upload_manager_stats(stats).await,
            Call::BugList => dashboard.bug_list().await.map(drop),
            Call::LoadBug(req) => dashboard.load_bug(&req.id).await.map(drop),
        }
    }

    /// Updates the per-record metrics. Called once per decoded call, before fan-out.
    pub fn record_metrics(&self) {
        match self {
            Call::UploadBuild(build) => count_build(BUILDS, build),
            Call::ReportBuildError(req) => count_build(BUILD_ERRORS, &req.build),
            Call::JobPoll(req) => {
                for manager in req.managers() {
                    counter!(JOB_POLLS, "manager" => manager.to_string()).increment(1);
                }
            }
            Call::JobDone(req) => {
                counter!(
                    JOBS_DONE,
                    "id" => req.id.clone(),
                    "manager" => req.build.manager.clone(),
                    "build_id" => req.build.id.clone(),
                    "os" => req.build.os.clone(),
                    "arch" => req.build.arch.clone(),
                    "vmarch" => req.build.vm_arch.clone(),
                )
                .increment(1);
            }
            Call::ManagerStats(stats) => record_manager_stats(stats),
            _ => {}
        }
    }
}

fn count_build(def: MetricDef, build: &Build) {
    counter!(
        def,
        "manager" => build.manager.clone(),
        "id" => build.id.clone(),
        "os" => build.os.clone(),
        "arch" => build.arch.clone(),
        "vmarch" => build.vm_arch.clone(),
    )
    .increment(1);
}

fn record_manager_stats(stats: &ManagerStatsReq) {
    let manager = stats.name.clone();

    gauge!(MANAGER_UPTIME, "manager" => manager.clone()).set(stats.up_time as f64);
    gauge!(MANAGER_CORPUS, "manager" => manager.clone()).set(stats.corpus as f64);
    gauge!(MANAGER_PCS, "manager" => manager.clone()).set(stats.pcs as f64);
    gauge!(MANAGER_COVERAGE, "manager" => manager.clone()).set(stats.cover as f64);
    counter!(MANAGER_CRASHES, "manager" => manager.clone()).increment(stats.crashes);
    counter!(MANAGER_SUPP_CRASHES, "manager" => manager.clone())
        .increment(stats.suppressed_crashes);
    counter!(MANAGER_EXECS, "manager" => manager.clone()).increment(stats.execs);
    counter!(MANAGER_FUZZING_DUR, "manager" => manager).increment(stats.fuzzing_time);
}
