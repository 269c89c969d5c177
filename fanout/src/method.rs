use crate::errors::DispatchError;
use std::fmt;
use std::str::FromStr;

/// Every API method the relay understands, named as on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    UploadBuild,
    BuilderPoll,
    JobPoll,
    JobDone,
    ReportBuildError,
    CommitPoll,
    UploadCommits,
    ReportCrash,
    NeedRepro,
    ReportFailedRepro,
    LogError,
    ReportingPollBugs,
    ReportingPollNotifs,
    ReportingPollClosed,
    ReportingUpdate,
    ManagerStats,
    BugList,
    LoadBug,
}

impl Method {
    pub const ALL: [Method; 18] = [
        Method::UploadBuild,
        Method::BuilderPoll,
        Method::JobPoll,
        Method::JobDone,
        Method::ReportBuildError,
        Method::CommitPoll,
        Method::UploadCommits,
        Method::ReportCrash,
        Method::NeedRepro,
        Method::ReportFailedRepro,
        Method::LogError,
        Method::ReportingPollBugs,
        Method::ReportingPollNotifs,
        Method::ReportingPollClosed,
        Method::ReportingUpdate,
        Method::ManagerStats,
        Method::BugList,
        Method::LoadBug,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::UploadBuild => "upload_build",
            Method::BuilderPoll => "builder_poll",
            Method::JobPoll => "job_poll",
            Method::JobDone => "job_done",
            Method::ReportBuildError => "report_build_error",
            Method::CommitPoll => "commit_poll",
            Method::UploadCommits => "upload_commits",
            Method::ReportCrash => "report_crash",
            Method::NeedRepro => "need_repro",
            Method::ReportFailedRepro => "report_failed_repro",
            Method::LogError => "log_error",
            Method::ReportingPollBugs => "reporting_poll_bugs",
            Method::ReportingPollNotifs => "reporting_poll_notifs",
            Method::ReportingPollClosed => "reporting_poll_closed",
            Method::ReportingUpdate => "reporting_update",
            Method::ManagerStats => "manager_stats",
            Method::BugList => "bug_list",
            Method::LoadBug => "load_bug",
        }
    }

    /// Whether the call carries a `payload` form field.
    pub const fn has_payload(&self) -> bool {
        !matches!(self, Method::CommitPoll | Method::BugList)
    }
}

impl FromStr for Method {
    type Err = DispatchError;

    // Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
