//! Request and reply records of the dashboard API.
//!
//! Field names on the wire follow the dashboard's JSON encoding (`Manager`, `ID`,
//! `VMArch`, ...). Only the fields the relay reads are modelled; everything else
//! is kept in `extra` so a decoded record re-encodes without losing data.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};

/// Fields carried through untouched.
pub type Extra = serde_json::Map<String, serde_json::Value>;

// Empty lists arrive as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    #[serde(rename = "Manager")]
    pub manager: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "OS")]
    pub os: String,
    #[serde(rename = "Arch")]
    pub arch: String,
    #[serde(rename = "VMArch")]
    pub vm_arch: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderPollReq {
    #[serde(rename = "Manager")]
    pub manager: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderPollResp {
    #[serde(rename = "PendingCommits", deserialize_with = "null_as_default")]
    pub pending_commits: Vec<String>,
    #[serde(rename = "ReportEmail")]
    pub report_email: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPollReq {
    #[serde(rename = "PatchTestManagers", deserialize_with = "null_as_default")]
    pub patch_test_managers: Vec<String>,
    #[serde(rename = "BisectManagers", deserialize_with = "null_as_default")]
    pub bisect_managers: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl JobPollReq {
    /// Distinct manager names across all job kinds, in first-seen order.
    pub fn managers(&self) -> Vec<&str> {
        let seen: IndexSet<&str> = self
            .patch_test_managers
            .iter()
            .chain(&self.bisect_managers)
            .map(String::as_str)
            .collect();
        seen.into_iter().collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPollResp {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDoneReq {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Build")]
    pub build: Build,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildErrorReq {
    #[serde(rename = "Build")]
    pub build: Build,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitPollResp {
    #[serde(rename = "ReportEmail")]
    pub report_email: String,
    #[serde(rename = "Commits", deserialize_with = "null_as_default")]
    pub commits: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitPollResultReq {
    #[serde(rename = "Commits", deserialize_with = "null_as_default")]
    pub commits: Vec<Commit>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crash {
    #[serde(rename = "BuildID")]
    pub build_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportCrashResp {
    #[serde(rename = "NeedRepro")]
    pub need_repro: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashId {
    #[serde(rename = "BuildID")]
    pub build_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedReproResp {
    #[serde(rename = "NeedRepro")]
    pub need_repro: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Text")]
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollBugsRequest {
    #[serde(rename = "Type")]
    pub typ: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollBugsResponse {
    #[serde(rename = "Reports", deserialize_with = "null_as_default")]
    pub reports: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollNotificationsRequest {
    #[serde(rename = "Type")]
    pub typ: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollNotificationsResponse {
    #[serde(rename = "Notifications", deserialize_with = "null_as_default")]
    pub notifications: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollClosedRequest {
    #[serde(rename = "IDs", deserialize_with = "null_as_default")]
    pub ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollClosedResponse {
    #[serde(rename = "IDs", deserialize_with = "null_as_default")]
    pub ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugUpdate {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugUpdateReply {
    #[serde(rename = "OK")]
    pub ok: bool,
    #[serde(rename = "Error")]
    pub error: bool,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Periodic statistics a fuzzing manager uploads.
///
/// `UpTime` and `FuzzingTime` are durations in nanoseconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerStatsReq {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Addr")]
    pub addr: String,
    #[serde(rename = "UpTime")]
    pub up_time: u64,
    #[serde(rename = "Corpus")]
    pub corpus: u64,
    #[serde(rename = "PCs")]
    pub pcs: u64,
    #[serde(rename = "Cover")]
    pub cover: u64,
    #[serde(rename = "CrashTypes")]
    pub crash_types: u64,
    #[serde(rename = "Crashes")]
    pub crashes: u64,
    #[serde(rename = "SuppressedCrashes")]
    pub suppressed_crashes: u64,
    #[serde(rename = "Execs")]
    pub execs: u64,
    #[serde(rename = "FuzzingTime")]
    pub fuzzing_time: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugListResp {
    #[serde(rename = "List", deserialize_with = "null_as_default")]
    pub list: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBugReq {
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBugResp {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive() {
        let raw = json!({
            "Manager": "ci-upstream",
            "ID": "abc",
            "OS": "linux",
            "Arch": "amd64",
            "VMArch": "amd64",
            "KernelCommit": "deadbeef",
            "KernelConfig": "Q09ORklHX0tBU0FOPXk=",
        });

        let build: Build = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(build.manager, "ci-upstream");
        assert_eq!(build.vm_arch, "amd64");
        assert_eq!(build.extra.len(), 2);
        assert_eq!(serde_json::to_value(&build).unwrap(), raw);
    }

    #[test]
    fn test_missing_fields_default() {
        let stats: ManagerStatsReq =
            serde_json::from_value(json!({"Name": "fuzzer1", "Crashes": 2})).unwrap();
        assert_eq!(stats.name, "fuzzer1");
        assert_eq!(stats.crashes, 2);
        assert_eq!(stats.up_time, 0);
        assert!(stats.extra.is_empty());
    }

    #[test]
    fn test_job_poll_managers_dedup() {
        let req = JobPollReq {
            patch_test_managers: vec!["a".into(), "b".into()],
            bisect_managers: vec!["b".into(), "c".into()],
            extra: Extra::new(),
        };
        assert_eq!(req.managers(), vec!["a", "b", "c"]);

        let req = JobPollReq {
            patch_test_managers: (0..1000).map(|i| format!("ci-{}", i % 10)).collect(),
            bisect_managers: vec!["ci-3".into(), "bisect".into(), "bisect".into()],
            extra: Extra::new(),
        };
        let mut expected: Vec<String> = (0..10).map(|i| format!("ci-{i}")).collect();
        expected.push("bisect".into());
        assert_eq!(req.managers(), expected);
    }

    #[test]
    fn test_null_lists() {
        let req: JobPollReq = serde_json::from_value(json!({
            "PatchTestManagers": null,
            "BisectManagers": ["ci"],
        }))
        .unwrap();
        assert!(req.patch_test_managers.is_empty());
        assert_eq!(req.managers(), vec!["ci"]);

        let resp: BugListResp = serde_json::from_value(json!({"List": null})).unwrap();
        assert!(resp.list.is_empty());
    }
}
