//! Response classification.
//!
//! Each operation carries a finite accept-set policy mapping status codes to
//! success or failure. Classifiers are pure: they look only at the status
//! code (and, for the accepted-async follow-up, the response body) and never
//! touch shared state.

use serde_json::Value;

/// Follow-up request issued after an accepted-async response.
#[derive(Debug)]
pub struct FollowUp {
    pub name: &'static str,
    /// Path template with a `{jobId}` placeholder filled from the
    /// triggering response body
    pub path: &'static str,
    pub accept: &'static [u16],
}

/// Accept-set policy for an operation's responses.
#[derive(Debug, Clone, Copy)]
pub enum AcceptPolicy {
    /// Exactly one status code is success
    Strict(u16),
    /// An explicit set of codes are all success (e.g. 404 for lookups
    /// where "not found" is an acceptable outcome)
    AnyOf(&'static [u16]),
    /// A single code signals deferred processing; success, plus one
    /// synchronous follow-up poll of a job-status endpoint
    AcceptedAsync {
        code: u16,
        follow_up: &'static FollowUp,
    },
}

impl AcceptPolicy {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            AcceptPolicy::Strict(code) => status == *code,
            AcceptPolicy::AnyOf(codes) => codes.contains(&status),
            AcceptPolicy::AcceptedAsync { code, .. } => status == *code,
        }
    }

    /// The follow-up to run after an accepted response, if any.
    pub fn follow_up(&self) -> Option<&'static FollowUp> {
        match self {
            AcceptPolicy::AcceptedAsync { follow_up, .. } => Some(follow_up),
            _ => None,
        }
    }
}

/// Classification outcome reported to the metrics collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
}

/// Classify a response status against an operation's accept policy.
pub fn classify(op_name: &str, policy: AcceptPolicy, status: u16) -> Outcome {
    if policy.accepts(status) {
        Outcome::Success
    } else {
        Outcome::Failure(format!("{} failed with status {}", op_name, status))
    }
}

/// Extract the job identifier from an accepted-async response body.
///
/// Returns `None` when the body is not JSON or carries no `jobId` field;
/// the caller then skips the follow-up poll.
pub fn extract_job_id(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("jobId")?.as_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    static JOB_STATUS: FollowUp = FollowUp {
        name: "job-status",
        path: "/api/listed-stocks/import-jobs/{jobId}",
        accept: &[200, 404],
    };

    #[test]
    fn strict_policy_accepts_only_its_code() {
        let policy = AcceptPolicy::Strict(200);
        assert_eq!(classify("health", policy, 200), Outcome::Success);
        for status in [201, 204, 301, 400, 404, 500, 503] {
            match classify("health", policy, status) {
                Outcome::Failure(msg) => assert!(msg.contains(&status.to_string())),
                Outcome::Success => panic!("status {} must not be accepted", status),
            }
        }
    }

    #[test]
    fn tolerant_policy_accepts_every_listed_code() {
        let policy = AcceptPolicy::AnyOf(&[200, 404]);
        assert_eq!(classify("quote", policy, 200), Outcome::Success);
        assert_eq!(classify("quote", policy, 404), Outcome::Success);
        assert_eq!(
            classify("quote", policy, 500),
            Outcome::Failure("quote failed with status 500".to_string())
        );
    }

    #[test]
    fn count_by_symbol_tolerates_bad_request() {
        let policy = AcceptPolicy::AnyOf(&[200, 400]);
        assert_eq!(classify("count-by-symbol", policy, 400), Outcome::Success);
    }

    #[test]
    fn accepted_async_accepts_202_and_exposes_follow_up() {
        let policy = AcceptPolicy::AcceptedAsync {
            code: 202,
            follow_up: &JOB_STATUS,
        };
        assert_eq!(classify("import-csv", policy, 202), Outcome::Success);
        assert!(matches!(classify("import-csv", policy, 200), Outcome::Failure(_)));
        let follow_up = policy.follow_up().unwrap();
        assert_eq!(follow_up.path, "/api/listed-stocks/import-jobs/{jobId}");
        assert!(follow_up.accept.contains(&404));
    }

    #[test]
    fn job_id_extraction_handles_absent_field() {
        assert_eq!(
            extract_job_id(br#"{"jobId": "abc-123"}"#).as_deref(),
            Some("abc-123")
        );
        assert_eq!(extract_job_id(br#"{"status": "queued"}"#), None);
        assert_eq!(extract_job_id(b"not json"), None);
        assert_eq!(extract_job_id(b""), None);
    }
}
