pub mod push;
pub mod work;

use crate::ops::github::PullRequest;

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkOutcome {
    /// The dice said no; nothing was touched.
    RestDay,
    Worked {
        commits: usize,
        pull_requests: Vec<PullRequest>,
    },
}
