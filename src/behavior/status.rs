//! Status returned by behavior nodes.

/// The result of evaluating a behavior node. Every tick completes
/// immediately, so there is no `Running` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Condition met, or the action did something meaningful.
    Success,
    /// Condition not met, or the action could not act.
    Failure,
}

impl Status {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }
}

impl From<bool> for Status {
    #[inline]
    fn from(ok: bool) -> Self {
        if ok { Status::Success } else { Status::Failure }
    }
}

impl From<Status> for bool {
    #[inline]
    fn from(status: Status) -> Self {
        status.is_success()
    }
}
