use std::process::ExitCode;

/// Exit status of the xi18n binary.
///
/// - `Success` (0): messages were extracted, or the command had nothing to report
/// - `Failure` (1): the run finished but templates were malformed, so no bundle was produced
/// - `Error` (2): the run was aborted (bad config, unreadable metadata or resources)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
