// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Which transitions of a Job trigger an email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// Only failures
    Failure,
    /// Failures and successes
    Complete,
    /// Failures, successes and retries
    #[default]
    All,
}

/// Result of reading the mode label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMode {
    pub mode: NotifyMode,
    /// The label had a non-empty value that is not a known mode
    pub malformed: bool,
}

impl NotifyMode {
    /// Parse the raw label value. Absent, empty and unknown values all
    /// fall back to `All`; only unknown non-empty values are malformed.
    pub fn parse(raw: Option<&str>) -> ParsedMode {
        let (mode, malformed) = match raw {
            Some("failure") => (NotifyMode::Failure, false),
            Some("complete") => (NotifyMode::Complete, false),
            Some("all") | Some("") | None => (NotifyMode::All, false),
            Some(_) => (NotifyMode::All, true),
        };
        ParsedMode { mode, malformed }
    }

    pub fn notify_on_failure(self) -> bool {
        true
    }

    pub fn notify_on_success(self) -> bool {
        matches!(self, NotifyMode::Complete | NotifyMode::All)
    }

    pub fn notify_on_retry(self) -> bool {
        matches!(self, NotifyMode::All)
    }
}
