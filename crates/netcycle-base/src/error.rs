use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    InvalidArgument = 1,
    SystemError = 5,
    ListFailed = 6,
    DisableFailed = 7,
    EnableFailed = 8,
    Unknown = 999,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

/// 重启流程中失败发生的阶段。
///
/// `Disable` 阶段失败时网卡状态未变；`Enable` 阶段失败时网卡已被禁用且没有恢复。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPhase {
    Disable,
    Enable,
}

impl RestartPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RestartPhase::Disable => "disable",
            RestartPhase::Enable => "enable",
        }
    }

    #[must_use]
    pub const fn leaves_adapter_down(self) -> bool {
        matches!(self, RestartPhase::Enable)
    }
}

impl fmt::Display for RestartPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 枚举网卡失败：外部工具无法启动或执行过程中出现平台级错误。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("枚举网卡失败: {cause}")]
pub struct ListFailed {
    pub cause: String,
}

impl ListFailed {
    #[must_use]
    pub fn new<C: Into<String>>(cause: C) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{}", describe_restart_failure(.phase, .cause))]
pub struct RestartFailed {
    pub phase: RestartPhase,
    pub cause: String,
}

impl RestartFailed {
    #[must_use]
    pub fn disable<C: Into<String>>(cause: C) -> Self {
        Self {
            phase: RestartPhase::Disable,
            cause: cause.into(),
        }
    }

    #[must_use]
    pub fn enable<C: Into<String>>(cause: C) -> Self {
        Self {
            phase: RestartPhase::Enable,
            cause: cause.into(),
        }
    }

    /// 网卡是否已被禁用且未能重新启用。
    #[must_use]
    pub const fn adapter_down(&self) -> bool {
        self.phase.leaves_adapter_down()
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self.phase {
            RestartPhase::Disable => ErrorCode::DisableFailed,
            RestartPhase::Enable => ErrorCode::EnableFailed,
        }
    }
}

fn describe_restart_failure(phase: &RestartPhase, cause: &str) -> String {
    let cause = cause.trim();
    let cause = if cause.is_empty() { "(无错误输出)" } else { cause };
    match phase {
        RestartPhase::Disable => format!("禁用网卡失败，网卡状态未改变: {cause}"),
        RestartPhase::Enable => {
            format!("网卡已禁用但重新启用失败，网卡当前处于停用状态: {cause}")
        }
    }
}

/// ABI/JSON 层使用的可序列化错误。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NetcycleError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<RestartPhase>,
    #[serde(default)]
    pub adapter_down: bool,
}

impl NetcycleError {
    #[must_use]
    pub fn invalid_argument<M: Into<String>>(message: M) -> Self {
        Self::plain(ErrorCode::InvalidArgument, message)
    }

    #[must_use]
    pub fn system_error<M: Into<String>>(message: M) -> Self {
        Self::plain(ErrorCode::SystemError, message)
    }

    fn plain<M: Into<String>>(code: ErrorCode, message: M) -> Self {
        Self {
            code,
            message: message.into(),
            phase: None,
            adapter_down: false,
        }
    }
}

impl fmt::Display for NetcycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for NetcycleError {}

impl From<ListFailed> for NetcycleError {
    fn from(e: ListFailed) -> Self {
        Self::plain(ErrorCode::ListFailed, e.to_string())
    }
}

impl From<RestartFailed> for NetcycleError {
    fn from(e: RestartFailed) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
            phase: Some(e.phase),
            adapter_down: e.adapter_down(),
        }
    }
}
