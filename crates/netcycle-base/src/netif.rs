use serde::{Deserialize, Serialize};

use crate::{ErrorCode, NetcycleError, RestartFailed, ABI_VERSION};

/// 一块可重启的网卡。`name` 与外部工具输出中的名称逐字节一致，可直接传回重启接口。
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
}

impl InterfaceRecord {
    #[must_use]
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdapterListResponse {
    pub abi: u32,
    pub items: Vec<InterfaceRecord>,
}

impl AdapterListResponse {
    #[must_use]
    pub fn v1(items: Vec<InterfaceRecord>) -> Self {
        Self {
            abi: ABI_VERSION,
            items,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RestartRequest {
    pub abi: u32,
    pub name: String,
}

impl RestartRequest {
    #[must_use]
    pub fn v1<N: Into<String>>(name: N) -> Self {
        Self {
            abi: ABI_VERSION,
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RestartResponse {
    pub abi: u32,
    pub ok: bool,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<NetcycleError>,
}

impl RestartResponse {
    #[must_use]
    pub fn from_outcome(name: String, outcome: Result<(), RestartFailed>) -> Self {
        match outcome {
            Ok(()) => Self {
                abi: ABI_VERSION,
                ok: true,
                name,
                error: None,
            },
            Err(e) => Self {
                abi: ABI_VERSION,
                ok: false,
                name,
                error: Some(e.into()),
            },
        }
    }

    /// 错误码；成功时为 [`ErrorCode::Ok`]。
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.error.as_ref().map_or(ErrorCode::Ok, |e| e.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RestartPhase;

    #[test]
    fn restart_response_carries_phase_and_code() {
        let resp = RestartResponse::from_outcome(
            "Wi-Fi".to_string(),
            Err(RestartFailed::disable("Access is denied.")),
        );
        assert!(!resp.ok);
        assert_eq!(resp.code(), ErrorCode::DisableFailed);
        let err = resp.error.as_ref().unwrap();
        assert_eq!(err.phase, Some(RestartPhase::Disable));
        assert!(!err.adapter_down);

        let ok = RestartResponse::from_outcome("Wi-Fi".to_string(), Ok(()));
        assert!(ok.ok);
        assert_eq!(ok.code(), ErrorCode::Ok);
        let v = serde_json::to_value(&ok).unwrap();
        assert!(v.get("error").is_none());
        assert_eq!(v["abi"], ABI_VERSION);
    }

    #[test]
    fn restart_request_parses_from_json() {
        let req: RestartRequest =
            serde_json::from_str(r#"{"abi":1,"name":"Local Area Connection 2"}"#).unwrap();
        assert_eq!(req, RestartRequest::v1("Local Area Connection 2"));
    }
}
