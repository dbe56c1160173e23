use std::thread;
use std::time::Duration;

use netcycle_base::{
    AdapterListResponse, InterfaceRecord, ListFailed, NetcycleError, RestartFailed, RestartPhase,
    RestartRequest, RestartResponse, ABI_VERSION,
};
use tracing::{debug, error, info, warn};

use crate::tool::{AdminAction, Invocation, NetTool, Netsh};

mod parse;

pub use parse::{parse_show_interface, HEADER_LINES};

pub const NETIF_ABI_VERSION: u32 = ABI_VERSION;

/// 禁用与重新启用之间的等待时间。
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// 网卡列举与重启。所有操作都是同步阻塞的，调用方负责串行化重启调用。
#[derive(Clone, Debug)]
pub struct AdapterControl<T> {
    tool: T,
    settle_delay: Duration,
}

impl<T: NetTool> AdapterControl<T> {
    #[must_use]
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    #[must_use]
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn list_adapters(&self) -> Result<Vec<InterfaceRecord>, ListFailed> {
        let inv = Invocation::show_interfaces();
        let out = self.tool.run(&inv).map_err(|e| {
            warn!(command = %inv.command_line(), error = %e, "无法执行 netsh");
            ListFailed::new(format!("无法执行 netsh: {e}"))
        })?;

        match out.status {
            None => {
                return Err(ListFailed::new("netsh 被异常终止"));
            }
            Some(0) => {}
            Some(code) => {
                warn!(code, "netsh interface show interface 返回非零退出码，继续解析输出");
            }
        }

        let items = parse_show_interface(&out.stdout);
        debug!(count = items.len(), "已列举网卡");
        Ok(items)
    }

    /// 禁用网卡，等待 settle delay，再重新启用。
    ///
    /// 禁用失败时立即返回，不会尝试启用；启用失败时网卡保持禁用状态，不回滚也不重试。
    pub fn restart_adapter(&self, name: &str) -> Result<(), RestartFailed> {
        if name.is_empty() {
            return Err(RestartFailed::disable("网卡名称不能为空"));
        }

        info!(adapter = name, "开始重启网卡");
        self.run_phase(name, RestartPhase::Disable)?;

        thread::sleep(self.settle_delay);

        self.run_phase(name, RestartPhase::Enable)?;
        info!(adapter = name, "网卡已重启");
        Ok(())
    }

    fn run_phase(&self, name: &str, phase: RestartPhase) -> Result<(), RestartFailed> {
        let action = match phase {
            RestartPhase::Disable => AdminAction::Disable,
            RestartPhase::Enable => AdminAction::Enable,
        };
        let inv = Invocation::set_interface(name, action);
        debug!(command = %inv.command_line(), "执行 netsh");

        let cause = match self.tool.run(&inv) {
            Ok(out) if out.success() => {
                info!(adapter = name, phase = %phase, "完成");
                return Ok(());
            }
            Ok(out) => out.stderr,
            Err(e) => format!("无法执行 netsh: {e}"),
        };

        let failure = RestartFailed { phase, cause };
        if failure.adapter_down() {
            error!(
                adapter = name,
                phase = %phase,
                cause = %failure.cause.trim(),
                "重新启用失败，网卡处于停用状态"
            );
        } else {
            warn!(
                adapter = name,
                phase = %phase,
                cause = %failure.cause.trim(),
                "禁用失败，网卡状态未改变"
            );
        }
        Err(failure)
    }

    pub fn list_response(&self) -> Result<AdapterListResponse, ListFailed> {
        Ok(AdapterListResponse::v1(self.list_adapters()?))
    }

    pub fn list_json_bytes(&self) -> Result<Vec<u8>, NetcycleError> {
        let resp = self.list_response()?;
        serde_json::to_vec(&resp)
            .map_err(|e| NetcycleError::system_error(format!("序列化 list 响应失败: {e}")))
    }

    pub fn restart_request(&self, req: RestartRequest) -> Result<RestartResponse, NetcycleError> {
        if req.abi != NETIF_ABI_VERSION {
            return Err(NetcycleError::invalid_argument(format!(
                "abi 版本不匹配: expected={} got={}",
                NETIF_ABI_VERSION, req.abi
            )));
        }
        let outcome = self.restart_adapter(&req.name);
        Ok(RestartResponse::from_outcome(req.name, outcome))
    }

    pub fn restart_json(&self, req_json: &str) -> Result<RestartResponse, NetcycleError> {
        let req: RestartRequest = serde_json::from_str(req_json)
            .map_err(|e| NetcycleError::invalid_argument(format!("解析请求 JSON 失败: {e}")))?;
        self.restart_request(req)
    }
}

pub fn list_adapters() -> Result<Vec<InterfaceRecord>, ListFailed> {
    AdapterControl::new(Netsh).list_adapters()
}

pub fn restart_adapter(name: &str) -> Result<(), RestartFailed> {
    AdapterControl::new(Netsh).restart_adapter(name)
}

pub fn list_json_bytes() -> Result<Vec<u8>, NetcycleError> {
    AdapterControl::new(Netsh).list_json_bytes()
}

pub fn restart_json(req_json: &str) -> Result<RestartResponse, NetcycleError> {
    AdapterControl::new(Netsh).restart_json(req_json)
}
