use std::cell::RefCell;
use std::io;
use std::time::{Duration, Instant};

use netcycle_base::RestartPhase;
use netcycle_sys::netif::{AdapterControl, DEFAULT_SETTLE_DELAY};
use netcycle_sys::tool::{CommandResult, Invocation, NetTool, ToolArg};

const SHOW_INTERFACE: &str = "\r
Admin State    State          Type             Interface Name\r
-------------------------------------------------------------------------\r
Enabled        Connected      Dedicated        Ethernet\r
Enabled            Connected        Dedicated       Local Area Connection 2\r
\r
";

/// 假的 netsh：`show interface` 返回固定表格，`fail_on` 指定的动作返回非零退出码。
struct FakeNetsh {
    fail_on: Option<&'static str>,
    calls: RefCell<Vec<(Instant, Invocation)>>,
}

impl FakeNetsh {
    fn new(fail_on: Option<&'static str>) -> Self {
        Self {
            fail_on,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn actions(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(_, inv)| inv.args.last().map(|a| a.value().to_string()).unwrap_or_default())
            .collect()
    }
}

impl NetTool for FakeNetsh {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandResult> {
        self.calls
            .borrow_mut()
            .push((Instant::now(), invocation.clone()));

        let action = invocation.args.last().map(ToolArg::value).unwrap_or_default();
        if action == "interface" {
            return Ok(CommandResult {
                status: Some(0),
                stdout: SHOW_INTERFACE.to_string(),
                stderr: String::new(),
            });
        }
        if self.fail_on == Some(action) {
            return Ok(CommandResult {
                status: Some(1),
                stdout: String::new(),
                stderr: format!("{action} rejected\r\n"),
            });
        }
        Ok(CommandResult {
            status: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

#[test]
fn listed_names_round_trip_into_restart() {
    let tool = FakeNetsh::new(None);
    let control = AdapterControl::new(&tool).with_settle_delay(Duration::from_millis(1));

    let adapters = control.list_adapters().unwrap();
    assert_eq!(adapters.len(), 2);
    let name = &adapters[1].name;
    assert_eq!(name, "Local Area Connection 2");

    control.restart_adapter(name).unwrap();

    let calls = tool.calls.borrow();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[1].1.args[3],
        ToolArg::Quoted("Local Area Connection 2".to_string())
    );
    assert_eq!(
        calls[2].1.command_line(),
        r#"interface set interface "Local Area Connection 2" enable"#
    );
}

#[test]
fn enable_runs_after_the_default_settle_delay() {
    let tool = FakeNetsh::new(Some("enable"));
    let control = AdapterControl::new(&tool);
    assert_eq!(control.settle_delay(), DEFAULT_SETTLE_DELAY);

    let err = control.restart_adapter("Ethernet").unwrap_err();
    assert_eq!(err.phase, RestartPhase::Enable);
    assert!(err.adapter_down());
    assert_eq!(err.cause, "enable rejected\r\n");

    assert_eq!(tool.actions(), ["disable", "enable"]);
    let calls = tool.calls.borrow();
    let gap = calls[1].0.duration_since(calls[0].0);
    assert!(gap >= DEFAULT_SETTLE_DELAY, "gap was {gap:?}");
}

#[test]
fn failed_disable_never_enables() {
    let tool = FakeNetsh::new(Some("disable"));
    let control = AdapterControl::new(&tool);

    let started = Instant::now();
    let err = control.restart_adapter("Ethernet").unwrap_err();
    assert_eq!(err.phase, RestartPhase::Disable);
    assert!(!err.adapter_down());
    assert_eq!(tool.actions(), ["disable"]);
    assert!(started.elapsed() < DEFAULT_SETTLE_DELAY);

    // 失败后核心仍可继续使用
    assert_eq!(control.list_adapters().unwrap().len(), 2);
}

#[test]
fn successful_restart_makes_exactly_two_calls() {
    let tool = FakeNetsh::new(None);
    let control = AdapterControl::new(&tool).with_settle_delay(Duration::from_millis(1));

    control.restart_adapter("Ethernet").unwrap();
    assert_eq!(tool.actions(), ["disable", "enable"]);
}
