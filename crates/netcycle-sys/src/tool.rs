//! 外部网络配置工具（`netsh`）的调用边界。
//!
//! 列举与重启都只通过 [`NetTool`] 调用外部工具，测试中可以替换为脚本化的假实现。

use std::io;
use std::process::{Command, Stdio};

/// 外部工具的可执行文件名，由系统的命令查找规则解析。
pub const NETSH: &str = "netsh";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ToolArg {
    Word(&'static str),
    /// 网卡名称；渲染时原样包一层双引号，不做其他转义。
    Quoted(String),
}

impl ToolArg {
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            ToolArg::Word(w) => *w,
            ToolArg::Quoted(s) => s.as_str(),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        match self {
            ToolArg::Word(w) => (*w).to_string(),
            ToolArg::Quoted(s) => format!("\"{s}\""),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AdminAction {
    Disable,
    Enable,
}

impl AdminAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AdminAction::Disable => "disable",
            AdminAction::Enable => "enable",
        }
    }
}

/// 一次外部工具调用的参数。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    pub args: Vec<ToolArg>,
    pub capture_stderr: bool,
}

impl Invocation {
    /// `interface show interface`，只捕获标准输出。
    #[must_use]
    pub fn show_interfaces() -> Self {
        Self {
            args: vec![
                ToolArg::Word("interface"),
                ToolArg::Word("show"),
                ToolArg::Word("interface"),
            ],
            capture_stderr: false,
        }
    }

    /// `interface set interface "<name>" disable|enable`，同时捕获标准输出和标准错误。
    #[must_use]
    pub fn set_interface(name: &str, action: AdminAction) -> Self {
        Self {
            args: vec![
                ToolArg::Word("interface"),
                ToolArg::Word("set"),
                ToolArg::Word("interface"),
                ToolArg::Quoted(name.to_string()),
                ToolArg::Word(action.as_str()),
            ],
            capture_stderr: true,
        }
    }

    #[must_use]
    pub fn command_line(&self) -> String {
        self.args
            .iter()
            .map(ToolArg::render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 一次调用的结果。`status` 为 `None` 表示进程被信号终止。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandResult {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

pub trait NetTool {
    /// 运行一次外部工具并等待其退出。进程无法启动时返回 `Err`。
    fn run(&self, invocation: &Invocation) -> io::Result<CommandResult>;
}

impl<T: NetTool + ?Sized> NetTool for &T {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandResult> {
        (**self).run(invocation)
    }
}

/// 系统自带的 `netsh`。
#[derive(Copy, Clone, Debug, Default)]
pub struct Netsh;

impl NetTool for Netsh {
    fn run(&self, invocation: &Invocation) -> io::Result<CommandResult> {
        let mut cmd = Command::new(NETSH);
        push_args(&mut cmd, invocation);
        cmd.stdin(Stdio::null()).stdout(Stdio::piped());
        if invocation.capture_stderr {
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stderr(Stdio::null());
        }
        hide_console_window(&mut cmd);

        let out = cmd.output()?;
        Ok(CommandResult {
            status: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        })
    }
}

// Windows 上 netsh 自己解析命令行，名称两侧的双引号需要原样到达。
#[cfg(target_os = "windows")]
fn push_args(cmd: &mut Command, invocation: &Invocation) {
    use std::os::windows::process::CommandExt;
    cmd.raw_arg(invocation.command_line());
}

#[cfg(not(target_os = "windows"))]
fn push_args(cmd: &mut Command, invocation: &Invocation) {
    cmd.args(invocation.args.iter().map(ToolArg::value));
}

#[cfg(target_os = "windows")]
fn hide_console_window(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(target_os = "windows"))]
fn hide_console_window(_cmd: &mut Command) {}
