use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use netcycle_base::{
    AdapterListResponse, ErrorCode, InterfaceRecord, ListFailed, NetcycleError, RestartFailed,
    RestartResponse, ABI_VERSION,
};
use netcycle_sys::netif::{AdapterControl, DEFAULT_SETTLE_DELAY};
use netcycle_sys::tool::Netsh;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTLE_MS: u64 = DEFAULT_SETTLE_DELAY.as_millis() as u64;

#[derive(Parser)]
#[command(version, about = "列举网卡，并通过 netsh 禁用再启用选中的网卡")]
struct Cli {
    /// 提高日志级别（-v info，-vv debug，-vvv trace）；设置 RUST_LOG 时以其为准
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出 netsh 报告的网卡
    List(ListArgs),
    /// 禁用再启用指定网卡，然后刷新网卡列表
    Restart(RestartArgs),
    /// 交互式选择网卡并重启
    Menu(MenuArgs),
}

#[derive(Parser, Clone)]
struct ListArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Clone)]
struct RestartArgs {
    /// 网卡名称，与 `netcycle list` 输出一致
    name: String,

    /// 跳过确认
    #[arg(short, long)]
    yes: bool,

    /// 禁用与启用之间等待的毫秒数
    #[arg(long, default_value_t = DEFAULT_SETTLE_MS)]
    settle_ms: u64,

    #[arg(long)]
    json: bool,
}

/// `restart --json` 的输出：重启结果加上重启后重新列举的网卡。
#[derive(Serialize)]
struct RestartReport {
    #[serde(flatten)]
    restart: RestartResponse,
    adapters: Vec<InterfaceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    list_error: Option<NetcycleError>,
}

impl RestartReport {
    fn new(restart: RestartResponse, listing: Result<Vec<InterfaceRecord>, ListFailed>) -> Self {
        let (adapters, list_error) = match listing {
            Ok(items) => (items, None),
            Err(e) => (Vec::new(), Some(e.into())),
        };
        Self {
            restart,
            adapters,
            list_error,
        }
    }
}

#[derive(Parser, Clone)]
struct MenuArgs {
    #[arg(long, default_value_t = DEFAULT_SETTLE_MS)]
    settle_ms: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::List(args) => list(args),
        Commands::Restart(args) => restart(args),
        Commands::Menu(args) => menu(args),
    };
    match result {
        Ok(code) => exit_code(code),
        Err(e) => {
            eprintln!("错误: {e:#}");
            exit_code(ErrorCode::SystemError)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(code: ErrorCode) -> ExitCode {
    ExitCode::from(exit_status(code))
}

fn exit_status(code: ErrorCode) -> u8 {
    code.as_i32().clamp(0, 255) as u8
}

fn control(settle_ms: u64) -> AdapterControl<Netsh> {
    AdapterControl::new(Netsh).with_settle_delay(Duration::from_millis(settle_ms))
}

fn list(args: ListArgs) -> anyhow::Result<ErrorCode> {
    let control = AdapterControl::new(Netsh);
    match control.list_adapters() {
        Ok(items) => {
            if args.json {
                print_json(&AdapterListResponse::v1(items))?;
            } else {
                print_adapters(&items);
            }
            Ok(ErrorCode::Ok)
        }
        Err(e) => {
            if args.json {
                let err = NetcycleError::from(e);
                print_json(&serde_json::json!({ "abi": ABI_VERSION, "ok": false, "error": err }))?;
            } else {
                eprintln!("{e}");
                print_adapters(&[]);
            }
            Ok(ErrorCode::ListFailed)
        }
    }
}

fn restart(args: RestartArgs) -> anyhow::Result<ErrorCode> {
    let theme = ColorfulTheme::default();
    if !args.yes && !confirm_restart(&theme, &args.name)? {
        println!("已取消");
        return Ok(ErrorCode::Ok);
    }

    let control = control(args.settle_ms);
    let outcome = control.restart_adapter(&args.name);

    if args.json {
        let resp = RestartResponse::from_outcome(args.name.clone(), outcome);
        let code = resp.code();
        print_json(&RestartReport::new(resp, control.list_adapters()))?;
        return Ok(code);
    }

    let code = report_restart(&args.name, &outcome);
    refresh(&control);
    Ok(code)
}

fn menu(args: MenuArgs) -> anyhow::Result<ErrorCode> {
    let theme = ColorfulTheme::default();
    let control = control(args.settle_ms);
    let mut last = ErrorCode::Ok;

    loop {
        let items = match control.list_adapters() {
            Ok(items) => {
                println!("找到 {} 个网卡", items.len());
                items
            }
            Err(e) => {
                eprintln!("{e}");
                Vec::new()
            }
        };

        let mut labels: Vec<String> = items.iter().map(|it| it.name.clone()).collect();
        labels.push("刷新列表".to_string());
        labels.push("退出".to_string());

        let idx = Select::with_theme(&theme)
            .with_prompt("选择要重启的网卡")
            .items(&labels)
            .default(0)
            .interact()
            .context("读取选择失败")?;

        if idx == items.len() {
            debug!("刷新网卡列表");
            continue;
        }
        if idx > items.len() {
            return Ok(last);
        }

        let name = &items[idx].name;
        if !confirm_restart(&theme, name)? {
            continue;
        }
        println!("正在重启 {name} ...");
        last = report_restart(name, &control.restart_adapter(name));
    }
}

fn confirm_restart(theme: &ColorfulTheme, name: &str) -> anyhow::Result<bool> {
    Confirm::with_theme(theme)
        .with_prompt(format!("重启网卡 '{name}'？这会暂时断开该网卡的连接。"))
        .default(false)
        .interact()
        .context("读取确认失败")
}

fn report_restart(name: &str, outcome: &Result<(), RestartFailed>) -> ErrorCode {
    match outcome {
        Ok(()) => {
            info!(adapter = name, "重启完成");
            println!("网卡 '{name}' 已重启");
            ErrorCode::Ok
        }
        Err(e) if e.adapter_down() => {
            eprintln!("!!! 网卡 '{name}' 已被禁用且未能重新启用，当前处于停用状态 !!!");
            eprintln!("{e}");
            eprintln!("可稍后再次执行重启，或在系统网络设置中手动启用该网卡。");
            e.code()
        }
        Err(e) => {
            eprintln!("重启网卡 '{name}' 失败: {e}");
            e.code()
        }
    }
}

fn refresh(control: &AdapterControl<Netsh>) {
    match control.list_adapters() {
        Ok(items) => print_adapters(&items),
        Err(e) => {
            eprintln!("{e}");
            print_adapters(&[]);
        }
    }
}

fn print_adapters(items: &[InterfaceRecord]) {
    println!("找到 {} 个网卡", items.len());
    for it in items {
        println!("  {}", it.name);
    }
}

fn print_json<T: Serialize>(v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("序列化 JSON 失败")?;
    println!("{s}");
    Ok(())
}
