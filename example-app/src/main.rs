//! # 示例应用程序
//!
//! 演示如何用组合标记描述类型，并通过依赖注入容器解析对象图

use anyhow::Context;
use clap::Parser;
use component_macros::Composable;
use di_abstractions::{ComponentResolver, ContainerBuilder, ContainerConfig, DiContainer};
use di_impl::DiContainerImpl;
use infrastructure_common::{Contract, Module, PropertyDescriptor, TypeDescriptor};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn DI 示例应用")]
struct Args {
    /// 容器配置文件路径
    #[arg(short, long, default_value = "config/container.toml")]
    config: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 要发送的消息
    #[arg(long, default_value = "订单已发货")]
    message: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("启动 Lorn DI 示例应用");

    let config = ContainerConfig::load(&args.config)
        .with_context(|| format!("无法加载容器配置: {}", args.config))?;

    let container = DiContainerImpl::builder()
        .with_config(config)
        .add_module(notification_module())
        .build()
        .context("容器构建失败")?;

    // 通过契约解析：只注入契约上声明的导入属性
    let notifier = container.resolve::<dyn Notifier>()?;
    info!("{}", notifier.send(&args.message));

    // 通过具体类型解析：注入具体类型自身声明的导入属性
    let service = container.resolve::<OrderService>()?;
    info!("{}", service.ship(&args.message));

    if let Err(e) = container.resolve::<AuditTrail>() {
        error!("预期的解析失败: {}", e);
    }

    info!("容器统计: {}", serde_json::to_string_pretty(&container.stats())?);
    Ok(())
}

/// 组装示例模块
fn notification_module() -> Module {
    Module::new("notification")
        .with_composable::<SystemClock>()
        .with_composable::<ConsoleSink>()
        .with_composable::<SmsNotifier>()
        .with_composable::<OrderService>()
        .with_type(TypeDescriptor::builder::<AuditTrail>().export().build())
}

/// 时间来源
#[derive(Debug, Composable)]
#[export]
struct SystemClock {
    started_at: u64,
}

impl SystemClock {
    fn now(&self) -> u64 {
        self.started_at + 1
    }
}

/// 消息输出契约
pub trait Sink {
    fn write(&self, line: &str) -> String;
}

impl Contract for dyn Sink {}

#[derive(Composable)]
#[export(contract = dyn Sink)]
struct ConsoleSink;

impl Sink for ConsoleSink {
    fn write(&self, line: &str) -> String {
        format!("[console] {line}")
    }
}

/// 通知契约，声明了 sink 导入属性
pub trait Notifier {
    fn send(&self, message: &str) -> String;
    fn attach_sink(&mut self, sink: Box<dyn Sink>);
}

impl Contract for dyn Notifier {
    fn imports() -> Vec<PropertyDescriptor> {
        vec![PropertyDescriptor::new::<dyn Notifier, dyn Sink, _>(
            "sink",
            |notifier, sink| notifier.attach_sink(sink),
        )]
    }
}

#[derive(Composable)]
#[export(contract = dyn Notifier)]
struct SmsNotifier {
    sink: Option<Box<dyn Sink>>,
}

impl Notifier for SmsNotifier {
    fn send(&self, message: &str) -> String {
        match &self.sink {
            Some(sink) => sink.write(&format!("短信: {message}")),
            None => format!("短信(未连接输出): {message}"),
        }
    }

    fn attach_sink(&mut self, sink: Box<dyn Sink>) {
        self.sink = Some(sink);
    }
}

/// 构造函数注入通知器与时钟
#[derive(Composable)]
#[import_constructor]
struct OrderService {
    #[inject]
    notifier: Box<dyn Notifier>,
    #[inject]
    clock: Box<SystemClock>,
}

impl OrderService {
    fn ship(&self, message: &str) -> String {
        format!("{} (t={})", self.notifier.send(message), self.clock.now())
    }
}

/// 只有导出标记、没有构造函数的类型，解析时报告缺少工厂
struct AuditTrail;
