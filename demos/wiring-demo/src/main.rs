//! # 装配示例应用
//!
//! 演示如何用配置文件、环境变量与日志模块装配一个小型对象图

use clap::Parser;
use component_macros::Injectable;
use di_abstractions::{Provider, RegisterOptions};
use infrastructure_composition::{Application, ApplicationBuilder, LogHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "wiring-demo")]
#[command(about = "Lorn Wiring 示例应用")]
struct Args {
    /// 配置文件路径（不含扩展名时按 toml/json/yaml 查找）
    #[arg(short, long, default_value = "config/app")]
    config: String,

    /// 环境变量前缀，例如 `WIRING__APP__ROUNDS=5`
    #[arg(long, default_value = "WIRING")]
    env_prefix: String,

    /// 只问候一轮后退出
    #[arg(long)]
    once: bool,
}

/// 应用配置
#[derive(Debug, Injectable)]
struct AppConfig {
    #[value("app.name")]
    name: String,
    #[value("app.rounds", optional)]
    rounds: u32,
    #[value("app.interval_ms", optional)]
    interval_ms: u64,
}

trait Greeter: Send + Sync {
    fn greet(&self, audience: &str) -> String;
}

#[derive(Debug, Default, Injectable)]
struct PlainGreeter;

impl Greeter for PlainGreeter {
    fn greet(&self, audience: &str) -> String {
        format!("Hello, {audience}!")
    }
}

#[derive(Debug, Default, Injectable)]
struct PirateGreeter;

impl Greeter for PirateGreeter {
    fn greet(&self, audience: &str) -> String {
        format!("Ahoy, {audience}!")
    }
}

/// 启动横幅，由工厂函数根据应用配置构建
#[derive(Debug)]
struct Banner(String);

fn banner(config: Arc<AppConfig>) -> anyhow::Result<Banner> {
    if config.name.trim().is_empty() {
        anyhow::bail!("app.name 不能为空");
    }
    Ok(Banner(format!("== {} ==", config.name)))
}

/// 问候服务
///
/// 依赖日志句柄，所以日志模块中的可选对象会在 Load 时一起构建。
#[derive(Injectable)]
struct GreetingService {
    #[inject(all = "^greeter-")]
    greeters: Vec<Arc<dyn Greeter>>,
    #[value("greeting.audience", optional)]
    audience: String,
    #[inject]
    log: Arc<LogHandle>,
}

impl GreetingService {
    fn round(&self, index: u32) {
        let audience = if self.audience.is_empty() {
            "stranger"
        } else {
            &self.audience
        };
        for greeter in &self.greeters {
            info!(round = index, "{}", greeter.greet(audience));
        }
    }
}

/// 构建应用
fn build_application(args: &Args) -> anyhow::Result<Application> {
    let app = ApplicationBuilder::new()
        .add_optional_config_file(&args.config)
        .add_config_env_vars(args.env_prefix.clone())
        .with_logging_module()
        .register(Provider::injectable::<AppConfig>(), RegisterOptions::new())
        .register(Provider::factory(banner), RegisterOptions::new())
        .register(
            Provider::injectable::<PlainGreeter>(),
            RegisterOptions::new()
                .name("greeter-plain")
                .implement::<dyn Greeter, PlainGreeter>(|value| value),
        )
        .register(
            Provider::injectable::<PirateGreeter>(),
            RegisterOptions::new()
                .name("greeter-pirate")
                .implement::<dyn Greeter, PirateGreeter>(|value| value),
        )
        .register(Provider::injectable::<GreetingService>(), RegisterOptions::new())
        .build()?;
    Ok(app)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app = build_application(&args)?;
    app.start()?;

    let service = app.get_object::<GreetingService>("")?;
    service.log.install_global()?;

    let config = app.get_object::<AppConfig>("")?;
    let banner = app.get_object::<Banner>("")?;
    info!("{}", banner.0);

    let stats = app.stats();
    info!(
        "容器统计: 注册 {} 个对象, 解析 {} 个, 接口 {} 个, 绑定 {} 个",
        stats.registered_objects, stats.resolved_objects, stats.interfaces, stats.bindings
    );
    for descriptor in app.registered_objects() {
        info!(
            "  {} ({}{}{})",
            descriptor.key,
            descriptor.kind,
            if descriptor.optional { ", 可选" } else { "" },
            if descriptor.resolved { ", 已解析" } else { "" }
        );
    }

    let rounds = if args.once { 1 } else { config.rounds.max(1) };
    let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms.max(1)));
    for index in 1..=rounds {
        tokio::select! {
            _ = ticker.tick() => service.round(index),
            _ = tokio::signal::ctrl_c() => {
                warn!("收到退出信号，提前结束");
                break;
            }
        }
    }

    app.stop();
    info!("应用已关闭");
    Ok(())
}
