// ==========================================
// 门店排班填充系统 - CLI 主入口
// ==========================================
// 用法: fill_shifts <week> [-v|--verbose]
// week 为周一的 ISO 日期，由外层调度器每周触发一次
// 退出码: 0 成功；致命错误写入 logs/error.log 后以 1 退出
// ==========================================

use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use venue_shift_aps::config::EnvConfig;
use venue_shift_aps::db;
use venue_shift_aps::domain::types::{slot_to_time, week_start};
use venue_shift_aps::engine::ShiftOrchestrator;
use venue_shift_aps::error::{AppError, AppResult};
use venue_shift_aps::logging;
use venue_shift_aps::repository::{ShiftRepository, UserRepository};
use venue_shift_aps::ScheduleConfig;

/// 错误日志目录（相对工作目录，外层调度器据此采集）
const ERROR_LOG_DIR: &str = "logs";

// ==========================================
// 命令行参数
// ==========================================

#[derive(Parser, Debug)]
#[command(name = "fill_shifts", version, about = "为指定周自动填充未排班的槽位岗位")]
struct Cli {
    /// 目标周标识（周一的 ISO 日期，例: 2026-07-27）
    week: String,

    /// 输出详细诊断信息
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // 参数错误也要走统一的错误日志出口，因此不用 clap 的自动退出
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(parse_err) => {
            use clap::error::ErrorKind;
            // --help / --version 属于正常路径
            if matches!(
                parse_err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                print!("{parse_err}");
                std::process::exit(0);
            }
            let err = AppError::Usage(parse_err.to_string());
            let _ = logging::append_error_log(Path::new(ERROR_LOG_DIR), &err.to_string());
            eprintln!("{parse_err}");
            std::process::exit(1);
        }
    };

    logging::init(cli.verbose);
    info!(
        app = venue_shift_aps::APP_NAME,
        version = venue_shift_aps::VERSION,
        week = %cli.week,
        "启动排班填充"
    );

    if let Err(err) = run(&cli) {
        let _ = logging::append_error_log(Path::new(ERROR_LOG_DIR), &err.to_string());
        tracing::error!(error = %err, "排班填充失败");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> AppResult<()> {
    // 周标识校验: 必须是 ISO 日期；外层调度器固定传周一
    let week_date = chrono::NaiveDate::parse_from_str(&cli.week, "%Y-%m-%d")
        .map_err(|_| AppError::Usage(format!("周标识必须为 ISO 日期: {}", cli.week)))?;
    if week_date != week_start(week_date) {
        warn!(week = %cli.week, "周标识不是周一，按原样使用");
    }

    // 环境配置与数据库连接
    let env = EnvConfig::from_env()?;
    let conn = db::connect_shared(&env.database_url)?;
    let user_repo = UserRepository::from_connection(Arc::clone(&conn));
    let shift_repo = ShiftRepository::from_connection(Arc::clone(&conn));

    // 读取输入: 员工、历史计数、该周已存在排班
    let workers = user_repo.fetch_all()?;
    let counts = user_repo.fetch_shift_counts(&workers)?;
    let pre_existing = shift_repo.fetch_week(&cli.week)?;

    info!(
        workers = workers.len(),
        pre_existing = pre_existing.len(),
        "输入数据加载完成"
    );
    if cli.verbose {
        for worker in &workers {
            println!(
                "  员工 {} ({}) 历史班次 {}",
                worker.id,
                worker.display_name,
                counts.get(&worker.id).copied().unwrap_or(0)
            );
        }
        for assignment in &pre_existing {
            println!(
                "  已占用 槽位 {} ({}) @ {}",
                assignment.slot,
                slot_to_time(assignment.slot),
                assignment.location
            );
        }
    }

    // 两池填充
    let orchestrator = ShiftOrchestrator::new(ScheduleConfig::default());
    let outcome = orchestrator.fill_week(&workers, &counts, &pre_existing);

    if outcome.has_shortfall() {
        warn!(
            bar_filled = outcome.bar_report.filled,
            bar_requested = outcome.bar_report.requested,
            general_filled = outcome.general_report.filled,
            general_requested = outcome.general_report.requested,
            "本周存在未填满的缺口"
        );
    }

    if cli.verbose {
        let name_of = |worker_id: i32| {
            workers
                .iter()
                .find(|w| w.id == worker_id)
                .map(|w| w.display_name.as_str())
                .unwrap_or("?")
                .to_string()
        };
        for assignment in &outcome.manifest {
            println!(
                "  槽位 {} ({}) @ {} -> {}",
                assignment.slot,
                slot_to_time(assignment.slot),
                assignment.location,
                name_of(assignment.worker_id)
            );
        }
    }

    // 整周事务性替换
    let written = shift_repo.replace_week(&cli.week, &outcome.manifest)?;
    info!(week = %cli.week, written, generated = outcome.generated_count(), "周排班已写入");

    Ok(())
}
