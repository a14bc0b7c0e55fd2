use anyhow::{Context, Result};
use clap::Parser;

use dumps_search::cli::Args;
use dumps_search::orchestrator::{log_plan, plan_batch, App};
use dumps_search::utils::logging;
use dumps_search::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let config = Config::load(&args.config)
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?
        .with_env_overrides();

    // 初始化日志
    logging::init(&config.log_level, args.verbose)?;

    args.validate()?;
    let exam = config.exam(&args.exam)?.clone();

    if args.dry_run {
        let plan = plan_batch(&config, &exam, &args);
        let merged = args
            .merge
            .then(|| exam.merged_file_name(args.topic, args.begin, args.end));
        log_plan(&plan, merged);
        return Ok(());
    }

    // 初始化并运行应用
    let app = App::initialize(&config, exam, args).await?;
    let result = app.run().await;
    app.shutdown().await;
    result?;

    Ok(())
}
