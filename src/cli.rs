//! 命令行参数

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::error::ConfigError;

/// 超过这个题数时给出提示
const LARGE_RANGE_WARNING: u32 = 1000;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "dumps_search",
    version,
    about = "按题号搜索考试讨论页，渲染为 PDF 并提取答案页"
)]
pub struct Args {
    /// 考试代码，对应配置文件中的 `[[exams]].exam`
    #[arg(long)]
    pub exam: String,

    /// 起始题号（包含）
    #[arg(long)]
    pub begin: u32,

    /// 结束题号（包含）
    #[arg(long)]
    pub end: u32,

    /// 主题编号
    #[arg(long, default_value_t = 1)]
    pub topic: u32,

    /// 输出目录
    #[arg(long, default_value = "output")]
    pub output: PathBuf,

    /// 配置文件路径
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// 处理完成后合并为一个 PDF
    #[arg(long)]
    pub merge: bool,

    /// 合并后保留单题文件
    #[arg(long)]
    pub keep_individual: bool,

    /// 输出调试日志
    #[arg(long, short)]
    pub verbose: bool,

    /// 只打印计划，不联网也不启动浏览器
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// 校验题号范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.begin < 1 {
            return Err(ConfigError::InvalidRange(format!(
                "起始题号必须 >= 1, 实际为 {}",
                self.begin
            )));
        }
        if self.begin > self.end {
            return Err(ConfigError::InvalidRange(format!(
                "起始题号 {} 大于结束题号 {}",
                self.begin, self.end
            )));
        }
        if self.question_count() > LARGE_RANGE_WARNING {
            warn!(
                "⚠️ 题号范围较大 ({} 题)，处理可能需要很长时间",
                self.question_count()
            );
        }
        Ok(())
    }

    pub fn question_count(&self) -> u32 {
        self.end.saturating_sub(self.begin) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["dumps_search", "--exam", "saa-c03"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--begin", "1", "--end", "5"]);
        assert_eq!(args.topic, 1);
        assert_eq!(args.output, PathBuf::from("output"));
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!args.merge);
        assert!(!args.keep_individual);
        assert!(!args.dry_run);
        assert_eq!(args.question_count(), 5);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "--begin",
            "3",
            "--end",
            "3",
            "--topic",
            "2",
            "--merge",
            "--keep-individual",
            "--verbose",
            "--dry-run",
        ]);
        assert_eq!(args.topic, 2);
        assert!(args.merge && args.keep_individual && args.verbose && args.dry_run);
        assert_eq!(args.question_count(), 1);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            parse(&["--begin", "0", "--end", "5"]).validate(),
            Err(ConfigError::InvalidRange(_))
        ));
        assert!(matches!(
            parse(&["--begin", "6", "--end", "5"]).validate(),
            Err(ConfigError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_missing_exam_is_rejected() {
        assert!(Args::try_parse_from(["dumps_search", "--begin", "1", "--end", "2"]).is_err());
    }
}
