use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::ExamConfig;
use crate::services::PageSelection;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "settings.toml";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 目标站点，例如 `https://www.examtopics.com`
    pub site: String,
    /// 日志级别 (debug / info / warning / error)
    pub log_level: String,
    /// 搜索设置
    pub search: SearchSettings,
    /// 页码筛选策略
    pub pages: PageSelection,
    /// 浏览器设置
    pub browser: BrowserSettings,
    /// 考试列表
    pub exams: Vec<ExamConfig>,
}

/// 搜索设置
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSettings {
    /// 每次搜索最多取回的结果数
    pub max_results: usize,
    /// 最大尝试次数
    pub retry_attempts: usize,
    /// 两次尝试之间的等待时间（毫秒）
    pub retry_delay_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl SearchSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// 浏览器设置
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserSettings {
    /// 已运行浏览器的调试端口，设置后直接连接而不是启动新浏览器
    pub debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<PathBuf>,
    /// 单页渲染超时（秒）
    pub render_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            debug_port: None,
            chrome_executable: None,
            render_timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: "https://www.examtopics.com".to_string(),
            log_level: "info".to_string(),
            search: SearchSettings::default(),
            pages: PageSelection::default(),
            browser: BrowserSettings::default(),
            exams: Vec::new(),
        }
    }
}

// 文件中的原始结构，字段全部可选，便于给出准确的错误信息
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: Option<String>,
    log_level: Option<String>,
    #[serde(default)]
    search: SearchSettings,
    #[serde(default)]
    pages: PageSelection,
    #[serde(default)]
    browser: BrowserSettings,
    exams: Option<Vec<RawExam>>,
}

#[derive(Debug, Deserialize)]
struct RawExam {
    exam: Option<String>,
    title: Option<String>,
    keyword: Option<String>,
    url_substring: Option<String>,
}

impl Config {
    /// 从 TOML 文件加载配置并校验
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// 从 TOML 文本解析配置，`origin` 只用于错误信息
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let site = raw
            .site
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "site".to_string(),
            })?;

        let raw_exams = raw.exams.ok_or_else(|| ConfigError::MissingField {
            field: "exams".to_string(),
        })?;
        if raw_exams.is_empty() {
            return Err(ConfigError::NoExams);
        }

        let exams = raw_exams
            .into_iter()
            .enumerate()
            .map(|(index, exam)| validate_exam(exam, index))
            .collect::<Result<Vec<_>, _>>()?;

        raw.pages.validate()?;

        Ok(Self {
            site,
            log_level: raw.log_level.unwrap_or_else(|| "info".to_string()),
            search: raw.search,
            pages: raw.pages,
            browser: raw.browser,
            exams,
        })
    }

    /// 用环境变量覆盖浏览器相关配置
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(port) = std::env::var("BROWSER_DEBUG_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.browser.debug_port = Some(port);
        }
        if let Ok(path) = std::env::var("CHROME_EXECUTABLE") {
            if !path.trim().is_empty() {
                self.browser.chrome_executable = Some(PathBuf::from(path));
            }
        }
        self
    }

    /// 查找考试配置
    pub fn exam(&self, code: &str) -> Result<&ExamConfig, ConfigError> {
        self.exams
            .iter()
            .find(|e| e.exam == code)
            .ok_or_else(|| ConfigError::ExamNotFound {
                exam: code.to_string(),
                available: self.available_exams(),
            })
    }

    /// 所有可用的考试代码
    pub fn available_exams(&self) -> Vec<String> {
        self.exams.iter().map(|e| e.exam.clone()).collect()
    }
}

fn validate_exam(raw: RawExam, index: usize) -> Result<ExamConfig, ConfigError> {
    let field = |value: Option<String>, name: &str| -> Result<String, ConfigError> {
        let value = value.ok_or_else(|| ConfigError::MissingField {
            field: format!("exams[{}].{}", index, name),
        })?;
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: name.to_string(),
                index,
            });
        }
        Ok(value)
    };

    Ok(ExamConfig {
        exam: field(raw.exam, "exam")?,
        title: field(raw.title, "title")?,
        keyword: field(raw.keyword, "keyword")?,
        url_substring: field(raw.url_substring, "url_substring")?,
    })
}
