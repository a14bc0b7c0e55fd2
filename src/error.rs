use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 搜索相关错误
    #[error("搜索错误: {0}")]
    Search(#[from] SearchError),
    /// 渲染相关错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// PDF 文档错误
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 合并错误
    #[error("合并错误: {0}")]
    Merge(#[from] MergeError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 搜索引擎单次调用失败（可重试）
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 网络请求失败
    #[error("请求搜索引擎失败: {0}")]
    Request(String),
    /// 搜索引擎返回非成功状态码
    #[error("搜索引擎返回状态码 {status}")]
    BadStatus { status: u16 },
    /// 被识别为机器人
    #[error("搜索引擎拦截了请求: {0}")]
    Blocked(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Request(err.to_string())
    }
}

/// 搜索解析错误
#[derive(Debug, Error)]
pub enum SearchError {
    /// 所有重试均失败
    #[error("搜索已尝试 {attempts} 次均失败, 最后错误: {last_error}")]
    ProviderExhausted {
        attempts: usize,
        last_error: ProviderError,
    },
}

/// 页面渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// URL 格式不正确
    #[error("无效的 URL: {0}")]
    InvalidUrl(String),
    /// 浏览器操作失败
    #[error("浏览器渲染 {url} 失败: {source}")]
    Browser {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 渲染超时
    #[error("渲染 {url} 超时 ({secs} 秒)")]
    Timeout { url: String, secs: u64 },
    /// 渲染结果为空
    #[error("渲染 {url} 得到空文档")]
    EmptyOutput { url: String },
}

/// PDF 文档错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 文件不存在
    #[error("文件不存在: {}", path.display())]
    NotFound { path: PathBuf },
    /// 文件为空
    #[error("文件为空: {}", path.display())]
    Empty { path: PathBuf },
    /// 无法解析
    #[error("无法解析 PDF ({origin}): {reason}")]
    Corrupt { origin: String, reason: String },
    /// 没有任何页面
    #[error("PDF 没有页面: {origin}")]
    NoPages { origin: String },
    /// 页码超出范围
    #[error("页码 {index} 超出范围 [1, {page_count}]")]
    PageOutOfRange { index: u32, page_count: usize },
    /// 读取失败
    #[error("读取文件失败 ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入失败
    #[error("写入 PDF 失败 ({}): {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// PDF 合并错误
#[derive(Debug, Error)]
pub enum MergeError {
    /// 没有可合并的有效文件
    #[error("没有可合并的有效 PDF 文件")]
    NoValidInputs,
    /// 写入后校验失败
    #[error("合并文件未生成或为空: {}", path.display())]
    WriteVerificationFailed { path: PathBuf },
    /// 文档处理失败
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// 文件操作失败
    #[error("合并过程中文件操作失败 ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("配置文件不存在: {}", path.display())]
    NotFound { path: PathBuf },
    /// 读取失败
    #[error("读取配置文件失败 ({}): {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("配置文件格式错误 ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 缺少字段
    #[error("缺少必填字段: {field}")]
    MissingField { field: String },
    /// 字段值不合法
    #[error("考试 {index} 的字段 '{field}' 必须是非空字符串")]
    InvalidField { field: String, index: usize },
    /// 没有考试配置
    #[error("至少需要一个考试配置")]
    NoExams,
    /// 找不到考试
    #[error("找不到考试 '{exam}', 可用考试: {}", available.join(", "))]
    ExamNotFound { exam: String, available: Vec<String> },
    /// 页码范围配置不合法
    #[error("页码范围配置不合法: min_page={min_page}, max_page={max_page}")]
    InvalidPageSelection { min_page: u32, max_page: u32 },
    /// 题号范围不合法
    #[error("题号范围不合法: {0}")]
    InvalidRange(String),
}

// ========== 便捷构造函数 ==========

impl DocumentError {
    /// 创建解析失败错误
    pub fn corrupt(origin: impl Into<String>, reason: impl ToString) -> Self {
        DocumentError::Corrupt {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建写入失败错误
    pub fn write_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DocumentError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl MergeError {
    /// 创建文件操作错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MergeError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
