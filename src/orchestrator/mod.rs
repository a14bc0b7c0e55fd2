//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责题号范围的调度和统计，是整个系统的"指挥中心"。
//!
//! ### `batch_processor` - 批量题目处理器
//! - 管理应用生命周期（初始化、运行、关闭浏览器）
//! - 按题号顺序处理，每道题的结果写入台账
//! - 输出全局统计信息
//! - 合并成功的文件并清理单题文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理题号范围)
//!     ↓
//! workflow::QuestionFlow (处理单道题)
//!     ↓
//! services (能力层：search / render / extract / merge)
//!     ↓
//! infrastructure (基础设施：PdfPrinter / PdfDocument / TempDocument)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有浏览器
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;

pub use batch_processor::{log_plan, plan_batch, App, BatchReport, MergeOutcome, PlannedItem};
