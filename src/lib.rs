//! # Question Composer
//!
//! 题库后台的题目编辑核心：题干、答案、选项和解析中混合普通文字、
//! 填空标记和 LaTeX 公式，按作答方式校验后提交到远程题库服务。
//!
//! ## 架构设计
//!
//! ### ① 标记层（Markup）
//! - `markup/` - 题目文本的渲染与公式录入
//! - `MarkupCodec` - `/dash` → 下划线，`/eqtn<公式>` → MathML
//! - `EquationInserter` - 录入一个公式并生成公式词
//!
//! ### ② 数据层（Models）
//! - `models/` - 选项、解析、题目草稿、分类、会话上下文
//! - `loaders` - 从 TOML 文件加载离线草稿
//!
//! ### ③ 流程层（Workflow）
//! - `QuestionComposer` - 一次编辑会话独占一份草稿
//! - `is_submittable` - 提交校验
//! - `AuthoringSession` - 加载 / 保存生命周期
//!
//! ### ④ 外部服务（Clients）
//! - `RecordStore` / `ImageStore` - 题目与图片存储边界
//! - `ApiClient` - 基于 reqwest 的实现
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod markup;
pub mod models;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{ApiClient, ImageStore, RecordStore};
pub use config::Config;
pub use error::{AppError, AppResult, ComposeError};
pub use markup::{EquationInserter, LatexTypesetter, MarkupCodec, MarkupFragment, MathStyle, Typesetter};
pub use models::{Choice, ChoiceField, ChoiceSet, Mode, QuestionDraft, QuestionRecord, SessionContext, SolutionRecord};
pub use workflow::{is_submittable, AuthoringSession, QuestionComposer, TextField};
