use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题目编辑错误
    #[error("编辑错误: {0}")]
    Compose(#[from] ComposeError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 编辑会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
}

/// 题目编辑错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// 选项索引超出范围（不做截断）
    #[error("索引 {index} 超出范围 (共 {len} 个)")]
    OutOfRange { index: usize, len: usize },
    /// 选项标签只支持 A-D
    #[error("无效的选项索引: {index}")]
    InvalidChoiceIndex { index: usize },
    /// 没有文字也没有图片的选项不能标记为答案
    #[error("选项 {index} 没有内容，不能标记为答案")]
    EmptyChoice { index: usize },
}

/// API 调用错误（网络失败，不自动重试）
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// API 返回空结果
    #[error("API返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 编辑会话状态错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 题目尚未加载完成
    #[error("题目仍在加载中")]
    NotReady,
    /// 会话已关闭
    #[error("编辑会话已关闭")]
    Closed,
    /// 已有保存请求在进行中
    #[error("已有保存请求正在进行")]
    SaveInFlight,
    /// 草稿未通过校验
    #[error("题目草稿不可提交")]
    NotSubmittable,
    /// 会话不在加载状态
    #[error("会话当前不在加载状态")]
    NotLoading,
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否为网络类错误（需要操作员重新触发）
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            AppError::Api(ApiError::RequestFailed { .. } | ApiError::BadResponse { .. })
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
