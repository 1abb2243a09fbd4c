use crate::error::ConfigError;
use crate::markup::MathStyle;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库服务基础 URL（以 `/` 结尾）
    pub api_base_url: String,
    /// 请求头 x-access-token 使用的令牌
    pub access_token: String,
    /// 离线题目草稿（TOML）存放目录
    pub draft_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 公式排版样式
    pub math_style: MathStyle,
    /// 是否把通过校验的草稿提交到题库
    pub submit_drafts: bool,
    /// 当前操作员用户名
    pub operator_username: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api/".to_string(),
            access_token: String::new(),
            draft_folder: "drafts".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            math_style: MathStyle::Display,
            submit_drafts: false,
            operator_username: "admin".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            access_token: std::env::var("ACCESS_TOKEN").unwrap_or(default.access_token),
            draft_folder: std::env::var("DRAFT_FOLDER").unwrap_or(default.draft_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            math_style: std::env::var("MATH_STYLE").ok().and_then(|v| parse_math_style(&v).ok()).unwrap_or(default.math_style),
            submit_drafts: std::env::var("SUBMIT_DRAFTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_drafts),
            operator_username: std::env::var("OPERATOR_USERNAME").unwrap_or(default.operator_username),
        }
    }
}

/// 解析 MATH_STYLE 取值
pub fn parse_math_style(value: &str) -> Result<MathStyle, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "display" => Ok(MathStyle::Display),
        "inline" => Ok(MathStyle::Inline),
        _ => Err(ConfigError::EnvVarParseFailed {
            var_name: "MATH_STYLE".to_string(),
            value: value.to_string(),
            expected_type: "display | inline".to_string(),
        }),
    }
}
