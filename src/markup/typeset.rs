//! 公式排版 - LaTeX → MathML
//!
//! 编码器唯一依赖的外部能力：把一段公式文本转换为可直接显示的标记。

use pulldown_latex::{
    config::DisplayMode, config::RenderConfig, mathml::push_mathml, Parser, Storage,
};
use thiserror::Error;

/// 公式排版样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MathStyle {
    /// 展示样式（大号运算符）
    #[default]
    Display,
    /// 行内样式
    Inline,
}

/// 单个公式排版失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("公式排版失败 ({formula}): {message}")]
pub struct TypesetError {
    pub formula: String,
    pub message: String,
}

/// 公式排版能力
///
/// 每次调用都可能失败，调用方负责降级
pub trait Typesetter {
    fn typeset(&self, formula: &str, style: MathStyle) -> Result<String, TypesetError>;
}

/// 基于 pulldown-latex 的 MathML 排版器
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexTypesetter;

impl Typesetter for LatexTypesetter {
    fn typeset(&self, formula: &str, style: MathStyle) -> Result<String, TypesetError> {
        let storage = Storage::new();
        let parser = Parser::new(formula, &storage);
        let config = RenderConfig {
            display_mode: match style {
                MathStyle::Display => DisplayMode::Block,
                MathStyle::Inline => DisplayMode::Inline,
            },
            ..Default::default()
        };

        let events: Vec<_> = parser.collect();
        let errors: Vec<String> = events
            .iter()
            .filter_map(|e| e.as_ref().err().map(|err| err.to_string()))
            .collect();

        if !errors.is_empty() {
            return Err(TypesetError {
                formula: formula.to_string(),
                message: errors.join("; "),
            });
        }

        let mut mathml = String::new();
        push_mathml(&mut mathml, events.into_iter(), config).map_err(|e| TypesetError {
            formula: formula.to_string(),
            message: e.to_string(),
        })?;

        Ok(mathml)
    }
}
