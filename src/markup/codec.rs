//! 题目文本编码器
//!
//! 题目文本（ComposedText）按单个空格切分为词：
//! - 普通词：原样输出
//! - 填空标记 `/dash`：替换为固定长度的下划线
//! - 公式词 `/eqtn<公式>`：去掉前缀后交给排版器
//!
//! 渲染是单向的，编辑永远基于原始文本，不从渲染结果反推。

use std::fmt;

use tracing::warn;

use super::typeset::{LatexTypesetter, MathStyle, Typesetter};

/// 填空标记
pub const BLANK_MARKER: &str = "/dash";

/// 填空标记渲染后的下划线
pub const BLANK_RUN: &str = "______";

/// 公式前缀（与公式之间没有空格）
pub const EQUATION_PREFIX: &str = "/eqtn";

/// 渲染结果
///
/// 内容已是可直接显示的标记，调用方不再转义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupFragment(String);

impl MarkupFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MarkupFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 题目文本编码器
#[derive(Debug, Clone)]
pub struct MarkupCodec<T = LatexTypesetter> {
    typesetter: T,
    style: MathStyle,
}

impl Default for MarkupCodec<LatexTypesetter> {
    fn default() -> Self {
        Self::new(LatexTypesetter, MathStyle::Display)
    }
}

impl<T: Typesetter> MarkupCodec<T> {
    pub fn new(typesetter: T, style: MathStyle) -> Self {
        Self { typesetter, style }
    }

    pub fn style(&self) -> MathStyle {
        self.style
    }

    /// 渲染题目文本
    ///
    /// 空文本返回 `None`（没有可显示的内容，而不是空元素）。
    /// 单个公式排版失败只影响该词，保留原文并记录日志。
    pub fn render(&self, text: &str) -> Option<MarkupFragment> {
        if text.is_empty() {
            return None;
        }

        let replaced = text.replace(BLANK_MARKER, BLANK_RUN);

        let words: Vec<String> = replaced
            .split(' ')
            .map(|word| self.render_word(word))
            .collect();

        Some(MarkupFragment(words.join(" ")))
    }

    fn render_word(&self, word: &str) -> String {
        let Some(formula) = word.strip_prefix(EQUATION_PREFIX) else {
            return word.to_string();
        };

        match self.typesetter.typeset(formula, self.style) {
            Ok(markup) => markup,
            Err(e) => {
                warn!("⚠️ 公式转换失败，保留原文: {}", e);
                word.to_string()
            }
        }
    }
}
