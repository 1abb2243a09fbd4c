//! 公式录入
//!
//! 打开录入框 → 编辑公式 → 确认（生成公式词）或取消（什么都不生成）。
//! 无论确认还是取消，焦点都回到打开录入框时的输入框。

use super::codec::{BLANK_MARKER, EQUATION_PREFIX};

/// 录入结束后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquationOutcome<F> {
    /// 确认：把 `fragment` 追加到 `target`
    Inserted { target: F, fragment: String },
    /// 取消：目标字段不变，焦点回到 `target`
    Cancelled { target: F },
}

impl<F: Copy> EquationOutcome<F> {
    /// 应该重新获得焦点的字段
    pub fn focus(&self) -> F {
        match self {
            EquationOutcome::Inserted { target, .. } | EquationOutcome::Cancelled { target } => {
                *target
            }
        }
    }
}

/// 公式录入器
///
/// `F` 是调用方的字段标识，录入器只负责把它原样带回
#[derive(Debug, Clone, Default)]
pub struct EquationInserter<F> {
    active: Option<(F, String)>,
}

impl<F: Copy> EquationInserter<F> {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// 为某个字段打开录入框，丢弃之前未完成的公式
    pub fn open(&mut self, target: F) {
        self.active = Some((target, String::new()));
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// 当前录入中的公式
    pub fn formula(&self) -> Option<&str> {
        self.active.as_ref().map(|(_, formula)| formula.as_str())
    }

    /// 录入框每次编辑后更新公式；未打开时忽略
    pub fn edit(&mut self, formula: impl Into<String>) {
        if let Some((_, current)) = self.active.as_mut() {
            *current = formula.into();
        }
    }

    /// 确认录入，生成 `/eqtn<公式> `
    pub fn confirm(&mut self) -> Option<EquationOutcome<F>> {
        let (target, formula) = self.active.take()?;
        Some(EquationOutcome::Inserted {
            target,
            fragment: equation_fragment(&formula),
        })
    }

    /// 取消录入
    pub fn cancel(&mut self) -> Option<EquationOutcome<F>> {
        let (target, _) = self.active.take()?;
        Some(EquationOutcome::Cancelled { target })
    }
}

/// 公式词：前缀 + 公式 + 一个结尾空格
///
/// 公式末尾的空白会被去掉，保证结尾恰好一个空格
pub fn equation_fragment(formula: &str) -> String {
    format!("{}{} ", EQUATION_PREFIX, formula.trim_end())
}

/// 填空标记片段
pub fn blank_fragment() -> String {
    format!("{} ", BLANK_MARKER)
}

/// 把片段追加到字段末尾
///
/// 字段为空或以空格结尾时直接追加，否则先补一个空格，
/// 所有可插入公式的字段都使用同一规则
pub fn append_fragment(target: &mut String, fragment: &str) {
    if !target.is_empty() && !target.ends_with(' ') {
        target.push(' ');
    }
    target.push_str(fragment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        Body,
    }

    #[test]
    fn confirm_emits_prefixed_fragment() {
        let mut inserter = EquationInserter::new();
        inserter.open(Field::Body);
        inserter.edit("x^2");
        inserter.edit("x^3");
        assert_eq!(
            inserter.confirm(),
            Some(EquationOutcome::Inserted {
                target: Field::Body,
                fragment: "/eqtnx^3 ".to_string()
            })
        );
        assert!(!inserter.is_active());
    }

    #[test]
    fn empty_formula_still_ends_with_one_space() {
        assert_eq!(equation_fragment(""), "/eqtn ");
        assert_eq!(equation_fragment("a+b  "), "/eqtna+b ");
    }

    #[test]
    fn cancel_emits_nothing_and_returns_focus() {
        let mut inserter = EquationInserter::new();
        inserter.open(Field::Body);
        inserter.edit("y");
        let outcome = inserter.cancel().unwrap();
        assert_eq!(outcome, EquationOutcome::Cancelled { target: Field::Body });
        assert_eq!(outcome.focus(), Field::Body);
        assert_eq!(inserter.formula(), None);
    }

    #[test]
    fn confirm_without_open_is_none() {
        let mut inserter: EquationInserter<Field> = EquationInserter::new();
        inserter.edit("ignored");
        assert_eq!(inserter.confirm(), None);
    }

    #[test]
    fn append_inserts_separator_only_when_needed() {
        let mut text = String::new();
        append_fragment(&mut text, "/eqtnx ");
        assert_eq!(text, "/eqtnx ");

        let mut text = "Solve".to_string();
        append_fragment(&mut text, "/eqtnx ");
        assert_eq!(text, "Solve /eqtnx ");

        let mut text = "Solve ".to_string();
        append_fragment(&mut text, &blank_fragment());
        assert_eq!(text, "Solve /dash ");
    }
}
