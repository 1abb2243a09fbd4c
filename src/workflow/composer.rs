//! 题目编辑器 - 流程层
//!
//! 一个编辑会话独占一份草稿：题干、分数、作答方式、答案或选项、图片、解析。
//! 所有操作在一次用户交互内同步完成。

use tracing::debug;

use crate::error::ComposeError;
use crate::markup::{
    append_fragment, blank_fragment, EquationInserter, EquationOutcome, LatexTypesetter,
    MarkupCodec, MarkupFragment, Typesetter,
};
use crate::models::choice::{choice_label, ChoiceField, ChoiceSet};
use crate::models::classification::Classification;
use crate::models::question::{Mode, QuestionDraft, QuestionRecord};
use crate::models::session::SessionContext;
use crate::models::solution::{SolutionField, SolutionRecord};
use crate::workflow::validation::is_submittable;

/// 可以插入公式的文本字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Question,
    Answer,
    Choice(usize),
    Solution,
}

/// 上传图片后的存放位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    /// 追加到题目图片列表
    Question,
    /// 设置为某个选项的图片
    Choice(usize),
    /// 追加到解析图片列表
    Solution,
}

/// 题目编辑器
pub struct QuestionComposer<T: Typesetter = LatexTypesetter> {
    draft: QuestionDraft,
    context: SessionContext,
    codec: MarkupCodec<T>,
    equation: EquationInserter<TextField>,
    focus: Option<TextField>,
}

impl QuestionComposer<LatexTypesetter> {
    /// 使用默认排版器新建题目
    pub fn with_defaults(context: SessionContext, classification: Classification) -> Self {
        Self::new(context, classification, MarkupCodec::default())
    }
}

impl<T: Typesetter> QuestionComposer<T> {
    /// 新建题目
    pub fn new(context: SessionContext, classification: Classification, codec: MarkupCodec<T>) -> Self {
        Self::from_draft(context, QuestionDraft::new(classification), codec)
    }

    /// 编辑已有题目，作答方式由记录推断
    pub fn from_record(context: SessionContext, record: QuestionRecord, codec: MarkupCodec<T>) -> Self {
        Self::from_draft(context, QuestionDraft::from_record(record), codec)
    }

    fn from_draft(context: SessionContext, draft: QuestionDraft, codec: MarkupCodec<T>) -> Self {
        Self {
            draft,
            context,
            codec,
            equation: EquationInserter::new(),
            focus: None,
        }
    }

    pub fn draft(&self) -> &QuestionDraft {
        &self.draft
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// 当前应获得焦点的字段
    pub fn focus(&self) -> Option<TextField> {
        self.focus
    }

    pub fn codec(&self) -> &MarkupCodec<T> {
        &self.codec
    }

    // ========== 文本字段 ==========

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.draft.answer = answer.into();
    }

    /// 在题干末尾插入填空标记
    pub fn insert_blank(&mut self) {
        append_fragment(&mut self.draft.text, &blank_fragment());
        self.focus = Some(TextField::Question);
    }

    // ========== 公式录入 ==========

    pub fn open_equation(&mut self, field: TextField) {
        self.equation.open(field);
    }

    pub fn edit_equation(&mut self, formula: impl Into<String>) {
        self.equation.edit(formula);
    }

    pub fn equation_in_progress(&self) -> Option<&str> {
        self.equation.formula()
    }

    /// 确认公式并追加到打开录入框时的字段
    ///
    /// 目标选项已不存在时返回 `OutOfRange`，草稿不变
    pub fn confirm_equation(&mut self) -> Result<(), ComposeError> {
        let Some(outcome) = self.equation.confirm() else {
            return Ok(());
        };
        self.focus = Some(outcome.focus());

        if let EquationOutcome::Inserted { target, fragment } = outcome {
            let field = self.text_field_mut(target)?;
            append_fragment(field, &fragment);
            debug!("插入公式到 {:?}: {}", target, fragment.trim_end());
        }
        Ok(())
    }

    pub fn cancel_equation(&mut self) {
        if let Some(outcome) = self.equation.cancel() {
            self.focus = Some(outcome.focus());
        }
    }

    fn text_field_mut(&mut self, field: TextField) -> Result<&mut String, ComposeError> {
        match field {
            TextField::Question => Ok(&mut self.draft.text),
            TextField::Answer => Ok(&mut self.draft.answer),
            TextField::Choice(index) => self.draft.choices.text_mut(index),
            TextField::Solution => Ok(&mut self.draft.solution.text),
        }
    }

    // ========== 分数 ==========

    pub fn increment_marks(&mut self) {
        self.draft.marks += 1;
    }

    /// 最低为 1 分
    pub fn decrement_marks(&mut self) {
        if self.draft.marks > 1 {
            self.draft.marks -= 1;
        }
    }

    // ========== 作答方式 ==========

    pub fn mode(&self) -> Mode {
        self.draft.mode
    }

    /// 切换作答方式
    ///
    /// 切换总是清空答案并重置为 4 个空选项，不保留之前的内容
    pub fn set_mode(&mut self, mode: Mode) {
        if self.draft.mode == mode {
            return;
        }
        debug!("切换作答方式: {:?} → {:?}", self.draft.mode, mode);

        self.draft.mode = mode;
        self.draft.answer.clear();
        self.draft.choices = ChoiceSet::with_defaults();
    }

    // ========== 选项 ==========

    pub fn set_choice_field(&mut self, index: usize, field: ChoiceField) -> Result<(), ComposeError> {
        self.draft.choices.set_field(index, field)
    }

    /// 切换某个选项的正确答案标记，不影响其他选项
    ///
    /// 没有文字也没有图片的选项不能标记为答案，取消标记总是允许
    pub fn toggle_choice_answer(&mut self, index: usize) -> Result<(), ComposeError> {
        let len = self.draft.choices.len();
        let choice = self
            .draft
            .choices
            .get(index)
            .ok_or(ComposeError::OutOfRange { index, len })?;

        let marked = !choice.answer;
        if marked && !choice.can_mark_answer() {
            return Err(ComposeError::EmptyChoice { index });
        }
        self.draft.choices.set_field(index, ChoiceField::Answer(marked))
    }

    pub fn clear_choice_image(&mut self, index: usize) -> Result<(), ComposeError> {
        self.draft.choices.clear_image(index)
    }

    pub fn move_choice(&mut self, from: usize, to: usize) -> Result<(), ComposeError> {
        self.draft.choices.move_choice(from, to)
    }

    // ========== 图片 ==========

    /// 保存上传成功后返回的图片引用
    pub fn attach_image(&mut self, target: ImageTarget, image: impl Into<String>) -> Result<(), ComposeError> {
        let image = image.into();
        match target {
            ImageTarget::Question => self.draft.images.push(image),
            ImageTarget::Choice(index) => self.draft.choices.set_field(index, ChoiceField::Image(image))?,
            ImageTarget::Solution => self.draft.solution.append_image(image),
        }
        Ok(())
    }

    /// 按值删除题目图片
    pub fn remove_image(&mut self, image: &str) {
        self.draft.images.retain(|value| value != image);
    }

    // ========== 解析 ==========

    pub fn set_solution_field(&mut self, field: SolutionField) {
        self.draft.solution.set_field(field);
    }

    pub fn append_solution_image(&mut self, image: impl Into<String>) {
        self.draft.solution.append_image(image);
    }

    pub fn remove_solution_image(&mut self, image: &str) {
        self.draft.solution.remove_image(image);
    }

    pub fn clear_solution_image(&mut self) {
        self.draft.solution.clear_image();
    }

    // ========== 校验与提交 ==========

    pub fn is_submittable(&self) -> bool {
        is_submittable(&self.draft)
    }

    /// 提交给题库的数据
    pub fn payload(&self) -> QuestionRecord {
        self.draft.to_record(None)
    }

    /// 新建成功后清空草稿，保留分类以便继续录入下一题
    pub fn reset_after_create(&mut self) {
        let classification = self.draft.classification.clone();
        self.draft = QuestionDraft::new(classification);
        self.focus = None;
    }

    // ========== 预览 ==========

    pub fn render(&self, text: &str) -> Option<MarkupFragment> {
        self.codec.render(text)
    }

    /// 生成预览
    ///
    /// 选项超过 4 个时无法生成标签，返回 `InvalidChoiceIndex`
    pub fn preview(&self) -> Result<QuestionPreview, ComposeError> {
        let draft = &self.draft;

        let shown = match draft.mode {
            Mode::SingleAnswer => &[][..],
            Mode::MultipleChoice => draft.choices.as_slice(),
        };
        let options = shown
            .iter()
            .enumerate()
            .map(|(index, choice)| -> Result<OptionPreview, ComposeError> {
                Ok(OptionPreview {
                    label: choice_label(index)?,
                    text: self.codec.render(&choice.text),
                    image: choice.image.clone(),
                })
            })
            .collect::<Result<Vec<_>, ComposeError>>()?;

        let correct_answers = match draft.mode {
            Mode::SingleAnswer => self
                .codec
                .render(&draft.answer)
                .map(|answer| format!("Correct Answer: {}", answer))
                .into_iter()
                .collect(),
            Mode::MultipleChoice => draft
                .choices
                .answer_indices()
                .into_iter()
                .map(|index| choice_label(index).map(|label| format!("Correct Answer: Choice {}", label)))
                .collect::<Result<Vec<_>, ComposeError>>()?,
        };

        Ok(QuestionPreview {
            text: self.codec.render(&draft.text),
            images: draft.images.clone(),
            options,
            score: score_line(draft.marks),
            correct_answers,
            solution: self.solution_preview(&draft.solution),
            classification: ClassificationPreview {
                department: self.context.department_title(&draft.classification.department),
                subject: self
                    .context
                    .subject_title(&draft.classification.department, &draft.classification.subject),
                type_line: draft.classification.type_line(),
            },
        })
    }

    fn solution_preview(&self, solution: &SolutionRecord) -> Option<SolutionPreview> {
        if !solution.is_displayable() {
            return None;
        }
        Some(SolutionPreview {
            text: self.codec.render(&solution.text),
            image: solution.image.clone(),
            images: solution.images.clone(),
        })
    }
}

/// 分数显示：`Total Marks: 1 Mark` / `Total Marks: 3 Marks`
pub fn score_line(marks: u32) -> String {
    let unit = if marks > 1 { "Marks" } else { "Mark" };
    format!("Total Marks: {} {}", marks, unit)
}

/// 题目预览
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPreview {
    pub text: Option<MarkupFragment>,
    pub images: Vec<String>,
    pub options: Vec<OptionPreview>,
    pub score: String,
    pub correct_answers: Vec<String>,
    pub solution: Option<SolutionPreview>,
    pub classification: ClassificationPreview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPreview {
    pub label: &'static str,
    pub text: Option<MarkupFragment>,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionPreview {
    pub text: Option<MarkupFragment>,
    pub image: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPreview {
    pub department: Option<String>,
    pub subject: Option<String>,
    pub type_line: String,
}
