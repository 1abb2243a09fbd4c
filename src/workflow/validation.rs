//! 提交校验
//!
//! 纯函数，每次字段变化后重新计算，只用于启用/禁用提交按钮

use crate::models::choice::Choice;
use crate::models::question::{Mode, QuestionDraft};

/// 草稿是否可以提交
///
/// - 单答案模式：答案去掉空白后不能为空
/// - 选择题模式：
///   1. 没有任何选项被标记为正确答案时不可提交（包括没有选项）
///   2. 同时存在文字为空的选项和没有图片的选项时，只有被标记的选项都有内容才可提交
///
/// 分数、题干、图片和解析都不会阻止提交
pub fn is_submittable(draft: &QuestionDraft) -> bool {
    match draft.mode {
        Mode::SingleAnswer => !draft.answer.trim().is_empty(),
        Mode::MultipleChoice => {
            let choices = &draft.choices;
            if !choices.iter().any(|c| c.answer) {
                return false;
            }

            let missing_text = choices.iter().any(|c| c.text.trim().is_empty());
            let missing_image = choices.iter().any(|c| c.image.is_empty());
            if !(missing_text && missing_image) {
                return true;
            }

            // 留空的选项只要没被标记为答案就不阻止提交
            choices.iter().filter(|c| c.answer).all(Choice::can_mark_answer)
        }
    }
}
