use serde::{Deserialize, Serialize};

use crate::error::ComposeError;

/// 进入选择题模式时的默认选项数量
pub const DEFAULT_CHOICE_COUNT: usize = 4;

/// 单个选项
///
/// `image` 为空字符串表示没有图片（与服务端数据格式一致）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub answer: bool,
}

impl Choice {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }

    /// 没有文字也没有图片时，不能标记为正确答案
    pub fn can_mark_answer(&self) -> bool {
        !self.text.is_empty() || self.has_image()
    }
}

/// 选项字段及其新值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceField {
    Text(String),
    Image(String),
    Answer(bool),
}

/// 有序选项集合
///
/// 不强制只有一个正确答案：切换一个选项不会清除其他选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceSet(Vec<Choice>);

impl ChoiceSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 选择题模式的默认集合：4 个空选项
    pub fn with_defaults() -> Self {
        Self(vec![Choice::default(); DEFAULT_CHOICE_COUNT])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[Choice] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.0.iter()
    }

    /// 原地替换某个选项的一个字段
    pub fn set_field(&mut self, index: usize, field: ChoiceField) -> Result<(), ComposeError> {
        let len = self.0.len();
        let choice = self
            .0
            .get_mut(index)
            .ok_or(ComposeError::OutOfRange { index, len })?;

        match field {
            ChoiceField::Text(text) => choice.text = text,
            ChoiceField::Image(image) => choice.image = image,
            ChoiceField::Answer(answer) => choice.answer = answer,
        }
        Ok(())
    }

    /// 追加文本片段（公式插入使用）
    pub fn text_mut(&mut self, index: usize) -> Result<&mut String, ComposeError> {
        let len = self.0.len();
        self.0
            .get_mut(index)
            .map(|choice| &mut choice.text)
            .ok_or(ComposeError::OutOfRange { index, len })
    }

    /// 删除某个选项的图片，文字和答案标记不变
    pub fn clear_image(&mut self, index: usize) -> Result<(), ComposeError> {
        self.set_field(index, ChoiceField::Image(String::new()))
    }

    /// 调整选项顺序
    pub fn move_choice(&mut self, from: usize, to: usize) -> Result<(), ComposeError> {
        let len = self.0.len();
        if from >= len {
            return Err(ComposeError::OutOfRange { index: from, len });
        }
        if to >= len {
            return Err(ComposeError::OutOfRange { index: to, len });
        }
        let choice = self.0.remove(from);
        self.0.insert(to, choice);
        Ok(())
    }

    /// 被标记为正确答案的选项索引
    pub fn answer_indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.answer)
            .map(|(index, _)| index)
            .collect()
    }
}

impl From<Vec<Choice>> for ChoiceSet {
    fn from(choices: Vec<Choice>) -> Self {
        Self(choices)
    }
}

impl<'a> IntoIterator for &'a ChoiceSet {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 选项标签：A. B. C. D.
pub fn choice_label(index: usize) -> Result<&'static str, ComposeError> {
    match index {
        0 => Ok("A."),
        1 => Ok("B."),
        2 => Ok("C."),
        3 => Ok("D."),
        _ => Err(ComposeError::InvalidChoiceIndex { index }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_four_blank_choices() {
        let set = ChoiceSet::with_defaults();
        assert_eq!(set.len(), 4);
        assert!(set.iter().all(|c| *c == Choice::default()));
    }

    #[test]
    fn set_field_out_of_range_leaves_set_untouched() {
        let mut set = ChoiceSet::with_defaults();
        let before = set.clone();
        let err = set.set_field(4, ChoiceField::Text("x".into())).unwrap_err();
        assert_eq!(err, ComposeError::OutOfRange { index: 4, len: 4 });
        assert_eq!(set, before);
    }

    #[test]
    fn clearing_image_keeps_text_and_answer() {
        let mut set = ChoiceSet::with_defaults();
        set.set_field(1, ChoiceField::Text("4".into())).unwrap();
        set.set_field(1, ChoiceField::Image("img-1.png".into())).unwrap();
        set.set_field(1, ChoiceField::Answer(true)).unwrap();

        set.clear_image(1).unwrap();

        let choice = set.get(1).unwrap();
        assert_eq!(choice.text, "4");
        assert!(!choice.has_image());
        assert!(choice.answer);
    }

    #[test]
    fn answers_are_not_exclusive() {
        let mut set = ChoiceSet::with_defaults();
        set.set_field(0, ChoiceField::Answer(true)).unwrap();
        set.set_field(2, ChoiceField::Answer(true)).unwrap();
        assert_eq!(set.answer_indices(), vec![0, 2]);
    }

    #[test]
    fn move_choice_reorders() {
        let mut set = ChoiceSet::with_defaults();
        set.set_field(0, ChoiceField::Text("first".into())).unwrap();
        set.move_choice(0, 3).unwrap();
        assert_eq!(set.get(3).unwrap().text, "first");
        assert!(set.move_choice(0, 9).is_err());
    }

    #[test]
    fn labels_stop_at_d() {
        assert_eq!(choice_label(0).unwrap(), "A.");
        assert_eq!(choice_label(3).unwrap(), "D.");
        assert_eq!(
            choice_label(4).unwrap_err(),
            ComposeError::InvalidChoiceIndex { index: 4 }
        );
    }
}
