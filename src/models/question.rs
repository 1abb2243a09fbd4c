use serde::{Deserialize, Serialize};

use super::choice::ChoiceSet;
use super::classification::Classification;
use super::solution::SolutionRecord;

/// 作答方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// 单个文字答案
    #[default]
    SingleAnswer,
    /// 选择题
    MultipleChoice,
}

/// 题库中存储的题目（加载和提交使用同一结构）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_marks")]
    pub marks: u32,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub choices: ChoiceSet,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub solution: SolutionRecord,
    #[serde(flatten)]
    pub classification: Classification,
}

fn default_marks() -> u32 {
    1
}

/// 编辑中的题目草稿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub marks: u32,
    pub mode: Mode,
    /// 仅单答案模式使用
    pub answer: String,
    /// 仅选择题模式使用
    pub choices: ChoiceSet,
    pub images: Vec<String>,
    pub solution: SolutionRecord,
    pub classification: Classification,
}

impl QuestionDraft {
    /// 新题目：单答案模式，所有字段为空，分数为 1
    pub fn new(classification: Classification) -> Self {
        Self {
            text: String::new(),
            marks: 1,
            mode: Mode::SingleAnswer,
            answer: String::new(),
            choices: ChoiceSet::new(),
            images: Vec::new(),
            solution: SolutionRecord::default(),
            classification,
        }
    }

    /// 从题库记录恢复草稿
    ///
    /// 有非空答案则为单答案模式，否则为选择题模式
    pub fn from_record(record: QuestionRecord) -> Self {
        let mode = if record.answer.is_empty() {
            Mode::MultipleChoice
        } else {
            Mode::SingleAnswer
        };

        Self {
            text: record.text,
            marks: record.marks.max(1),
            mode,
            answer: record.answer,
            choices: record.choices,
            images: record.images,
            solution: record.solution,
            classification: record.classification,
        }
    }

    /// 提交给题库的数据
    pub fn to_record(&self, id: Option<String>) -> QuestionRecord {
        QuestionRecord {
            id,
            text: self.text.clone(),
            marks: self.marks,
            answer: self.answer.clone(),
            choices: self.choices.clone(),
            images: self.images.clone(),
            solution: self.solution.clone(),
            classification: self.classification.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::choice::{Choice, ChoiceField};
    use crate::models::classification::YearOrType;

    #[test]
    fn record_with_answer_opens_in_single_answer_mode() {
        let record = QuestionRecord {
            answer: "42".to_string(),
            ..QuestionRecord::default()
        };
        assert_eq!(QuestionDraft::from_record(record).mode, Mode::SingleAnswer);
    }

    #[test]
    fn record_without_answer_opens_in_choice_mode() {
        let record = QuestionRecord {
            choices: vec![Choice {
                text: "4".to_string(),
                image: String::new(),
                answer: true,
            }]
            .into(),
            ..QuestionRecord::default()
        };
        let draft = QuestionDraft::from_record(record);
        assert_eq!(draft.mode, Mode::MultipleChoice);
        assert_eq!(draft.choices.len(), 1);
    }

    #[test]
    fn record_json_flattens_classification() {
        let mut draft = QuestionDraft::new(Classification {
            department: "EE".to_string(),
            subject: "NT".to_string(),
            year: YearOrType::Series,
            set: None,
        });
        draft.text = "What is /dash ?".to_string();
        draft.choices = ChoiceSet::with_defaults();
        draft.choices.set_field(0, ChoiceField::Answer(true)).unwrap();

        let value = serde_json::to_value(draft.to_record(None)).unwrap();
        assert_eq!(value["department"], "EE");
        assert_eq!(value["year"], 1000);
        assert_eq!(value["marks"], 1);
        assert_eq!(value["choices"][0]["answer"], true);
        assert!(value.get("id").is_none());
        assert!(value.get("set").is_none());
    }

    #[test]
    fn fetched_record_accepts_mongo_id() {
        let record: QuestionRecord = serde_json::from_str(
            r#"{"_id":"q1","text":"t","marks":3,"answer":"","choices":[],"images":[],
                "solution":{"text":"","image":"","images":[]},
                "department":"CS","subject":"DS","year":"2016","set":1}"#,
        )
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("q1"));
        assert_eq!(record.classification.set, Some(1));
        assert_eq!(record.classification.year, YearOrType::Year(2016));
    }
}
