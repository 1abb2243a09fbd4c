//! 外部存储能力
//!
//! 题目记录存储和图片存储都在服务端，这里只定义边界

#![allow(async_fn_in_trait)]

use crate::error::AppResult;
use crate::models::question::QuestionRecord;

/// 题目记录存储
pub trait RecordStore {
    /// 加载已有题目
    async fn fetch_question(&self, id: &str) -> AppResult<QuestionRecord>;

    /// 新建题目
    async fn create_question(&self, record: &QuestionRecord) -> AppResult<()>;

    /// 更新题目
    async fn update_question(&self, id: &str, record: &QuestionRecord) -> AppResult<()>;
}

/// 图片存储
///
/// 返回的图片引用是不透明字符串，只存储、删除，不解析
pub trait ImageStore {
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<String>;
}
