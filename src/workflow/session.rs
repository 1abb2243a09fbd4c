//! 编辑会话
//!
//! 管理一次题目编辑的生命周期：
//! - 新建题目：直接进入 `Ready`
//! - 编辑题目：先 `Loading`，加载完成后进入 `Ready`（只转换一次）
//! - 离开页面：`Closed`，之后到达的加载/保存结果直接忽略
//!
//! 同一会话同时最多只有一个保存请求。

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::clients::store::{ImageStore, RecordStore};
use crate::error::{AppError, AppResult, SessionError};
use crate::markup::{LatexTypesetter, MarkupCodec, Typesetter};
use crate::models::classification::Classification;
use crate::models::question::QuestionRecord;
use crate::models::session::SessionContext;
use crate::workflow::composer::{ImageTarget, QuestionComposer};

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Closed,
}

/// 会话类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKind {
    Create,
    Edit { id: String },
}

impl Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKind::Create => write!(f, "[新建题目]"),
            SessionKind::Edit { id } => write!(f, "[编辑题目 ID#{}]", id),
        }
    }
}

/// 待发送的保存请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(QuestionRecord),
    Update { id: String, record: QuestionRecord },
}

/// 编辑会话
pub struct AuthoringSession<T: Typesetter = LatexTypesetter> {
    kind: SessionKind,
    phase: SessionPhase,
    context: SessionContext,
    /// 加载完成前暂存，加载完成后交给编辑器
    pending_codec: Option<MarkupCodec<T>>,
    composer: Option<QuestionComposer<T>>,
    saving: bool,
}

impl AuthoringSession<LatexTypesetter> {
    pub fn create_with_defaults(context: SessionContext, classification: Classification) -> Self {
        Self::create(context, classification, MarkupCodec::default())
    }

    pub fn edit_with_defaults(context: SessionContext, id: impl Into<String>) -> Self {
        Self::edit(context, id, MarkupCodec::default())
    }
}

impl<T: Typesetter> AuthoringSession<T> {
    /// 新建题目会话
    pub fn create(context: SessionContext, classification: Classification, codec: MarkupCodec<T>) -> Self {
        let composer = QuestionComposer::new(context.clone(), classification, codec);
        Self {
            kind: SessionKind::Create,
            phase: SessionPhase::Ready,
            context,
            pending_codec: None,
            composer: Some(composer),
            saving: false,
        }
    }

    /// 以离线草稿开始新建会话，作答方式由草稿推断
    pub fn create_from_record(context: SessionContext, record: QuestionRecord, codec: MarkupCodec<T>) -> Self {
        let composer = QuestionComposer::from_record(context.clone(), record, codec);
        Self {
            kind: SessionKind::Create,
            phase: SessionPhase::Ready,
            context,
            pending_codec: None,
            composer: Some(composer),
            saving: false,
        }
    }

    /// 编辑已有题目会话，等待加载
    pub fn edit(context: SessionContext, id: impl Into<String>, codec: MarkupCodec<T>) -> Self {
        Self {
            kind: SessionKind::Edit { id: id.into() },
            phase: SessionPhase::Loading,
            context,
            pending_codec: Some(codec),
            composer: None,
            saving: false,
        }
    }

    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// 保存请求进行中时应禁用提交
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn composer(&self) -> Option<&QuestionComposer<T>> {
        self.composer.as_ref()
    }

    pub fn composer_mut(&mut self) -> Option<&mut QuestionComposer<T>> {
        self.composer.as_mut()
    }

    /// 离开编辑页面，丢弃草稿
    pub fn close(&mut self) {
        debug!("{} 会话关闭", self.kind);
        self.phase = SessionPhase::Closed;
        self.composer = None;
        self.pending_codec = None;
        self.saving = false;
    }

    /// 加载完成回调
    ///
    /// 失败时保持 `Loading` 并返回错误
    pub fn complete_load(&mut self, result: AppResult<QuestionRecord>) -> AppResult<()> {
        match self.phase {
            SessionPhase::Closed => {
                debug!("{} 会话已关闭，忽略加载结果", self.kind);
                return Ok(());
            }
            SessionPhase::Ready => return Err(SessionError::NotLoading.into()),
            SessionPhase::Loading => {}
        }

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("{} ⚠️ 加载题目失败: {}", self.kind, e);
                return Err(e);
            }
        };

        let codec = self.pending_codec.take().ok_or(SessionError::NotLoading)?;
        let composer = QuestionComposer::from_record(self.context.clone(), record, codec);
        info!("{} ✓ 题目加载完成，作答方式: {:?}", self.kind, composer.mode());

        self.composer = Some(composer);
        self.phase = SessionPhase::Ready;
        Ok(())
    }

    /// 开始保存，返回要发送的数据
    pub fn begin_save(&mut self) -> Result<SaveRequest, SessionError> {
        let composer = match self.phase {
            SessionPhase::Closed => return Err(SessionError::Closed),
            SessionPhase::Loading => return Err(SessionError::NotReady),
            SessionPhase::Ready => self.composer.as_ref().ok_or(SessionError::NotReady)?,
        };

        if self.saving {
            return Err(SessionError::SaveInFlight);
        }
        if !composer.is_submittable() {
            return Err(SessionError::NotSubmittable);
        }

        let request = match &self.kind {
            SessionKind::Create => SaveRequest::Create(composer.payload()),
            SessionKind::Edit { id } => SaveRequest::Update {
                id: id.clone(),
                record: composer.payload(),
            },
        };

        self.saving = true;
        Ok(request)
    }

    /// 保存完成回调
    ///
    /// 新建成功后清空草稿继续录入；更新成功后关闭会话
    pub fn complete_save(&mut self, result: AppResult<()>) -> AppResult<()> {
        if self.phase == SessionPhase::Closed {
            debug!("{} 会话已关闭，忽略保存结果", self.kind);
            return Ok(());
        }
        self.saving = false;

        if let Err(e) = result {
            warn!("{} ⚠️ 保存失败: {}", self.kind, e);
            return Err(e);
        }

        if self.kind == SessionKind::Create {
            info!("{} ✓ 题目提交成功", self.kind);
            if let Some(composer) = self.composer.as_mut() {
                composer.reset_after_create();
            }
        } else {
            info!("{} ✓ 题目更新成功", self.kind);
            self.close();
        }
        Ok(())
    }

    // ========== 与外部存储交互 ==========

    /// 从题库加载（仅编辑会话）
    pub async fn load_from<S: RecordStore>(&mut self, store: &S) -> AppResult<()> {
        let id = match (&self.kind, self.phase) {
            (SessionKind::Edit { id }, SessionPhase::Loading) => id.clone(),
            _ => return Err(SessionError::NotLoading.into()),
        };
        let result = store.fetch_question(&id).await;
        self.complete_load(result)
    }

    /// 提交到题库
    pub async fn submit_to<S: RecordStore>(&mut self, store: &S) -> AppResult<()> {
        let request = self.begin_save()?;
        let result = match &request {
            SaveRequest::Create(record) => store.create_question(record).await,
            SaveRequest::Update { id, record } => store.update_question(id, record).await,
        };
        self.complete_save(result)
    }

    /// 上传图片并保存引用
    pub async fn upload_image_to<I: ImageStore>(
        &mut self,
        store: &I,
        target: ImageTarget,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AppResult<()> {
        if self.phase != SessionPhase::Ready {
            return Err(SessionError::NotReady.into());
        }

        let reference = store.upload_image(file_name, bytes).await.map_err(|e| {
            warn!("{} ⚠️ 图片上传失败: {}", self.kind, e);
            e
        })?;

        match self.composer.as_mut() {
            Some(composer) => composer.attach_image(target, reference).map_err(AppError::from),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::question::Mode;
    use crate::models::session::{AdminRole, Operator};

    fn context() -> SessionContext {
        SessionContext::with_builtin_departments(Operator {
            username: "master".to_string(),
            role: AdminRole::Master,
        })
    }

    fn network_error() -> AppError {
        AppError::Api(ApiError::BadResponse {
            endpoint: "questions/new".to_string(),
            status: 500,
            message: None,
        })
    }

    #[test]
    fn edit_session_transitions_once() {
        let mut session = AuthoringSession::edit_with_defaults(context(), "q1");
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(session.composer().is_none());

        let record = QuestionRecord {
            answer: "7".to_string(),
            ..QuestionRecord::default()
        };
        session.complete_load(Ok(record.clone())).unwrap();
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.composer().unwrap().mode(), Mode::SingleAnswer);

        assert!(matches!(
            session.complete_load(Ok(record)),
            Err(AppError::Session(SessionError::NotLoading))
        ));
    }

    #[test]
    fn failed_load_stays_loading() {
        let mut session = AuthoringSession::edit_with_defaults(context(), "q1");
        assert!(session.complete_load(Err(network_error())).is_err());
        assert_eq!(session.phase(), SessionPhase::Loading);
    }

    #[test]
    fn late_load_after_close_is_ignored() {
        let mut session = AuthoringSession::edit_with_defaults(context(), "q1");
        session.close();
        session.complete_load(Ok(QuestionRecord::default())).unwrap();
        assert_eq!(session.phase(), SessionPhase::Closed);
        assert!(session.composer().is_none());
    }

    #[test]
    fn only_one_save_in_flight() {
        let mut session = AuthoringSession::create_with_defaults(context(), Classification::default());
        assert_eq!(session.begin_save(), Err(SessionError::NotSubmittable));

        session.composer_mut().unwrap().set_answer("x");
        assert!(matches!(session.begin_save(), Ok(SaveRequest::Create(_))));
        assert!(session.is_saving());
        assert_eq!(session.begin_save(), Err(SessionError::SaveInFlight));

        assert!(session.complete_save(Err(network_error())).is_err());
        assert!(!session.is_saving());
        assert_eq!(session.composer().unwrap().draft().answer, "x");
    }

    #[test]
    fn late_save_after_close_is_noop() {
        let mut session = AuthoringSession::create_with_defaults(context(), Classification::default());
        session.composer_mut().unwrap().set_answer("x");
        session.begin_save().unwrap();
        session.close();
        session.complete_save(Err(network_error())).unwrap();
        assert_eq!(session.phase(), SessionPhase::Closed);
    }

    #[test]
    fn loading_session_cannot_save() {
        let mut session = AuthoringSession::edit_with_defaults(context(), "q1");
        assert_eq!(session.begin_save(), Err(SessionError::NotReady));
    }
}
