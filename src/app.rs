//! 应用主流程
//!
//! 加载离线草稿 → 逐个构建编辑会话 → 预览与校验 → （可选）提交到题库

use crate::clients::ApiClient;
use crate::config::Config;
use crate::markup::{LatexTypesetter, MarkupCodec};
use crate::models::loaders::{load_all_drafts, DraftFile};
use crate::models::session::{AdminRole, Operator, SessionContext};
use crate::utils::logging::{
    init_log_file, log_drafts_loaded, log_startup, print_final_stats, truncate_text,
};
use crate::workflow::AuthoringSession;
use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: ApiClient,
    context: SessionContext,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub valid: usize,
    pub submitted: usize,
    pub failed: usize,
    pub total: usize,
}

/// 单个草稿的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftOutcome {
    /// 通过校验并已提交
    Submitted,
    /// 通过校验（未提交）
    Valid,
    /// 未通过校验
    Blocked,
    /// 预览或提交失败
    Failed,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config.draft_folder, config.submit_drafts);

        let context = SessionContext::with_builtin_departments(Operator {
            username: config.operator_username.clone(),
            role: AdminRole::Support,
        });

        Ok(Self {
            client: ApiClient::new(&config),
            config,
            context,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描题目草稿...");
        let drafts = load_all_drafts(&self.config.draft_folder).await?;

        if drafts.is_empty() {
            warn!("⚠️ 没有找到题目草稿，程序结束");
            return Ok(ProcessingStats::default());
        }
        log_drafts_loaded(drafts.len());

        let mut stats = ProcessingStats {
            total: drafts.len(),
            ..Default::default()
        };

        for (idx, draft) in drafts.into_iter().enumerate() {
            let outcome = self.process_draft(idx + 1, draft).await;
            match outcome {
                DraftOutcome::Submitted => {
                    stats.valid += 1;
                    stats.submitted += 1;
                }
                DraftOutcome::Valid => stats.valid += 1,
                DraftOutcome::Blocked => {}
                DraftOutcome::Failed => stats.failed += 1,
            }
        }

        print_final_stats(
            stats.submitted,
            stats.valid,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );
        Ok(stats)
    }

    /// 处理单个草稿
    async fn process_draft(&self, index: usize, draft: DraftFile) -> DraftOutcome {
        let name = draft.path.display().to_string();
        let codec = MarkupCodec::new(LatexTypesetter, self.config.math_style);
        let mut session = AuthoringSession::create_from_record(self.context.clone(), draft.record, codec);

        let Some(composer) = session.composer() else {
            return DraftOutcome::Failed;
        };

        let preview = match composer.preview() {
            Ok(preview) => preview,
            Err(e) => {
                error!("[草稿 {}] ❌ 预览失败: {}", index, e);
                self.append_log(&name, "预览失败");
                return DraftOutcome::Failed;
            }
        };

        info!(
            "[草稿 {}] 题干: {}",
            index,
            truncate_text(&composer.draft().text, 80)
        );
        if self.config.verbose_logging {
            if let Some(markup) = &preview.text {
                info!("[草稿 {}]   渲染: {}", index, truncate_text(markup.as_str(), 120));
            }
            for line in &preview.correct_answers {
                info!("[草稿 {}]   {}", index, line);
            }
        }
        info!("[草稿 {}] {} | {}", index, preview.score, preview.classification.type_line);

        if !composer.is_submittable() {
            warn!("[草稿 {}] ⚠️ 未通过校验，跳过", index);
            self.append_log(&name, "未通过校验");
            return DraftOutcome::Blocked;
        }

        if !self.config.submit_drafts {
            self.append_log(&name, "通过校验");
            return DraftOutcome::Valid;
        }

        info!("[草稿 {}] 📤 正在提交题目到题库...", index);
        match session.submit_to(&self.client).await {
            Ok(()) => {
                self.append_log(&name, "提交成功");
                DraftOutcome::Submitted
            }
            Err(e) => {
                error!("[草稿 {}] ❌ 提交失败: {}", index, e);
                self.append_log(&name, "提交失败");
                DraftOutcome::Failed
            }
        }
    }

    /// 追加一行处理结果到日志文件
    fn append_log(&self, name: &str, result: &str) {
        let line = format!("{} | {}\n", name, result);
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_log_file)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = written {
            warn!("写入日志文件失败 {}: {}", self.config.output_log_file, e);
        }
    }
}
