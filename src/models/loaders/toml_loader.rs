use crate::error::{AppError, AppResult, FileError};
use crate::models::question::QuestionRecord;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件读取的题目草稿
#[derive(Debug, Clone)]
pub struct DraftFile {
    pub path: PathBuf,
    pub record: QuestionRecord,
}

/// 从 TOML 文件加载题目草稿
pub async fn load_draft_from_toml(toml_file_path: &Path) -> AppResult<DraftFile> {
    let path_text = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_text, e))?;

    let record: QuestionRecord = toml::from_str(&content).map_err(|e| {
        AppError::File(FileError::TomlParseFailed {
            path: path_text.clone(),
            source: Box::new(e),
        })
    })?;

    Ok(DraftFile {
        path: toml_file_path.to_path_buf(),
        record,
    })
}

/// 从文件夹中加载所有 TOML 草稿，按文件名排序
///
/// 单个文件解析失败只记录警告，不影响其他文件
pub async fn load_all_drafts(folder_path: &str) -> AppResult<Vec<DraftFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }));
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut drafts = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_draft_from_toml(&path).await {
            Ok(draft) => drafts.push(draft),
            Err(e) => {
                tracing::warn!("加载文件失败: {}", e);
            }
        }
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classification::YearOrType;

    const DRAFT: &str = r#"
text = "Evaluate /eqtn\\frac{1}{2} + /dash"
marks = 2
answer = ""
images = []
department = "EE"
subject = "NT"
year = 1010

[[choices]]
text = "1"
answer = true

[[choices]]
text = "2"

[solution]
text = "Add the halves"
"#;

    #[tokio::test]
    async fn loads_draft_with_choices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q1.toml");
        std::fs::write(&path, DRAFT).unwrap();

        let draft = load_draft_from_toml(&path).await.unwrap();
        assert_eq!(draft.record.marks, 2);
        assert_eq!(draft.record.choices.len(), 2);
        assert!(draft.record.choices.get(0).unwrap().answer);
        assert_eq!(draft.record.classification.year, YearOrType::Quiz);
        assert_eq!(draft.record.solution.text, "Add the halves");
    }

    #[tokio::test]
    async fn skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), DRAFT).unwrap();
        std::fs::write(dir.path().join("b.toml"), "marks = [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let drafts = load_all_drafts(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].path.ends_with("a.toml"));
    }

    #[tokio::test]
    async fn missing_folder_is_an_error() {
        let err = load_all_drafts("/definitely/not/here").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::DirectoryNotFound { ref path }) if path == "/definitely/not/here"
        ));
    }

    #[tokio::test]
    async fn file_errors_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "marks = [").unwrap();

        let err = load_draft_from_toml(&broken).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::TomlParseFailed { ref path, .. }) if path.ends_with("broken.toml")
        ));

        let missing = dir.path().join("missing.toml");
        let err = load_draft_from_toml(&missing).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::ReadFailed { ref path, .. }) if path.ends_with("missing.toml")
        ));
    }
}
