//! 会话上下文
//!
//! 当前操作员和院系列表在会话开始时显式传入，编辑器只读

use serde::{Deserialize, Serialize};

use super::classification::DepartmentCode;

/// 管理员角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Master,
    Senior,
    Support,
}

/// 当前操作员
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub username: String,
    pub role: AdminRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectEntry {
    pub code: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub subjects: Vec<SubjectEntry>,
}

/// 会话上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub operator: Operator,
    pub departments: Vec<Department>,
}

impl SessionContext {
    pub fn new(operator: Operator, departments: Vec<Department>) -> Self {
        Self {
            operator,
            departments,
        }
    }

    /// 使用内置院系列表（没有科目）
    pub fn with_builtin_departments(operator: Operator) -> Self {
        let departments = DepartmentCode::ALL
            .into_iter()
            .map(|code| Department {
                code: code.code().to_string(),
                title: code.name().to_string(),
                subjects: Vec::new(),
            })
            .collect();
        Self::new(operator, departments)
    }

    pub fn department(&self, code: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.code == code)
    }

    /// 院系名称，找不到时回退到内置名称
    pub fn department_title(&self, code: &str) -> Option<String> {
        self.department(code)
            .map(|d| d.title.clone())
            .or_else(|| DepartmentCode::from_code(code).map(|d| d.name().to_string()))
    }

    pub fn subject_title(&self, department: &str, subject: &str) -> Option<String> {
        self.department(department)?
            .subjects
            .iter()
            .find(|s| s.code == subject)
            .map(|s| s.title.clone())
    }
}
