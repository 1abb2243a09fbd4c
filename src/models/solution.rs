use serde::{Deserialize, Serialize};

/// 题目解析
///
/// 每道题都有解析，可以为空。`image` 是单张主图，`images` 是追加的图片列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// 解析字段及其新值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionField {
    Text(String),
    Image(String),
}

impl SolutionRecord {
    pub fn set_field(&mut self, field: SolutionField) {
        match field {
            SolutionField::Text(text) => self.text = text,
            SolutionField::Image(image) => self.image = image,
        }
    }

    /// 追加图片（只追加，不会删除）
    pub fn append_image(&mut self, image: impl Into<String>) {
        self.images.push(image.into());
    }

    /// 按值删除图片列表中的图片
    pub fn remove_image(&mut self, image: &str) {
        self.images.retain(|value| value != image);
    }

    /// 清除单张主图，不影响 `images`
    pub fn clear_image(&mut self) {
        self.image.clear();
    }

    /// 预览中是否显示解析
    pub fn is_displayable(&self) -> bool {
        !self.text.is_empty() || !self.image.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_image_keeps_image_list() {
        let mut solution = SolutionRecord::default();
        solution.set_field(SolutionField::Image("main.png".into()));
        solution.append_image("a.png");
        solution.clear_image();
        assert!(solution.image.is_empty());
        assert_eq!(solution.images, vec!["a.png".to_string()]);
    }

    #[test]
    fn remove_image_filters_every_match() {
        let mut solution = SolutionRecord::default();
        solution.append_image("a.png");
        solution.append_image("b.png");
        solution.append_image("a.png");
        solution.remove_image("a.png");
        assert_eq!(solution.images, vec!["b.png".to_string()]);
    }

    #[test]
    fn displayable_only_with_text_or_image() {
        let mut solution = SolutionRecord::default();
        solution.append_image("only-list.png");
        assert!(!solution.is_displayable());
        solution.set_field(SolutionField::Text("Because".into()));
        assert!(solution.is_displayable());
    }
}
