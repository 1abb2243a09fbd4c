//! 题目分类：院系 / 科目 / 年份或类型 / 套卷

use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// 年份列表的起始年
pub const FIRST_YEAR: i32 = 2010;

/// 院系代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepartmentCode {
    EE,
    ME,
    CS,
    MT,
    IN,
    EC,
    CE,
    CH,
    GG,
    CY,
}

impl DepartmentCode {
    pub const ALL: [DepartmentCode; 10] = [
        DepartmentCode::EE,
        DepartmentCode::ME,
        DepartmentCode::CS,
        DepartmentCode::MT,
        DepartmentCode::IN,
        DepartmentCode::EC,
        DepartmentCode::CE,
        DepartmentCode::CH,
        DepartmentCode::GG,
        DepartmentCode::CY,
    ];

    /// 获取院系代码
    pub fn code(self) -> &'static str {
        match self {
            DepartmentCode::EE => "EE",
            DepartmentCode::ME => "ME",
            DepartmentCode::CS => "CS",
            DepartmentCode::MT => "MT",
            DepartmentCode::IN => "IN",
            DepartmentCode::EC => "EC",
            DepartmentCode::CE => "CE",
            DepartmentCode::CH => "CH",
            DepartmentCode::GG => "GG",
            DepartmentCode::CY => "CY",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            DepartmentCode::EE => "Electrical Engineering",
            DepartmentCode::ME => "Mechanical Engineering",
            DepartmentCode::CS => "Computer Science and Information Technology",
            DepartmentCode::MT => "Metallurgical Engineering Section",
            DepartmentCode::IN => "Instrumentation Engineering",
            DepartmentCode::EC => "Electronics and Communications",
            DepartmentCode::CE => "Civil Engineering",
            DepartmentCode::CH => "Chemical Engineering",
            DepartmentCode::GG => "Geology and Geophysics",
            DepartmentCode::CY => "Chemistry",
        }
    }

    /// 从代码解析院系（区分大小写）
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }
}

impl fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 年份或题目类型
///
/// 服务端用同一个整数字段存储：普通年份，或 1000（测试系列）/ 1010（小测验）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearOrType {
    Year(i32),
    Series,
    Quiz,
}

impl YearOrType {
    pub const SERIES_CODE: i32 = 1000;
    pub const QUIZ_CODE: i32 = 1010;

    pub fn from_code(code: i32) -> Self {
        match code {
            Self::SERIES_CODE => YearOrType::Series,
            Self::QUIZ_CODE => YearOrType::Quiz,
            year => YearOrType::Year(year),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            YearOrType::Year(year) => year,
            YearOrType::Series => Self::SERIES_CODE,
            YearOrType::Quiz => Self::QUIZ_CODE,
        }
    }
}

impl Default for YearOrType {
    fn default() -> Self {
        YearOrType::Year(chrono::Local::now().year() - 1)
    }
}

impl fmt::Display for YearOrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearOrType::Year(year) => write!(f, "Year: {}", year),
            YearOrType::Series => write!(f, "Type: Test Series"),
            YearOrType::Quiz => write!(f, "Type: Quiz"),
        }
    }
}

impl Serialize for YearOrType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.code())
    }
}

// 年份既可能是字符串也可能是整数
impl<'de> Deserialize<'de> for YearOrType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct YearVisitor;

        impl<'de> Visitor<'de> for YearVisitor {
            type Value = YearOrType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a year or question type")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match value.trim() {
                    "series" => Ok(YearOrType::Series),
                    "quiz" => Ok(YearOrType::Quiz),
                    other => other
                        .parse::<i32>()
                        .map(YearOrType::from_code)
                        .map_err(|_| E::custom(format!("invalid year: {}", value))),
                }
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i32::try_from(value)
                    .map(YearOrType::from_code)
                    .map_err(|_| E::custom(format!("year out of range: {}", value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i32::try_from(value)
                    .map(YearOrType::from_code)
                    .map_err(|_| E::custom(format!("year out of range: {}", value)))
            }
        }

        deserializer.deserialize_any(YearVisitor)
    }
}

/// 题目分类
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub year: YearOrType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<u32>,
}

impl Classification {
    /// 例如 `Year: 2019, Set 2`
    pub fn type_line(&self) -> String {
        match self.set {
            Some(set) => format!("{}, Set {}", self.year, set),
            None => self.year.to_string(),
        }
    }
}

/// 可选年份：去年到 2010 年，倒序
pub fn years() -> Vec<i32> {
    years_until(chrono::Local::now().year() - 1)
}

fn years_until(end_year: i32) -> Vec<i32> {
    (FIRST_YEAR..=end_year).rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_codes_map_to_types() {
        assert_eq!(YearOrType::from_code(1000), YearOrType::Series);
        assert_eq!(YearOrType::from_code(1010), YearOrType::Quiz);
        assert_eq!(YearOrType::from_code(2019), YearOrType::Year(2019));
        assert_eq!(YearOrType::Quiz.code(), 1010);
    }

    #[test]
    fn type_line_matches_labels() {
        let mut classification = Classification {
            year: YearOrType::Series,
            ..Classification::default()
        };
        assert_eq!(classification.type_line(), "Type: Test Series");
        classification.year = YearOrType::Year(2018);
        classification.set = Some(2);
        assert_eq!(classification.type_line(), "Year: 2018, Set 2");
    }

    #[test]
    fn year_accepts_string_or_integer() {
        let from_int: Classification =
            serde_json::from_str(r#"{"department":"CS","subject":"DS","year":1010}"#).unwrap();
        assert_eq!(from_int.year, YearOrType::Quiz);
        let from_str: Classification =
            serde_json::from_str(r#"{"department":"CS","subject":"DS","year":"2015"}"#).unwrap();
        assert_eq!(from_str.year, YearOrType::Year(2015));
    }

    #[test]
    fn years_run_backwards_to_first_year() {
        let list = years_until(2013);
        assert_eq!(list, vec![2013, 2012, 2011, 2010]);
        assert!(years_until(2009).is_empty());
    }

    #[test]
    fn department_codes_round_trip() {
        assert_eq!(DepartmentCode::from_code("CY"), Some(DepartmentCode::CY));
        assert_eq!(DepartmentCode::from_code("cy"), None);
        assert_eq!(DepartmentCode::EE.name(), "Electrical Engineering");
    }
}
