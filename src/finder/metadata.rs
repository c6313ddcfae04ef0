use crate::finder::config::ScriptMetadata;
use crate::finder::error::{FinderError, Result};
use encoding_rs::{GB18030, GBK};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

/// categories = { ... } 块，只取第一次出现
static CATEGORIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"categories\s*=\s*\{([^}]+)\}").unwrap());

/// description = "..." 赋值，只取第一次出现，到第一个右引号为止
static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"description\s*=\s*"([^"]+)""#).unwrap());

/// 提取脚本元数据
///
/// 读取或解码失败时返回空元数据并记录警告，调用方继续处理其余脚本。
pub fn extract_metadata(path: &Path) -> ScriptMetadata {
    match read_script_text(path) {
        Ok(content) => parse_metadata(&content),
        Err(e) => {
            log::warn!("{}", e);
            ScriptMetadata::default()
        }
    }
}

/// 从脚本内容中解析元数据字段
pub fn parse_metadata(content: &str) -> ScriptMetadata {
    let mut metadata = ScriptMetadata::default();

    if let Some(caps) = CATEGORIES_RE.captures(content) {
        metadata.categories = caps[1]
            .split(',')
            .map(|cat| {
                cat.trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string()
            })
            .collect();
    }

    if let Some(caps) = DESCRIPTION_RE.captures(content) {
        metadata.description = caps[1].to_string();
    }

    metadata
}

/// 读取脚本全文，按 UTF-8、GBK、GB18030 依次尝试解码
fn read_script_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| FinderError::Read {
        path: path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => {
            let bytes = e.into_bytes();

            let (cow, _, had_errors) = GBK.decode(&bytes);
            if !had_errors {
                return Ok(cow.into_owned());
            }

            let (cow, _, had_errors) = GB18030.decode(&bytes);
            if !had_errors {
                return Ok(cow.into_owned());
            }

            Err(FinderError::Read {
                path: path.to_string_lossy().to_string(),
                reason: "无法解码文件内容".to_string(),
            })
        }
    }
}
