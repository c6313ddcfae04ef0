use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinderError>;

/// 搜索过程中可能出现的错误
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("目录不存在或不是目录: {0}")]
    NotFound(String),

    #[error("参数无效: {0}")]
    Validation(String),

    #[error("读取脚本失败 {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("下载失败: {0}")]
    Download(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
