use crate::finder::error::{FinderError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 递归扫描目录，返回文件名满足谓词的文件路径
///
/// 跟随符号链接；结果按目录项遍历顺序返回，调用方不应假定排序。
/// 路径以传入的根目录为前缀，根目录为相对路径时结果也是相对路径。
/// 无法读取的子项直接跳过，根目录缺失或不是目录则返回错误。
pub fn scan<P>(root: &Path, predicate: P) -> Result<Vec<PathBuf>>
where
    P: Fn(&str) -> bool,
{
    if !root.is_dir() {
        return Err(FinderError::NotFound(root.to_string_lossy().to_string()));
    }

    let mut results = Vec::new();
    let walker = WalkDir::new(root).follow_links(true).into_iter();

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = match entry.file_name().to_str() {
            Some(name) => name,
            None => continue, // 文件名无法转换为字符串，跳过
        };

        if predicate(file_name) {
            results.push(entry.path().to_path_buf());
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
    }

    #[test]
    fn scan_collects_matching_names_recursively() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("http-cve.nse"), "");
        touch(&temp.path().join("sub/smb-cve.nse"), "");
        touch(&temp.path().join("sub/readme.txt"), "");

        let keyword = "cve";
        let results = scan(temp.path(), |name| name.to_lowercase().contains(keyword))
            .expect("scan failed");

        let mut names: Vec<String> = results
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["http-cve.nse", "smb-cve.nse"]);
    }

    #[test]
    fn scan_keyword_match_is_case_insensitive() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("HTTP-CVE.NSE"), "");

        let results = scan(temp.path(), |name| name.to_lowercase().contains("cve"))
            .expect("scan failed");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn scan_missing_root_is_not_found() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("no-such-dir");

        let err = scan(&missing, |_| true).expect_err("must fail");
        assert!(matches!(err, FinderError::NotFound(_)));
    }

    #[test]
    fn scan_root_that_is_a_file_is_not_found() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("plain.nse");
        touch(&file, "");

        let err = scan(&file, |_| true).expect_err("must fail");
        assert!(matches!(err, FinderError::NotFound(_)));
    }

    #[test]
    fn scan_excludes_non_matching_names() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("dns-brute.nse"), "");
        touch(&temp.path().join("http-title.nse"), "");

        let results = scan(temp.path(), |name| name.to_lowercase().contains("dns"))
            .expect("scan failed");
        assert_eq!(results.len(), 1);
        assert!(results[0].ends_with("dns-brute.nse"));
    }
}
