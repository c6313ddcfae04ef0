use crate::finder::config::{ScriptInfo, ScriptMetadata, SearchConfig};
use crate::finder::error::{FinderError, Result};
use crate::finder::{metadata, scanner};
use crate::utils::progress::ProgressManager;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 按关键字搜索 NSE 脚本，返回按文件名去重后的匹配记录
///
/// 主目录必须存在；附加目录缺失时静默跳过。关键字匹配文件名或脚本
/// 描述（忽略大小写），再应用过滤条件。同名脚本只保留最后处理的一个。
pub fn search_scripts(config: &SearchConfig) -> Result<Vec<ScriptInfo>> {
    let keyword = config.keyword.trim();
    if keyword.is_empty() {
        return Err(FinderError::Validation("关键字不能为空".to_string()));
    }
    let keyword_lower = keyword.to_lowercase();

    // 收集候选脚本
    let mut candidates = scanner::scan(Path::new(&config.scripts_dir), is_nse_file)?;
    for extra in &config.extra_dirs {
        let dir = Path::new(extra);
        if dir.is_dir() {
            candidates.extend(scanner::scan(dir, is_nse_file)?);
        }
    }

    let progress = ProgressManager::new(candidates.len() as u64);
    progress.start();

    // 提取元数据：默认顺序执行，可选在 rayon 线程池中并行。
    // 两种方式都按候选顺序收集结果，去重策略保持确定。
    let records: Vec<(PathBuf, ScriptMetadata)> = if config.concurrent {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .build()
            .unwrap();
        pool.install(|| {
            candidates
                .par_iter()
                .map(|path| {
                    let meta = metadata::extract_metadata(path);
                    progress.increment();
                    (path.clone(), meta)
                })
                .collect()
        })
    } else {
        candidates
            .iter()
            .map(|path| {
                let meta = metadata::extract_metadata(path);
                progress.increment();
                (path.clone(), meta)
            })
            .collect()
    };

    progress.stop(true);

    // 关键字加过滤条件，按文件名去重：位置取首次出现，内容取最后出现
    let mut results: Vec<ScriptInfo> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for (path, meta) in records {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        if !keyword_matches(&name, &meta, &keyword_lower) {
            continue;
        }
        if !config.filter.matches(&meta) {
            continue;
        }

        let info = ScriptInfo {
            name: name.clone(),
            path: path.to_string_lossy().to_string(),
            categories: meta.categories,
            description: meta.description,
        };

        match index_by_name.get(&name) {
            Some(&idx) => results[idx] = info,
            None => {
                index_by_name.insert(name, results.len());
                results.push(info);
            }
        }
    }

    Ok(results)
}

/// 关键字匹配：文件名或描述包含关键字（忽略大小写）
fn keyword_matches(name: &str, metadata: &ScriptMetadata, keyword_lower: &str) -> bool {
    name.to_lowercase().contains(keyword_lower)
        || metadata.description.to_lowercase().contains(keyword_lower)
}

/// 候选脚本谓词：.nse 后缀
fn is_nse_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("nse"))
        .unwrap_or(false)
}
