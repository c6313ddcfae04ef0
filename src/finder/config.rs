/// 脚本元数据，从 NSE 脚本内容中解析得到，每次搜索重新计算
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptMetadata {
    pub categories: Vec<String>,
    pub description: String,
}

/// 匹配结果记录，按脚本文件名去重
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptInfo {
    pub name: String,
    pub path: String,
    pub categories: Vec<String>,
    pub description: String,
}

/// 过滤条件，在关键字匹配之外附加应用
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilter {
    None,
    Category(String),
    Description(String),
}

impl SearchFilter {
    /// 判断元数据是否满足过滤条件
    pub fn matches(&self, metadata: &ScriptMetadata) -> bool {
        match self {
            SearchFilter::None => true,
            SearchFilter::Category(value) => {
                let value = value.to_lowercase();
                metadata
                    .categories
                    .iter()
                    .any(|cat| cat.to_lowercase() == value)
            }
            SearchFilter::Description(value) => metadata
                .description
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }
}

/// 搜索配置结构体，由命令行解析层一次性构建
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub scripts_dir: String,
    pub keyword: String,
    pub filter: SearchFilter,
    pub extra_dirs: Vec<String>,
    pub show_full_path: bool,
    pub concurrent: bool,
    pub max_workers: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            scripts_dir: ".".to_string(),
            keyword: String::new(),
            filter: SearchFilter::None,
            // 附加脚本仓库目录，不存在时自动跳过
            extra_dirs: vec!["nmap-vulners".to_string(), "vulscan".to_string()],
            show_full_path: false,
            concurrent: false,
            max_workers: 5,
        }
    }
}

impl SearchConfig {
    /// 创建新的搜索配置实例
    pub fn new() -> Self {
        Self::default()
    }
}
