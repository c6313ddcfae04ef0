mod finder;
mod utils;

use clap::{Arg, ArgAction, Command};
use finder::{downloader, search_scripts, FinderError, ScriptInfo, SearchConfig, SearchFilter};
use std::path::Path;
use std::process;
use utils::progress::ProgressManager;
use utils::style::{paint, Style};
use utils::{init_logger, log_to_file};

const USAGE: &str = r#"NSE 脚本搜索工具 (NSE Script Finder)

使用方法:
  nse-finder [选项]

基本选项:
  --keyword string
        按关键字搜索脚本，匹配文件名或脚本描述（忽略大小写）
        示例: --keyword cve 或 --keyword smb

搜索范围:
  --dir string
        指定 NSE 脚本目录
        (默认: Linux/macOS 为 /usr/share/nmap/scripts/,
         Windows 为 C:\Program Files (x86)\Nmap\scripts\)

  --extra-dirs string
        附加脚本目录，多个目录用逗号分隔，不存在时自动跳过
        (默认: "nmap-vulners,vulscan")

过滤选项:
  --category string
        只保留类别完全匹配的脚本（忽略大小写）
        示例: --category vuln

  --description string
        只保留描述包含指定子串的脚本（忽略大小写）
        示例: --description "CVE-2017"

下载选项:
  --download
        搜索前下载并解压附加脚本压缩包 (nmap-vulners, vulscan)
        单个压缩包失败时跳过，继续本地搜索

  --extract-dir string
        压缩包解压目录 (默认: "external-scripts")

显示选项:
  --full-path
        结果表格显示完整路径而不是文件名

性能选项:
  --concurrent
        启用并发元数据提取 (默认: 关闭)

  --workers int
        并发提取的工作线程数 (默认: 5)

其他选项:
  --log
        输出运行日志并将搜索结果写入 nse-finder.log
"#;

/// 命令行参数解析
fn parse_args() -> clap::ArgMatches {
    Command::new("nse-finder")
        .about("NSE 脚本搜索工具")
        .arg(
            Arg::new("keyword")
                .long("keyword")
                .help("按关键字搜索脚本，匹配文件名或脚本描述")
                .value_name("KEYWORD"),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .help("指定 NSE 脚本目录")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("extra-dirs")
                .long("extra-dirs")
                .help("附加脚本目录，多个目录用逗号分隔")
                .value_name("DIRS"),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .help("只保留类别完全匹配的脚本")
                .value_name("CATEGORY")
                .conflicts_with("description"),
        )
        .arg(
            Arg::new("description")
                .long("description")
                .help("只保留描述包含指定子串的脚本")
                .value_name("TEXT"),
        )
        .arg(
            Arg::new("download")
                .long("download")
                .help("搜索前下载并解压附加脚本压缩包")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("extract-dir")
                .long("extract-dir")
                .help("压缩包解压目录")
                .default_value("external-scripts")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("full-path")
                .long("full-path")
                .help("结果表格显示完整路径")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("concurrent")
                .long("concurrent")
                .help("启用并发元数据提取")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .help("并发提取的工作线程数")
                .default_value("5")
                .value_name("WORKERS")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .help("输出运行日志并将搜索结果写入日志文件")
                .action(ArgAction::SetTrue),
        )
        .get_matches()
}

/// 根据操作系统返回默认的 Nmap 脚本目录
fn default_scripts_dir() -> Option<&'static str> {
    if cfg!(windows) {
        Some("C:\\Program Files (x86)\\Nmap\\scripts\\")
    } else if cfg!(unix) {
        Some("/usr/share/nmap/scripts/")
    } else {
        None
    }
}

/// 创建搜索配置
fn create_search_config(matches: &clap::ArgMatches) -> Result<SearchConfig, FinderError> {
    let mut config = SearchConfig::new();

    match matches.get_one::<String>("dir") {
        Some(dir) => config.scripts_dir = dir.clone(),
        None => match default_scripts_dir() {
            Some(dir) => config.scripts_dir = dir.to_string(),
            None => {
                return Err(FinderError::Validation(
                    "不支持的操作系统，请使用 --dir 指定脚本目录".to_string(),
                ))
            }
        },
    }

    if let Some(keyword) = matches.get_one::<String>("keyword") {
        config.keyword = keyword.clone();
    }

    if let Some(category) = matches.get_one::<String>("category") {
        config.filter = SearchFilter::Category(category.clone());
    } else if let Some(description) = matches.get_one::<String>("description") {
        config.filter = SearchFilter::Description(description.clone());
    }

    if let Some(dirs) = matches.get_one::<String>("extra-dirs") {
        config.extra_dirs = dirs.split(',').map(|s| s.trim().to_string()).collect();
    }

    // 解压目录也纳入附加搜索范围，扫描时缺失会被跳过
    if let Some(extract_dir) = matches.get_one::<String>("extract-dir") {
        config.extra_dirs.push(extract_dir.clone());
    }

    config.show_full_path = matches.get_flag("full-path");
    config.concurrent = matches.get_flag("concurrent");

    if let Some(workers) = matches.get_one::<usize>("workers") {
        config.max_workers = *workers;
    }

    Ok(config)
}

/// 下载并解压附加脚本压缩包
///
/// 每个压缩包只请求一次，失败时记录错误并跳过，不影响后续搜索。
fn download_archives(extract_dir: &str) {
    for (name, url) in downloader::DEFAULT_ARCHIVES {
        let dest = Path::new(extract_dir);
        let progress = ProgressManager::spinner(&format!("正在下载 {}", name));
        progress.start();

        match downloader::download_and_extract(url, dest) {
            Ok(count) => {
                progress.finish();
                println!("✅ {} 下载完成，解压 {} 个文件", name, count);
            }
            Err(e) => {
                progress.finish();
                log::error!("下载 {} 失败: {}", name, e);
                eprintln!("❌ 下载 {} 失败: {}，跳过", name, e);
            }
        }
    }
}

/// 打印搜索结果
fn print_search_results(results: &[ScriptInfo], config: &SearchConfig) {
    if results.is_empty() {
        println!(
            "\n❌ 未找到匹配关键字 '{}' 的脚本",
            paint(Style::Yellow, &config.keyword)
        );
        return;
    }

    println!(
        "\n✅ 找到 {} 个匹配脚本:\n",
        paint(Style::Green, &results.len().to_string())
    );
    print_result_table(results, config.show_full_path);
}

/// 打印结果表格
fn print_result_table(results: &[ScriptInfo], show_full_path: bool) {
    // 定义列宽
    const NAME_WIDTH: usize = 28;
    const PATH_WIDTH: usize = 52;
    const CAT_WIDTH: usize = 22;
    const DESC_WIDTH: usize = 44;

    let first_width = if show_full_path {
        PATH_WIDTH
    } else {
        NAME_WIDTH
    };
    let first_header = if show_full_path {
        "脚本路径"
    } else {
        "脚本名称"
    };
    let total_width = first_width + CAT_WIDTH + DESC_WIDTH + 10;

    // 分隔线
    let line = "-".repeat(total_width);
    let dotline = ".".repeat(total_width);

    // 表头
    println!("{}", line);
    println!(
        "| {:<first_width$} | {:<CAT_WIDTH$} | {:<DESC_WIDTH$} |",
        first_header, "类别", "描述"
    );
    println!("{}", line);

    for (idx, script) in results.iter().enumerate() {
        let first_cell = if show_full_path {
            truncate_cell(&script.path, first_width)
        } else {
            truncate_cell(&script.name, first_width)
        };

        let categories = if script.categories.is_empty() {
            "N/A".to_string()
        } else {
            script.categories.join(", ")
        };
        let description = if script.description.is_empty() {
            "N/A".to_string()
        } else {
            script.description.clone()
        };

        println!(
            "| {:<first_width$} | {:<CAT_WIDTH$} | {:<DESC_WIDTH$} |",
            first_cell,
            truncate_cell(&categories, CAT_WIDTH),
            truncate_cell(&description, DESC_WIDTH)
        );

        // 条目之间分隔符
        if idx < results.len() - 1 {
            println!("{}", dotline);
        }
    }

    // 表尾
    println!("{}", line);
}

/// 按字符截断单元格内容，超出部分用省略号表示
fn truncate_cell(content: &str, max_width: usize) -> String {
    // 只取第一行
    let first_line = content.lines().next().unwrap_or("");

    if first_line.chars().count() <= max_width {
        return first_line.to_string();
    }

    // 按字符截断，避免多字节字符边界问题
    let mut result = String::new();
    let mut char_count = 0;
    for c in first_line.chars() {
        if char_count >= max_width.saturating_sub(3) {
            break;
        }
        result.push(c);
        char_count += 1;
    }
    format!("{}...", result)
}

/// 日志记录搜索结果
fn log_search_results(results: &[ScriptInfo]) -> std::io::Result<()> {
    let mut log_buf = format!("找到 {} 个匹配脚本:\n", results.len());
    for script in results {
        log_buf.push_str(&format!(
            "{} - 类别: [{}], 描述: {}\n",
            script.path,
            script.categories.join(", "),
            script.description
        ));
    }
    log_to_file(&log_buf)
}

fn main() {
    // 如果没有参数，打印使用信息
    if std::env::args().len() <= 1 {
        println!("{}", USAGE);
        return;
    }

    // 解析命令行参数
    let matches = parse_args();

    // 初始化日志
    let enable_log = matches.get_flag("log");
    if let Err(e) = init_logger(enable_log) {
        eprintln!("初始化日志失败: {}", e);
    }

    // 检查搜索关键字
    if matches.get_one::<String>("keyword").is_none() {
        eprintln!("错误: 请使用 --keyword 指定搜索关键字");
        println!("\n{}", USAGE);
        process::exit(1);
    }

    // 下载附加脚本压缩包，失败不阻断本地搜索
    if matches.get_flag("download") {
        let extract_dir = matches
            .get_one::<String>("extract-dir")
            .map(String::as_str)
            .unwrap_or("external-scripts");
        download_archives(extract_dir);
    }

    // 创建搜索配置
    let config = match create_search_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", paint(Style::Red, &e.to_string()));
            process::exit(1);
        }
    };

    // 执行搜索
    match search_scripts(&config) {
        Ok(results) => {
            if enable_log {
                if let Err(e) = log_search_results(&results) {
                    eprintln!("记录日志失败: {}", e);
                }
            }
            print_search_results(&results, &config);
        }
        Err(e) => {
            eprintln!("{}", paint(Style::Red, &format!("搜索失败: {}", e)));
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_content() {
        assert_eq!(truncate_cell("http-cve.nse", 28), "http-cve.nse");
    }

    #[test]
    fn truncate_appends_ellipsis_for_long_content() {
        let cell = truncate_cell("a-very-long-script-name-that-overflows.nse", 20);
        assert!(cell.ends_with("..."));
        assert!(cell.chars().count() <= 20);
    }

    #[test]
    fn truncate_is_char_boundary_safe() {
        let cell = truncate_cell("检测服务器上的已知漏洞并给出修复建议", 10);
        assert!(cell.ends_with("..."));
        assert!(cell.chars().count() <= 10);
    }

    #[test]
    fn truncate_uses_first_line_only() {
        assert_eq!(truncate_cell("first\nsecond", 28), "first");
    }
}
