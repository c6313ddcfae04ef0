use crate::finder::error::{FinderError, Result};
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;
use zip::ZipArchive;

/// 附加脚本仓库的 zip 下载地址
pub const DEFAULT_ARCHIVES: &[(&str, &str)] = &[
    (
        "nmap-vulners",
        "https://github.com/vulnersCom/nmap-vulners/archive/refs/heads/master.zip",
    ),
    (
        "vulscan",
        "https://github.com/scipag/vulscan/archive/refs/heads/master.zip",
    ),
];

/// 下载 zip 压缩包并解压到目标目录，返回写入的文件数
///
/// 只发起一次 GET，不重试；非 200 状态视为下载失败。压缩包内容
/// 在内存中解压，不落地临时文件。
pub fn download_and_extract(url: &str, dest: &Path) -> Result<usize> {
    log::info!("开始下载: {}", url);

    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        return Err(FinderError::Download(format!(
            "{} 返回状态 {}",
            url,
            response.status()
        )));
    }

    let bytes = response.bytes()?;
    extract_zip(Cursor::new(bytes.as_ref()), dest)
}

/// 将 zip 内容解压到目标目录
///
/// 条目路径经过 enclosed_name 规范化，越界条目跳过并记录警告。
pub fn extract_zip<R: io::Read + io::Seek>(reader: R, dest: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(reader)?;
    let mut written = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let rel_path = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                log::warn!("跳过越界条目: {}", entry.name());
                continue;
            }
        };

        let out_path = dest.join(rel_path);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = fs::File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::config::SearchConfig;
    use crate::finder::search::search_scripts;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn sample_zip() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buf);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.add_directory("repo/", options).expect("add dir");
        zip.start_file("repo/http-cve.nse", options)
            .expect("start file");
        zip.write_all(b"description = \"scan for CVE\"\n")
            .expect("write entry");
        zip.start_file("repo/lib/helper.nse", options)
            .expect("start nested file");
        zip.write_all(b"categories = {\"vuln\"}\n")
            .expect("write entry");
        zip.finish().expect("finish zip");

        buf.into_inner()
    }

    #[test]
    fn extract_writes_all_entries() {
        let temp = tempdir().expect("tempdir");
        let written = extract_zip(Cursor::new(sample_zip()), temp.path()).expect("extract");

        assert_eq!(written, 2);
        assert!(temp.path().join("repo/http-cve.nse").is_file());
        assert!(temp.path().join("repo/lib/helper.nse").is_file());
    }

    #[test]
    fn extract_skips_escaping_entries() {
        let mut buf = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buf);
        let options = SimpleFileOptions::default();
        zip.start_file("../evil.nse", options).expect("start file");
        zip.write_all(b"bad").expect("write entry");
        zip.start_file("ok.nse", options).expect("start file");
        zip.write_all(b"good").expect("write entry");
        zip.finish().expect("finish zip");
        let bytes = buf.into_inner();

        let temp = tempdir().expect("tempdir");
        let dest = temp.path().join("out");
        fs::create_dir_all(&dest).expect("create dest");

        let written = extract_zip(Cursor::new(bytes), &dest).expect("extract");
        assert_eq!(written, 1);
        assert!(dest.join("ok.nse").is_file());
        assert!(!temp.path().join("evil.nse").exists());
    }

    #[test]
    fn invalid_zip_payload_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let err =
            extract_zip(Cursor::new(b"not a zip".to_vec()), temp.path()).expect_err("must fail");
        assert!(matches!(err, FinderError::Zip(_)));
    }

    #[test]
    fn malformed_url_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let err = download_and_extract("htp://not-a-url", temp.path()).expect_err("must fail");
        assert!(matches!(err, FinderError::Http(_)));
    }

    #[test]
    fn non_success_status_does_not_abort_later_search() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let server = std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                );
            }
        });

        let temp = tempdir().expect("tempdir");
        let url = format!("http://{}/archive.zip", addr);
        let err = download_and_extract(&url, temp.path()).expect_err("must fail");
        assert!(matches!(err, FinderError::Download(_)));
        server.join().expect("server thread");

        // 下载失败后，针对原目录的搜索仍然可用
        fs::write(
            temp.path().join("cve-check.nse"),
            "description = \"scan for CVE\"\n",
        )
        .expect("write script");
        let config = SearchConfig {
            scripts_dir: temp.path().to_string_lossy().to_string(),
            keyword: "cve".to_string(),
            extra_dirs: Vec::new(),
            ..SearchConfig::default()
        };
        let results = search_scripts(&config).expect("search after failed download");
        assert_eq!(results.len(), 1);
    }
}
