use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 进度条管理器
///
/// 包装 indicatif 进度条；输出目标不是终端时自动隐藏，测试环境下无副作用。
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// 创建新的进度条管理器
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} 已处理: {pos}/{len} 个脚本 | 用时: {elapsed_precise}",
            )
            .unwrap()
            .tick_chars("◐◓◑◒ "),
        );
        ProgressManager { bar }
    }

    /// 创建不定长度的旋转指示器
    pub fn spinner(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg} | 用时: {elapsed_precise}")
                .unwrap()
                .tick_chars("◐◓◑◒ "),
        );
        bar.set_message(message.to_string());
        ProgressManager { bar }
    }

    /// 启动进度条
    pub fn start(&self) {
        // 每100ms刷新一次，避免频繁输出
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    /// 增加进度
    pub fn increment(&self) {
        self.bar.inc(1);
    }

    /// 设置进度条消息
    #[allow(dead_code)]
    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    /// 获取当前进度
    #[allow(dead_code)]
    pub fn get_current(&self) -> u64 {
        self.bar.position()
    }

    /// 停止进度条并输出汇总
    pub fn stop(&self, success: bool) {
        let count = self.bar.position();
        let elapsed = self.bar.elapsed();
        self.bar.finish_and_clear();

        if success {
            println!(
                "搜索完成，共处理 {} 个脚本，用时 {:.2} 秒",
                count,
                elapsed.as_secs_f64()
            );
        } else {
            println!("搜索中断");
        }
    }

    /// 清除进度条，不输出汇总
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
