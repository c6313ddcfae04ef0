/// 终端样式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Style {
    Green,
    Yellow,
    Red,
}

/// 为文本附加 ANSI 颜色码
///
/// 无进程级可变状态，样式只存在于返回的字符串中。
pub fn paint(style: Style, text: &str) -> String {
    let code = match style {
        Style::Green => "\x1b[32m",
        Style::Yellow => "\x1b[33m",
        Style::Red => "\x1b[31m",
    };
    format!("{}{}\x1b[0m", code, text)
}
