use std::fmt::Write;

use tera::escape_html;

use crate::models::document::{RichTextBlock, Span};

/// 富文本的纯文本形式，块之间以空格分隔
pub fn as_text(blocks: &[RichTextBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 将富文本渲染为 HTML
pub fn as_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::with_capacity(blocks.iter().map(|b| b.text.len() + 16).sum());
    // 当前打开的列表标签（ul / ol）
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list = match block.block_type.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if open_list != list {
            if let Some(tag) = open_list {
                let _ = write!(html, "</{}>", tag);
            }
            if let Some(tag) = list {
                let _ = write!(html, "<{}>", tag);
            }
            open_list = list;
        }

        render_block(&mut html, block);
    }

    if let Some(tag) = open_list {
        let _ = write!(html, "</{}>", tag);
    }

    html
}

fn render_block(html: &mut String, block: &RichTextBlock) {
    let kind = block.block_type.as_str();
    match kind {
        "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
            let level = &kind["heading".len()..];
            let _ = write!(html, "<h{0}>{1}</h{0}>", level, render_spans(&block.text, &block.spans));
        }
        "preformatted" => {
            let _ = write!(html, "<pre>{}</pre>", render_spans(&block.text, &block.spans));
        }
        "list-item" | "o-list-item" => {
            let _ = write!(html, "<li>{}</li>", render_spans(&block.text, &block.spans));
        }
        "image" => {
            let src = block.url.as_deref().unwrap_or_default();
            let alt = block.alt.as_deref().unwrap_or_default();
            let _ = write!(
                html,
                "<p class=\"block-img\"><img src=\"{}\" alt=\"{}\" /></p>",
                escape_html(src),
                escape_html(alt)
            );
        }
        "embed" => {
            let embed = block.oembed.clone().unwrap_or_default();
            let _ = write!(
                html,
                "<div data-oembed=\"{}\" data-oembed-type=\"{}\">{}</div>",
                escape_html(embed.embed_url.as_deref().unwrap_or_default()),
                escape_html(embed.embed_type.as_deref().unwrap_or_default()),
                embed.html.as_deref().unwrap_or_default()
            );
        }
        _ => {
            let _ = write!(html, "<p>{}</p>", render_spans(&block.text, &block.spans));
        }
    }
}

fn open_tag(span: &Span) -> String {
    match span.span_type.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "hyperlink" => {
            let data = span.data.clone().unwrap_or_default();
            let href = escape_html(data.url.as_deref().unwrap_or("#"));
            match data.target.as_deref() {
                Some("_blank") => format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
                    href
                ),
                _ => format!("<a href=\"{}\">", href),
            }
        }
        "label" => {
            let label = span
                .data
                .as_ref()
                .and_then(|d| d.label.as_deref())
                .unwrap_or_default();
            format!("<span class=\"{}\">", escape_html(label))
        }
        _ => "<span>".to_string(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.span_type.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "hyperlink" => "</a>",
        _ => "</span>",
    }
}

fn flush_text(html: &mut String, buffer: &mut String) {
    if buffer.is_empty() {
        return;
    }
    for (i, line) in buffer.split('\n').enumerate() {
        if i > 0 {
            html.push_str("<br />");
        }
        html.push_str(&escape_html(line));
    }
    buffer.clear();
}

/// 按字符偏移套用样式区间；交叉的区间会先关闭再重新打开，保证标签正确嵌套
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut spans: Vec<&Span> = spans
        .iter()
        .filter(|s| s.start < s.end && s.start < len)
        .collect();
    // 同一位置开始时，较长的区间在外层
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut html = String::with_capacity(text.len() + spans.len() * 16);
    let mut buffer = String::new();
    let mut stack: Vec<&Span> = Vec::new();

    for pos in 0..=len {
        let closes_here = stack.iter().any(|s| s.end.min(len) == pos);
        let opens_here = spans.iter().any(|s| s.start == pos);

        if closes_here || opens_here {
            flush_text(&mut html, &mut buffer);
        }

        if closes_here {
            let mut reopen = Vec::new();
            while stack.iter().any(|s| s.end.min(len) == pos) {
                if let Some(span) = stack.pop() {
                    html.push_str(close_tag(span));
                    if span.end.min(len) != pos {
                        reopen.push(span);
                    }
                }
            }
            for span in reopen.into_iter().rev() {
                html.push_str(&open_tag(span));
                stack.push(span);
            }
        }

        for span in spans.iter().copied().filter(|s| s.start == pos) {
            html.push_str(&open_tag(span));
            stack.push(span);
        }

        if let Some(c) = chars.get(pos) {
            buffer.push(*c);
        }
    }

    flush_text(&mut html, &mut buffer);
    while let Some(span) = stack.pop() {
        html.push_str(close_tag(span));
    }

    html
}
