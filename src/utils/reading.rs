use crate::cms::richtext;
use crate::models::document::ContentGroup;

/// 阅读速度：每分钟 200 个单词
pub const WORDS_PER_MINUTE: usize = 200;

/// 统计字数：英文按空白分词，中日韩统一表意文字每个字计一个词
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .map(|token| {
            let cjk_chars = token.chars().filter(|c| is_cjk(*c)).count();
            let has_other = token.chars().any(|c| !is_cjk(c));
            cjk_chars + usize::from(has_other)
        })
        .sum()
}

fn is_cjk(c: char) -> bool {
    let cp = c as u32;
    (0x4E00..=0x9FFF).contains(&cp)
        || (0x3400..=0x4DBF).contains(&cp)
        || (0xF900..=0xFAFF).contains(&cp)
}

/// 将字数换算为阅读分钟数，向上取整
pub fn minutes_for(words: usize) -> u32 {
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

/// 估算文章的阅读时间：所有标题和正文纯文本的字数之和
pub fn reading_time(content: &[ContentGroup]) -> u32 {
    let words: usize = content
        .iter()
        .map(|group| word_count(&group.heading) + word_count(&richtext::as_text(&group.body)))
        .sum();
    minutes_for(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::RichTextBlock;

    fn paragraph(text: &str) -> RichTextBlock {
        RichTextBlock {
            block_type: "paragraph".to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn group(heading: &str, words: usize) -> ContentGroup {
        ContentGroup {
            heading: heading.to_string(),
            body: vec![paragraph(&vec!["palavra"; words].join(" "))],
        }
    }

    #[test]
    fn counts_words_and_cjk() {
        assert_eq!(word_count("um dois  três\nquatro"), 4);
        assert_eq!(word_count("静态博客 rust"), 5);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("静态博客"), 4);
        assert_eq!(word_count("用rust写博客"), 5);
    }

    #[test]
    fn rounds_up_to_whole_minutes() {
        assert_eq!(minutes_for(0), 0);
        assert_eq!(minutes_for(1), 1);
        assert_eq!(minutes_for(200), 1);
        assert_eq!(minutes_for(201), 2);
        assert_eq!(minutes_for(1000), 5);
    }

    #[test]
    fn sums_headings_and_bodies() {
        // 2 + 198 + 1 + 200 = 401 词
        let content = vec![group("Primeiro título", 198), group("Segundo", 200)];
        assert_eq!(reading_time(&content), 3);
    }

    #[test]
    fn empty_post_reads_in_zero_minutes() {
        assert_eq!(reading_time(&[]), 0);
    }

    #[test]
    fn non_decreasing_and_positive() {
        let mut previous = 0;
        for words in 1..1500 {
            let minutes = reading_time(&[group("", words)]);
            assert!(minutes >= previous);
            assert!(minutes > 0);
            previous = minutes;
        }
    }
}
