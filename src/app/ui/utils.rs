#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn notice_area(area: Rect, percent_width: u16) -> Rect {
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_width)]).flex(Flex::End);
    let [area] = horizontal.areas(area);
    area
}

pub fn repeat_from_substactions(text: &str, subs: &[usize]) -> String {
    let Some((first, rest)) = subs.split_first() else {
        return String::new();
    };
    let count = rest.iter().fold(*first, |acc, e| acc.saturating_sub(*e));
    text.repeat(count)
}

/// wrap_words splits text into lines no wider than max_width. Words wider
/// than a whole line are broken by character.
pub fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = vec![];
    let mut line = String::new();

    for word in text.replace('\n', " ").split(' ').filter(|w| !w.is_empty()) {
        let sep = if line.is_empty() { 0 } else { 1 };
        if !line.is_empty() && line.width() + sep + word.width() > max_width {
            lines.push(std::mem::take(&mut line));
        }

        if word.width() > max_width {
            for c in word.chars() {
                if line.width() + c.width().unwrap_or(0) > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(c);
            }
            continue;
        }

        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
