use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::state::response_state::StatusClass;

const HEADER_NAME: Color = Color::Rgb(125, 207, 255); // #7dcfff
const HEADER_VALUE: Color = Color::Rgb(169, 177, 214); // #a9b1d6
const PUNCTUATION: Color = Color::Rgb(86, 95, 137); // #565f89
const TARGET: Color = Color::Rgb(192, 202, 245); // #c0caf5
const VERSION: Color = Color::Rgb(187, 154, 247); // #bb9af7

pub fn method_color(method: &str) -> Color {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Color::Rgb(115, 218, 202),
        "POST" => Color::Rgb(158, 206, 106),
        "PUT" => Color::Rgb(224, 175, 104),
        "PATCH" => Color::Rgb(187, 154, 247),
        "DELETE" => Color::Rgb(247, 118, 142),
        "HEAD" => Color::Rgb(122, 162, 247),
        _ => Color::Rgb(169, 177, 214),
    }
}

pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Success => Color::Rgb(158, 206, 106), // green
        StatusClass::ClientError => Color::Rgb(224, 175, 104), // orange
        StatusClass::ServerError => Color::Rgb(247, 118, 142), // red
        StatusClass::Neutral => Color::Rgb(122, 162, 247), // blue
    }
}

/// Style raw request or response text.
///
/// The first line is a request line or, when it starts with `HTTP/`, a
/// status line. Header lines follow up to the first blank line; the body is
/// left unstyled. Only styles are added: [`plain_text`] of the result is
/// always the input.
pub fn highlight_http(text: &str) -> Text<'static> {
    let mut lines = Vec::new();
    let mut in_body = false;
    for (i, line) in text.split('\n').enumerate() {
        let styled = if i == 0 {
            start_line(line)
        } else if in_body {
            Line::from(Span::raw(line.to_string()))
        } else if line.trim().is_empty() {
            in_body = true;
            Line::from(Span::raw(line.to_string()))
        } else {
            header_line(line)
        };
        lines.push(styled);
    }
    Text::from(lines)
}

/// Concatenate the spans of each line and join the lines with `\n`.
#[cfg(test)]
pub fn plain_text(text: &Text) -> String {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn start_line(line: &str) -> Line<'static> {
    let is_status = line.trim_start().starts_with("HTTP/");
    let spans = words(line)
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let style = match (is_status, i) {
                (true, 0) | (false, 2..) => Style::default().fg(VERSION),
                (true, 1) => {
                    let class = part
                        .trim()
                        .parse::<u16>()
                        .map(StatusClass::of)
                        .unwrap_or(StatusClass::Neutral);
                    Style::default().fg(status_color(class)).add_modifier(Modifier::BOLD)
                }
                (true, _) => Style::default().fg(TARGET),
                (false, 0) => Style::default()
                    .fg(method_color(part.trim()))
                    .add_modifier(Modifier::BOLD),
                (false, 1) => Style::default().fg(TARGET),
            };
            Span::styled(part.to_string(), style)
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

/// Split after each run of whitespace that follows a word, so every piece is
/// a word plus its trailing whitespace.
fn words(line: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let (mut start, mut in_word, mut after_word) = (0, false, false);
    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            after_word |= in_word;
            in_word = false;
        } else {
            if after_word {
                words.push(&line[start..i]);
                start = i;
                after_word = false;
            }
            in_word = true;
        }
    }
    if start < line.len() {
        words.push(&line[start..]);
    }
    words
}

fn header_line(line: &str) -> Line<'static> {
    // `:authority: x` is a pseudo-header; its name keeps the leading colon.
    let search_from = usize::from(line.starts_with(':'));
    let Some(colon) = line[search_from..].find(':').map(|i| i + search_from) else {
        return Line::from(Span::raw(line.to_string()));
    };
    Line::from(vec![
        Span::styled(line[..colon].to_string(), Style::default().fg(HEADER_NAME)),
        Span::styled(":".to_string(), Style::default().fg(PUNCTUATION)),
        Span::styled(line[colon + 1..].to_string(), Style::default().fg(HEADER_VALUE)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lossless(input: &str) {
        assert_eq!(plain_text(&highlight_http(input)), input);
    }

    #[test]
    fn test_lossless_on_request_and_response() {
        assert_lossless("POST /api?q=1 HTTP/1.1\nHost: a.com\nX-A:  spaced \n\n{\n  \"k\": 1\n}");
        assert_lossless("HTTP/1.1 404 Not Found\ncontent-type: text/plain\n\nmissing");
        assert_lossless("");
        assert_lossless("\n\n\n");
        assert_lossless("GET  /double-space   HTTP/1.1\r\nHost: a\r\n\r\nbody\r\n");
        assert_lossless(":authority: a.com\nno colon here\n\nbody: not a header");
    }

    #[test]
    fn test_request_line_spans() {
        let text = highlight_http("DELETE /x HTTP/1.1");
        let spans = &text.lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].style.fg, Some(method_color("DELETE")));
        assert_eq!(spans[2].style.fg, Some(VERSION));
    }

    #[test]
    fn test_status_code_coloured_by_class() {
        let text = highlight_http("HTTP/1.1 503 Service Unavailable");
        let code = &text.lines[0].spans[1];
        assert_eq!(code.content, "503 ");
        assert_eq!(code.style.fg, Some(status_color(StatusClass::ServerError)));
    }

    #[test]
    fn test_body_is_unstyled() {
        let text = highlight_http("GET / HTTP/1.1\nHost: a\n\nName: not-a-header");
        let body = &text.lines[3];
        assert_eq!(body.spans.len(), 1);
        assert_eq!(body.spans[0].style, Style::default());
    }

    #[test]
    fn test_words_keep_whitespace() {
        assert_eq!(words("  GET  /a\tHTTP/1.1 "), vec!["  GET  ", "/a\t", "HTTP/1.1 "]);
    }

    #[test]
    fn test_header_split() {
        let text = highlight_http("GET / HTTP/1.1\nAccept: a:b");
        let spans = &text.lines[1].spans;
        assert_eq!(spans[0].content, "Accept");
        assert_eq!(spans[1].content, ":");
        assert_eq!(spans[2].content, " a:b");
    }
}
