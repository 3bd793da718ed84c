use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::AppError;
use crate::state::captured::CapturedRequest;

const METHOD_CATEGORIES: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Starred,
    Method(String),
}

impl Category {
    /// Cycle order: All → Starred → GET → POST → PUT → PATCH → DELETE → All
    pub fn next(&self) -> Category {
        match self {
            Category::All => Category::Starred,
            Category::Starred => Category::Method(METHOD_CATEGORIES[0].to_string()),
            Category::Method(m) => {
                match METHOD_CATEGORIES.iter().position(|c| c.eq_ignore_ascii_case(m)) {
                    Some(i) if i + 1 < METHOD_CATEGORIES.len() => {
                        Category::Method(METHOD_CATEGORIES[i + 1].to_string())
                    }
                    _ => Category::All,
                }
            }
        }
    }

    fn admits(&self, req: &CapturedRequest) -> bool {
        match self {
            Category::All => true,
            Category::Starred => req.starred,
            Category::Method(m) => req.method.eq_ignore_ascii_case(m),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str("all"),
            Category::Starred => f.write_str("starred"),
            Category::Method(m) => f.write_str(m),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(Category::All)
        } else if s.eq_ignore_ascii_case("starred") {
            Ok(Category::Starred)
        } else if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Category::Method(s.to_ascii_uppercase()))
        } else {
            Err(format!("unknown category {:?}", s))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub regex_mode: bool,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Visibility {
    /// Indices into the request log, ascending.
    pub visible: Vec<usize>,
    pub regex_error: bool,
}

/// The text a search term is matched against.
struct Corpus {
    url: String,
    method: String,
    headers: String,
    body: String,
}

impl Corpus {
    fn of(req: &CapturedRequest) -> Self {
        let headers = req
            .headers
            .iter()
            .map(|h| format!("{}: {} ", h.name, h.value))
            .collect::<String>();
        Self {
            url: req.url.clone(),
            method: req.method.to_uppercase(),
            headers,
            body: req.body.clone().unwrap_or_default(),
        }
    }

    fn matches_regex(&self, re: &Regex) -> bool {
        re.is_match(&self.url)
            || re.is_match(&self.method)
            || re.is_match(&self.headers)
            || re.is_match(&self.body)
    }

    fn contains_ignore_case(&self, term_lower: &str) -> bool {
        self.url.to_lowercase().contains(term_lower)
            || self.method.contains(&term_lower.to_uppercase())
            || self.headers.to_lowercase().contains(term_lower)
            || self.body.to_lowercase().contains(term_lower)
    }
}

pub fn compile_pattern(term: &str) -> Result<Regex, AppError> {
    Ok(Regex::new(term)?)
}

/// Work out which captured requests the filter lets through.
///
/// A pattern that fails to compile is not an error: nothing matches the
/// search and `regex_error` is set so the UI can flag it.
pub fn compute_visibility(requests: &[CapturedRequest], state: &FilterState) -> Visibility {
    enum Search {
        Everything,
        Pattern(Regex),
        Broken,
        Plain(String),
    }

    let search = if state.search_term.is_empty() {
        Search::Everything
    } else if state.regex_mode {
        match compile_pattern(&state.search_term) {
            Ok(re) => Search::Pattern(re),
            Err(e) => {
                tracing::debug!(pattern = %state.search_term, error = %e, "invalid regex pattern");
                Search::Broken
            }
        }
    } else {
        Search::Plain(state.search_term.to_lowercase())
    };

    let visible = requests
        .iter()
        .enumerate()
        .filter(|(_, req)| state.category.admits(req))
        .filter(|(_, req)| match &search {
            Search::Everything => true,
            Search::Broken => false,
            Search::Pattern(re) => Corpus::of(req).matches_regex(re),
            Search::Plain(term) => Corpus::of(req).contains_ignore_case(term),
        })
        .map(|(i, _)| i)
        .collect();

    Visibility {
        visible,
        regex_error: matches!(search, Search::Broken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CapturedRequest> {
        let mut second = CapturedRequest::new("POST", "http://a.com/y");
        second.starred = true;
        vec![CapturedRequest::new("GET", "http://a.com/x"), second]
    }

    fn state(term: &str, regex_mode: bool, category: Category) -> FilterState {
        FilterState {
            search_term: term.to_string(),
            regex_mode,
            category,
        }
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let v = compute_visibility(&sample(), &FilterState::default());
        assert_eq!(v.visible, vec![0, 1]);
        assert!(!v.regex_error);
    }

    #[test]
    fn test_starred_category() {
        let v = compute_visibility(&sample(), &state("", false, Category::Starred));
        assert_eq!(v.visible, vec![1]);
    }

    #[test]
    fn test_plain_search() {
        let v = compute_visibility(&sample(), &state("x", false, Category::All));
        assert_eq!(v.visible, vec![0]);
    }

    #[test]
    fn test_plain_search_ignores_case() {
        let v = compute_visibility(&sample(), &state("HTTP://A.COM/Y", false, Category::All));
        assert_eq!(v.visible, vec![1]);
        let v = compute_visibility(&sample(), &state("post", false, Category::All));
        assert_eq!(v.visible, vec![1]);
    }

    #[test]
    fn test_regex_search() {
        let v = compute_visibility(&sample(), &state("^http://a", true, Category::All));
        assert_eq!(v.visible, vec![0, 1]);
        assert!(!v.regex_error);
    }

    #[test]
    fn test_regex_is_case_sensitive_by_default() {
        let v = compute_visibility(&sample(), &state("^HTTP", true, Category::All));
        assert!(v.visible.is_empty());
        let v = compute_visibility(&sample(), &state("(?i)^HTTP", true, Category::All));
        assert_eq!(v.visible, vec![0, 1]);
    }

    #[test]
    fn test_invalid_regex_hides_everything() {
        let v = compute_visibility(&sample(), &state("(unclosed", true, Category::All));
        assert!(v.visible.is_empty());
        assert!(v.regex_error);
    }

    #[test]
    fn test_compile_pattern_reports_regex_error() {
        assert!(matches!(compile_pattern("a[b"), Err(AppError::InvalidRegex(_))));
        assert!(compile_pattern("a[b]").is_ok());
    }

    #[test]
    fn test_invalid_regex_text_is_fine_in_plain_mode() {
        let mut reqs = sample();
        reqs[0].body = Some("call f(unclosed".into());
        let v = compute_visibility(&reqs, &state("(unclosed", false, Category::All));
        assert_eq!(v.visible, vec![0]);
        assert!(!v.regex_error);
    }

    #[test]
    fn test_search_covers_headers_and_body() {
        let reqs = vec![
            CapturedRequest::new("GET", "http://a.com/1").with_header("X-Tenant", "Acme"),
            CapturedRequest::new("POST", "http://a.com/2").with_body("{\"user\":\"bob\"}"),
        ];
        assert_eq!(
            compute_visibility(&reqs, &state("x-tenant: acme", false, Category::All)).visible,
            vec![0]
        );
        assert_eq!(
            compute_visibility(&reqs, &state("\"user\":\\s*\"b", true, Category::All)).visible,
            vec![1]
        );
    }

    #[test]
    fn test_category_and_search_combine() {
        let v = compute_visibility(&sample(), &state("a.com", false, Category::Method("GET".into())));
        assert_eq!(v.visible, vec![0]);
        let v = compute_visibility(&sample(), &state("/x", false, Category::Starred));
        assert!(v.visible.is_empty());
    }

    #[test]
    fn test_category_cycle_and_parse() {
        let mut c = Category::All;
        let mut seen = vec![c.to_string()];
        for _ in 0..6 {
            c = c.next();
            seen.push(c.to_string());
        }
        assert_eq!(seen, vec!["all", "starred", "GET", "POST", "PUT", "PATCH", "DELETE"]);
        assert_eq!(c.next(), Category::All);
        assert_eq!("post".parse::<Category>(), Ok(Category::Method("POST".into())));
        assert_eq!("Starred".parse::<Category>(), Ok(Category::Starred));
        assert!("no/such".parse::<Category>().is_err());
    }
}
