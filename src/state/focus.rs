#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    RequestList,
    Filter,
    Editor,
    Response,
}

impl Focus {
    /// Cycle order: RequestList → Filter → Editor → Response → RequestList
    pub fn next(&self) -> Focus {
        match self {
            Focus::RequestList => Focus::Filter,
            Focus::Filter => Focus::Editor,
            Focus::Editor => Focus::Response,
            Focus::Response => Focus::RequestList,
        }
    }

    pub fn prev(&self) -> Focus {
        match self {
            Focus::RequestList => Focus::Response,
            Focus::Filter => Focus::RequestList,
            Focus::Editor => Focus::Filter,
            Focus::Response => Focus::Editor,
        }
    }

    /// Pane selected by the number keys `1`–`4`.
    pub fn from_digit(c: char) -> Option<Focus> {
        match c {
            '1' => Some(Focus::RequestList),
            '2' => Some(Focus::Filter),
            '3' => Some(Focus::Editor),
            '4' => Some(Focus::Response),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_is_closed() {
        let mut focus = Focus::default();
        for _ in 0..4 {
            assert_eq!(focus.next().prev(), focus);
            focus = focus.next();
        }
        assert_eq!(focus, Focus::RequestList);
    }
}
