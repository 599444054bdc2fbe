use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub matched: usize,
    pub total: usize,
}

impl Summary {
    /// Job counter text: just the total when nothing is hidden, otherwise
    /// `matched / total`.
    pub fn label(&self) -> String {
        if self.matched == self.total {
            self.total.to_string()
        } else {
            format!("{} / {}", self.matched, self.total)
        }
    }

    pub fn empty_message(&self, filters_active: bool) -> Option<&'static str> {
        if self.matched > 0 {
            None
        } else if filters_active {
            Some("No jobs match current filters. Try adjusting your filters.")
        } else {
            Some("No jobs yet. Add your first job above!")
        }
    }
}

pub fn summarize<A, B>(full: &[A], filtered: &[B]) -> Summary {
    Summary {
        matched: filtered.len(),
        total: full.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts() {
        let full = [1, 2, 3, 4];
        let filtered = [&full[1], &full[3]];
        assert_eq!(summarize(&full, &filtered), Summary { matched: 2, total: 4 });
    }

    #[test]
    fn test_label() {
        assert_eq!(Summary { matched: 5, total: 5 }.label(), "5");
        assert_eq!(Summary { matched: 1, total: 2 }.label(), "1 / 2");
        assert_eq!(Summary { matched: 0, total: 0 }.label(), "0");
    }

    #[test]
    fn test_empty_message() {
        let some = Summary { matched: 1, total: 3 };
        assert_eq!(some.empty_message(true), None);

        let none = Summary { matched: 0, total: 3 };
        assert!(none.empty_message(true).unwrap().contains("filters"));
        assert!(none.empty_message(false).unwrap().starts_with("No jobs yet"));
    }
}
