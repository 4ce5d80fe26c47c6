//! Отсев устаревших ответов: каждый новый запрос получает номер, и ответ
//! применяется только если за это время не ушёл более новый запрос.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RequestSeq {
    current: u64,
}

impl RequestSeq {
    /// Номер нового запроса; все выданные раньше становятся устаревшими.
    pub(crate) fn begin(&mut self) -> u64 {
        self.current = self.current.wrapping_add(1);
        self.current
    }

    pub(crate) fn is_current(&self, ticket: u64) -> bool {
        self.current == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_request_is_current() {
        let mut seq = RequestSeq::default();
        let first = seq.begin();
        assert!(seq.is_current(first));

        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn response_for_previous_post_is_dropped() {
        let mut seq = RequestSeq::default();
        let edit_one = seq.begin();
        let edit_two = seq.begin();

        let mut applied = Vec::new();
        for (ticket, post) in [(edit_two, 2), (edit_one, 1)] {
            if seq.is_current(ticket) {
                applied.push(post);
            }
        }
        assert_eq!(applied, vec![2]);
    }
}
