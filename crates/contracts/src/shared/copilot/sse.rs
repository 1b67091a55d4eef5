//! Decoding of the runtime's `text/event-stream` body into [`CopilotEvent`]s.

use super::protocol::CopilotEvent;

/// Incremental decoder: feed body chunks as they arrive, get complete events
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every event completed by it.
    /// Frames whose data is not a valid event (keep-alives, comments) are skipped.
    pub fn feed(&mut self, chunk: &str) -> Vec<CopilotEvent> {
        self.buffer.push_str(&chunk.replace("\r\n", "\n"));

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.find("\n\n") {
            let frame: String = self.buffer.drain(..pos + 2).collect();
            if let Some(event) = parse_frame(&frame) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes a trailing frame that was not terminated by a blank line
    pub fn finish(mut self) -> Option<CopilotEvent> {
        let rest = std::mem::take(&mut self.buffer);
        parse_frame(&rest)
    }
}

/// Decodes a complete body
pub fn parse_event_stream(body: &str) -> Vec<CopilotEvent> {
    let mut decoder = SseDecoder::new();
    let mut events = decoder.feed(body);
    events.extend(decoder.finish());
    events
}

fn parse_frame(frame: &str) -> Option<CopilotEvent> {
    let mut data_lines = Vec::new();
    for line in frame.lines() {
        if let Some(data) = line.strip_prefix("data:") {
            data_lines.push(data.strip_prefix(' ').unwrap_or(data));
        }
    }
    if data_lines.is_empty() {
        return None;
    }
    serde_json::from_str(&data_lines.join("\n")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body() {
        let body = "event: text_delta\ndata: {\"type\":\"text_delta\",\"content\":\"Revenue \"}\n\n\
                    : keepalive\n\n\
                    event: text_delta\ndata: {\"type\":\"text_delta\",\"content\":\"grew.\"}\n\n\
                    event: done\ndata: {\"type\":\"done\",\"thread_id\":\"t1\"}\n\n";
        let events = parse_event_stream(body);
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            CopilotEvent::TextDelta {
                content: "Revenue ".to_string()
            }
        );
        assert_eq!(
            events[2],
            CopilotEvent::Done {
                thread_id: Some("t1".to_string())
            }
        );
    }

    #[test]
    fn test_chunks_split_mid_frame() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("event: error\r\ndata: {\"type\":\"err").is_empty());
        let events = decoder.feed("or\",\"message\":\"throttled\"}\r\n\r\n");
        assert_eq!(
            events,
            vec![CopilotEvent::Error {
                message: "throttled".to_string()
            }]
        );
    }

    #[test]
    fn test_unterminated_trailing_frame() {
        let events = parse_event_stream("data: {\"type\":\"done\"}");
        assert_eq!(events, vec![CopilotEvent::Done { thread_id: None }]);
    }

    #[test]
    fn test_garbage_is_skipped() {
        assert!(parse_event_stream("data: not json\n\n").is_empty());
    }
}
