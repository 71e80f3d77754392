//! NDJSON stream to [`StreamEvent`] adapter.
//!
//! Ollama streams chat responses as newline-delimited JSON objects; the
//! final object has `done: true` and carries the token counts. This module
//! maps a response body to the provider-agnostic event enum: `TextDelta`
//! per content chunk, `Usage` from the final chunk, then `Done`.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use theseus_types::llm::{BackendError, StreamEvent, TokenUsage};

use super::types::OllamaChatChunk;

/// Parse one NDJSON line into stream events.
///
/// Returns the events it yields plus whether this was the terminal chunk.
/// An in-band `error` field from the server becomes a `Provider` error.
pub(crate) fn parse_chunk_line(line: &str) -> Result<(Vec<StreamEvent>, bool), BackendError> {
    let chunk: OllamaChatChunk = serde_json::from_str(line)
        .map_err(|err| BackendError::Deserialization(format!("stream chunk: {err}")))?;

    if let Some(message) = chunk.error {
        return Err(BackendError::Provider { message });
    }

    let mut events = Vec::new();
    if let Some(message) = chunk.message {
        if !message.content.is_empty() {
            events.push(StreamEvent::TextDelta {
                text: message.content,
            });
        }
    }

    if chunk.done {
        if let (Some(input), Some(output)) = (chunk.prompt_eval_count, chunk.eval_count) {
            events.push(StreamEvent::Usage(TokenUsage {
                input_tokens: input,
                output_tokens: output,
            }));
        }
        events.push(StreamEvent::Done);
    }

    Ok((events, chunk.done))
}

/// Map a streaming HTTP response body to a stream of [`StreamEvent`]s.
///
/// Chunk boundaries from the transport do not align with line boundaries,
/// so bytes are buffered and split on newlines. A body that ends without a
/// terminal chunk still yields `Done` so the fold terminates.
pub(crate) fn ndjson_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, BackendError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        let mut body = response.bytes_stream();
        let mut buffer = String::new();
        let mut saw_done = false;

        'read: while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|err| BackendError::Stream(err.to_string()))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let (events, done) = parse_chunk_line(line)?;
                for event in events {
                    yield event;
                }
                if done {
                    saw_done = true;
                    break 'read;
                }
            }
        }

        if !saw_done {
            // Flush a trailing line without a newline terminator.
            let line = buffer.trim();
            if !line.is_empty() {
                let (events, done) = parse_chunk_line(line)?;
                for event in events {
                    yield event;
                }
                saw_done = done;
            }
        }

        if !saw_done {
            yield StreamEvent::Done;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_chunk() {
        let (events, done) =
            parse_chunk_line(r#"{"message":{"role":"assistant","content":"Hi"},"done":false}"#)
                .unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::TextDelta {
                text: "Hi".to_string()
            }]
        );
        assert!(!done);
    }

    #[test]
    fn test_parse_empty_content_yields_nothing() {
        let (events, done) =
            parse_chunk_line(r#"{"message":{"role":"assistant","content":""},"done":false}"#)
                .unwrap();
        assert!(events.is_empty());
        assert!(!done);
    }

    #[test]
    fn test_parse_terminal_chunk_yields_usage_then_done() {
        let (events, done) = parse_chunk_line(
            r#"{"message":{"role":"assistant","content":""},"done":true,"prompt_eval_count":26,"eval_count":298}"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                StreamEvent::Usage(TokenUsage {
                    input_tokens: 26,
                    output_tokens: 298
                }),
                StreamEvent::Done,
            ]
        );
        assert!(done);
    }

    #[test]
    fn test_parse_terminal_chunk_without_counts_still_done() {
        let (events, done) = parse_chunk_line(r#"{"done":true}"#).unwrap();
        assert_eq!(events, vec![StreamEvent::Done]);
        assert!(done);
    }

    #[test]
    fn test_parse_in_band_error() {
        let result = parse_chunk_line(r#"{"error":"model 'missing' not found"}"#);
        assert!(matches!(result, Err(BackendError::Provider { .. })));
    }

    #[test]
    fn test_parse_garbage_is_deserialization_error() {
        let result = parse_chunk_line("not json at all");
        assert!(matches!(result, Err(BackendError::Deserialization(_))));
    }

    #[test]
    fn test_fold_of_chunks_equals_full_response() {
        let lines = [
            r#"{"message":{"role":"assistant","content":"Hi"},"done":false}"#,
            r#"{"message":{"role":"assistant","content":" there"},"done":false}"#,
            r#"{"message":{"role":"assistant","content":""},"done":true,"prompt_eval_count":5,"eval_count":2}"#,
        ];

        let mut full = String::new();
        for line in lines {
            let (events, _) = parse_chunk_line(line).unwrap();
            for event in events {
                if let StreamEvent::TextDelta { text } = event {
                    full.push_str(&text);
                }
            }
        }
        assert_eq!(full, "Hi there");
    }
}
