//! Synchronous parsing core and the async `Stream` wrapper built on it.

use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use futures::Stream;

use crate::adapter::ChunkAdapter;
use crate::builder::ValueBuilder;
use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::tokenizer::Tokenizer;
use crate::value::Value;

/// Drives the adapter, tokenizer, and value builder over byte chunks fed to
/// it, yielding every `Value` produced along the way.
///
/// This is the synchronous engine underneath [`JsonStream`]; use it directly
/// when the byte source isn't an async `Stream` (e.g. reading a file
/// incrementally, or testing).
#[derive(Debug)]
pub struct ParserCore {
    adapter: ChunkAdapter,
    tokenizer: Tokenizer,
    builder: ValueBuilder,
}

impl ParserCore {
    /// Creates a new parser core with the given configuration.
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            adapter: ChunkAdapter::new(),
            tokenizer: Tokenizer::new(config),
            builder: ValueBuilder::new(config.initial_string_capacity()),
        }
    }

    /// Creates a new parser core using default configuration.
    pub fn with_defaults() -> Self {
        Self::new(&ParserConfig::default())
    }

    /// Feeds a raw byte chunk, returning every value produced as a result —
    /// the completed root value once, if this chunk finished it, or any
    /// number of progressively-refined snapshots of the root as it's still
    /// being built.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Value>, ParseError> {
        let text = self.adapter.feed(chunk)?;
        let events = self.tokenizer.feed(&text)?;
        Ok(events
            .into_iter()
            .filter_map(|event| self.builder.apply(event))
            .collect())
    }

    /// Signals end-of-input. Returns the final value if one completed
    /// exactly at end-of-stream (trailing numbers finalize here), or an
    /// error if the input ended mid-structure or with no value at all.
    pub fn finish(&mut self) -> Result<Option<Value>, ParseError> {
        self.adapter.finish()?;
        let events = self.tokenizer.finish()?;
        let mut last = None;
        for event in events {
            if let Some(value) = self.builder.apply(event) {
                last = Some(value);
            }
        }
        Ok(last.or_else(|| self.builder.current()))
    }
}

/// Adapts a byte-chunk stream into a stream of parsed [`Value`]s.
///
/// `S` yields fallible chunks of anything that can be viewed as bytes —
/// `bytes::Bytes`, `Vec<u8>`, `&'static [u8]`, and so on — as produced by an
/// HTTP body, a framed socket read, or any other chunked source. Each chunk
/// is fed to an internal [`ParserCore`]; every value it yields is relayed
/// downstream immediately, so a caller sees array/object elements as soon as
/// they're known rather than only once the whole document has arrived.
pub struct JsonStream<S> {
    inner: S,
    core: ParserCore,
    buffered: std::collections::VecDeque<Value>,
    finished: bool,
    last_emitted: Option<Value>,
}

impl<S> JsonStream<S> {
    /// Wraps `inner` with default parser configuration.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, ParserConfig::default())
    }

    /// Wraps `inner` with explicit parser configuration.
    pub fn with_config(inner: S, config: ParserConfig) -> Self {
        Self {
            inner,
            core: ParserCore::new(&config),
            buffered: std::collections::VecDeque::new(),
            finished: false,
            last_emitted: None,
        }
    }
}

impl<S, B, E> Stream for JsonStream<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<ParseError>,
{
    type Item = Result<Value, ParseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(value) = this.buffered.pop_front() {
                this.last_emitted = Some(value.clone());
                return Poll::Ready(Some(Ok(value)));
            }

            if this.finished {
                return Poll::Ready(None);
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => match this.core.feed(chunk.as_ref()) {
                    Ok(values) => {
                        this.buffered.extend(values);
                        continue;
                    }
                    Err(err) => {
                        this.finished = true;
                        return Poll::Ready(Some(Err(err)));
                    }
                },
                Poll::Ready(Some(Err(err))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(err.into())));
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    // `finish()` re-surfaces the final root even when no new
                    // token was produced at end-of-stream (see `ParserCore::finish`);
                    // skip re-emitting it here if it's identical to what the
                    // last `feed()` already sent downstream, so the stream keeps
                    // strict per-yield progress.
                    return match this.core.finish() {
                        Ok(Some(value)) if this.last_emitted.as_ref() == Some(&value) => {
                            Poll::Ready(None)
                        }
                        Ok(Some(value)) => {
                            this.last_emitted = Some(value.clone());
                            Poll::Ready(Some(Ok(value)))
                        }
                        Ok(None) => Poll::Ready(None),
                        Err(err) => Poll::Ready(Some(Err(err))),
                    };
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
