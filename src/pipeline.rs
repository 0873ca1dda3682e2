//! Line-by-line ingest, decode and publish
//!
//! [`DecodePublishUnit`] handles one extracted PDU token and decides whether a
//! failure only costs that line or ends the run. [`Pipeline`] feeds it from
//! any async line source, strictly one line at a time.

use crate::error::{GatewayResult, LocalFailure};
use crate::extractor::{extract_pdu, LineOutcome, PduToken};
use crate::line_span;
use crate::pdu::PduDecoder;
use crate::transport::{PublishError, Publisher};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn, Instrument};

/// What happened to one token
#[derive(Debug)]
pub enum TokenOutcome {
    /// Broker acknowledged the message
    Published { sender: String },
    /// Decode or serialization failed; the line is dropped
    Skipped(LocalFailure),
}

/// Decodes a token and publishes the result to a fixed topic
pub struct DecodePublishUnit<P, D> {
    publisher: P,
    decoder: D,
    topic: String,
}

impl<P: Publisher, D: PduDecoder> DecodePublishUnit<P, D> {
    pub fn new(publisher: P, decoder: D, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            decoder,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Decode, serialize and publish one token
    ///
    /// Local failures are logged and reported as [`TokenOutcome::Skipped`];
    /// only a publish failure is returned as an error.
    pub async fn process(&self, token: &PduToken) -> Result<TokenOutcome, PublishError> {
        let sms = match self.decoder.decode(token.as_str()) {
            Ok(sms) => sms,
            Err(e) => return Ok(Self::skip(LocalFailure::from(e))),
        };

        let payload = match sms.to_payload() {
            Ok(payload) => payload,
            Err(e) => return Ok(Self::skip(LocalFailure::from(e))),
        };

        debug!(bytes = payload.len(), "Publishing decoded SMS");
        self.publisher.publish(&self.topic, payload).await?;

        let sender = sms.sender_number().to_string();
        info!("Published SMS from {} to {}", sender, self.topic);
        Ok(TokenOutcome::Published { sender })
    }

    fn skip(failure: LocalFailure) -> TokenOutcome {
        warn!("{}", failure);
        TokenOutcome::Skipped(failure)
    }
}

/// Counters reported at end of input
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub lines: usize,
    pub blank: usize,
    pub published: usize,
    pub skipped: usize,
}

/// Sequential driver over an input line source
pub struct Pipeline<P, D> {
    unit: DecodePublishUnit<P, D>,
}

impl<P: Publisher, D: PduDecoder> Pipeline<P, D> {
    pub fn new(unit: DecodePublishUnit<P, D>) -> Self {
        Self { unit }
    }

    /// Process lines until end of input or the first fatal error
    ///
    /// An unparsable line, a publish failure or a read error stops the run
    /// immediately; nothing after that line is read.
    pub async fn run<R>(&self, reader: R) -> GatewayResult<PipelineSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(
            "Reading MikroTik SMS PDU lines from stdin and publishing them to {}",
            self.unit.topic()
        );

        let mut lines = reader.lines();
        let mut summary = PipelineSummary::default();

        while let Some(line) = lines.next_line().await? {
            summary.lines += 1;

            let token = match extract_pdu(&line)? {
                LineOutcome::Blank => {
                    summary.blank += 1;
                    continue;
                }
                LineOutcome::Token(token) => token,
            };

            let span = line_span!(line = summary.lines);
            match self.unit.process(&token).instrument(span).await? {
                TokenOutcome::Published { .. } => summary.published += 1,
                TokenOutcome::Skipped(_) => summary.skipped += 1,
            }
        }

        info!(
            lines = summary.lines,
            published = summary.published,
            skipped = summary.skipped,
            "End of input"
        );
        Ok(summary)
    }
}
