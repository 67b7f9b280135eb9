use crate::stage::Stage;

/// Boundary the round pushes display events through. Implementations render
/// (or record) them; the round itself never touches a drawing surface.
///
/// All methods default to no-ops so query-only callers can pass a bare sink.
pub trait PresentationSink {
    /// Round initialized: safe to render the empty mask and enable input.
    fn round_ready(&mut self) {}

    /// A wrong guess revealed the next gallows stage. Fired exactly once per
    /// stage, strictly in drawing order within a round.
    fn failure_stage(&mut self, _stage: Stage) {}

    /// Round reached a terminal state; the secret word is revealed.
    fn round_ended(&mut self, _did_win: bool, _secret_word: &str) {}
}

/// Sink that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {}

/// Everything a sink can observe, in emission order.
#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    RoundReady,
    FailureStage(Stage),
    RoundEnded { did_win: bool, secret_word: String },
}

/// Recording sink for unit and integration tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages seen so far, in emission order.
    pub fn stages(&self) -> Vec<Stage> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::FailureStage(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingSink {
    fn round_ready(&mut self) {
        self.events.push(SinkEvent::RoundReady);
    }

    fn failure_stage(&mut self, stage: Stage) {
        self.events.push(SinkEvent::FailureStage(stage));
    }

    fn round_ended(&mut self, did_win: bool, secret_word: &str) {
        self.events.push(SinkEvent::RoundEnded {
            did_win,
            secret_word: secret_word.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        sink.round_ready();
        sink.failure_stage(Stage::Head);
        sink.round_ended(false, "cat");
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.round_ready();
        sink.failure_stage(Stage::Head);
        sink.failure_stage(Stage::Torso);
        sink.round_ended(false, "cat");

        assert_eq!(sink.events.len(), 4);
        assert_eq!(sink.events[0], SinkEvent::RoundReady);
        assert_eq!(sink.stages(), vec![Stage::Head, Stage::Torso]);
        assert_eq!(
            sink.events[3],
            SinkEvent::RoundEnded {
                did_win: false,
                secret_word: "cat".to_string()
            }
        );
    }
}
