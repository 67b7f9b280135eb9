use std::sync::{mpsc, Arc};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use gallows::round::Round;
use gallows::runtime::{spawn_fetch, AppEvent, FixedTicker, Runner, TestEventSource};
use gallows::sink::{RecordingSink, SinkEvent};
use gallows::stage::Stage;
use gallows::words::{FixedSource, WordSource};

// Headless integration using the internal runtime + Round without a TTY
// Verifies that a fetch-then-guess flow completes via Runner/TestEventSource.
#[test]
fn headless_guessing_flow_completes() {
    let (tx, rx) = mpsc::channel();

    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    // Fetch the word through the worker thread, as the app would
    let source: Arc<dyn WordSource + Send + Sync> = Arc::new(FixedSource::new("book"));
    spawn_fetch(source, "easy".to_string(), 1, tx.clone());

    let mut sink = RecordingSink::new();
    let mut round = loop {
        match runner.step() {
            AppEvent::WordReady { generation, result } => {
                assert_eq!(generation, 1);
                break Round::with_word(&result.unwrap(), &mut sink).unwrap();
            }
            // ticks while the worker runs
            _ => {}
        }
    };

    // Producer: send the guesses for the word (one wrong one in the middle)
    for c in ['b', 'o', 'x', 'k'] {
        tx.send(AppEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }

    // Act: drive a tiny event loop until the round ends (or bounded steps)
    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    round.guess(&c.to_string(), &mut sink).unwrap();
                    if round.is_over() {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    assert!(round.is_over(), "round should have finished");
    assert!(round.did_win());
    assert_eq!(round.masked_text(), "b o o k");
    assert_eq!(sink.stages(), vec![Stage::Head]);
    assert_eq!(
        sink.events.last(),
        Some(&SinkEvent::RoundEnded {
            did_win: true,
            secret_word: "book".to_string()
        })
    );
}

#[test]
fn headless_loss_records_every_stage() {
    let mut sink = RecordingSink::new();
    let mut round = Round::with_word("cat", &mut sink).unwrap();

    for letter in ["x", "y", "z", "q", "w", "v"] {
        round.guess(letter, &mut sink).unwrap();
    }

    assert!(round.is_over());
    assert!(!round.did_win());
    assert_eq!(
        sink.stages(),
        vec![
            Stage::Head,
            Stage::Torso,
            Stage::RightArm,
            Stage::LeftArm,
            Stage::RightLeg,
            Stage::LeftLeg,
        ]
    );
}

#[test]
fn headless_fetch_failure_surfaces_through_the_runner() {
    let (tx, rx) = mpsc::channel();

    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    let source: Arc<dyn WordSource + Send + Sync> = Arc::new(FixedSource::new("not a word"));
    spawn_fetch(source, "easy".to_string(), 1, tx);

    for _ in 0..100u32 {
        if let AppEvent::WordReady { result, .. } = runner.step() {
            assert!(result.is_err(), "malformed words must not start a round");
            return;
        }
    }
    panic!("fetch answer never arrived");
}
