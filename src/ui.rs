use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::stage::MAX_WRONG_GUESSES;
use crate::{App, AppState, Difficulty};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Seven rows of scaffold for a given miss count. Row contents follow the
/// reveal order: head, torso, right arm, left arm, right leg, left leg.
fn gallows_art(wrong_guesses: usize) -> [&'static str; 7] {
    let head = if wrong_guesses >= 1 {
        "  O   |"
    } else {
        "      |"
    };
    let arms = match wrong_guesses {
        0 | 1 => "      |",
        2 => "  |   |",
        3 => r"  |\  |",
        _ => r" /|\  |",
    };
    let legs = match wrong_guesses {
        0..=4 => "      |",
        5 => r"   \  |",
        _ => r" / \  |",
    };
    ["  +---+", "  |   |", head, arms, legs, "      |", "========="]
}

/// Drops leading characters until the string fits the given display width.
/// The tail is kept since the cursor sits at the end of the entry.
fn fit_tail(mut s: &str, max_width: usize) -> &str {
    while s.width() > max_width {
        let mut chars = s.chars();
        chars.next();
        s = chars.as_str();
    }
    s
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        match self.state {
            AppState::SelectDifficulty => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Length(area.height.saturating_sub(8) / 2),
                        Constraint::Length(1), // title
                        Constraint::Length(1),
                        Constraint::Length(1), // difficulty row
                        Constraint::Length(1),
                        Constraint::Length(1), // status
                        Constraint::Min(1),
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                let title = Paragraph::new(Span::styled("gallows", bold_style))
                    .alignment(Alignment::Center);
                title.render(chunks[1], buf);

                let mut spans: Vec<Span> = Vec::new();
                for (idx, d) in Difficulty::ALL.iter().enumerate() {
                    if idx > 0 {
                        spans.push(Span::raw("   "));
                    }
                    let style = if *d == self.difficulty {
                        green_bold_style
                    } else {
                        dim_bold_style
                    };
                    spans.push(Span::styled(d.selector(), style));
                }
                let picker = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
                picker.render(chunks[3], buf);

                if let Some(status) = &self.status {
                    let status = Paragraph::new(Span::styled(status.as_str(), red_bold_style))
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true });
                    status.render(chunks[5], buf);
                }

                let legend = Paragraph::new(Span::styled(
                    "(e)asy / (m)edium / (h)ard / (enter) start / (esc)ape",
                    italic_style,
                ));
                legend.render(chunks[7], buf);
            }
            AppState::Fetching => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Length(area.height.saturating_sub(4) / 2),
                        Constraint::Length(1), // message
                        Constraint::Min(1),
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
                let message = Paragraph::new(Span::styled(
                    format!("fetching {} word {}", self.difficulty.selector(), spinner),
                    dim_bold_style,
                ))
                .alignment(Alignment::Center);
                message.render(chunks[1], buf);

                let legend = Paragraph::new(Span::styled("(esc) cancel", italic_style));
                legend.render(chunks[3], buf);
            }
            AppState::Playing => {
                if let Some(round) = &self.round {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .horizontal_margin(HORIZONTAL_MARGIN)
                        .constraints([
                            Constraint::Length(area.height.saturating_sub(13) / 2),
                            Constraint::Length(7), // scaffold
                            Constraint::Length(1),
                            Constraint::Length(1), // mask
                            Constraint::Length(1), // guessed letters
                            Constraint::Length(1), // misses
                            Constraint::Length(1),
                            Constraint::Length(1), // entry
                            Constraint::Length(1), // status
                            Constraint::Min(0),
                        ])
                        .split(area);

                    let art: Vec<Line> = gallows_art(round.wrong_guesses())
                        .iter()
                        .map(|row| Line::from(Span::styled(*row, bold_style)))
                        .collect();
                    Paragraph::new(art)
                        .alignment(Alignment::Center)
                        .render(chunks[1], buf);

                    let mut mask_spans: Vec<Span> = Vec::new();
                    for (idx, slot) in round.masked().into_iter().enumerate() {
                        if idx > 0 {
                            mask_spans.push(Span::raw(" "));
                        }
                        match slot {
                            Some(c) => {
                                mask_spans.push(Span::styled(c.to_string(), green_bold_style))
                            }
                            None => mask_spans.push(Span::styled("-", dim_bold_style)),
                        }
                    }
                    Paragraph::new(Line::from(mask_spans))
                        .alignment(Alignment::Center)
                        .render(chunks[3], buf);

                    if !round.guessed_letters().is_empty() {
                        let guessed = Paragraph::new(Span::styled(
                            format!("guessed: {}", round.guesses_text()),
                            italic_style,
                        ))
                        .alignment(Alignment::Center);
                        guessed.render(chunks[4], buf);
                    }

                    let misses = Paragraph::new(Span::styled(
                        format!(
                            "misses: {} of {}",
                            round.wrong_guesses(),
                            MAX_WRONG_GUESSES
                        ),
                        dim_bold_style,
                    ))
                    .alignment(Alignment::Center);
                    misses.render(chunks[5], buf);

                    let reserved = (HORIZONTAL_MARGIN as usize) * 2 + 8;
                    let shown =
                        fit_tail(&self.entry, (area.width as usize).saturating_sub(reserved));
                    let entry = Paragraph::new(Line::from(vec![
                        Span::styled("guess: ", dim_bold_style),
                        Span::styled(shown, bold_style),
                        Span::styled("_", underlined_dim_bold_style),
                    ]))
                    .alignment(Alignment::Center);
                    entry.render(chunks[7], buf);

                    if let Some(status) = &self.status {
                        let status = Paragraph::new(Span::styled(status.as_str(), red_bold_style))
                            .alignment(Alignment::Center)
                            .wrap(Wrap { trim: true });
                        status.render(chunks[8], buf);
                    }
                }
            }
            AppState::RoundOver => {
                if let Some(round) = &self.round {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .horizontal_margin(HORIZONTAL_MARGIN)
                        .vertical_margin(VERTICAL_MARGIN)
                        .constraints([
                            Constraint::Length(area.height.saturating_sub(12) / 2),
                            Constraint::Length(7), // scaffold
                            Constraint::Length(1),
                            Constraint::Length(1), // banner
                            Constraint::Length(1), // word
                            Constraint::Min(1),
                            Constraint::Length(1), // legend
                        ])
                        .split(area);

                    let art: Vec<Line> = gallows_art(round.wrong_guesses())
                        .iter()
                        .map(|row| Line::from(Span::styled(*row, bold_style)))
                        .collect();
                    Paragraph::new(art)
                        .alignment(Alignment::Center)
                        .render(chunks[1], buf);

                    let (did_win, word) = match &self.sink.outcome {
                        Some((did_win, word)) => (*did_win, word.as_str()),
                        None => (round.did_win(), round.secret_word()),
                    };

                    let banner = if did_win {
                        Paragraph::new(Span::styled("you won!", green_bold_style))
                    } else {
                        Paragraph::new(Span::styled("you lost", red_bold_style))
                    }
                    .alignment(Alignment::Center);
                    banner.render(chunks[3], buf);

                    let word_line = if did_win {
                        format!(
                            "{} solved in {} guesses",
                            word,
                            round.guessed_letters().len()
                        )
                    } else {
                        format!("the word was {word}")
                    };
                    Paragraph::new(Span::styled(word_line, bold_style))
                        .alignment(Alignment::Center)
                        .render(chunks[4], buf);

                    let legend = Paragraph::new(Span::styled(
                        "(r)etry / (n)ew difficulty / (esc)ape",
                        italic_style,
                    ));
                    legend.render(chunks[6], buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfigStore;
    use crate::round::Round;
    use crate::sink::NullSink;
    use crate::words::FixedSource;
    use ratatui::{buffer::Buffer, layout::Rect};
    use std::sync::{mpsc, Arc};

    fn create_test_app() -> App {
        let (tx, _rx) = mpsc::channel();
        App::new(
            Difficulty::Easy,
            None,
            Arc::new(FixedSource::new("book")),
            Box::new(FileConfigStore::with_path(
                std::env::temp_dir().join("gallows-ui-test-config.json"),
            )),
            tx,
        )
    }

    fn rendered_symbols(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_gallows_art_progression() {
        assert!(!gallows_art(0).iter().any(|row| row.contains('O')));
        assert!(gallows_art(1)[2].contains('O'));
        assert_eq!(gallows_art(2)[3], "  |   |");
        // right arm comes in before left
        assert_eq!(gallows_art(3)[3], r"  |\  |");
        assert_eq!(gallows_art(4)[3], r" /|\  |");
        // same for the legs
        assert_eq!(gallows_art(5)[4], r"   \  |");
        assert_eq!(gallows_art(6)[4], r" / \  |");
    }

    #[test]
    fn test_gallows_art_always_seven_rows() {
        for wrong in 0..=6 {
            assert_eq!(gallows_art(wrong).len(), 7);
        }
    }

    #[test]
    fn test_fit_tail_keeps_short_strings() {
        assert_eq!(fit_tail("abc", 10), "abc");
        assert_eq!(fit_tail("", 0), "");
    }

    #[test]
    fn test_fit_tail_drops_leading_chars() {
        assert_eq!(fit_tail("abcdef", 3), "def");
        assert_eq!(fit_tail("abcdef", 0), "");
    }

    #[test]
    fn test_fit_tail_counts_display_width() {
        // wide characters take two cells each
        assert_eq!(fit_tail("ねこ", 2), "こ");
        assert_eq!(fit_tail("ねこ", 4), "ねこ");
    }

    #[test]
    fn test_select_screen_lists_difficulties() {
        let app = create_test_app();
        let rendered = rendered_symbols(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("gallows"));
        assert!(rendered.contains("easy"));
        assert!(rendered.contains("medium"));
        assert!(rendered.contains("hard"));
        assert!(rendered.contains("(enter) start"));
    }

    #[test]
    fn test_select_screen_shows_status() {
        let mut app = create_test_app();
        app.status = Some("could not start a round".into());
        let rendered = rendered_symbols(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("could not start a round"));
    }

    #[test]
    fn test_fetching_screen_names_difficulty() {
        let mut app = create_test_app();
        app.state = AppState::Fetching;
        app.difficulty = Difficulty::Hard;
        let rendered = rendered_symbols(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("fetching hard word"));
        assert!(rendered.contains("(esc) cancel"));
    }

    #[test]
    fn test_playing_screen_shows_mask_and_entry() {
        let mut app = create_test_app();
        app.round = Some(Round::with_word("book", &mut NullSink).unwrap());
        app.state = AppState::Playing;
        let rendered = rendered_symbols(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("- - - -"));
        assert!(rendered.contains("guess:"));
        assert!(rendered.contains("misses: 0 of 6"));
    }

    #[test]
    fn test_playing_screen_reveals_guessed_letters() {
        let mut app = create_test_app();
        let mut round = Round::with_word("book", &mut NullSink).unwrap();
        round.guess("b", &mut NullSink).unwrap();
        round.guess("x", &mut NullSink).unwrap();
        app.round = Some(round);
        app.state = AppState::Playing;
        let rendered = rendered_symbols(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("b - - -"));
        assert!(rendered.contains("guessed: b, x"));
        assert!(rendered.contains("misses: 1 of 6"));
        assert!(rendered.contains('O'), "one miss hangs the head");
    }

    #[test]
    fn test_round_over_screen_reports_loss() {
        let mut app = create_test_app();
        let mut round = Round::with_word("cat", &mut NullSink).unwrap();
        for letter in ["x", "y", "z", "q", "w", "v"] {
            round.guess(letter, &mut app.sink).unwrap();
        }
        app.round = Some(round);
        app.state = AppState::RoundOver;
        let rendered = rendered_symbols(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("you lost"));
        assert!(rendered.contains("the word was cat"));
        assert!(rendered.contains("(r)etry"));
    }

    #[test]
    fn test_round_over_screen_reports_win() {
        let mut app = create_test_app();
        let mut round = Round::with_word("cat", &mut NullSink).unwrap();
        for letter in ["c", "a", "t"] {
            round.guess(letter, &mut app.sink).unwrap();
        }
        app.round = Some(round);
        app.state = AppState::RoundOver;
        let rendered = rendered_symbols(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("you won!"));
        assert!(rendered.contains("cat solved in 3 guesses"));
    }

    #[test]
    fn test_widget_handles_extreme_sizes() {
        let mut app = create_test_app();
        app.round = Some(Round::with_word("book", &mut NullSink).unwrap());
        app.state = AppState::Playing;

        for area in [
            Rect::new(0, 0, 10, 3),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 20, 50),
            Rect::new(0, 0, 1000, 1000),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }

    #[test]
    fn test_ui_constants() {
        assert_eq!(HORIZONTAL_MARGIN, 5);
        assert_eq!(VERTICAL_MARGIN, 2);
    }
}
