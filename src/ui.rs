use chrono::{DateTime, Local};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::challenge::{Challenge, ChallengeMode, Direction};
use crate::error::DrillError;
use crate::report::{Report, Tier};
use crate::session::{AnswerRecord, Presenter, Session};
use crate::stats::Verdict;

const RULE: &str = "═══════════════════════════════════════════";
const THIN_RULE: &str = "-------------------";

/// Every screen the drill can show
pub enum View<'a> {
    Welcome {
        mode: ChallengeMode,
    },
    DigitPrompt,
    Instructions {
        mode: ChallengeMode,
        required_digit: Option<u8>,
    },
    Challenge {
        session: &'a Session,
        /// the answer just given, shown until the next challenge appears
        feedback: Option<&'a AnswerRecord>,
        now: DateTime<Local>,
    },
    Results {
        report: &'a Report,
    },
}

pub fn title(mode: ChallengeMode) -> &'static str {
    match mode {
        ChallengeMode::NumberOnly => "NUMBER STORM",
        ChallengeMode::NumberWithDirection => "NVIM NUMBER JUMP",
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

fn tier_style(tier: Tier, poor: Color) -> Style {
    let color = match tier {
        Tier::Good => Color::Green,
        Tier::Fair => Color::Yellow,
        Tier::Poor => poor,
    };
    bold().fg(color)
}

fn header(text: &str, color: Color) -> Vec<Line<'static>> {
    vec![
        Line::styled(RULE, fg(Color::Cyan)),
        Line::styled(text.to_string(), bold().fg(color)),
        Line::styled(RULE, fg(Color::Cyan)),
        Line::default(),
    ]
}

fn numbered(n: usize, text: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = vec![Span::styled(format!("{}. ", n), dim())];
    spans.extend(text);
    Line::from(spans)
}

fn welcome_lines(mode: ChallengeMode) -> Vec<Line<'static>> {
    let mut lines = header(&format!("WELCOME TO {}", title(mode)), Color::Yellow);
    let steps: Vec<Vec<Span<'static>>> = match mode {
        ChallengeMode::NumberOnly => vec![
            vec![Span::raw("One number appears at a time")],
            vec![Span::raw("Type it using your number row")],
            vec![Span::raw("Press Enter to submit")],
            vec![
                Span::raw("Complete all "),
                Span::styled("10 numbers", fg(Color::Yellow)),
                Span::raw(" as fast as you can!"),
            ],
        ],
        ChallengeMode::NumberWithDirection => vec![
            vec![
                Span::raw("See a number and direction ("),
                Span::styled("↓", fg(Color::Green)),
                Span::raw(" or "),
                Span::styled("↑", fg(Color::Magenta)),
                Span::raw(")"),
            ],
            vec![
                Span::raw("Type number + "),
                Span::styled("j", fg(Color::Green)),
                Span::raw(" (down) or "),
                Span::styled("k", fg(Color::Magenta)),
                Span::raw(" (up)"),
            ],
            vec![Span::raw("Pressing j/k submits automatically!")],
            vec![
                Span::raw("Complete all "),
                Span::styled("10 jumps", fg(Color::Yellow)),
                Span::raw(" as fast as you can!"),
            ],
        ],
    };

    let n = steps.len();
    lines.push(Line::from("How to play:"));
    for (i, step) in steps.into_iter().enumerate() {
        lines.push(numbered(i + 1, step));
    }
    lines.push(numbered(
        n + 1,
        vec![
            Span::styled("Mistakes are OK", fg(Color::Green)),
            Span::raw(" - keep going for your score!"),
        ],
    ));
    lines.push(numbered(
        n + 2,
        vec![
            Span::raw("Type "),
            Span::styled("'q'", fg(Color::Yellow)),
            Span::raw(" to quit"),
        ],
    ));
    lines.push(Line::default());
    lines.push(Line::styled("Press any key to continue...", dim()));
    lines
}

fn digit_prompt_lines() -> Vec<Line<'static>> {
    let mut lines = header(title(ChallengeMode::NumberWithDirection), Color::Yellow);
    lines.push(Line::from("Practice vim-style line jumps!"));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::raw("Enter a digit "),
        Span::styled("(0-9)", fg(Color::Yellow)),
        Span::raw(" to practice numbers containing that digit,"),
    ]));
    lines.push(Line::from(vec![
        Span::raw("or press "),
        Span::styled("ENTER", fg(Color::Yellow)),
        Span::raw(" for all numbers."),
    ]));
    lines.push(Line::default());
    lines.push(Line::styled("Base digit: ", fg(Color::Cyan)));
    lines
}

fn instruction_lines(mode: ChallengeMode, required_digit: Option<u8>) -> Vec<Line<'static>> {
    let mut lines = header(title(mode), Color::Yellow);
    match mode {
        ChallengeMode::NumberOnly => {
            lines.push(Line::from("You'll type 10 numbers, one at a time."));
            lines.push(Line::from("Each number will appear on screen."));
            lines.push(Line::from(vec![
                Span::raw("Type them as "),
                Span::styled("fast", fg(Color::Yellow)),
                Span::raw(" as you can!"),
            ]));
            lines.push(Line::from(vec![
                Span::raw("Score is tracked - "),
                Span::styled("no penalty for mistakes!", fg(Color::Green)),
            ]));
        }
        ChallengeMode::NumberWithDirection => {
            let practicing = match required_digit {
                Some(d) => vec![
                    Span::raw("Practicing numbers containing: "),
                    Span::styled(d.to_string(), bold().fg(Color::Yellow)),
                ],
                None => vec![
                    Span::raw("Practicing: "),
                    Span::styled("all numbers", bold().fg(Color::Yellow)),
                ],
            };
            lines.push(Line::from(practicing));
            lines.push(Line::default());
            lines.push(Line::from("You'll see a number and direction arrow."));
            lines.push(Line::from(vec![
                Span::raw("Type the number + "),
                Span::styled("j", fg(Color::Green)),
                Span::raw(" (down) or "),
                Span::styled("k", fg(Color::Green)),
                Span::raw(" (up)."),
            ]));
            lines.push(Line::from(vec![
                Span::raw("Example: "),
                Span::styled("15j", fg(Color::Yellow)),
                Span::raw(" or "),
                Span::styled("8k", fg(Color::Yellow)),
            ]));
        }
    }
    lines.push(Line::default());
    lines.push(Line::styled("Press any key when you're ready to start...", dim()));
    lines
}

/// The boxed prompt, e.g. `║  15 ↓  ║`
fn challenge_box(challenge: &Challenge) -> Vec<Line<'static>> {
    let mut content = vec![Span::styled(
        format!("{:>3}", challenge.value),
        bold().fg(Color::Yellow),
    )];
    if let Some(direction) = challenge.direction {
        let color = match direction {
            Direction::Down => Color::Green,
            Direction::Up => Color::Magenta,
        };
        content.push(Span::raw("  "));
        content.push(Span::styled(direction.arrow().to_string(), bold().fg(color)));
    }

    let inner_width: usize = content.iter().map(|s| s.content.width()).sum::<usize>() + 8;
    let edge = bold().fg(Color::Blue);

    let mut middle = vec![Span::styled("║", edge), Span::raw("    ")];
    middle.extend(content);
    middle.push(Span::raw("    "));
    middle.push(Span::styled("║", edge));

    vec![
        Line::styled(format!("╔{}╗", "═".repeat(inner_width)), edge),
        Line::from(middle),
        Line::styled(format!("╚{}╝", "═".repeat(inner_width)), edge),
    ]
}

fn feedback_spans(record: &AnswerRecord) -> Vec<Span<'static>> {
    match record.verdict() {
        Verdict::Correct => vec![Span::styled("✓", bold().fg(Color::Green))],
        Verdict::WrongDirection => vec![Span::styled("✗ wrong direction", bold().fg(Color::Yellow))],
        Verdict::WrongNumber => vec![Span::styled("✗ wrong number", bold().fg(Color::Yellow))],
        Verdict::Wrong => vec![Span::styled("✗", bold().fg(Color::Red))],
    }
}

fn challenge_lines(
    session: &Session,
    feedback: Option<&AnswerRecord>,
    now: DateTime<Local>,
) -> Vec<Line<'static>> {
    let mode = session.mode();
    let total = session.challenges().len();
    let (challenge, typed, position) = match feedback {
        Some(record) => (Some(record.expected), record.typed.clone(), session.records().len()),
        None => (
            session.current_challenge().copied(),
            session.buffer().to_string(),
            session.current_index() + 1,
        ),
    };

    let mut lines = header(title(mode), Color::Yellow);
    lines.push(Line::from(match mode {
        ChallengeMode::NumberOnly => "Type this number:",
        ChallengeMode::NumberWithDirection => "Type the jump command:",
    }));
    lines.push(Line::default());
    if let Some(challenge) = challenge {
        lines.extend(challenge_box(&challenge));
    }
    lines.push(Line::default());
    lines.push(Line::styled(THIN_RULE, dim()));
    lines.push(Line::from(vec![
        Span::styled("Progress: ", fg(Color::Cyan)),
        Span::styled(format!("{}/{}", position.min(total), total), bold()),
    ]));
    let mut time = vec![
        Span::styled("Time: ", fg(Color::Cyan)),
        Span::styled(format!("{:.1}s", session.elapsed_secs(now)), bold()),
    ];
    if feedback.is_none() && session.current_challenge().is_some() {
        time.push(Span::styled(
            format!("  (this one {:.1}s)", session.challenge_secs(now)),
            dim(),
        ));
    }
    lines.push(Line::from(time));
    lines.push(Line::default());

    let mut answer = vec![Span::raw("Your answer: "), Span::styled(typed, bold())];
    if let Some(record) = feedback {
        answer.push(Span::raw("  "));
        answer.extend(feedback_spans(record));
    }
    lines.push(Line::from(answer));
    lines.push(Line::default());
    lines.push(Line::styled("Press 'q' to quit", dim()));
    lines
}

fn breakdown_line(n: usize, record: &AnswerRecord, mode: ChallengeMode) -> Line<'static> {
    let expected = record.expected.to_string();
    let mut spans = vec![Span::raw(format!("{} → ", expected))];

    if record.correct {
        spans.push(Span::raw(record.typed.clone()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled("✓", fg(Color::Green)));
        return numbered(n, spans);
    }

    let typed = if record.typed.is_empty() {
        "(empty)".to_string()
    } else {
        record.typed.clone()
    };
    spans.push(Span::styled(typed, fg(Color::Red)));
    spans.push(Span::raw(" "));
    spans.push(Span::styled("✗", fg(Color::Red)));

    let hint = match (mode, record.verdict()) {
        (ChallengeMode::NumberOnly, _) => Some(format!("(expected {})", expected)),
        (_, Verdict::WrongDirection) => Some("(wrong direction)".to_string()),
        (_, Verdict::WrongNumber) => Some("(wrong number)".to_string()),
        _ => None,
    };
    if let Some(hint) = hint {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(hint, dim()));
    }
    numbered(n, spans)
}

fn results_lines(report: &Report) -> Vec<Line<'static>> {
    let stats = &report.stats;
    let mut lines = if stats.aborted {
        header("SESSION ENDED", Color::Yellow)
    } else {
        header("GAME COMPLETE!", Color::Green)
    };

    lines.push(Line::from(vec![
        Span::raw("📊 "),
        Span::styled("Score: ", fg(Color::Cyan)),
        Span::styled(
            format!("{}/{}", stats.correct_count, stats.out_of()),
            tier_style(report.score_tier(), Color::Red),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::raw("🎯 "),
        Span::styled("Accuracy: ", fg(Color::Cyan)),
        Span::styled(
            format!("{:.1}%", stats.accuracy()),
            tier_style(report.accuracy_tier(), Color::Red),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::raw("⏱️  "),
        Span::styled("Time: ", fg(Color::Cyan)),
        Span::styled(
            format!("{:.2} seconds", stats.elapsed_secs()),
            tier_style(report.time_tier(), Color::White),
        ),
    ]));
    lines.push(Line::default());

    lines.push(Line::from("Results breakdown:"));
    lines.push(Line::styled(THIN_RULE, dim()));
    for (i, record) in report.records.iter().enumerate() {
        lines.push(breakdown_line(i + 1, record, report.mode));
    }
    lines.push(Line::styled(THIN_RULE, dim()));
    lines.push(Line::styled(report.rating().message(), bold()));
    lines.push(Line::default());
    lines
}

fn play_again_line() -> Line<'static> {
    Line::styled("Play again? (y/n): ", fg(Color::Cyan))
}

impl Widget for View<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let footer = match self {
            View::Results { .. } => Some(play_again_line()),
            _ => None,
        };
        let mut lines = match self {
            View::Welcome { mode } => welcome_lines(mode),
            View::DigitPrompt => digit_prompt_lines(),
            View::Instructions {
                mode,
                required_digit,
            } => instruction_lines(mode, required_digit),
            View::Challenge {
                session,
                feedback,
                now,
            } => challenge_lines(session, feedback, now),
            View::Results { report } => results_lines(report),
        };

        if let Some(footer) = footer {
            if lines.len() as u16 >= area.height {
                // too tall: the prompt keeps the bottom row, the body is clipped above it
                let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(chunks[0], buf);
                Paragraph::new(footer)
                    .alignment(Alignment::Center)
                    .render(chunks[1], buf);
                return;
            }
            lines.push(footer);
        }

        // vertically centred; overflow is clipped at the bottom
        let top = area.height.saturating_sub(lines.len() as u16) / 2;
        let body = Rect {
            y: area.y + top,
            height: area.height - top,
            ..area
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(body, buf);
    }
}

/// Draws views onto a ratatui terminal
pub struct TerminalPresenter<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalPresenter<B> {
    pub fn new(backend: B) -> Result<Self, DrillError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
        })
    }

    pub fn draw(&mut self, view: View<'_>) -> Result<(), DrillError> {
        self.terminal.draw(|f| f.render_widget(view, f.area()))?;
        Ok(())
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Presenter for TerminalPresenter<B> {
    fn show_challenge(&mut self, session: &Session) -> Result<(), DrillError> {
        self.draw(View::Challenge {
            session,
            feedback: None,
            now: Local::now(),
        })
    }

    fn show_feedback(&mut self, session: &Session, record: &AnswerRecord) -> Result<(), DrillError> {
        self.draw(View::Challenge {
            session,
            feedback: Some(record),
            now: Local::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Keystroke;
    use crate::session::SessionConfig;
    use ratatui::backend::TestBackend;

    fn screen_text(presenter: &TerminalPresenter<TestBackend>) -> String {
        let buffer = presenter.terminal().backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn presenter() -> TerminalPresenter<TestBackend> {
        TerminalPresenter::new(TestBackend::new(80, 40)).unwrap()
    }

    fn jump_session() -> Session {
        let mut session = Session::new(
            SessionConfig::new(ChallengeMode::NumberWithDirection, None),
            vec![Challenge::jump(15, Direction::Down), Challenge::jump(8, Direction::Up)],
        );
        session.start(Local::now());
        session
    }

    #[test]
    fn challenge_screen_shows_prompt_progress_and_buffer() {
        let mut session = jump_session();
        session.handle_key(Keystroke::Char('1'), Local::now());

        let mut p = presenter();
        p.show_challenge(&session).unwrap();
        let text = screen_text(&p);

        assert!(text.contains("NVIM NUMBER JUMP"));
        assert!(text.contains(" 15"));
        assert!(text.contains("↓"));
        assert!(text.contains("Progress: 1/2"));
        assert!(text.contains("Your answer: 1"));
    }

    #[test]
    fn challenge_screen_shows_time_on_current_challenge() {
        let start = Local::now();
        let mut session = Session::new(
            SessionConfig::new(ChallengeMode::NumberOnly, None),
            vec![Challenge::number(7), Challenge::number(88)],
        );
        session.start(start);
        let answered = start + chrono::Duration::seconds(4);
        session.handle_key(Keystroke::Char('7'), answered);
        session.handle_key(Keystroke::Enter, answered);

        let mut p = presenter();
        p.draw(View::Challenge {
            session: &session,
            feedback: None,
            now: answered + chrono::Duration::milliseconds(1500),
        })
        .unwrap();
        let text = screen_text(&p);

        assert!(text.contains("Time: 5.5s"));
        assert!(text.contains("(this one 1.5s)"));
        assert!(text.contains("Progress: 2/2"));
    }

    #[test]
    fn feedback_screen_shows_partial_verdict() {
        let mut session = jump_session();
        let now = Local::now();
        session.handle_key(Keystroke::Char('1'), now);
        session.handle_key(Keystroke::Char('5'), now);
        session.handle_key(Keystroke::Char('k'), now);
        let record = session.records()[0].clone();

        let mut p = presenter();
        p.show_feedback(&session, &record).unwrap();
        let text = screen_text(&p);

        assert!(text.contains("Your answer: 15k"));
        assert!(text.contains("wrong direction"));
        assert!(text.contains("Progress: 1/2"));
    }

    #[test]
    fn results_screen_lists_breakdown() {
        let now = Local::now();
        let mut session = Session::new(
            SessionConfig::new(ChallengeMode::NumberOnly, None),
            vec![Challenge::number(7), Challenge::number(88)],
        );
        session.start(now);
        for c in "7\r80\r".chars() {
            session.handle_key(Keystroke::from(c), now);
        }
        let report = Report::from_session(&session).unwrap();

        let mut p = presenter();
        p.draw(View::Results { report: &report }).unwrap();
        let text = screen_text(&p);

        assert!(text.contains("GAME COMPLETE!"));
        assert!(text.contains("Score: 1/2"));
        assert!(text.contains("Accuracy: 50.0%"));
        assert!(text.contains("(expected 88)"));
        assert!(text.contains("Keep practicing to improve!"));
        assert!(text.contains("Play again? (y/n)"));
    }

    #[test]
    fn play_again_stays_visible_on_short_terminal() {
        let now = Local::now();
        let challenges: Vec<Challenge> = (1..=10).map(|v| Challenge::jump(v, Direction::Down)).collect();
        let mut session = Session::new(SessionConfig::new(ChallengeMode::NumberWithDirection, None), challenges);
        session.start(now);
        for v in 1..=10 {
            for c in format!("{}j", v).chars() {
                session.handle_key(Keystroke::from(c), now);
            }
        }
        let report = Report::from_session(&session).unwrap();

        let mut p = TerminalPresenter::new(TestBackend::new(80, 20)).unwrap();
        p.draw(View::Results { report: &report }).unwrap();
        let text = screen_text(&p);

        let last_row = text.lines().last().unwrap_or_default();
        assert!(last_row.contains("Play again? (y/n)"));
        assert!(text.contains("GAME COMPLETE!"));
    }

    #[test]
    fn quit_results_score_out_of_planned() {
        let now = Local::now();
        let mut session = Session::new(
            SessionConfig::new(ChallengeMode::NumberOnly, None),
            (1..=10).map(Challenge::number).collect(),
        );
        session.start(now);
        for c in "1\rq".chars() {
            session.handle_key(Keystroke::from(c), now);
        }
        let report = Report::from_session(&session).unwrap();

        let mut p = presenter();
        p.draw(View::Results { report: &report }).unwrap();
        let text = screen_text(&p);

        assert!(text.contains("SESSION ENDED"));
        assert!(text.contains("Score: 1/10"));
        assert!(text.contains("Accuracy: 10.0%"));
        assert!(!text.contains("Perfect score"));
    }

    #[test]
    fn instructions_show_digit_filter() {
        let mut p = presenter();
        p.draw(View::Instructions {
            mode: ChallengeMode::NumberWithDirection,
            required_digit: Some(7),
        })
        .unwrap();
        assert!(screen_text(&p).contains("Practicing numbers containing: 7"));

        p.draw(View::Instructions {
            mode: ChallengeMode::NumberWithDirection,
            required_digit: None,
        })
        .unwrap();
        assert!(screen_text(&p).contains("Practicing: all numbers"));
    }

    #[test]
    fn welcome_and_digit_prompt_render() {
        let mut p = presenter();
        p.draw(View::Welcome {
            mode: ChallengeMode::NumberOnly,
        })
        .unwrap();
        assert!(screen_text(&p).contains("WELCOME TO NUMBER STORM"));

        p.draw(View::DigitPrompt).unwrap();
        assert!(screen_text(&p).contains("Base digit:"));
    }
}
