//! Rendering: ambient background plus the centred session panel.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::ambient::{Surface, BACKGROUND};
use crate::types::{SessionPhase, SessionView};

const PANEL_WIDTH: u16 = 48;

// Palette
const ACCENT: Color = Color::Rgb(102, 126, 234);
const ACCENT_SOFT: Color = Color::Rgb(118, 75, 162);
const TEXT: Color = Color::Rgb(225, 228, 245);
const DIM: Color = Color::Rgb(130, 136, 170);
const NOTICE: Color = Color::Rgb(255, 210, 110);
const PANEL_BG: Color = Color::Rgb(16, 20, 50);

const INFO_LINES: [&str; 4] = [
    "Gamma waves (30-100Hz) are linked to focus,",
    "memory and attention. This timer plays a",
    "steady 40Hz sine tone. Headphones help; keep",
    "the volume comfortable.",
];

/// Everything one frame needs, borrowed from the app.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    pub session: &'a SessionView,
    pub presets: &'a [u32],
    /// Custom duration being typed, if the prompt is open
    pub custom_input: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub quit_armed: bool,
    pub show_info: bool,
    /// Ambient surface, or `None` when the background is disabled
    pub ambient: Option<&'a Surface>,
}

/// Draws one frame.
pub fn draw(frame: &mut Frame<'_>, screen: &Screen<'_>) {
    let area = frame.size();

    frame.render_widget(AmbientLayer { surface: screen.ambient }, area);

    let lines = panel_lines(screen);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let panel = centered_rect(PANEL_WIDTH, height, area);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT).bg(PANEL_BG))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT))
                .title(Span::styled(
                    " 40Hz Gamma ",
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ))
                .title_alignment(Alignment::Center),
        );

    frame.render_widget(Clear, panel);
    frame.render_widget(paragraph, panel);
}

fn panel_lines<'a>(screen: &Screen<'a>) -> Vec<Line<'a>> {
    let session = screen.session;
    let key = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(DIM);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            session.time_display.clone(),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(session.status.clone(), Style::default().fg(ACCENT_SOFT))),
        Line::from(""),
    ];

    match session.phase {
        SessionPhase::Idle => match screen.custom_input {
            Some(input) => {
                lines.push(Line::from(vec![
                    Span::styled("Minutes: ", dim),
                    Span::styled(format!("{}_", input), key),
                ]));
                lines.push(Line::from(Span::styled("[Enter] start  [Esc] cancel", dim)));
            }
            None => {
                let mut spans = Vec::new();
                for (i, minutes) in screen.presets.iter().enumerate() {
                    spans.push(Span::styled(format!("[{}]", i + 1), key));
                    spans.push(Span::raw(format!(" {}m  ", minutes)));
                }
                spans.push(Span::styled("[c]", key));
                spans.push(Span::raw(" custom"));
                lines.push(Line::from(spans));
            }
        },
        SessionPhase::Playing | SessionPhase::Paused => {
            let toggle = if session.playing { " ⏸ pause  " } else { " ▶ resume  " };
            lines.push(Line::from(vec![
                Span::styled("[Space]", key),
                Span::raw(toggle),
                Span::styled("[Esc]", key),
                Span::raw(" ■ stop"),
            ]));
        }
        SessionPhase::Completing => {}
    }

    lines.push(Line::from(""));
    let mut volume = vec![
        Span::styled("Volume ", dim),
        Span::styled(volume_bar(session.volume_percent), Style::default().fg(ACCENT)),
        Span::raw(format!(" {}%", session.volume_percent)),
    ];
    if !session.audible {
        volume.push(Span::styled("  (no audio device)", Style::default().fg(NOTICE)));
    }
    lines.push(Line::from(volume));

    if let Some(notice) = screen.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(notice, Style::default().fg(NOTICE))));
    }

    if screen.quit_armed {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Session in progress. Press q again to quit.",
            Style::default().fg(NOTICE).add_modifier(Modifier::BOLD),
        )));
    }

    if screen.show_info {
        lines.push(Line::from(""));
        lines.extend(INFO_LINES.iter().map(|text| Line::from(Span::styled(*text, dim))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[+/-] volume  [i] info  [q] quit",
        dim,
    )));

    lines
}

/// Ten-step volume bar.
fn volume_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)).div_ceil(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Returns a `width` x `height` rect centred in `area`, clipped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Paints the ambient surface as cell background colours.
struct AmbientLayer<'a> {
    surface: Option<&'a Surface>,
}

impl Widget for AmbientLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fallback = BACKGROUND.to_u8();

        for y in 0..area.height {
            for x in 0..area.width {
                let (r, g, b) = self
                    .surface
                    .and_then(|surface| surface.get(i32::from(x), i32::from(y)))
                    .map_or(fallback, |color| color.to_u8());
                buf.get_mut(area.x + x, area.y + y)
                    .set_symbol(" ")
                    .set_bg(Color::Rgb(r, g, b));
            }
        }
    }
}
