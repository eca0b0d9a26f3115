use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
};

use crate::{
    app::{App, CustomForm, MenuItem, Play, Screen, SettingsItem},
    command,
    config::{Difficulty, GameConfig},
    game::{Game, GameStatus},
    tiles::{Pos, TileContent, TileMode},
};

const DIGITS: [&str; 9] = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];

pub fn draw(frame: &mut Frame, app: &App) {
    match &app.screen {
        Screen::Menu { selected } => menu(frame, app, *selected),
        Screen::Settings { selected, form } => settings(frame, app, *selected, form.as_ref()),
        Screen::Playing(play) => game(frame, play),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

fn selectable(text: String, selected: bool) -> Line<'static> {
    if selected {
        Line::from(format!("> {text}")).reversed()
    } else {
        Line::from(format!("  {text}"))
    }
}

fn describe(config: &GameConfig) -> String {
    let name = Difficulty::of(config).map_or("Custom", Difficulty::name);
    format!(
        "{name} {}x{} ({} mines)",
        config.rows, config.cols, config.mines
    )
}

fn framed(frame: &mut Frame, title: &str, lines: Vec<Line<'static>>) {
    let height = lines.len() as u16 + 2;
    let area = centered(frame.area(), 48, height);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(format!(" {title} "))),
        area,
    );
}

fn notice_line(app: &App) -> Option<Line<'static>> {
    app.notice
        .as_ref()
        .map(|notice| Line::from(notice.clone()).red())
}

fn menu(frame: &mut Frame, app: &App, selected: usize) {
    let mut lines = vec![
        Line::from("M I N E F I E L D").bold().centered(),
        Line::default(),
    ];
    for (index, item) in MenuItem::ALL.iter().enumerate() {
        lines.push(selectable(item.label().to_string(), index == selected));
    }
    lines.push(Line::default());
    lines.push(Line::from(describe(&app.config)).dim());
    lines.extend(notice_line(app));
    framed(frame, "Minefield", lines);
}

fn settings(frame: &mut Frame, app: &App, selected: usize, form: Option<&CustomForm>) {
    let active = Difficulty::of(&app.config);
    let mut lines = vec![Line::from("Difficulty").bold(), Line::default()];
    for (index, item) in SettingsItem::ALL.iter().enumerate() {
        let (text, is_active) = match item {
            SettingsItem::Preset(difficulty) => {
                let preset = difficulty.config();
                (
                    format!(
                        "{:<13} {:>5}  ({} mines)",
                        difficulty.name(),
                        format!("{}x{}", preset.rows, preset.cols),
                        preset.mines
                    ),
                    active == Some(*difficulty),
                )
            }
            SettingsItem::Custom if active.is_none() => (
                format!(
                    "{:<13} {:>5}  ({} mines)",
                    "Custom",
                    format!("{}x{}", app.config.rows, app.config.cols),
                    app.config.mines
                ),
                true,
            ),
            SettingsItem::Custom => (format!("{:<13} {:>5}  (?? mines)", "Custom", "??x??"), false),
            SettingsItem::Back => ("Back".to_string(), false),
        };
        let marked = if is_active {
            format!("{text} *")
        } else {
            text
        };
        lines.push(selectable(marked, index == selected && form.is_none()));
    }

    if let Some(form) = form {
        lines.push(Line::default());
        for (index, (label, value)) in CustomForm::LABELS.iter().zip(&form.fields).enumerate() {
            let line = Line::from(format!("  {label:>5}: {value:_<3}"));
            lines.push(if index == form.focus {
                line.reversed()
            } else {
                line
            });
        }
        lines.push(Line::from("  Tab next field, Enter apply, Esc cancel").dim());
    }
    lines.extend(notice_line(app));
    framed(frame, "Settings", lines);
}

fn count_color(count: u8) -> Color {
    match count {
        1 => Color::LightBlue,
        2 | 7 => Color::Green,
        3 => Color::Red,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        _ => Color::DarkGray,
    }
}

/// Glyph and colour for one cell, two columns wide.
pub fn tile_span(game: &Game, pos: Pos) -> Span<'static> {
    let (glyph, style) = match game.tile_at(pos) {
        TileMode::Covered => ("-", Style::new().fg(Color::DarkGray)),
        TileMode::Flagged => match game.answer_at(pos) {
            Some(TileContent::Mine) | None => ("<", Style::new().fg(Color::Yellow)),
            // flagged something harmless
            Some(_) => ("!", Style::new().fg(Color::Red).add_modifier(Modifier::BOLD)),
        },
        TileMode::Revealed(TileContent::Mine) if game.detonated() == Some(pos) => {
            ("X", Style::new().fg(Color::Black).bg(Color::Red))
        }
        TileMode::Revealed(TileContent::Mine) => ("X", Style::new().fg(Color::LightYellow)),
        TileMode::Revealed(TileContent::Blank) => (".", Style::new()),
        TileMode::Revealed(TileContent::Count(count)) => (
            DIGITS[usize::from(count)],
            Style::new().fg(count_color(count)),
        ),
    };
    Span::styled(format!("{glyph} "), style)
}

fn label(n: usize) -> char {
    command::encode(n).unwrap_or(' ')
}

fn board(play: &Play) -> Text<'static> {
    let game = &play.game;
    let (rows, cols) = game.size();
    let show_cursor = !game.status().is_finished();

    let mut header = vec![Span::raw("   ")];
    header.extend((0..cols).map(|col| Span::raw(format!("{} ", label(col)))));
    let mut lines = vec![
        Line::from(header),
        Line::from(format!("   {}", "_".repeat(cols * 2 - 1))),
    ];
    for row in 0..rows {
        let mut spans = vec![Span::raw(format!("{} |", label(row)))];
        for col in 0..cols {
            let span = tile_span(game, (row, col));
            spans.push(if show_cursor && play.cursor == (row, col) {
                span.reversed()
            } else {
                span
            });
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

fn footer(play: &Play) -> Line<'static> {
    match play.game.status() {
        GameStatus::Won => Line::from("You win! Play again? (y/n)").green().bold(),
        GameStatus::Lost => Line::from("You lose! Play again? (y/n)").red().bold(),
        _ => match (&play.prompt, &play.message) {
            (Some(prompt), _) => Line::from(format!(":{prompt}")),
            (None, Some(message)) => Line::from(message.clone()).red(),
            (None, None) => Line::from(
                "arrows/hjkl move  space dig  f flag  : command (3a, f3a, u3a, q)  esc quit",
            )
            .dim(),
        },
    }
}

fn game(frame: &mut Frame, play: &Play) {
    let [header, body, bottom] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let status = format!(
        "Mines left: {:>3}   Time: {:>4}s",
        play.game.mines_left(),
        play.game.elapsed().as_secs()
    );
    frame.render_widget(Paragraph::new(status).bold(), header);

    // keep the cursor on screen for boards larger than the terminal
    let scroll_rows = (play.cursor.0 + 3).saturating_sub(usize::from(body.height));
    let scroll_cols = (play.cursor.1 * 2 + 5).saturating_sub(usize::from(body.width));
    frame.render_widget(
        Paragraph::new(board(play)).scroll((scroll_rows as u16, scroll_cols as u16)),
        body,
    );
    frame.render_widget(Paragraph::new(footer(play)), bottom);
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::{game::Action, minefield::Minefield};

    fn corners() -> Game {
        let minefield = Minefield::from_mines((3, 3), &[(0, 0), (2, 2)]).unwrap();
        Game::from_minefield(minefield, StdRng::seed_from_u64(0))
    }

    fn screen(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn glyphs_follow_visibility() {
        let mut game = corners();
        assert_eq!(tile_span(&game, (0, 0)).content, "- ");
        game.apply(Action::Flag((1, 0))).unwrap();
        assert_eq!(tile_span(&game, (1, 0)).content, "< ");
        game.apply(Action::Dig((0, 2))).unwrap();
        assert_eq!(tile_span(&game, (0, 2)).content, ". ");
        assert_eq!(tile_span(&game, (1, 1)).content, "2 ");
        assert_eq!(tile_span(&game, (1, 1)).style.fg, Some(Color::Green));
    }

    #[test]
    fn loss_marks_the_detonated_mine_and_wrong_flags() {
        let mut game = corners();
        game.apply(Action::Dig((0, 2))).unwrap();
        game.apply(Action::Flag((1, 0))).unwrap();
        game.apply(Action::Dig((2, 2))).unwrap();

        assert_eq!(tile_span(&game, (1, 0)).content, "! ");
        let detonated = tile_span(&game, (2, 2));
        assert_eq!(detonated.content, "X ");
        assert_eq!(detonated.style.bg, Some(Color::Red));
        assert_eq!(tile_span(&game, (0, 0)).style.fg, Some(Color::LightYellow));
    }

    #[test]
    fn menu_shows_current_board() {
        let app = App::new(Difficulty::Expert.config());
        let lines = screen(&app);
        assert!(lines.iter().any(|line| line.contains("1. Play")));
        assert!(lines.iter().any(|line| line.contains("Expert 30x16 (99 mines)")));
    }

    #[test]
    fn game_screen_has_labels_and_counter() {
        let mut app = App::new(GameConfig::new(12, 12, 10));
        app.on_key_event(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('1'),
            crossterm::event::KeyModifiers::NONE,
        ));
        let lines = screen(&app);
        assert!(lines[0].starts_with("Mines left:  10"));
        assert!(lines[1].starts_with("   0 1 2 3 4 5 6 7 8 9 A B"));
        assert!(lines[3].starts_with("0 |- - -"));
        assert!(lines[14].starts_with("B |"));
    }
}
