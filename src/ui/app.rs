use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::warn;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::controller::{Action, Field, FormController, Notice, Selection, COLUMNS};
use crate::db::count_books;

use super::forms::{field_line, ConfirmDelete, LABEL_WIDTH};
use super::helpers::{centered_rect, cursor_column, notice_style};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Four input lines plus the block borders.
const FORM_HEIGHT: u16 = 6;
/// Rows skipped by PageUp / PageDown in the table.
const PAGE_STEP: isize = 5;

/// Function keys bound to the form's named actions.
pub(crate) const ACTION_KEYS: [(KeyCode, Action); 5] = [
    (KeyCode::F(1), Action::Add),
    (KeyCode::F(2), Action::Update),
    (KeyCode::F(3), Action::Delete),
    (KeyCode::F(4), Action::Search),
    (KeyCode::F(5), Action::Clear),
];

fn action_for_key(code: KeyCode) -> Option<Action> {
    ACTION_KEYS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, action)| *action)
}

/// Which half of the screen receives plain key presses.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Focus {
    Table,
    Form,
}

/// Overlays that capture input until they are closed.
enum Mode {
    Normal,
    Searching { query: String },
    ConfirmDelete(ConfirmDelete),
    Dialog(Notice),
}

/// Terminal application state: the database connection, the form controller,
/// and what is currently on screen.
pub struct App {
    conn: Connection,
    controller: FormController,
    focus: Focus,
    mode: Mode,
    status: Option<Notice>,
    total: i64,
}

impl App {
    pub fn new(conn: Connection) -> Result<Self> {
        let controller = FormController::load(&conn)?;
        let total = count_books(&conn)?;
        Ok(Self {
            conn,
            controller,
            focus: Focus::Table,
            mode: Mode::Normal,
            status: None,
            total,
        })
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching { query } => self.handle_search(code, query),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Dialog(notice) => match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
                _ => Mode::Dialog(notice),
            },
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        if let Some(action) = action_for_key(code) {
            return self.run_action(action);
        }

        match self.focus {
            Focus::Table => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    *exit = true;
                    Mode::Normal
                }
                KeyCode::Up => self.move_cursor(-1),
                KeyCode::Down => self.move_cursor(1),
                KeyCode::PageUp => self.move_cursor(-PAGE_STEP),
                KeyCode::PageDown => self.move_cursor(PAGE_STEP),
                KeyCode::Home => {
                    self.controller.table_mut().select_first();
                    Mode::Normal
                }
                KeyCode::End => {
                    self.controller.table_mut().select_last();
                    Mode::Normal
                }
                KeyCode::Enter => match self.controller.activate_selected_row() {
                    Ok(book) => {
                        self.focus = Focus::Form;
                        self.set_status(Notice::status(format!("Editing \"{}\".", book.title)));
                        Mode::Normal
                    }
                    Err(err) => {
                        warn!("row activation failed: {err}");
                        self.show(Notice::from(err))
                    }
                },
                KeyCode::Char('/') | KeyCode::Char('f') => self.run_action(Action::Search),
                KeyCode::Char('+') | KeyCode::Char('a') => {
                    let notice = self.controller.clear_form();
                    self.focus = Focus::Form;
                    self.show(notice)
                }
                KeyCode::Char('-') | KeyCode::Char('d') => self.run_action(Action::Delete),
                KeyCode::Char('c') => self.run_action(Action::Clear),
                KeyCode::Char('e') | KeyCode::Tab => {
                    self.focus = Focus::Form;
                    Mode::Normal
                }
                _ => Mode::Normal,
            },
            Focus::Form => {
                let fields = self.controller.fields_mut();
                match code {
                    KeyCode::Esc => self.focus = Focus::Table,
                    KeyCode::Tab | KeyCode::Down => fields.focus_next(),
                    KeyCode::BackTab | KeyCode::Up => fields.focus_previous(),
                    KeyCode::Backspace => fields.backspace(),
                    KeyCode::Enter => {
                        let action = match self.controller.selection() {
                            Selection::Idle => Action::Add,
                            Selection::Editing(_) => Action::Update,
                        };
                        return self.run_action(action);
                    }
                    KeyCode::Char(ch) => {
                        fields.push_char(ch);
                    }
                    _ => {}
                }
                Mode::Normal
            }
        }
    }

    /// Entry point for every named action. Search opens the search bar and
    /// Delete asks for confirmation first; the rest go straight to the
    /// controller.
    fn run_action(&mut self, action: Action) -> Mode {
        match action {
            Action::Search => {
                self.clear_status();
                Mode::Searching {
                    query: self.controller.query().to_string(),
                }
            }
            Action::Delete => match self.controller.selection() {
                Selection::Editing(id) => Mode::ConfirmDelete(ConfirmDelete {
                    id,
                    title: self.controller.fields().get(Field::Title).to_string(),
                }),
                Selection::Idle => self.dispatch(Action::Delete),
            },
            Action::Add | Action::Update | Action::Clear => self.dispatch(action),
        }
    }

    fn dispatch(&mut self, action: Action) -> Mode {
        let notice = self.controller.dispatch(&self.conn, action);
        if matches!(action, Action::Add | Action::Update | Action::Delete) {
            self.refresh_total();
        }
        self.show(notice)
    }

    fn handle_search(&mut self, code: KeyCode, mut query: String) -> Mode {
        match code {
            KeyCode::Esc => {
                self.controller.set_query("");
                if let Err(err) = self.controller.reload(&self.conn) {
                    return self.show(Notice::from(err));
                }
                self.set_status(Notice::status("Search cleared."));
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => {
                self.controller.table_mut().move_cursor(-1);
                return Mode::Searching { query };
            }
            KeyCode::Down => {
                self.controller.table_mut().move_cursor(1);
                return Mode::Searching { query };
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => query.push(ch),
            _ => return Mode::Searching { query },
        }

        self.controller.set_query(query.clone());
        let notice = self.controller.dispatch(&self.conn, Action::Search);
        if notice.blocking {
            return Mode::Dialog(notice);
        }
        self.set_status(notice);
        Mode::Searching { query }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status(Notice::status("Deletion cancelled."));
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let mode = self.dispatch(Action::Delete);
                self.focus = Focus::Table;
                mode
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn move_cursor(&mut self, offset: isize) -> Mode {
        self.controller.table_mut().move_cursor(offset);
        Mode::Normal
    }

    /// Route a notice to a dialog or the footer depending on whether it blocks.
    fn show(&mut self, notice: Notice) -> Mode {
        if notice.blocking {
            Mode::Dialog(notice)
        } else {
            self.set_status(notice);
            Mode::Normal
        }
    }

    fn refresh_total(&mut self) {
        match count_books(&self.conn) {
            Ok(total) => self.total = total,
            Err(err) => warn!("could not count books: {err:#}"),
        }
    }

    fn set_status(&mut self, notice: Notice) {
        self.status = Some(notice);
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Normal => {}
            Mode::Searching { query } => self.draw_search_bar(frame, area, query),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Dialog(notice) => self.draw_dialog(frame, area, notice),
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let form_focused = self.focus == Focus::Form;
        let title = match self.controller.selection() {
            Selection::Idle => "New Book".to_string(),
            Selection::Editing(id) => format!("Editing Book #{id}"),
        };
        let mut block = Block::default().borders(Borders::ALL).title(title);
        if form_focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        let inner = block.inner(area);

        let fields = self.controller.fields();
        let lines: Vec<Line> = Field::ALL
            .into_iter()
            .map(|field| field_line(fields, field, form_focused))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if form_focused && matches!(self.mode, Mode::Normal) {
            let active = fields.active();
            let row = Field::ALL
                .iter()
                .position(|field| *field == active)
                .unwrap_or(0) as u16;
            let cursor_x = cursor_column(inner, LABEL_WIDTH + fields.value_len(active));
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let table = self.controller.table();
        let mut block = Block::default().borders(Borders::ALL).title(format!(
            "Books ({} shown / {} total)",
            table.len(),
            self.total
        ));
        if self.focus == Focus::Table {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        if table.is_empty() {
            let message = Paragraph::new("No books to show. Press F1 or 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(COLUMNS.iter().map(|name| Cell::from(*name)))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = table
            .rows()
            .iter()
            .map(|values| Row::new(values.iter().map(|value| Cell::from(value.clone()))));
        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Length(8),
            Constraint::Percentage(20),
        ];
        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(table.cursor()));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(
                status.message.clone(),
                notice_style(status.kind),
            )])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        for (key, action) in ACTION_KEYS {
            if let KeyCode::F(n) = key {
                spans.push(Span::styled(format!("[F{n}]"), key_style));
                spans.push(Span::raw(format!(" {}   ", capitalize(action.name()))));
            }
        }

        match (&self.mode, self.focus) {
            (Mode::Searching { .. }, _) => vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Keep Results   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Show All"),
            ]
            .into(),
            (_, Focus::Form) => {
                spans.extend([
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Save   "),
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Next Field   "),
                    Span::styled("[Esc]", key_style),
                    Span::raw(" Back to List"),
                ]);
                Line::from(spans)
            }
            (_, Focus::Table) => {
                spans.extend([
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Edit   "),
                    Span::styled("[/]", key_style),
                    Span::raw(" Search   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]);
                Line::from(spans)
            }
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, query: &str) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search title, author or category");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {query}")))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = cursor_column(inner, "Search: ".len() + query.chars().count());
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete book #{} '{}' permanently?",
                confirm.id, confirm.title
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_dialog(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.title.clone())
            .borders(Borders::ALL)
            .border_style(notice_style(notice.kind));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
