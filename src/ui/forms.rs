use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::controller::{Field, FormFields};

/// Width reserved for field labels so the inputs line up.
pub(crate) const LABEL_WIDTH: usize = 10;

/// Render one input line. The focused field is highlighted only while the form
/// itself has focus.
pub(crate) fn field_line(fields: &FormFields, field: Field, form_focused: bool) -> Line<'static> {
    let value = fields.get(field);
    let is_active = form_focused && fields.active() == field;

    let display = if value.is_empty() {
        "<required>".to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH)),
        Span::styled(display, style),
    ])
}

/// Book awaiting a Y/N answer before it is deleted.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
}
