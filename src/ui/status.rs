use crate::app::{App, Focus, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.input.is_some() {
        Cow::Borrowed("Type to edit | ENTER apply | ESC cancel")
    } else {
        match (app.view, app.focus) {
            (View::Detail, _) => {
                Cow::Borrowed("[b]ack [j/k]scroll [Ctrl+d/u]page [o]pen image [?]help [q]uit")
            }
            (View::Browse, Focus::Products) => Cow::Borrowed(
                "[/]search [[/]]price [s]ort [n/p/1-5]page [Tab]filters [x]reset [?]help [q]uit",
            ),
            (View::Browse, Focus::Sidebar) => {
                Cow::Borrowed("[j/k]move [Enter]select [Tab]products [x]reset [?]help [q]uit")
            }
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
