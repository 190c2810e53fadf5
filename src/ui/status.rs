//! Status bar: transient messages, loading state, and keybinding hints.

use crate::app::{App, Focus, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Priority: transient message, then loading indicator, then hints.
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.articles_loading {
        Cow::Borrowed("Loading articles...")
    } else {
        match app.view {
            View::Home => Cow::Borrowed(
                "[j/k]select [Enter]read [n/p]page [m]more [2]categories [3]about [t]heme [q]uit",
            ),
            View::Categories => match app.focus {
                Focus::Tree => Cow::Borrowed(
                    "[j/k]move [Enter]filter [Space]fold [E/C]expand/collapse all [Tab]articles [q]uit",
                ),
                Focus::Articles => Cow::Borrowed(
                    "[j/k]select [Enter]read [n/p]page [m]more [Tab]tree [1]home [q]uit",
                ),
            },
            View::Reader => {
                Cow::Borrowed("[b]ack [j/k]scroll [Ctrl+d/u]page [g/G]top/bottom [r]eload [q]uit")
            }
            View::About => Cow::Borrowed("[j/k]scroll [o]pen website [1]home [2]categories [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text.into_owned()).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
