//! About view: author profile, blog mission, job experience.

use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::util::strip_control_chars;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let section = app.style("about_section");
    let detail = app.style("about_detail");
    let heading = app.style("sidebar_heading");

    let mut lines: Vec<Line> = Vec::new();

    if app.about_loading {
        lines.push(Line::from("Loading..."));
    }

    // Author
    if let Some(author) = &app.about.author {
        lines.push(Line::from(Span::styled(
            strip_control_chars(&author.author_name).into_owned(),
            heading,
        )));
        if let Some(age) = author.birth_date.as_deref().and_then(age_from_birth_date) {
            lines.push(Line::from(Span::styled(format!("{} years old", age), detail)));
        }
        if let Some(signature) = &author.signature {
            lines.push(Line::from(Span::styled(
                strip_control_chars(signature).into_owned(),
                detail,
            )));
        }
        if let Some(email) = &author.email {
            lines.push(Line::from(Span::styled(format!("Email: {}", email), detail)));
        }
        if let Some(website) = &author.website {
            lines.push(Line::from(Span::styled(
                format!("Website: {}", website),
                detail,
            )));
        }
        lines.push(Line::from(""));
    }

    // Mission
    if let Some(mission) = &app.about.mission {
        lines.push(Line::from(Span::styled("Mission", section)));
        if let Some(statement) = &mission.statement {
            lines.push(Line::from(
                strip_control_chars(statement).into_owned(),
            ));
        }
        for point in &mission.mission_point_list {
            let mut text = format!("- {}", strip_control_chars(&point.title));
            if let Some(description) = &point.description {
                text.push_str(": ");
                text.push_str(&strip_control_chars(description));
            }
            lines.push(Line::from(Span::styled(text, detail)));
        }
        lines.push(Line::from(""));
    }

    // Experience
    if !app.about.experiences.is_empty() {
        lines.push(Line::from(Span::styled("Experience", section)));
        for job in &app.about.experiences {
            let period = match (&job.start_date, &job.end_date) {
                (Some(start), Some(end)) => format!("{} – {}", start, end),
                (Some(start), None) => format!("{} – present", start),
                _ => String::new(),
            };
            let mut header = vec![Span::styled(
                format!(
                    "{} — {}",
                    strip_control_chars(&job.company),
                    strip_control_chars(&job.role)
                ),
                heading,
            )];
            if !period.is_empty() {
                header.push(Span::styled(format!("  {}", period), detail));
            }
            lines.push(Line::from(header));
            if let Some(description) = &job.description {
                lines.push(Line::from(Span::styled(
                    strip_control_chars(description).into_owned(),
                    detail,
                )));
            }
            for achievement in &job.achievement_list {
                let mut text = format!("  * {}", strip_control_chars(&achievement.title));
                if let Some(d) = &achievement.detail {
                    text.push_str(" — ");
                    text.push_str(&strip_control_chars(d));
                }
                lines.push(Line::from(Span::styled(text, detail)));
            }
            lines.push(Line::from(""));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from("Nothing to show yet. Press r to refresh."));
    }

    // Clamp display scroll to the content length; the raw offset can run
    // ahead when the user holds j on a short page.
    let visible = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    let scroll = app.about_scroll.min(max_scroll).min(u16::MAX as usize) as u16;

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title("About"),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
}

/// Age in whole years from a "YYYY-MM-DD" birth date.
fn age_from_birth_date(birth: &str) -> Option<u32> {
    let birth = NaiveDate::parse_from_str(birth, "%Y-%m-%d").ok()?;
    let today = chrono::Local::now().date_naive();
    today.years_since(birth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_from_valid_birth_date() {
        // Anyone born in 1990 is at least 30 by now.
        let age = age_from_birth_date("1990-06-15").unwrap();
        assert!(age >= 30);
    }

    #[test]
    fn age_from_garbage_is_none() {
        assert!(age_from_birth_date("not-a-date").is_none());
        assert!(age_from_birth_date("").is_none());
    }

    #[test]
    fn age_from_future_date_is_none() {
        assert!(age_from_birth_date("2999-01-01").is_none());
    }
}
