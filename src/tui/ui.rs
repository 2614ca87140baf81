use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LandingPage, MessageList, TitleBar};

/// Lays out one frame: title bar, transcript (or landing page), input box.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    if app.transcript.is_empty() && !app.is_sending() {
        tui.message_list.has_unseen_content = false;
        LandingPage::new(app.session.thread_id(), app.connected, spinner_frame)
            .render(frame, main_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.transcript,
            app.is_sending(),
            spinner_frame,
        )
        .render(frame, main_area);
    }

    TitleBar::new(
        app.connected,
        app.session.thread_id().to_string(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
