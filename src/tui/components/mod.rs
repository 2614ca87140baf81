//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: connection indicator, active thread, status message
//! - `Message`: a single transcript entry
//! - `LandingPage`: greeting shown while the transcript is empty
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that own local state and emit events:
//! - `InputBox`: multi-line editor, emits `InputEvent::Submit`
//! - `MessageList`: scrollable transcript with layout caching and the
//!   typing indicator
//!
//! ## Props-Based Data Flow
//!
//! Components get external data through their fields, never by reaching into
//! `App`. The parent (`ui.rs`) copies what each component needs every frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     app.connected,
//!     app.session.thread_id().to_string(),
//!     app.status_message.clone(),
//!     tui.message_list.has_unseen_content,
//! );
//! title_bar.render(frame, title_area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status bar)
//! ├── landing.rs       (empty-transcript greeting)
//! ├── message.rs       (single message renderer)
//! ├── message_list.rs  (scrollable message container)
//! └── input_box/       (multi-line editor)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{InputBox, InputEvent};
pub mod landing;
pub use landing::LandingPage;
pub mod message;
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
