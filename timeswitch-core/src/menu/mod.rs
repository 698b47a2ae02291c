//! Menu user interface
//!
//! ```text
//!            Right                 Enter
//!   Home ──────────▶ Main Menu ─────────▶ Edit (time / on / off)
//!    ▲                 │  ▲                   │ OK
//!    └──── Quit ───────┘  │                   ▼
//!                         └──── timeout ── Message ◀── Alarm menu
//! ```

mod frame;
mod render;
mod screen;

pub use frame::Frame;
pub use render::BANNER;
pub use screen::{
    Action, AlarmChoice, EditOutcome, EditTarget, Editor, Event, MenuItem, Message, Screen,
};
