//! Screen layouts
//!
//! ```text
//! Home            Main menu         Editor            Message
//! ┌────────────────┐┌────────────────┐┌────────────────┐┌────────────────┐
//! │   RTC DS3231   ││    Main Menu   ││06:30:00 <OK>   ││Message !       │
//! │    14:05:09    ││< Set Time     >││   ^^           ││OnTime Set      │
//! └────────────────┘└────────────────┘└────────────────┘└────────────────┘
//! ```

use crate::time::TimeOfDay;
use crate::traits::CharDisplay;

use super::screen::{Editor, Screen};

/// Home screen banner
pub const BANNER: &str = "   RTC DS3231   ";

const OK_MARK: &str = "<OK>";

impl Screen {
    /// Draw the screen onto a blank display
    pub fn render<D: CharDisplay>(&self, display: &mut D, now: &TimeOfDay) -> Result<(), D::Error> {
        match self {
            Screen::Home => {
                display.write_str_at(0, 0, BANNER)?;
                display.write_str_at(4, 1, &now.format_hms())
            }
            Screen::MainMenu { selected } => {
                display.write_str_at(4, 0, "Main Menu")?;
                draw_selector(display, selected.label())
            }
            Screen::Edit(editor) => draw_editor(display, editor),
            Screen::AlarmMenu { selected } => {
                display.write_str_at(4, 0, "Set Alarm")?;
                draw_selector(display, selected.label())
            }
            Screen::Message { message, .. } => {
                display.write_str_at(0, 0, "Message !")?;
                display.write_str_at(0, 1, message.text())
            }
        }
    }
}

/// `<` item `>` on the bottom row
fn draw_selector<D: CharDisplay>(display: &mut D, label: &str) -> Result<(), D::Error> {
    display.write_str_at(0, 1, "<")?;
    display.write_str_at(2, 1, label)?;
    display.write_str_at(15, 1, ">")
}

/// Fields at columns 0, 3, 6 with `^^` under the cursor; OK follows the
/// last field
fn draw_editor<D: CharDisplay>(display: &mut D, editor: &Editor) -> Result<(), D::Error> {
    let fields = editor.target.fields();
    for (i, &field) in fields.iter().enumerate() {
        let col = (i * 3) as u8;
        display.write_int_at(col, 0, editor.value.get(field) as u16, 2)?;
        if i + 1 < fields.len() {
            display.write_str_at(col + 2, 0, ":")?;
        }
    }
    display.write_str_at((fields.len() * 3) as u8, 0, OK_MARK)?;
    display.write_str_at(editor.cursor * 3, 1, "^^")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::frame::Frame;
    use crate::menu::screen::{AlarmChoice, EditTarget, MenuItem, Message};

    fn draw(screen: Screen, now: TimeOfDay) -> Frame {
        let mut frame = Frame::new();
        screen.render(&mut frame, &now).unwrap();
        frame
    }

    #[test]
    fn test_home() {
        let frame = draw(Screen::Home, TimeOfDay::new(14, 5, 9).unwrap());
        assert_eq!(frame.row(0), "   RTC DS3231   ");
        assert_eq!(frame.row(1), "    14:05:09    ");
    }

    #[test]
    fn test_main_menu() {
        let frame = draw(
            Screen::MainMenu {
                selected: MenuItem::SetOffTime,
            },
            TimeOfDay::MIDNIGHT,
        );
        assert_eq!(frame.row(0), "    Main Menu   ");
        assert_eq!(frame.row(1), "< Set Off Time >");
    }

    #[test]
    fn test_clock_editor() {
        let editor = Editor {
            target: EditTarget::Clock,
            value: TimeOfDay::new(6, 30, 0).unwrap(),
            cursor: 1,
        };
        let frame = draw(Screen::Edit(editor), TimeOfDay::MIDNIGHT);
        assert_eq!(frame.row(0), "06:30:00 <OK>   ");
        assert_eq!(frame.row(1), "   ^^           ");
    }

    #[test]
    fn test_off_time_editor_on_ok() {
        let editor = Editor {
            target: EditTarget::OffTime,
            value: TimeOfDay::hm(22, 15).unwrap(),
            cursor: 2,
        };
        let frame = draw(Screen::Edit(editor), TimeOfDay::MIDNIGHT);
        assert_eq!(frame.row(0), "22:15 <OK>      ");
        assert_eq!(frame.row(1), "      ^^        ");
    }

    #[test]
    fn test_alarm_menu_and_message() {
        let frame = draw(
            Screen::AlarmMenu {
                selected: AlarmChoice::Disable,
            },
            TimeOfDay::MIDNIGHT,
        );
        assert_eq!(frame.row(1), "< Disable      >");

        let frame = draw(
            Screen::Message {
                message: Message::TimeSet,
                remaining: 1,
            },
            TimeOfDay::MIDNIGHT,
        );
        assert_eq!(frame.row(0), "Message !       ");
        assert_eq!(frame.row(1), "Main Time Set   ");
    }
}
