//! Main-loop application
//!
//! One [`App::tick`] per loop iteration: read the clock, run the off-time
//! check, feed the keypad into the menu, apply whatever clock access the
//! menu asked for, then redraw what changed.

use crate::config::UiConfig;
use crate::input::{KeySet, Keypad};
use crate::menu::{Action, EditTarget, Event, Frame, Message, Screen};
use crate::schedule::off_time_reached;
use crate::time::TimeOfDay;
use crate::traits::{CharDisplay, RtcDevice};

/// Failure during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError<R, D> {
    /// Clock access failed; the UI shows "Clock Error"
    Rtc(R),
    /// Display write failed; the next tick redraws everything
    Display(D),
}

/// Timer switch UI
#[derive(Debug)]
pub struct App {
    screen: Screen,
    keypad: Keypad,
    ui: UiConfig,
    now: TimeOfDay,
    shown: Option<Frame>,
}

impl App {
    pub const fn new(ui: UiConfig) -> Self {
        Self {
            screen: Screen::Home,
            keypad: Keypad::new(),
            ui,
            now: TimeOfDay::MIDNIGHT,
            shown: None,
        }
    }

    /// Current screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Last time read from the clock
    pub fn now(&self) -> TimeOfDay {
        self.now
    }

    /// Run one main-loop iteration with the keys currently held
    pub fn tick<R, D>(
        &mut self,
        held: KeySet,
        rtc: &mut R,
        display: &mut D,
    ) -> Result<(), AppError<R::Error, D::Error>>
    where
        R: RtcDevice,
        D: CharDisplay,
    {
        let stepped = self.step(held, rtc);
        if stepped.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("clock access failed");
            self.screen = Screen::message(Message::ClockError, &self.ui);
        }
        self.redraw(display).map_err(AppError::Display)?;
        stepped.map_err(AppError::Rtc)
    }

    fn step<R: RtcDevice>(&mut self, held: KeySet, rtc: &mut R) -> Result<(), R::Error> {
        self.now = rtc.time()?;

        if self.screen == Screen::Home {
            let off = rtc.off_time()?;
            if off_time_reached(&self.now, &off) {
                rtc.clear_status()?;
            }
        }

        let event = self.keypad.update(held).map_or(Event::Tick, Event::Key);
        let (next, action) = self.screen.transition(event, &self.ui);
        self.screen = next;

        if let Some(action) = action {
            self.apply(action, rtc)?;
        }
        Ok(())
    }

    fn apply<R: RtcDevice>(&mut self, action: Action, rtc: &mut R) -> Result<(), R::Error> {
        match action {
            Action::LoadEditor(target) => {
                let value = match target {
                    EditTarget::Clock => self.now,
                    EditTarget::OnTime => rtc.on_time()?,
                    EditTarget::OffTime => rtc.off_time()?,
                };
                self.screen.load_editor(target, value);
            }
            Action::SetTime(time) => {
                rtc.set_time(time)?;
                self.now = time;
            }
            Action::SetOnTime(time) => rtc.set_on_time(time)?,
            Action::SetOffTime(time) => rtc.set_off_time(time)?,
            Action::SetAlarm(enabled) => rtc.set_alarm_enabled(enabled)?,
        }
        Ok(())
    }

    fn redraw<D: CharDisplay>(&mut self, display: &mut D) -> Result<(), D::Error> {
        let mut frame = Frame::new();
        self.screen
            .render(&mut frame, &self.now)
            .unwrap_or_else(|never| match never {});

        if self.shown.as_ref() == Some(&frame) {
            return Ok(());
        }
        // Forget what is on the glass until the write goes through
        let shown = self.shown.take();
        frame.flush(shown.as_ref(), display)?;
        self.shown = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::menu::MenuItem;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Offline;

    struct MockRtc {
        time: TimeOfDay,
        on: TimeOfDay,
        off: TimeOfDay,
        alarm: Option<bool>,
        status_clears: u32,
        offline: bool,
    }

    impl MockRtc {
        fn at(hours: u8, minutes: u8, seconds: u8) -> Self {
            Self {
                time: TimeOfDay::new(hours, minutes, seconds).unwrap(),
                on: TimeOfDay::new(6, 30, 0).unwrap(),
                off: TimeOfDay::hm(22, 15).unwrap(),
                alarm: None,
                status_clears: 0,
                offline: false,
            }
        }

        fn check(&self) -> Result<(), Offline> {
            if self.offline {
                Err(Offline)
            } else {
                Ok(())
            }
        }
    }

    impl RtcDevice for MockRtc {
        type Error = Offline;

        fn time(&mut self) -> Result<TimeOfDay, Offline> {
            self.check().map(|_| self.time)
        }

        fn set_time(&mut self, time: TimeOfDay) -> Result<(), Offline> {
            self.check()?;
            self.time = time;
            Ok(())
        }

        fn on_time(&mut self) -> Result<TimeOfDay, Offline> {
            self.check().map(|_| self.on)
        }

        fn set_on_time(&mut self, time: TimeOfDay) -> Result<(), Offline> {
            self.check()?;
            self.on = time;
            Ok(())
        }

        fn off_time(&mut self) -> Result<TimeOfDay, Offline> {
            self.check().map(|_| self.off)
        }

        fn set_off_time(&mut self, time: TimeOfDay) -> Result<(), Offline> {
            self.check()?;
            self.off = TimeOfDay {
                seconds: 0,
                ..time
            };
            Ok(())
        }

        fn set_alarm_enabled(&mut self, enabled: bool) -> Result<(), Offline> {
            self.check()?;
            self.alarm = Some(enabled);
            Ok(())
        }

        fn clear_status(&mut self) -> Result<(), Offline> {
            self.check()?;
            self.status_clears += 1;
            Ok(())
        }
    }

    /// Frame-backed display that counts row writes
    #[derive(Default)]
    struct Glass {
        frame: Frame,
        writes: u32,
    }

    impl CharDisplay for Glass {
        type Error = core::convert::Infallible;

        fn clear(&mut self) -> Result<(), Self::Error> {
            self.frame.clear()
        }

        fn write_str_at(&mut self, col: u8, row: u8, text: &str) -> Result<(), Self::Error> {
            self.writes += 1;
            self.frame.write_str_at(col, row, text)
        }
    }

    fn app() -> App {
        App::new(UiConfig {
            message_ticks: 2,
            ..UiConfig::default()
        })
    }

    fn tap(app: &mut App, key: Key, rtc: &mut MockRtc, glass: &mut Glass) {
        app.tick(key.into(), rtc, glass).unwrap();
        app.tick(KeySet::EMPTY, rtc, glass).unwrap();
    }

    #[test]
    fn test_home_shows_clock() {
        let mut app = app();
        let mut rtc = MockRtc::at(14, 5, 9);
        let mut glass = Glass::default();
        app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        assert_eq!(glass.frame.row(0), "   RTC DS3231   ");
        assert_eq!(glass.frame.row(1), "    14:05:09    ");
    }

    #[test]
    fn test_unchanged_screen_is_not_resent() {
        let mut app = app();
        let mut rtc = MockRtc::at(14, 5, 9);
        let mut glass = Glass::default();
        app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        let writes = glass.writes;
        app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        assert_eq!(glass.writes, writes);

        // Only the clock row changes
        rtc.time.seconds = 10;
        app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        assert_eq!(glass.writes, writes + 1);
        assert_eq!(glass.frame.row(1), "    14:05:10    ");
    }

    #[test]
    fn test_held_key_does_not_repeat() {
        let mut app = app();
        let mut rtc = MockRtc::at(8, 0, 0);
        let mut glass = Glass::default();
        app.tick(Key::Right.into(), &mut rtc, &mut glass).unwrap();
        app.tick(Key::Right.into(), &mut rtc, &mut glass).unwrap();
        assert_eq!(
            app.screen(),
            &Screen::MainMenu {
                selected: MenuItem::SetTime
            }
        );
        assert_eq!(glass.frame.row(1), "< Set Time     >");
    }

    #[test]
    fn test_on_time_editor_loads_stored_value() {
        let mut app = app();
        let mut rtc = MockRtc::at(8, 0, 0);
        let mut glass = Glass::default();
        tap(&mut app, Key::Right, &mut rtc, &mut glass);
        tap(&mut app, Key::Right, &mut rtc, &mut glass);
        tap(&mut app, Key::Enter, &mut rtc, &mut glass);
        assert_eq!(glass.frame.row(0), "06:30:00 <OK>   ");
    }

    #[test]
    fn test_off_time_editor_loads_stored_value_not_clock() {
        let mut app = app();
        let mut rtc = MockRtc::at(8, 45, 12);
        let mut glass = Glass::default();
        for _ in 0..3 {
            tap(&mut app, Key::Right, &mut rtc, &mut glass);
        }
        tap(&mut app, Key::Enter, &mut rtc, &mut glass);
        assert_eq!(glass.frame.row(0), "22:15 <OK>      ");
    }

    #[test]
    fn test_set_clock_writes_through() {
        let mut app = app();
        let mut rtc = MockRtc::at(8, 0, 0);
        let mut glass = Glass::default();
        tap(&mut app, Key::Right, &mut rtc, &mut glass);
        tap(&mut app, Key::Enter, &mut rtc, &mut glass);

        // Hours up once, then walk to OK and confirm
        tap(&mut app, Key::Left, &mut rtc, &mut glass);
        for _ in 0..3 {
            tap(&mut app, Key::Enter, &mut rtc, &mut glass);
        }
        app.tick(Key::Left.into(), &mut rtc, &mut glass).unwrap();

        assert_eq!(rtc.time, TimeOfDay::new(9, 0, 0).unwrap());
        assert_eq!(glass.frame.row(1), "Main Time Set   ");

        // Message times out back to the menu
        for _ in 0..2 {
            app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        }
        assert_eq!(
            app.screen(),
            &Screen::MainMenu {
                selected: MenuItem::SetTime
            }
        );
    }

    #[test]
    fn test_alarm_enable() {
        let mut app = app();
        let mut rtc = MockRtc::at(8, 0, 0);
        let mut glass = Glass::default();
        tap(&mut app, Key::Right, &mut rtc, &mut glass);
        for _ in 0..3 {
            tap(&mut app, Key::Right, &mut rtc, &mut glass);
        }
        tap(&mut app, Key::Enter, &mut rtc, &mut glass);
        tap(&mut app, Key::Enter, &mut rtc, &mut glass);
        assert_eq!(rtc.alarm, Some(true));
    }

    #[test]
    fn test_off_time_clears_status_on_home() {
        let mut app = app();
        let mut rtc = MockRtc::at(22, 14, 59);
        let mut glass = Glass::default();
        app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        assert_eq!(rtc.status_clears, 0);

        rtc.time = TimeOfDay::new(22, 15, 0).unwrap();
        app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        assert_eq!(rtc.status_clears, 1);
    }

    #[test]
    fn test_off_time_ignored_in_menus() {
        let mut app = app();
        let mut rtc = MockRtc::at(22, 15, 0);
        let mut glass = Glass::default();
        app.tick(Key::Right.into(), &mut rtc, &mut glass).unwrap();
        let clears = rtc.status_clears;
        app.tick(KeySet::EMPTY, &mut rtc, &mut glass).unwrap();
        assert_eq!(rtc.status_clears, clears);
    }

    #[test]
    fn test_clock_failure_shows_error() {
        let mut app = app();
        let mut rtc = MockRtc::at(8, 0, 0);
        rtc.offline = true;
        let mut glass = Glass::default();
        assert_eq!(
            app.tick(KeySet::EMPTY, &mut rtc, &mut glass),
            Err(AppError::Rtc(Offline))
        );
        assert_eq!(glass.frame.row(1), "Clock Error     ");
    }
}
