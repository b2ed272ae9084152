//! Local menu state machine for the keypad + OLED front panel.
//!
//! Five screens: main, node selection, profile selection (scrollable),
//! live status, and manual control.  The menu owns no hardware and no
//! engine state; [`Menu::process_key`] digests debounced keypad codes
//! and hands any resulting effect back as a [`MenuAction`], and
//! [`Menu::render`] produces a plain text [`ScreenView`] for whatever
//! display adapter is attached.
//!
//! Keypad layout: 1–12 are the numeric grid, 13/14 move the cursor,
//! 15 selects, 16 backs out.  On the manual screen, 1–4 toggle zone 0's
//! actuators and 5–8 zone 1's.

use core::fmt::Write;

use crate::config::SystemConfig;
use crate::engine::CycleReadings;
use crate::profiles;
use crate::protocol::Actuator;
use crate::zone::ZoneId;

const KEY_UP: u8 = 13;
const KEY_DOWN: u8 = 14;
const KEY_SELECT: u8 = 15;
const KEY_BACK: u8 = 16;

const ITEMS_PER_SCREEN: u8 = 4;

/// One display line.  Sized for a 128px panel at the 6px font.
pub type Line = heapless::String<24>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    SelectNode,
    SelectProfile,
    ViewStatus,
    ManualControl,
}

/// Effect requested by a key press, applied by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Assign a catalog profile to a zone.
    AssignProfile { zone: ZoneId, profile_index: u8 },
    /// Send a raw toggle byte to a zone, manual-mode only.
    ManualCommand { zone: ZoneId, byte: u8 },
}

pub struct Menu {
    screen: Screen,
    cursor: u8,
    scroll: u8,
    selected_zone: ZoneId,
    manual_mode: bool,
    debounce_ms: u32,
    last_key: u8,
    last_key_time: u32,
}

impl Menu {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            screen: Screen::Main,
            cursor: 0,
            scroll: 0,
            selected_zone: ZoneId::Zone0,
            manual_mode: false,
            debounce_ms: config.key_debounce_ms,
            last_key: 0,
            last_key_time: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// While true, the automatic decision cycle is paused and keys 1–8
    /// on the manual screen drive actuators directly.
    pub fn is_manual_mode(&self) -> bool {
        self.manual_mode
    }

    /// Digest one keypad scan result (0 = no key down).
    ///
    /// A key repeats only after a release: the same code is ignored
    /// until a 0 scan re-arms it, and any code inside the debounce
    /// window is dropped.
    pub fn process_key(&mut self, key: u8, now_ms: u32) -> Option<MenuAction> {
        if key == 0 {
            self.last_key = 0;
            return None;
        }
        if key == self.last_key || now_ms.wrapping_sub(self.last_key_time) <= self.debounce_ms {
            return None;
        }
        self.last_key = key;
        self.last_key_time = now_ms;
        self.dispatch(key)
    }

    fn dispatch(&mut self, key: u8) -> Option<MenuAction> {
        match self.screen {
            Screen::Main => {
                match key {
                    1 => self.enter(Screen::ViewStatus),
                    2 => self.enter(Screen::SelectNode),
                    3 => self.enter(Screen::ManualControl),
                    4 => self.manual_mode = !self.manual_mode,
                    _ => {}
                }
                None
            }
            Screen::SelectNode => {
                match key {
                    1 | 2 => {
                        self.selected_zone = if key == 1 { ZoneId::Zone0 } else { ZoneId::Zone1 };
                        self.enter(Screen::SelectProfile);
                    }
                    KEY_BACK => self.enter(Screen::Main),
                    _ => {}
                }
                None
            }
            Screen::SelectProfile => self.profile_key(key),
            Screen::ViewStatus => {
                if key == KEY_BACK {
                    self.enter(Screen::Main);
                }
                None
            }
            Screen::ManualControl => {
                if (1..=8).contains(&key) && self.manual_mode {
                    let zone = if key <= 4 { ZoneId::Zone0 } else { ZoneId::Zone1 };
                    let actuator = Actuator::ALL[usize::from((key - 1) % 4)];
                    return Some(MenuAction::ManualCommand {
                        zone,
                        byte: actuator.toggle_code(),
                    });
                }
                if key == KEY_BACK {
                    self.enter(Screen::Main);
                }
                None
            }
        }
    }

    fn profile_key(&mut self, key: u8) -> Option<MenuAction> {
        let total = profiles::count();
        match key {
            KEY_UP => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                } else if self.scroll > 0 {
                    self.scroll -= 1;
                }
            }
            KEY_DOWN => {
                let visible = visible_items(total, self.scroll);
                if self.cursor + 1 < visible {
                    self.cursor += 1;
                } else if self.scroll + ITEMS_PER_SCREEN < total {
                    self.scroll += 1;
                }
            }
            KEY_SELECT => {
                let index = self.scroll + self.cursor;
                if index < total {
                    let zone = self.selected_zone;
                    self.enter(Screen::Main);
                    return Some(MenuAction::AssignProfile {
                        zone,
                        profile_index: index,
                    });
                }
            }
            KEY_BACK => self.enter(Screen::SelectNode),
            _ => {}
        }
        None
    }

    fn enter(&mut self, screen: Screen) {
        self.screen = screen;
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Lay out the current screen as text lines.
    ///
    /// `assigned` is the per-zone profile index from the engine;
    /// `readings` the latest sensor values (zeros until a zone has
    /// produced a frame).
    pub fn render(
        &self,
        assigned: [Option<u8>; ZoneId::COUNT],
        readings: CycleReadings,
    ) -> ScreenView {
        let mut view = ScreenView::default();
        match self.screen {
            Screen::Main => {
                view.push("MAIN MENU");
                view.push("1.STATUS");
                view.push("2.ASSIGN PROFILE");
                view.push("3.MANUAL CTRL");
                view.pushf(format_args!(
                    "4.MODE:{}",
                    if self.manual_mode { "MAN" } else { "AUTO" }
                ));
            }
            Screen::SelectNode => {
                view.push("SELECT NODE:");
                view.push("1. NODE 1");
                view.push("2. NODE 2");
                view.push("16.BACK");
            }
            Screen::SelectProfile => {
                let total = profiles::count();
                view.pushf(format_args!("NODE {} PROFILE:", self.selected_zone.index() + 1));
                for i in 0..visible_items(total, self.scroll) {
                    if let Some(profile) = profiles::get(self.scroll + i) {
                        let marker = if i == self.cursor { "->" } else { "  " };
                        view.pushf(format_args!("{}{}", marker, profile.name));
                    }
                }
                if self.scroll > 0 {
                    view.push("^");
                }
                if self.scroll + ITEMS_PER_SCREEN < total {
                    view.push("v");
                }
                view.push("13^ 14v 15OK 16X");
            }
            Screen::ViewStatus => {
                view.push("SYSTEM STATUS");
                for zone in ZoneId::ALL {
                    let name = match assigned[zone.index()] {
                        Some(index) => profiles::name(index),
                        None => "NONE",
                    };
                    view.pushf(format_args!("N{}:{}", zone.index() + 1, name));
                    let r = readings[zone.index()].unwrap_or_default();
                    view.pushf(format_args!(
                        "H:{} T:{} L:{}",
                        r.humidity, r.temperature, r.light
                    ));
                }
                view.push("16.BACK");
            }
            Screen::ManualControl => {
                view.push("MANUAL CONTROL");
                view.push("N1:1-PMP 2-HUM");
                view.push("   3-FAN 4-LGT");
                view.push("N2:5-PMP 6-HUM");
                view.push("   7-FAN 8-LGT");
                view.push("16.BACK");
            }
        }
        view
    }
}

fn visible_items(total: u8, scroll: u8) -> u8 {
    total.saturating_sub(scroll).min(ITEMS_PER_SCREEN)
}

/// Text rendering of one screen, top to bottom.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub lines: heapless::Vec<Line, 8>,
}

impl ScreenView {
    fn push(&mut self, text: &str) {
        let mut line = Line::new();
        let _ = line.push_str(text);
        let _ = self.lines.push(line);
    }

    fn pushf(&mut self, args: core::fmt::Arguments<'_>) {
        let mut line = Line::new();
        let _ = line.write_fmt(args);
        let _ = self.lines.push(line);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }
}
