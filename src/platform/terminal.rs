//! Terminal frontend
//!
//! Draws a `FrameView` as a character grid and turns key presses into
//! `InputEvent`s. Where the terminal supports the keyboard enhancement
//! protocol, movement keys are held from press to release. Otherwise only
//! presses and auto-repeats arrive, and a key counts as held for a window
//! that outlasts the usual repeat delay.

use std::io::{self, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Color},
    terminal,
};

use super::{InputEvent, Key};
use crate::Rgb;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::frame::{FrameView, SpriteKind};
use crate::sim::{Rect, TickInput};

/// How long a movement key stays held after its last press/repeat when the
/// terminal cannot report releases. Must exceed the OS key-repeat delay.
pub const REPEAT_HOLD_WINDOW: Duration = Duration::from_millis(650);

/// Translate a terminal key event
pub fn map_key(key: &KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }
    let key = match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(InputEvent::Quit),
        KeyCode::Left | KeyCode::Char('a') => Key::Left,
        KeyCode::Right | KeyCode::Char('d') => Key::Right,
        KeyCode::Char('r') | KeyCode::Char('R') => Key::Restart,
        KeyCode::Char('m') | KeyCode::Char('M') => Key::Menu,
        _ => Key::Other,
    };
    Some(InputEvent::KeyPressed(key))
}

/// Held state of one movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Hold {
    #[default]
    Up,
    /// Held until a release event
    Down,
    /// Held until this instant unless pressed again
    Until(Instant),
}

impl Hold {
    fn is_held(self, now: Instant) -> bool {
        match self {
            Hold::Up => false,
            Hold::Down => true,
            Hold::Until(t) => now < t,
        }
    }
}

/// Left/Right held state built from key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldKeys {
    left: Hold,
    right: Hold,
    /// `None` when the terminal reports releases
    window: Option<Duration>,
}

impl HeldKeys {
    /// Track keys on a terminal that reports press, repeat and release
    pub fn with_releases() -> Self {
        Self {
            left: Hold::Up,
            right: Hold::Up,
            window: None,
        }
    }

    /// Track keys from presses and auto-repeats only
    pub fn with_window(window: Duration) -> Self {
        Self {
            left: Hold::Up,
            right: Hold::Up,
            window: Some(window),
        }
    }

    pub fn on_key(&mut self, key: &KeyEvent, now: Instant) {
        let slot = match key.code {
            KeyCode::Left | KeyCode::Char('a') => &mut self.left,
            KeyCode::Right | KeyCode::Char('d') => &mut self.right,
            _ => return,
        };
        *slot = match (key.kind, self.window) {
            (KeyEventKind::Release, _) => Hold::Up,
            (_, None) => Hold::Down,
            (_, Some(window)) => Hold::Until(now + window),
        };
    }

    pub fn input(&self, now: Instant) -> TickInput {
        TickInput {
            left: self.left.is_held(now),
            right: self.right.is_held(now),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

fn glyph(kind: SpriteKind) -> char {
    match kind {
        SpriteKind::Player => '@',
        SpriteKind::Obstacle => '#',
        SpriteKind::DrinkMe => 'v',
        SpriteKind::EatMe => '*',
        SpriteKind::Star => '.',
    }
}

/// Raw-mode terminal session
pub struct TerminalFrontend {
    out: Stdout,
    cols: u16,
    rows: u16,
    held: HeldKeys,
    /// Keyboard enhancement flags were pushed and must be popped on close
    enhanced: bool,
    closed: bool,
}

impl TerminalFrontend {
    pub fn open() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        let held = if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            HeldKeys::with_releases()
        } else {
            log::info!("Terminal does not report key releases, using repeat hold window");
            HeldKeys::with_window(REPEAT_HOLD_WINDOW)
        };
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols: cols.max(1),
            rows: rows.max(1),
            held,
            enhanced,
            closed: false,
        })
    }

    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            style::ResetColor,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }

    /// Drain pending terminal events without blocking
    pub fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    self.held.on_key(&key, Instant::now());
                    events.extend(map_key(&key));
                }
                Event::Resize(c, r) => {
                    self.cols = c.max(1);
                    self.rows = r.max(1);
                    queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }
        Ok(events)
    }

    /// Movement keys currently considered held
    pub fn held(&self) -> TickInput {
        self.held.input(Instant::now())
    }

    fn cell_span(&self, r: &Rect, shake: (i32, i32)) -> (usize, usize, usize, usize) {
        let (cols, rows) = (self.cols as f32, self.rows as f32);
        let sx = cols / SCREEN_WIDTH;
        let sy = rows / SCREEN_HEIGHT;
        let x0 = ((r.left() + shake.0 as f32) * sx).floor().clamp(0.0, cols - 1.0) as usize;
        let y0 = ((r.top() + shake.1 as f32) * sy).floor().clamp(0.0, rows - 1.0) as usize;
        let x1 = ((r.right() + shake.0 as f32) * sx).ceil().clamp(0.0, cols) as usize;
        let y1 = ((r.bottom() + shake.1 as f32) * sy).ceil().clamp(0.0, rows) as usize;
        (x0, y0, x1.max(x0 + 1), y1.max(y0 + 1))
    }

    pub fn draw(&mut self, view: &FrameView) -> io::Result<()> {
        let (cols, rows) = (self.cols as usize, self.rows as usize);
        let blank = Cell {
            ch: ' ',
            fg: view.background,
            bg: view.background,
        };
        let mut grid = vec![blank; cols * rows];

        let on_screen = |r: &Rect| r.bottom() >= 0.0 && r.top() < SCREEN_HEIGHT;
        for sprite in view.sprites.iter().filter(|s| on_screen(&s.rect)) {
            let (x0, y0, x1, y1) = self.cell_span(&sprite.rect, view.shake);
            for y in y0..y1.min(rows) {
                for x in x0..x1.min(cols) {
                    let cell = &mut grid[y * cols + x];
                    cell.ch = glyph(sprite.kind);
                    cell.fg = sprite.color;
                }
            }
        }

        for dot in &view.fragments {
            let r = Rect::from_center(dot.pos, dot.radius, dot.radius);
            if !on_screen(&r) {
                continue;
            }
            let (x0, y0, _, _) = self.cell_span(&r, view.shake);
            let cell = &mut grid[y0 * cols + x0];
            cell.ch = 'o';
            cell.fg = dot.color;
        }

        for line in &view.text {
            let row = ((line.y + view.shake.1 as f32) / SCREEN_HEIGHT * rows as f32) as usize;
            if row >= rows {
                continue;
            }
            let chars: Vec<char> = line.text.chars().take(cols).collect();
            let start = (cols - chars.len()) / 2;
            for (i, ch) in chars.into_iter().enumerate() {
                let cell = &mut grid[row * cols + start + i];
                cell.ch = ch;
                cell.fg = line.color;
            }
        }

        let mut current: Option<(Rgb, Rgb)> = None;
        for y in 0..rows {
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            for cell in &grid[y * cols..(y + 1) * cols] {
                if current != Some((cell.fg, cell.bg)) {
                    queue!(
                        self.out,
                        style::SetForegroundColor(color(cell.fg)),
                        style::SetBackgroundColor(color(cell.bg)),
                    )?;
                    current = Some((cell.fg, cell.bg));
                }
                queue!(self.out, style::Print(cell.ch))?;
            }
        }
        self.out.flush()
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to restore terminal: {}", e);
        }
    }
}
