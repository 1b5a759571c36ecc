/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame from a `Snapshot` into the `front` buffer
///   2. Compare each cell with `back` (the previous frame)
///   3. Only emit terminal commands for cells that changed, batched with
///      `queue!` and flushed once
///   4. Swap front/back
///
/// World mapping: one terminal row per tile row (16 px) and two columns
/// per tile (8 px per column), so the 256×192 world is 32×12 cells.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Body;
use crate::domain::tile::{Tile, GRID_H, GRID_W, TILE};
use crate::sim::level;
use crate::sim::world::{RunState, Snapshot};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from any real cell, so every position gets repainted.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    const fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = (MAP_COLS.saturating_sub(s.chars().count())) / 2;
        self.put_str(MAP_COL + x, y, s, fg);
    }
}

// ── Layout ──

const COL_PX: f32 = TILE / 2.0;
const MAP_COLS: usize = GRID_W * 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MAP_COL: usize = 1;
const HELP_ROW: usize = MAP_ROW + GRID_H + 1;

/// Frame size the game needs; smaller terminals get clipped.
pub const MIN_COLS: usize = MAP_COL * 2 + MAP_COLS + 14;
pub const MIN_ROWS: usize = HELP_ROW + 1;

const SOLID: Cell = Cell::new('█', Color::Green);
const LADDER: Cell = Cell::new('H', Color::Cyan);
const PLAYER: Cell = Cell::new('@', Color::Yellow);
const HAZARD: Cell = Cell::new('o', Color::Red);
const ITEM: Cell = Cell::new('0', Color::White);
const ANTAGONIST: Cell = Cell::new('&', Color::Magenta);

/// Terminal cell under a world point, relative to the map origin.
fn to_cell(px: f32, py: f32) -> Option<(usize, usize)> {
    let (cx, cy) = ((px / COL_PX).floor(), (py / TILE).floor());
    if cx < 0.0 || cy < 0.0 || cx >= MAP_COLS as f32 || cy >= GRID_H as f32 {
        return None;
    }
    Some((MAP_COL + cx as usize, MAP_ROW + cy as usize))
}

// ── Composition (pure: snapshot → buffer) ──

fn compose(buf: &mut FrameBuffer, snap: &Snapshot) {
    buf.clear();
    match snap.run_state {
        RunState::Menu => compose_menu(buf, snap),
        RunState::Playing => compose_game(buf, snap),
        RunState::Lost => {
            compose_game(buf, snap);
            buf.put_centered(MAP_ROW + GRID_H / 2 - 1, " OUCH! ", Color::Red);
            buf.put_centered(MAP_ROW + GRID_H / 2, " Enter: menu ", Color::White);
        }
        RunState::Won => {
            compose_game(buf, snap);
            buf.put_centered(MAP_ROW + GRID_H / 2 - 1, " ALL LEVELS CLEARED ", Color::Yellow);
            buf.put_centered(MAP_ROW + GRID_H / 2, &format!(" SCORE {} ", snap.score), Color::White);
        }
    }
}

fn compose_hud(buf: &mut FrameBuffer, snap: &Snapshot) {
    let hud = format!(
        "SCORE {:06}  EGGS {:2}  LEVEL {} {}",
        snap.score,
        snap.items.len(),
        snap.level_index + 1,
        snap.level_name
    );
    buf.put_str(MAP_COL, HUD_ROW, &hud, Color::White);
    let sound = if snap.sound_on { "SOUND ON" } else { "SOUND OFF" };
    buf.put_str(MAP_COL + MAP_COLS + 2, HUD_ROW, sound, Color::DarkGrey);
}

fn compose_game(buf: &mut FrameBuffer, snap: &Snapshot) {
    compose_hud(buf, snap);

    for row in 0..GRID_H {
        for col in 0..GRID_W {
            let cell = match snap.grid.classify(col as i32, row as i32) {
                Tile::Solid => SOLID,
                Tile::Climbable => LADDER,
                Tile::Empty => continue,
            };
            buf.set(MAP_COL + col * 2, MAP_ROW + row, cell);
            buf.set(MAP_COL + col * 2 + 1, MAP_ROW + row, cell);
        }
    }

    for item in snap.items {
        if let Some((x, y)) = to_cell(item.x, item.y) {
            buf.set(x, y, ITEM);
        }
    }

    let (ax, ay) = snap.antagonist;
    if let Some((x, y)) = to_cell(ax, ay) {
        buf.set(x, y, ANTAGONIST);
        buf.set(x + 1, y, ANTAGONIST);
    }

    for hazard in snap.hazards {
        let (cx, cy) = hazard.center();
        if let Some((x, y)) = to_cell(cx, cy) {
            buf.set(x, y, HAZARD);
        }
    }

    let (px, py) = snap.player.center();
    if let Some((x, y)) = to_cell(px, py) {
        buf.set(x, y, PLAYER);
    }

    buf.put_str(MAP_COL, HELP_ROW, "←→ move  ↑↓ climb  Space jump  M sound", Color::DarkGrey);
}

fn compose_menu(buf: &mut FrameBuffer, snap: &Snapshot) {
    buf.put_centered(HUD_ROW, "E G G   K O N G", Color::Yellow);

    for (i, name) in level::names().enumerate() {
        let selected = i == snap.level_index;
        let line = format!("{} {}  {}", if selected { '>' } else { ' ' }, i, name);
        let fg = if selected { Color::Yellow } else { Color::Grey };
        buf.put_str(MAP_COL + 4, MAP_ROW + i, &line, fg);
    }

    let sound = if snap.sound_on { "M sound: on" } else { "M sound: off" };
    buf.put_str(MAP_COL, HELP_ROW - 1, sound, Color::DarkGrey);
    buf.put_str(MAP_COL, HELP_ROW, "←→/0-9 pick  Enter start  Q quit", Color::DarkGrey);
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_state: Option<RunState>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(8192, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_state: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.fit_terminal()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, snap: &Snapshot) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((MIN_COLS as u16, MIN_ROWS as u16));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.fit_terminal()?;
        }

        // Repaint everything on a state change for a clean transition.
        if self.last_state != Some(snap.run_state) {
            self.back.cells.fill(Cell::INVALID);
            self.last_state = Some(snap.run_state);
        }

        compose(&mut self.front, snap);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn fit_terminal(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((MIN_COLS as u16, MIN_ROWS as u16));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}
