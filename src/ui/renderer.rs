/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::KeyConfig;
use crate::domain::grid::SIZE;
use crate::sim::world::{GameState, MenuItem, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 30, g: 28, b: 26 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by composition, so every position diffs after a fill.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, Cell { ch: ' ', fg: Color::White, bg });
            }
        }
    }
}

// ── Layout ──

/// Each board cell is TILE_W columns by TILE_H rows, with a 1-cell gutter.
const TILE_W: usize = 7;
const TILE_H: usize = 3;
const GAP: usize = 1;
const BOARD_W: usize = SIZE * TILE_W + (SIZE + 1) * GAP;
const BOARD_H: usize = SIZE * TILE_H + (SIZE + 1) * GAP;

const LEFT: usize = 2;
const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;
const MSG_ROW: usize = BOARD_ROW + BOARD_H + 1;
const HELP_ROW: usize = MSG_ROW + 2;

const BOARD_BG: Color = Color::Rgb { r: 120, g: 110, b: 100 };
const HUD_BG: Color = Color::Rgb { r: 60, g: 55, b: 50 };

/// Background/foreground for a tile value.
fn tile_colors(v: u32) -> (Color, Color) {
    let dark = Color::Rgb { r: 60, g: 58, b: 50 };
    let light = Color::Rgb { r: 249, g: 246, b: 242 };
    match v {
        0 => (Color::Rgb { r: 150, g: 140, b: 130 }, dark),
        2 => (Color::Rgb { r: 238, g: 228, b: 218 }, dark),
        4 => (Color::Rgb { r: 237, g: 224, b: 200 }, dark),
        8 => (Color::Rgb { r: 242, g: 177, b: 121 }, light),
        16 => (Color::Rgb { r: 245, g: 149, b: 99 }, light),
        32 => (Color::Rgb { r: 246, g: 124, b: 95 }, light),
        64 => (Color::Rgb { r: 246, g: 94, b: 59 }, light),
        128 => (Color::Rgb { r: 237, g: 207, b: 114 }, light),
        256 => (Color::Rgb { r: 237, g: 204, b: 97 }, light),
        512 => (Color::Rgb { r: 237, g: 200, b: 80 }, light),
        1024 => (Color::Rgb { r: 237, g: 197, b: 63 }, light),
        2048 => (Color::Rgb { r: 237, g: 194, b: 46 }, light),
        _ => (Color::Rgb { r: 60, g: 58, b: 50 }, light),
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(8192, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
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

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, gs: &GameState, keys: &KeyConfig) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(gs.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(gs.phase);
        }

        self.front.clear();
        match gs.phase {
            Phase::Menu => self.compose_menu(gs),
            Phase::Playing | Phase::GameOver => self.compose_game(gs, keys),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

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

    // ── Compose: build front buffer content ──

    fn compose_menu(&mut self, gs: &GameState) {
        let title = "====== 2048 ======";
        self.front.put_str(LEFT, 1, title, Color::Rgb { r: 237, g: 194, b: 46 }, Cell::BASE_BG);

        for (i, item) in MenuItem::ALL.iter().enumerate() {
            let selected = i == gs.menu_cursor;
            let disabled = *item == MenuItem::Continue && !gs.has_save;
            let marker = if selected { '>' } else { ' ' };
            let line = format!("{} {}. {}", marker, i + 1, item.label());
            let fg = if disabled {
                Color::DarkGrey
            } else if selected {
                Color::White
            } else {
                Color::Grey
            };
            self.front.put_str(LEFT, 3 + i, &line, fg, Cell::BASE_BG);
        }

        if gs.best_score > 0 {
            let best = format!("Best: {}", gs.best_score);
            self.front.put_str(LEFT, 6, &best, Color::Grey, Cell::BASE_BG);
        }

        let help = "1/2 or arrows + Enter to choose, Esc to quit";
        self.front.put_str(LEFT, 8, help, Color::DarkGrey, Cell::BASE_BG);
    }

    fn compose_game(&mut self, gs: &GameState, keys: &KeyConfig) {
        // ── HUD row ──
        let hud = format!(
            " Score: {:<8} Best: {:<8} Max: {}",
            gs.grid.score(), gs.best_score, gs.grid.max_tile(),
        );
        self.front.fill_rect(0, HUD_ROW, BOARD_W + LEFT * 2, 1, HUD_BG);
        self.front.put_str(LEFT, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Board ──
        self.front.fill_rect(LEFT, BOARD_ROW, BOARD_W, BOARD_H, BOARD_BG);
        for (r, row) in gs.grid.rows().iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                let x = LEFT + GAP + c * (TILE_W + GAP);
                let y = BOARD_ROW + GAP + r * (TILE_H + GAP);
                self.compose_tile(x, y, v);
            }
        }

        // ── Message bar ──
        if gs.phase == Phase::GameOver {
            let msg = " Game Over! No more possible moves. ";
            self.front.put_str(LEFT, MSG_ROW, msg, Color::Black, Color::Rgb { r: 200, g: 80, b: 60 });
        } else if !gs.message.is_empty() {
            let msg = format!(" {} ", gs.message);
            self.front.put_str(LEFT, MSG_ROW, &msg, Color::Black, Color::Rgb { r: 200, g: 180, b: 50 });
        }

        // ── Help bar ──
        let up = keys.up.to_ascii_uppercase();
        let left = keys.left.to_ascii_uppercase();
        let down = keys.down.to_ascii_uppercase();
        let right = keys.right.to_ascii_uppercase();
        let help = format!(
            " {up}{left}{down}{right}/arrows: move  {}: new game  {}: quit",
            keys.new_game.to_ascii_uppercase(),
            keys.quit.to_ascii_uppercase(),
        );
        self.front.put_str(0, HELP_ROW, &help, Color::DarkGrey, Cell::BASE_BG);
    }

    fn compose_tile(&mut self, x: usize, y: usize, v: u32) {
        let (bg, fg) = tile_colors(v);
        self.front.fill_rect(x, y, TILE_W, TILE_H, bg);
        if v == 0 {
            return;
        }
        let label = v.to_string();
        let pad = TILE_W.saturating_sub(label.len()) / 2;
        self.front.put_str(x + pad, y + TILE_H / 2, &label, fg, bg);
    }
}
