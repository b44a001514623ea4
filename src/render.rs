//! Terminal renderer.
//!
//! The world is drawn into an RGB pixel buffer that is two pixels taller than
//! the terminal has rows; each cell prints `▀` with the upper pixel as
//! foreground and the lower one as background. The 360×640 world is scaled
//! uniformly to fit and centered, with the leftover area letterboxed.

use std::io::{self, Write};
use std::ops::Range;

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::audio::SoundPlayer;
use crate::session::{GameState, Session};
use crate::store::ScoreStore;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

impl From<Rgb> for CColor {
    fn from(c: Rgb) -> Self {
        CColor::Rgb {
            r: c.0,
            g: c.1,
            b: c.2,
        }
    }
}

const LETTERBOX: Rgb = Rgb(18, 18, 28);
const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const CAT_FUR: Rgb = Rgb(240, 150, 60);
const CAT_STRIPE: Rgb = Rgb(195, 105, 35);
const CAT_EYE: Rgb = Rgb(255, 255, 255);
const CAT_PUPIL: Rgb = Rgb(20, 20, 20);
const CAT_NOSE: Rgb = Rgb(240, 120, 150);
const TITLE: Rgb = Rgb(245, 200, 66);
const PANEL: Rgb = Rgb(220, 195, 120);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill(&mut self, xs: Range<i32>, ys: Range<i32>, c: Rgb) {
        for y in ys {
            for x in xs.clone() {
                self.set(x, y, c);
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.into()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(top.into()))?;
                        fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    let glyph = match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'F' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0],
        'G' => [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'Y' => [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0],
        _ => return None,
    };
    Some(glyph)
}

fn glyph(ch: char) -> Option<[u8; 15]> {
    match ch.to_digit(10) {
        Some(d) => Some(DIGITS[d as usize]),
        None => letter(ch),
    }
}

/// Pixel width of `text` drawn with [`draw_text`].
pub fn text_width(text: &str) -> i32 {
    (text.chars().count() as i32 * 4 - 1).max(0)
}

/// Draw `text` horizontally centered on `cx`, with a drop shadow.
/// Unknown characters (including spaces) leave a blank cell.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let start_x = cx - text_width(text) / 2;
    for (i, ch) in text.chars().enumerate() {
        let Some(g) = glyph(ch) else { continue };
        let x = start_x + i as i32 * 4;
        for row in 0..5 {
            for col in 0..3 {
                if g[row * 3 + col] == 1 {
                    let px = x + col as i32;
                    let py = y + row as i32;
                    buf.set(px + 1, py + 1, SHADOW);
                    buf.set(px, py, fg);
                }
            }
        }
    }
}

// ── World to pixels ─────────────────────────────────────────────────────────

/// Uniform scale from world units to buffer pixels, centered.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub scale: f64,
    ox: f64,
    oy: f64,
    fw: f64,
    fh: f64,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize, fw: f64, fh: f64) -> Self {
        let scale = (pw as f64 / fw).min(ph as f64 / fh);
        Self {
            scale,
            ox: (pw as f64 - fw * scale) / 2.0,
            oy: (ph as f64 - fh * scale) / 2.0,
            fw,
            fh,
        }
    }

    pub fn px(&self, x: f64) -> i32 {
        (self.ox + x * self.scale).round() as i32
    }

    pub fn py(&self, y: f64) -> i32 {
        (self.oy + y * self.scale).round() as i32
    }

    /// Pixel columns covering world `x0..x1`, clipped to the field.
    pub fn xs(&self, x0: f64, x1: f64) -> Range<i32> {
        self.px(x0.clamp(0.0, self.fw))..self.px(x1.clamp(0.0, self.fw))
    }

    /// Pixel rows covering world `y0..y1`, clipped to the field.
    pub fn ys(&self, y0: f64, y1: f64) -> Range<i32> {
        self.py(y0.clamp(0.0, self.fh))..self.py(y1.clamp(0.0, self.fh))
    }

    /// At least `min` pixels.
    fn span(&self, world: f64, min: i32) -> i32 {
        ((world * self.scale).round() as i32).max(min)
    }
}

// ── Renderer ────────────────────────────────────────────────────────────────

pub struct Renderer {
    buf: PixelBuf,
}

impl Renderer {
    /// Sized for a terminal of `cols`×`rows` cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.buf.resize(cols as usize, rows as usize * 2);
    }

    pub fn buffer(&self) -> &PixelBuf {
        &self.buf
    }

    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        self.buf.render(out)
    }

    pub fn draw<S: SoundPlayer, B: ScoreStore>(&mut self, session: &Session<S, B>) {
        let field = &session.config().field;
        let vp = Viewport::fit(self.buf.w, self.buf.h, field.width, field.height);
        let buf = &mut self.buf;

        let all_x = 0..buf.w as i32;
        let all_y = 0..buf.h as i32;
        buf.fill(all_x, all_y, LETTERBOX);

        draw_sky(buf, &vp, field.height - field.ground_height);
        draw_pipes(buf, &vp, session);
        draw_cat(buf, &vp, session);
        draw_ground(buf, &vp, session);

        let cx = vp.px(field.width / 2.0);
        let top = vp.py(0.0);
        match session.state() {
            GameState::Start => draw_title(buf, &vp, cx, session.best()),
            GameState::Play => draw_text(buf, cx, top + 3, &session.score().to_string(), WHITE),
            GameState::Over => draw_game_over(buf, &vp, cx, session.score(), session.best()),
        }
    }
}

fn draw_sky(buf: &mut PixelBuf, vp: &Viewport, floor: f64) {
    let ys = vp.ys(0.0, floor);
    let span = (ys.end - ys.start).max(1);
    for y in ys.clone() {
        let t = ((y - ys.start) * 256 / span) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in vp.xs(0.0, vp.fw) {
            buf.set(x, y, c);
        }
    }
}

fn draw_pipes<S: SoundPlayer, B: ScoreStore>(
    buf: &mut PixelBuf,
    vp: &Viewport,
    session: &Session<S, B>,
) {
    let pipes = session.pipes();
    let cfg = pipes.config();
    let cap_h = vp.span(24.0, 1);
    let cap_extra = vp.span(4.0, 1);
    let pw = vp.span(cfg.width, 1);

    for pipe in pipes.iter() {
        let left = vp.px(pipe.x);
        let xs = vp.xs(pipe.x, pipe.x + cfg.width);
        let gap_top = pipes.gap_top(pipe);
        let gap_bot = pipes.gap_bottom(pipe);
        let upper = vp.ys(pipe.y, gap_top);
        let lower = vp.ys(gap_bot, gap_bot + cfg.segment_height);

        for x in xs {
            let c = pipe_shade(x - left, pw);
            for y in upper.clone().chain(lower.clone()) {
                buf.set(x, y, c);
            }
        }

        // Caps sit on the gap side of each segment, a little wider than the body.
        let cap_xs = vp.xs(pipe.x, pipe.x + cfg.width);
        let cap_xs =
            (cap_xs.start - cap_extra).max(vp.px(0.0))..(cap_xs.end + cap_extra).min(vp.px(vp.fw));
        let top_cap = vp.py(gap_top) - cap_h..vp.py(gap_top);
        let bot_cap = vp.py(gap_bot)..vp.py(gap_bot) + cap_h;
        for x in cap_xs {
            let c = pipe_shade(x - left + cap_extra, pw + cap_extra * 2);
            for y in top_cap.clone().chain(bot_cap.clone()) {
                if y >= vp.py(0.0) {
                    buf.set(x, y, c);
                }
            }
            buf.set(x, top_cap.end - 1, CAP_DARK);
            buf.set(x, bot_cap.start, CAP_DARK);
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// The cat faces right; rotation is approximated by shearing columns about
/// the body's center.
fn draw_cat<S: SoundPlayer, B: ScoreStore>(
    buf: &mut PixelBuf,
    vp: &Viewport,
    session: &Session<S, B>,
) {
    let cat = session.cat();
    let (cx, cy) = cat.center();
    let w = vp.span(cat.w, 4);
    let h = vp.span(cat.h, 3);
    let left = vp.px(cx) - w / 2;
    let top = vp.py(cy) - h / 2;
    let slope = cat.rotation.sin();
    let shift = |dx: i32| ((dx - w / 2) as f64 * slope).round() as i32;

    for dx in 0..w {
        let y0 = top + shift(dx);
        for dy in 0..h {
            let stripe = dx % 3 == 1 && dy < h / 2;
            buf.set(left + dx, y0 + dy, if stripe { CAT_STRIPE } else { CAT_FUR });
        }
    }

    // Ears
    for dx in [w - 1, w - 3] {
        buf.set(left + dx, top + shift(dx) - 1, CAT_FUR);
    }
    // Eye
    let ex = w - 2;
    buf.set(left + ex, top + shift(ex) + 1, CAT_EYE);
    buf.set(left + ex + 1, top + shift(ex + 1) + 1, CAT_PUPIL);
    // Nose
    buf.set(left + w - 1, top + shift(w - 1) + h / 2, CAT_NOSE);
    // Tail, curled up
    buf.set(left - 1, top + shift(-1) + 1, CAT_STRIPE);
    buf.set(left - 2, top + shift(-2), CAT_STRIPE);
}

fn draw_ground<S: SoundPlayer, B: ScoreStore>(
    buf: &mut PixelBuf,
    vp: &Viewport,
    session: &Session<S, B>,
) {
    let field = &session.config().field;
    let gy = vp.py(field.height - field.ground_height);
    let bottom = vp.py(field.height);
    let scroll = (session.ground_offset() * vp.scale).round() as i32;

    for x in vp.xs(0.0, field.width) {
        let gx = x - scroll;
        let alt = (gx / 3).rem_euclid(2) == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
        for y in (gy + 2)..bottom {
            let stripe = (gx + (y - gy) * 2).rem_euclid(12) < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn draw_title(buf: &mut PixelBuf, vp: &Viewport, cx: i32, best: u32) {
    let y = vp.py(vp.fh / 4.0);
    draw_text(buf, cx, y, "FLAPPY", TITLE);
    draw_text(buf, cx, y + 7, "CAT", TITLE);
    draw_text(buf, cx, y + 18, "TAP TO START", WHITE);
    if best > 0 {
        draw_text(buf, cx, y + 25, &format!("BEST {best}"), WHITE);
    }
}

fn draw_game_over(buf: &mut PixelBuf, vp: &Viewport, cx: i32, score: u32, best: u32) {
    // Dim the field
    for y in vp.ys(0.0, vp.fh) {
        for x in vp.xs(0.0, vp.fw) {
            let c = buf.get(x as usize, y as usize);
            buf.set(x, y, c.dim());
        }
    }

    let cy = vp.py(vp.fh / 2.0);
    let panel_w = text_width("GAME OVER") + 6;
    let panel_h = 26;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill(px - 1..px + panel_w + 1, py - 1..py + panel_h + 1, SHADOW);
    buf.fill(px..px + panel_w, py..py + panel_h, DIRT);
    buf.fill(px + 1..px + panel_w - 1, py + 1..py + panel_h - 1, PANEL);

    draw_text(buf, cx, py + 3, "GAME OVER", WHITE);
    draw_text(buf, cx, py + 11, &score.to_string(), WHITE);
    draw_text(buf, cx, py + 18, &format!("BEST {best}"), TITLE);
    draw_text(buf, cx, py + panel_h + 3, "TAP TO RESTART", WHITE);
}
