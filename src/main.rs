use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use unicode_width::UnicodeWidthStr;

use zombie_maze::constants::TILE_SIZE;
use zombie_maze::{seeded_rng, Config, Dir, EntityKind, Game, GameRng, GameState, TilePos, Vec2};

const CELL_W: usize = 2;
const RENDER_FPS: u64 = 60;
const INPUT_HOLD_MS: u64 = 160;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Agent,
    Key,
    Projectile,
    Wall,
    Floor,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    width: usize,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Floor,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            width,
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

struct Input {
    last_seen: [Option<Instant>; 4],
    last_pressed: Option<Dir>,
}

impl Input {
    fn press(&mut self, dir: Dir) {
        self.last_seen[idx_for_dir(dir)] = Some(Instant::now());
        self.last_pressed = Some(dir);
    }

    /// Terminals report no key releases, so a key counts as held for a short window.
    fn held(&self) -> Option<Dir> {
        let now = Instant::now();
        let hold = Duration::from_millis(INPUT_HOLD_MS);
        if let Some(dir) = self.last_pressed {
            if let Some(t) = self.last_seen[idx_for_dir(dir)] {
                if now.duration_since(t) <= hold {
                    return Some(dir);
                }
            }
        }
        Dir::ALL
            .iter()
            .filter_map(|dir| {
                let t = self.last_seen[idx_for_dir(*dir)]?;
                (now.duration_since(t) <= hold).then_some((*dir, t))
            })
            .max_by_key(|(_, t)| *t)
            .map(|(dir, _)| dir)
    }

    fn vector(&self) -> Vec2 {
        match self.held() {
            Some(dir) => {
                let (dx, dy) = dir.delta();
                Vec2::new(dx as f32, dy as f32)
            }
            None => Vec2::ZERO,
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();
    setup_logging()?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// File-only logging; the terminal belongs to the game.
fn setup_logging() -> Result<()> {
    let log_dir = std::env::var_os("ZOMBIE_MAZE_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "zombie-maze.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer alive for the whole process.
    std::mem::forget(guard);

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(())
}

fn run(stdout: &mut Stdout, config: Config) -> Result<()> {
    let mut rng: GameRng = seeded_rng(config.seed);
    let tick_time = Duration::from_millis(config.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / RENDER_FPS);
    let mut game = Game::start(config, &mut rng)?;
    let mut renderer = Renderer::new(game.grid().width(), game.grid().height());
    let mut input = Input {
        last_seen: [None; 4],
        last_pressed: None,
    };
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('w') | KeyCode::Char('k') => input.press(Dir::Up),
                    KeyCode::Char('s') | KeyCode::Char('j') => input.press(Dir::Down),
                    KeyCode::Char('a') | KeyCode::Char('h') => input.press(Dir::Left),
                    KeyCode::Char('d') | KeyCode::Char('l') => input.press(Dir::Right),
                    KeyCode::Char('f') => {
                        game.fire();
                    }
                    KeyCode::Char(' ') if game.state() == GameState::LevelComplete => {
                        game.next_level(&mut rng)?;
                        renderer = Renderer::new(game.grid().width(), game.grid().height());
                        stdout.queue(Clear(ClearType::All))?;
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_time {
            last_tick = Instant::now();
            game.tick(input.vector(), &mut rng);
        }
        render(stdout, &game, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn tile_of(centre: Vec2) -> Option<TilePos> {
    if centre.x < 0.0 || centre.y < 0.0 {
        return None;
    }
    Some(TilePos::new(
        (centre.x / TILE_SIZE) as usize,
        (centre.y / TILE_SIZE) as usize,
    ))
}

fn frame(game: &Game) -> Vec<Cell> {
    let grid = game.grid();
    let mut cells: Vec<Cell> = grid
        .cells()
        .map(|(_, cell)| match cell {
            zombie_maze::Cell::Wall => Cell {
                glyph: Glyph::Wall,
                color: Color::DarkGrey,
            },
            zombie_maze::Cell::Open => Cell {
                glyph: Glyph::Floor,
                color: Color::Reset,
            },
        })
        .collect();

    let mut put = |pos: Option<TilePos>, cell: Cell| {
        if let Some(pos) = pos.filter(|p| grid.in_bounds(*p)) {
            cells[pos.y * grid.width() + pos.x] = cell;
        }
    };
    // Later layers draw over earlier ones.
    for kind in [EntityKind::Key, EntityKind::Projectile, EntityKind::Agent] {
        let layer = game
            .arena()
            .iter()
            .filter(|(_, entity)| entity.is_active() && entity.kind() == kind);
        for (_, entity) in layer {
            let cell = match kind {
                EntityKind::Key => Cell {
                    glyph: Glyph::Key,
                    color: Color::Yellow,
                },
                EntityKind::Projectile => Cell {
                    glyph: Glyph::Projectile,
                    color: Color::White,
                },
                EntityKind::Agent => Cell {
                    glyph: Glyph::Agent,
                    color: Color::Red,
                },
                EntityKind::Wall => continue,
            };
            put(tile_of(entity.body().aabb().center()), cell);
        }
    }
    put(
        tile_of(game.player().center()),
        Cell {
            glyph: Glyph::Player,
            color: Color::Cyan,
        },
    );
    cells
}

fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let width = game.grid().width();
    let height = game.grid().height();
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let active_agents = game.agents().filter(|(_, a)| a.is_active()).count();
    let hud = match game.state() {
        GameState::Playing => format!(
            "Keys: {}/{}  Level: {}  Zombies: {}  (f fire, q quit)",
            game.player().keys(),
            game.keys_required(),
            game.level().index(),
            active_agents
        ),
        GameState::LevelComplete => format!(
            "Level {} complete! Press SPACE for level {}",
            game.level().index(),
            game.level().index() + 1
        ),
    };
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for (idx, cell) in frame(game).into_iter().enumerate() {
        if renderer.needs_full || cell != renderer.last[idx] {
            renderer.last[idx] = cell;
            draw_cell(stdout, renderer, idx % renderer.width, idx / renderer.width, cell)?;
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "@ ",
        Glyph::Agent => "Z ",
        Glyph::Key => "k ",
        Glyph::Projectile => "* ",
        Glyph::Wall => "██",
        Glyph::Floor => "  ",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}
