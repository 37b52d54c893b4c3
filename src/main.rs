use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{style, Print, Stylize},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use fifteen_puzzle::{
    astar, bfs, shuffle, Controller, Move, Puzzle, PuzzleConfig, Session, Ticker, CELLS, SIZE,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

const ORIGIN_X: u16 = 2;
const ORIGIN_Y: u16 = 2;
const CELL_WIDTH: u16 = 6;
const CELL_HEIGHT: u16 = 2;
const IDLE_POLL: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "fifteen", about = "The 15-puzzle with optimal hints", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Random blank moves used to scramble a new board
    #[arg(long, global = true, default_value_t = 50)]
    steps: usize,

    /// Seed for reproducible boards
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Most moves handed out by one hint
    #[arg(long, global = true, default_value_t = 10)]
    hint_len: usize,

    /// Milliseconds between auto-played hint moves
    #[arg(long, global = true, default_value_t = 600)]
    interval_ms: u64,

    /// Give up a hint search after expanding this many boards
    #[arg(long, global = true)]
    budget: Option<usize>,

    /// Only deal boards that need at least this many moves (at most 20)
    #[arg(long, global = true)]
    min_difficulty: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal (default)
    Play {
        /// Start from this board instead of a scramble, e.g. "1 2 3 4 ... 15 _"
        #[arg(long)]
        board: Option<String>,
    },

    /// Print a scrambled board
    Scramble,

    /// Fewest moves that solve a board
    Distance {
        /// 16 slots, blank written as 0, _ or .
        board: String,

        /// Stop searching past this many moves
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Show the first moves of an optimal solution
    Hint {
        /// 16 slots, blank written as 0, _ or .
        board: String,
    },
}

impl Cli {
    fn config(&self) -> PuzzleConfig {
        PuzzleConfig {
            shuffle_steps: self.steps,
            hint_len: self.hint_len,
            hint_interval: Duration::from_millis(self.interval_ms),
            hint_node_budget: self.budget,
            min_difficulty: self.min_difficulty,
            seed: self.seed,
        }
    }
}

/// Auto-play deadline polled by the terminal event loop.
#[derive(Debug, Default)]
struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    fn is_due(&self) -> bool {
        self.at.is_some_and(|at| at <= Instant::now())
    }

    fn timeout(&self) -> Duration {
        self.at
            .map_or(IDLE_POLL, |at| at.saturating_duration_since(Instant::now()))
    }
}

impl Ticker for Deadline {
    fn schedule(&mut self, after: Duration) {
        self.at = Some(Instant::now() + after);
    }

    fn cancel(&mut self) {
        self.at = None;
    }
}

fn parse_board(board: &str) -> Result<Puzzle> {
    board
        .parse()
        .with_context(|| format!("could not read board {:?}", board))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate()?;

    match cli.command.unwrap_or(Commands::Play { board: None }) {
        Commands::Play { board } => {
            let board = board.as_deref().map(parse_board).transpose()?;
            play(config, board)
        }
        Commands::Scramble => {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            println!("Initial Puzzle:\n{}", Puzzle::new());
            println!("Shuffled Puzzle:\n{}", shuffle::generate(&mut rng, &config));
            Ok(())
        }
        Commands::Distance { board, max_depth } => {
            let puzzle = parse_board(&board)?;
            let distance = match max_depth {
                Some(depth) => bfs::min_solution_length_within(&puzzle, depth),
                None => bfs::min_solution_length(&puzzle),
            };
            match distance {
                Some(moves) => println!("Solvable in {} moves", moves),
                None => println!("Unreachable"),
            }
            Ok(())
        }
        Commands::Hint { board } => {
            let mut current = parse_board(&board)?;
            let hint = astar::hint_with_budget(&current, config.hint_len, config.hint_node_budget);
            match hint.solution_len {
                Some(len) => println!("Found optimal solution with: {} moves", len),
                None => println!("No hint found"),
            }

            for next in hint.steps {
                let movement = Move::ALL
                    .into_iter()
                    .find(|&dir| current.neighbor(dir) == Some(next.blank()))
                    .context("hint step is not a single move")?;
                println!("{}\n{}", movement, next);
                current = next;
            }
            Ok(())
        }
    }
}

fn play(config: PuzzleConfig, board: Option<Puzzle>) -> Result<()> {
    let mut controller = match board {
        Some(puzzle) => Controller::with_puzzle(config, Deadline::default(), puzzle)?,
        None => Controller::new(config, Deadline::default())?,
    };

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let result = run(&mut stdout, &mut controller);

    execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run<W: Write>(out: &mut W, controller: &mut Controller<Deadline>) -> Result<()> {
    loop {
        draw(out, controller.session())?;

        if !event::poll(controller.ticker().timeout())? {
            if controller.ticker().is_due() {
                controller.tick();
            }
            continue;
        }

        match event::read()? {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Char('r') => controller.reset(),
                KeyCode::Char('h') => {
                    controller.request_hint();
                }
                code => {
                    // arrows name the direction a tile slides, the blank goes the other way
                    let tile = match code {
                        KeyCode::Up => Some(Move::Up),
                        KeyCode::Down => Some(Move::Down),
                        KeyCode::Left => Some(Move::Left),
                        KeyCode::Right => Some(Move::Right),
                        _ => None,
                    };
                    let puzzle = controller.session().puzzle();
                    let target = tile.and_then(|dir| puzzle.neighbor(dir.opposite()));
                    if let Some(index) = target {
                        controller.request_move(index);
                    }
                }
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if let Some(index) = cell_at(column, row) {
                    controller.request_move(index);
                }
            }
            _ => {}
        }
    }
}

fn cell_at(column: u16, row: u16) -> Option<usize> {
    let col = column.checked_sub(ORIGIN_X)? / CELL_WIDTH;
    let row = row.checked_sub(ORIGIN_Y)? / CELL_HEIGHT;
    let (col, row) = (col as usize, row as usize);
    (col < SIZE && row < SIZE).then_some(row * SIZE + col)
}

fn draw<W: Write>(out: &mut W, session: &Session) -> Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(ORIGIN_X, 0),
        Print("Fifteen".bold())
    )?;

    let puzzle = session.puzzle();
    for index in 0..CELLS {
        let x = ORIGIN_X + (index % SIZE) as u16 * CELL_WIDTH;
        let y = ORIGIN_Y + (index / SIZE) as u16 * CELL_HEIGHT;
        queue!(out, MoveTo(x, y))?;
        match puzzle.tile(index) {
            Some(label) => queue!(out, Print(format!("[{:>3}]", label)))?,
            None => queue!(out, Print("     "))?,
        }
    }

    let status_y = ORIGIN_Y + SIZE as u16 * CELL_HEIGHT;
    queue!(
        out,
        MoveTo(ORIGIN_X, status_y),
        Print(format!("Moves: {}", session.moves()))
    )?;
    if session.is_solved() {
        queue!(out, Print("  "), Print("Solved!".green().bold()))?;
    } else if session.has_pending_hint() {
        let left = session.pending_hint().count();
        queue!(out, Print(style(format!("  hint: {} to go", left)).yellow()))?;
    }
    queue!(
        out,
        MoveTo(ORIGIN_X, status_y + 2),
        Print("click or arrows: move   h: hint   r: new game   q: quit".dim())
    )?;

    out.flush()?;
    Ok(())
}
