use std::io;
use std::io::Write;
use std::thread;
use std::time;
use std::time::Duration;

use anyhow::Context;
use anyhow::bail;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cellscape::camera;
use cellscape::camera::Camera;
use cellscape::config::Config;
use cellscape::events::AppEvent;
use cellscape::events::Event;
use cellscape::rule_set::RuleSet;
use cellscape::session::AGENT_RADIUS;
use cellscape::session::FrameInput;
use cellscape::session::LifeSession;
use cellscape::session::Phase;
use cellscape::session::TerrainSession;

const FRAMERATE: u32 = 60;
const FRAMETIME: time::Duration =
    time::Duration::from_millis(((1f64 / FRAMERATE as f64) * 1_000f64) as u64);

const USAGE: &str = "usage: cellscape [life|terrain] [--rule B3/S23] [--tick-speed N]";

enum Game {
    Life(LifeSession),
    Terrain(TerrainSession),
}

struct Args {
    terrain: bool,
    rules: RuleSet,
    tick_speed: u32,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        terrain: false,
        rules: RuleSet::default(),
        tick_speed: 1,
    };

    let mut it = std::env::args().skip(1);

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "life" => args.terrain = false,
            "terrain" => args.terrain = true,
            "--rule" => {
                let rule = it.next().context("--rule expects a rulestring")?;
                args.rules = rule
                    .parse()
                    .with_context(|| format!("Invalid rule \"{rule}\""))?;
            }
            "--tick-speed" => {
                let n = it.next().context("--tick-speed expects a number")?;
                args.tick_speed = n
                    .parse()
                    .with_context(|| format!("Invalid tick speed \"{n}\""))?;
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("Unrecognized argument \"{other}\"\n{USAGE}"),
        }
    }

    Ok(args)
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't tear the frame drawn on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args()?;

    let game = if args.terrain {
        let config = Config::default().with_tick_speed(args.tick_speed);
        Game::Terrain(TerrainSession::new(&config).context("Failed to build terrain session")?)
    } else {
        let config = Config::life().with_tick_speed(args.tick_speed);
        Game::Life(LifeSession::new(&config, args.rules).context("Failed to build life session")?)
    };

    terminal::enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

    let res = run(game);

    execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    res
}

fn run(mut game: Game) -> anyhow::Result<()> {
    let mut stdout = io::stdout();

    let mut cam = match &game {
        Game::Life(session) => camera::for_grid(session.grid()),
        Game::Terrain(session) => Camera::new(
            session.scroll().viewport_width(),
            session.scroll().viewport_height(),
        ),
    };

    let mut frame: u64 = 0;
    info!("Entering main loop");

    loop {
        let t = time::Instant::now();
        let mut input = FrameInput::default();

        // Drain every event that arrived during this frame
        while event::poll(Duration::ZERO)? {
            match cellscape::io::convert_event(event::read()?) {
                None => {}
                Some(Event::AppEvent(AppEvent::Exit)) => return Ok(()),
                Some(Event::GameEvent(e)) => cellscape::io::apply(&mut input, e),
            }
        }

        cam.reset();

        let (phase, status) = match &mut game {
            Game::Life(session) => {
                session.update(input);
                cam.draw_grid(session.grid());

                let status = format!("generation {}", session.generation());
                (session.phase(), status)
            }
            Game::Terrain(session) => {
                session.update(input);
                cam.draw_terrain(session.scroll());
                cam.draw_agent(session.agent(), AGENT_RADIUS, frame);

                let status = format!("lives {}", session.agent().lives);
                (session.phase(), status)
            }
        };

        queue!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        match phase {
            Phase::Title => queue!(stdout, style::Print("Press X to start"))?,
            Phase::GameOver => queue!(stdout, style::Print("Game over. Press X to restart"))?,
            Phase::Running => {
                for line in cam.render().lines() {
                    queue!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
                }
                queue!(stdout, style::Print(status))?;
            }
        }

        stdout.flush()?;

        frame += 1;
        let time_left = FRAMETIME.saturating_sub(t.elapsed());
        thread::sleep(time_left);
    }
}
