//! Per-frame drivers for the two games.
//!
//! A session owns all of its state. The host calls `update` once per rendered frame with that
//! frame's [`FrameInput`], then draws from the session's accessors.

use tracing::info;

use crate::automaton::Automaton;
use crate::bit_grid::BitGrid;
use crate::config::Config;
use crate::config::ConfigError;
use crate::point::Point;
use crate::rule_set::RuleSet;
use crate::scroll::ScrollBuffer;

pub const START_LIVES: u8 = 3;

/// Frames of invulnerability after a hit.
pub const BLINK_FRAMES: u32 = 60;

/// Viewport pixels the agent moves per frame.
pub const AGENT_SPEED: i32 = 1;

/// Half the side of the agent's collision box, in viewport pixels.
pub const AGENT_RADIUS: i32 = 2;

/// What the player asked for this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Start, or restart, a run
    pub start: bool,

    /// Movement intent, each component in `-1..=1`
    pub direction: (i8, i8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player to press start
    Title,
    Running,
    GameOver,
}

pub struct LifeSession {
    grid: BitGrid,
    automaton: Automaton,
    phase: Phase,

    /// Frames seen so far. Seeds the grid on start.
    frames: u64,
    tick_speed: u32,
}

impl LifeSession {
    pub fn new(config: &Config, rules: RuleSet) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            grid: BitGrid::new(config.width, config.height)?,
            automaton: Automaton::new(rules, config.width, config.height)?,
            phase: Phase::Title,
            frames: 0,
            tick_speed: config.tick_speed,
        })
    }

    pub fn update(&mut self, input: FrameInput) {
        self.frames += 1;

        // The start frame also counts as a running frame
        if input.start {
            self.grid.randomize(self.frames);
            self.automaton.reset();
            self.phase = Phase::Running;
            info!(seed = self.frames, "Life started");
        }

        if self.phase != Phase::Running {
            return;
        }

        if self.frames % self.tick_speed as u64 == 0 {
            self.automaton.advance(&mut self.grid);
        }
    }

    pub fn grid(&self) -> &BitGrid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.automaton.generation()
    }
}

/// The player's ship in the terrain game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub pos: Point,
    pub lives: u8,

    /// Frames of invulnerability left
    pub blink: u32,
}

impl Agent {
    pub fn is_blinking(&self) -> bool {
        self.blink > 0
    }
}

pub struct TerrainSession {
    scroll: ScrollBuffer,
    agent: Agent,
    phase: Phase,
    frames: u64,
    tick_speed: u32,
}

impl TerrainSession {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let scroll = ScrollBuffer::new(config, 0)?;
        let agent = Self::spawn_agent(&scroll);

        Ok(Self {
            scroll,
            agent,
            phase: Phase::Title,
            frames: 0,
            tick_speed: config.tick_speed,
        })
    }

    /// Start a run on an existing scroll buffer.
    pub fn with_scroll(config: &Config, scroll: ScrollBuffer) -> Result<Self, ConfigError> {
        config.validate()?;
        let agent = Self::spawn_agent(&scroll);

        Ok(Self {
            scroll,
            agent,
            phase: Phase::Running,
            frames: 0,
            tick_speed: config.tick_speed,
        })
    }

    /// Centered horizontally, a few cells above the bottom of the viewport.
    fn spawn_agent(scroll: &ScrollBuffer) -> Agent {
        let x = scroll.viewport_width() / 2;
        let y = scroll
            .viewport_height()
            .saturating_sub(4 * AGENT_RADIUS as usize);

        Agent {
            pos: Point::new(x as i32, y as i32),
            lives: START_LIVES,
            blink: 0,
        }
    }

    pub fn update(&mut self, input: FrameInput) {
        self.frames += 1;

        if input.start {
            self.restart();
            return;
        }

        if self.phase != Phase::Running {
            return;
        }

        let (dx, dy) = input.direction;
        self.agent.pos = self.agent.pos.moved_within(
            dx.signum() as i32 * AGENT_SPEED,
            dy.signum() as i32 * AGENT_SPEED,
            self.scroll.viewport_width(),
            self.scroll.viewport_height(),
        );

        if self.frames % self.tick_speed as u64 == 0 {
            self.scroll.tick();
        }

        if self.agent.is_blinking() {
            self.agent.blink -= 1;
        } else if self.scroll.collide(self.agent.pos, AGENT_RADIUS) {
            self.agent.lives = self.agent.lives.saturating_sub(1);
            self.agent.blink = BLINK_FRAMES;

            if self.agent.lives == 0 {
                self.phase = Phase::GameOver;
                info!(
                    generation = self.scroll.generation(),
                    frames = self.frames,
                    "Game over"
                );
            }
        }
    }

    fn restart(&mut self) {
        self.scroll.reset(self.frames);
        self.agent = Self::spawn_agent(&self.scroll);
        self.phase = Phase::Running;
        info!(seed = self.frames, "Terrain run started");
    }

    pub fn scroll(&self) -> &ScrollBuffer {
        &self.scroll
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}
