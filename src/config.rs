use thiserror::Error;

/// Side length of the life grid, in cells.
pub const LIFE_GRID_SIZE: usize = 160;

/// Side length of the terrain grid, in cells.
pub const TERRAIN_GRID_SIZE: usize = 40;

pub const SMOOTHING_PASSES: u32 = 5;
pub const MAJORITY_THRESHOLD: u8 = 5;
pub const CONNECTIVITY_THRESHOLD: u8 = 4;

/// Viewport pixels per terrain cell. The scroll wrap period is `height * DISPLAY_SCALE` rows.
pub const DISPLAY_SCALE: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid width must be positive")]
    ZeroWidth,

    #[error("Grid height must be positive")]
    ZeroHeight,

    #[error("Display scale must be positive")]
    ZeroScale,

    #[error("Tick speed must be at least one frame per tick")]
    ZeroTickSpeed,

    #[error("Majority threshold {got} is above the 8 neighbors a cell has")]
    ThresholdOutOfRange { got: u8 },

    #[error("Viewport of {width}x{height} grid cells at scale {scale} does not fit in i32 pixels")]
    ViewportTooLarge {
        width: usize,
        height: usize,
        scale: usize,
    },

    #[error("Expected grid dimensions {expected:?}, got {got:?}")]
    GridMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
}

/// Construction-time parameters shared by the terrain pipeline and the sessions.
///
/// Everything here is fixed once a session is built. Call [`Config::validate`] (the session and
/// grid constructors do) before using the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub smoothing_passes: u32,
    pub majority_threshold: u8,
    pub connectivity_threshold: u8,
    pub display_scale: usize,

    /// Frames per simulated tick
    pub tick_speed: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: TERRAIN_GRID_SIZE,
            height: TERRAIN_GRID_SIZE,
            smoothing_passes: SMOOTHING_PASSES,
            majority_threshold: MAJORITY_THRESHOLD,
            connectivity_threshold: CONNECTIVITY_THRESHOLD,
            display_scale: DISPLAY_SCALE,
            tick_speed: 1,
        }
    }
}

impl Config {
    /// Defaults for the life game: a square `LIFE_GRID_SIZE` torus drawn at one pixel per cell.
    pub fn life() -> Self {
        Self {
            width: LIFE_GRID_SIZE,
            height: LIFE_GRID_SIZE,
            display_scale: 1,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_smoothing_passes(mut self, passes: u32) -> Self {
        self.smoothing_passes = passes;
        self
    }

    pub fn with_display_scale(mut self, scale: usize) -> Self {
        self.display_scale = scale;
        self
    }

    pub fn with_tick_speed(mut self, tick_speed: u32) -> Self {
        self.tick_speed = tick_speed;
        self
    }

    /// Number of scroll ticks before the `next` terrain grid is promoted.
    pub fn scroll_wrap_rows(&self) -> usize {
        self.height * self.display_scale
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }

        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }

        if self.display_scale == 0 {
            return Err(ConfigError::ZeroScale);
        }

        if self.tick_speed == 0 {
            return Err(ConfigError::ZeroTickSpeed);
        }

        // Viewport pixels are addressed with `i32` points
        let fits = |cells: usize| {
            cells
                .checked_mul(self.display_scale)
                .is_some_and(|px| i32::try_from(px).is_ok())
        };

        if !fits(self.width) || !fits(self.height) {
            return Err(ConfigError::ViewportTooLarge {
                width: self.width,
                height: self.height,
                scale: self.display_scale,
            });
        }

        if self.majority_threshold > 8 {
            return Err(ConfigError::ThresholdOutOfRange {
                got: self.majority_threshold,
            });
        }

        Ok(())
    }
}
