//! Tick-driven animation adapters.
//!
//! The effect set is registered once per process; adapters look it up on
//! construction so the first one created performs the registration.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// An animation effect known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Looping carousel that wraps at both ends.
    CarouselLoop,
    /// Staggered, item-by-item reveal.
    Reveal,
}

/// Effects registered for this process.
#[derive(Debug)]
pub struct AnimationRegistry {
    effects: Vec<Effect>,
}

impl AnimationRegistry {
    /// Whether `effect` is registered.
    #[must_use]
    pub fn contains(&self, effect: Effect) -> bool {
        self.effects.contains(&effect)
    }
}

static REGISTRY: OnceLock<AnimationRegistry> = OnceLock::new();

/// Registers the animation effects, once per process.
///
/// Later calls return the registry created by the first call.
pub fn register_animations() -> &'static AnimationRegistry {
    REGISTRY.get_or_init(|| {
        tracing::debug!("registering animation effects");
        AnimationRegistry {
            effects: vec![Effect::CarouselLoop, Effect::Reveal],
        }
    })
}

/// Looping index over a fixed number of slots.
#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    index: usize,
    advance_every: u32,
    countdown: u32,
    active: bool,
}

impl Carousel {
    /// Creates an inactive carousel that auto-advances every `advance_every`
    /// ticks once active.
    #[must_use]
    pub fn new(advance_every: u32) -> Self {
        register_animations();
        let advance_every = advance_every.max(1);
        Self {
            len: 0,
            index: 0,
            advance_every,
            countdown: advance_every,
            active: false,
        }
    }

    /// Whether a carousel over a section should run: a limit is set, items
    /// are present, nothing is loading and there is no error.
    #[must_use]
    pub const fn should_run(limit: Option<usize>, items: usize, loading: bool, failed: bool) -> bool {
        limit.is_some() && items > 0 && !loading && !failed
    }

    /// Updates the slot count and whether the carousel runs.
    pub const fn configure(&mut self, len: usize, active: bool) {
        self.len = len;
        self.active = active && len > 0;
        if self.index >= len {
            self.index = 0;
        }
    }

    /// Current slot.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether ticks advance the carousel.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Moves one slot forward, wrapping to the first slot.
    pub const fn next(&mut self) {
        self.step_forward();
        self.countdown = self.advance_every;
    }

    /// Moves one slot back, wrapping to the last slot.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn prev(&mut self) {
        if self.len == 0 {
            return;
        }
        self.index = if self.index == 0 {
            self.len - 1
        } else {
            self.index - 1
        };
        self.countdown = self.advance_every;
    }

    /// Advances the auto-advance countdown by one tick.
    pub const fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.step_forward();
            self.countdown = self.advance_every;
        }
    }

    /// Slots in display order starting at the current one, `count` at most.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn window(&self, count: usize) -> impl Iterator<Item = usize> + '_ {
        (0..count.min(self.len)).map(move |offset| (self.index + offset) % self.len)
    }

    #[allow(clippy::arithmetic_side_effects)]
    const fn step_forward(&mut self) {
        if self.len == 0 {
            return;
        }
        self.index = (self.index + 1) % self.len;
    }
}

/// Staggered reveal of a keyed list: one more item per tick.
///
/// The reveal restarts whenever the set of keys changes.
#[derive(Debug, Clone, Default)]
pub struct Reveal {
    identity: u64,
    total: usize,
    visible: usize,
}

impl Reveal {
    /// Creates an empty reveal.
    #[must_use]
    pub fn new() -> Self {
        register_animations();
        Self::default()
    }

    /// Tracks `keys`, restarting when they differ from the previous set.
    pub fn sync<K: Hash>(&mut self, keys: &[K]) {
        let mut hasher = DefaultHasher::new();
        keys.hash(&mut hasher);
        let identity = hasher.finish();
        if identity != self.identity || keys.len() != self.total {
            self.identity = identity;
            self.total = keys.len();
            self.visible = 0;
        }
    }

    /// Reveals one more item.
    pub fn tick(&mut self) {
        self.visible = self.visible.saturating_add(1).min(self.total);
    }

    /// Number of items currently visible.
    #[must_use]
    pub const fn visible(&self) -> usize {
        self.visible
    }

    /// Whether every item is visible.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.visible == self.total
    }
}
