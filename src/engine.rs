//! Dispatch engine.
//!
//! The engine owns the [`EngineState`], the settings store and the strip.
//! Every [`Engine::tick`] runs the current phase handler once, renders the
//! phase unless told not to, commits or drops a pending edit when the phase
//! ends, and moves to the successor declared in the phase table.

use embassy_time::Duration;
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::StripDriver;
use crate::display::DisplayValue;
use crate::input::ButtonEvent;
use crate::modes::ModeRun;
use crate::navigator::{EditSession, Gesture, MENU_TIMEOUT};
use crate::phase::{EndMode, PhaseId, Scope, Target};
use crate::prng::Prng;
use crate::settings::{ConfigChannel, Settings, WorkingMode};
use crate::store::{ConfigStore, StoreError};

/// Period the engine is designed to be ticked at
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

const ZERO: Duration = Duration::from_ticks(0);

/// Board specific values supplied at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed of the generator behind the traffic light hold and order.
    ///
    /// Persist [`TickReport::rng_state`] and pass it back here on the next
    /// boot, otherwise every power cycle replays the same draws.
    pub seed: u16,
    /// Latest battery voltage, if the board measures it
    pub battery_millivolts: Option<u16>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            battery_millivolts: None,
        }
    }
}

/// Mutable run-time state, threaded through every handler and renderer
#[derive(Debug, Clone)]
pub struct EngineState {
    pub(crate) phase: PhaseId,
    pub(crate) in_phase: Duration,
    pub(crate) settings: Settings,
    pub(crate) edit: Option<EditSession>,
    pub(crate) gesture: Gesture,
    pub(crate) menu_idle: Duration,
    pub(crate) run: ModeRun,
    pub(crate) config_requested: bool,
    pub(crate) exit_requested: bool,
    /// Button level as last reported, kept across phase changes
    pub(crate) button_held: bool,
    pub(crate) battery_millivolts: Option<u16>,
    pub(crate) rng: Prng,
}

impl EngineState {
    /// Power-up state: [`PhaseId::Idle`] with the stored settings
    pub fn new(settings: Settings, config: EngineConfig) -> Self {
        Self {
            phase: PhaseId::Idle,
            in_phase: ZERO,
            settings,
            edit: None,
            gesture: Gesture::Up,
            menu_idle: ZERO,
            run: ModeRun::Inactive,
            config_requested: false,
            exit_requested: false,
            button_held: false,
            battery_millivolts: config.battery_millivolts,
            rng: Prng::new(config.seed),
        }
    }

    pub const fn phase(&self) -> PhaseId {
        self.phase
    }

    /// Time spent in the current phase
    pub const fn in_phase(&self) -> Duration {
        self.in_phase
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Channel shown by the current config phase
    pub const fn selected_channel(&self) -> Option<ConfigChannel> {
        self.phase.config_channel()
    }

    /// Value being edited, not yet persisted
    pub fn pending_value(&self) -> Option<u8> {
        self.edit.map(|session| session.value())
    }

    pub const fn run(&self) -> &ModeRun {
        &self.run
    }

    pub const fn battery_millivolts(&self) -> Option<u16> {
        self.battery_millivolts
    }

    /// Generator state, the seed for the next boot
    pub const fn rng_state(&self) -> u16 {
        self.rng.state()
    }

    pub const fn working_mode(&self) -> WorkingMode {
        self.settings.working_mode()
    }

    /// Whether configuration should be left without waiting for the user
    fn leaving_config(&self) -> bool {
        let committing = self.edit.is_some_and(|session| session.is_committing());
        (self.exit_requested || self.menu_idle >= MENU_TIMEOUT) && !committing
    }

    fn resolve(&mut self, target: Target) -> PhaseId {
        match target {
            Target::Phase(id) => id,
            Target::Root if core::mem::take(&mut self.config_requested) => PhaseId::Config,
            Target::Root => match self.settings.working_mode() {
                WorkingMode::PedestrianInterval => PhaseId::PedestrianInterval,
                WorkingMode::TrafficLight => PhaseId::TrafficLight,
            },
        }
    }

    fn enter(&mut self, target: Target) -> PhaseId {
        let next = self.resolve(target);
        self.phase = next;
        self.in_phase = ZERO;
        self.edit = None;
        self.gesture = Gesture::Up;
        if next.scope() != Scope::Config {
            self.menu_idle = ZERO;
            self.exit_requested = false;
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PhaseId,
    pub to: PhaseId,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Phase whose handler ran
    pub phase: PhaseId,
    pub end: EndMode,
    /// Whether a frame was sent to the strip
    pub rendered: bool,
    pub transition: Option<Transition>,
    /// Channel and value written to the store
    pub committed: Option<(ConfigChannel, u8)>,
    /// Failed store write, the previous value stays in effect
    pub store_error: Option<StoreError>,
    /// New generator state when this tick drew from it
    pub rng_state: Option<u16>,
}

pub struct Engine<S, D> {
    state: EngineState,
    store: S,
    strip: D,
    config: EngineConfig,
}

impl<S: ConfigStore, D: StripDriver> Engine<S, D> {
    /// Loads the settings and starts in [`PhaseId::Idle`]
    pub fn new(mut store: S, strip: D, config: EngineConfig) -> Self {
        let settings = store.load();
        Self {
            state: EngineState::new(settings, config),
            store,
            strip,
            config,
        }
    }

    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    pub const fn phase(&self) -> PhaseId {
        self.state.phase
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub const fn strip(&self) -> &D {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut D {
        &mut self.strip
    }

    pub fn into_parts(self) -> (S, D) {
        (self.store, self.strip)
    }

    pub fn set_battery_millivolts(&mut self, millivolts: Option<u16>) {
        self.state.battery_millivolts = millivolts;
    }

    /// Requests leaving configuration without saving.
    ///
    /// Takes effect on the next tick, or after a commit in progress.
    /// Returns `false` outside configuration.
    pub fn exit_config(&mut self) -> bool {
        if self.state.phase.scope() != Scope::Config {
            return false;
        }
        self.state.exit_requested = true;
        true
    }

    /// Power cycle: reload settings and start over from [`PhaseId::Idle`]
    pub fn reset(&mut self) {
        let settings = self.store.load();
        let rng = self.state.rng;
        let battery = self.state.battery_millivolts;
        self.state = EngineState::new(settings, self.config);
        self.state.rng = rng;
        self.state.battery_millivolts = battery;
    }

    /// Runs one tick of the current phase
    pub fn tick(&mut self, input: Option<ButtonEvent>, elapsed: Duration) -> TickReport {
        let from = self.state.phase;
        let descriptor = from.descriptor();
        let in_config = descriptor.is_config();

        self.state.in_phase += elapsed;
        match input {
            Some(ButtonEvent::Pressed | ButtonEvent::LongPressed) => self.state.button_held = true,
            Some(ButtonEvent::Released) => self.state.button_held = false,
            None => {}
        }
        if in_config {
            self.state.menu_idle = match input {
                Some(_) => ZERO,
                None => self.state.menu_idle + elapsed,
            };
        }

        let rng_before = self.state.rng;
        let mut end = (descriptor.handler)(&mut self.state, input, elapsed);
        let rng_state = (self.state.rng != rng_before).then(|| self.state.rng.state());
        let mut next = descriptor.next.resolve(end);

        if in_config && end != EndMode::EndSaving && self.state.leaving_config() {
            #[cfg(feature = "esp32-log")]
            println!("[Engine] leaving configuration from {:?} without saving", from);
            end = EndMode::EndNotSaving;
            next = Some(Target::Root);
        }

        let rendered = end != EndMode::ContinueNoRender;
        if rendered {
            let mut frame = DisplayValue::new(self.state.settings.brightness());
            (descriptor.render)(&self.state, &mut frame);
            self.strip.render(&frame);
        }

        let mut committed = None;
        let mut store_error = None;
        if end == EndMode::EndSaving {
            if let Some((channel, value)) = self
                .state
                .edit
                .and_then(|session| session.committed_value().map(|v| (session.channel(), v)))
            {
                match self.store.save(channel, value) {
                    Ok(()) => {
                        #[cfg(feature = "esp32-log")]
                        println!("[Engine] saved {} = {}", channel.as_str(), value);
                        self.state.settings.set(channel, value);
                        committed = Some((channel, value));
                    }
                    Err(err) => {
                        #[cfg(feature = "esp32-log")]
                        println!("[Engine] failed to save {}: {}", channel.as_str(), err);
                        store_error = Some(err);
                    }
                }
            }
        }

        let transition = next.map(|target| {
            let to = self.state.enter(target);
            #[cfg(feature = "esp32-log")]
            println!("[Engine] {:?} -> {:?}", from, to);
            Transition { from, to }
        });

        TickReport {
            phase: from,
            end,
            rendered,
            transition,
            committed,
            store_error,
            rng_state,
        }
    }

    /// Ticks once per input sample, `period` apart, until the source ends.
    ///
    /// Returns the report of the last tick.
    pub fn run<I>(&mut self, inputs: I, period: Duration) -> Option<TickReport>
    where
        I: IntoIterator<Item = Option<ButtonEvent>>,
    {
        inputs.into_iter().map(|input| self.tick(input, period)).last()
    }
}
