//! The phase table.
//!
//! Every phase of the board is a [`PhaseDescriptor`]: a handler that consumes
//! one tick of input, a renderer that draws the phase, and the successors to
//! take when the handler ends the phase. [`PHASE_TABLE`] is indexed by
//! [`PhaseId`] and checked at compile time.

use embassy_time::Duration;

use crate::display::DisplayValue;
use crate::engine::EngineState;
use crate::input::ButtonEvent;
use crate::modes::{config, lock, pedestrian, root, traffic};
use crate::settings::ConfigChannel;

/// Result of one handler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndMode {
    /// Stay in the phase and render it
    Continue,
    /// Stay in the phase and leave the strip as it is
    ContinueNoRender,
    /// Leave the phase, committing the pending edit
    EndSaving,
    /// Leave the phase without committing anything
    EndNotSaving,
}

impl EndMode {
    pub const fn is_end(self) -> bool {
        matches!(self, Self::EndSaving | Self::EndNotSaving)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PhaseId {
    Idle,
    Config,
    PedestrianInterval,
    TrafficLight,
    Lock,

    ConfigBegin,
    ConfigBrightness,
    ConfigMode,
    ConfigSequence,
    ConfigTimer1,
    ConfigTimer2,
    ConfigLightMin,
    ConfigLightMax,
    ConfigEnd,

    LockStart,
    LockOn,
    LockOff,

    PitCountdown,
    PitYellow,
    PitGreenToBlack,
    PitRedPre,
    PitRedCountdown,
    PitFinalGreen,

    TrafficYellowPre,
    TrafficSlalom,
    TrafficShowRandom,
    TrafficPower,
}

pub const PHASE_COUNT: usize = PhaseId::TrafficPower as usize + 1;

impl PhaseId {
    /// Channel edited in this phase, for the config channel phases
    pub const fn config_channel(self) -> Option<ConfigChannel> {
        match self {
            Self::ConfigBrightness => Some(ConfigChannel::Brightness),
            Self::ConfigMode => Some(ConfigChannel::Mode),
            Self::ConfigSequence => Some(ConfigChannel::Sequence),
            Self::ConfigTimer1 => Some(ConfigChannel::Timer1),
            Self::ConfigTimer2 => Some(ConfigChannel::Timer2),
            Self::ConfigLightMin => Some(ConfigChannel::LightDurationMin),
            Self::ConfigLightMax => Some(ConfigChannel::LightDurationMax),
            _ => None,
        }
    }

    pub fn scope(self) -> Scope {
        self.descriptor().scope
    }

    pub fn descriptor(self) -> &'static PhaseDescriptor {
        &PHASE_TABLE[self as usize]
    }
}

/// Subtree a phase belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Boot,
    Root,
    Config,
    Pedestrian,
    Traffic,
    /// Closed subtree, only a power cycle leaves it
    Lock,
}

/// Where a phase goes when it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Phase(PhaseId),
    /// Root dispatch: configuration when requested at boot, otherwise the
    /// root of the working mode
    Root,
}

/// Phases reachable through [`Target::Root`]
pub const ROOT_CANDIDATES: [PhaseId; 3] = [
    PhaseId::Config,
    PhaseId::PedestrianInterval,
    PhaseId::TrafficLight,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Successors {
    /// Same successor for both end modes
    One(Target),
    Two { saved: Target, discarded: Target },
}

impl Successors {
    /// Successor for an end mode, `None` when the phase continues
    pub const fn resolve(self, end: EndMode) -> Option<Target> {
        match (self, end) {
            (_, EndMode::Continue | EndMode::ContinueNoRender) => None,
            (Self::One(target), _) => Some(target),
            (Self::Two { saved, .. }, EndMode::EndSaving) => Some(saved),
            (Self::Two { discarded, .. }, EndMode::EndNotSaving) => Some(discarded),
        }
    }
}

pub type PhaseHandler = fn(&mut EngineState, Option<ButtonEvent>, Duration) -> EndMode;
pub type PhaseRenderer = fn(&EngineState, &mut DisplayValue);

#[derive(Debug, Clone, Copy)]
pub struct PhaseDescriptor {
    pub id: PhaseId,
    pub scope: Scope,
    pub handler: PhaseHandler,
    pub render: PhaseRenderer,
    pub next: Successors,
}

impl PhaseDescriptor {
    /// Whether the phase belongs to the closed lock subtree
    pub const fn is_terminal(&self) -> bool {
        matches!(self.scope, Scope::Lock)
    }

    pub const fn is_config(&self) -> bool {
        matches!(self.scope, Scope::Config)
    }
}

const fn phase(
    id: PhaseId,
    scope: Scope,
    handler: PhaseHandler,
    render: PhaseRenderer,
    next: Successors,
) -> PhaseDescriptor {
    PhaseDescriptor {
        id,
        scope,
        handler,
        render,
        next,
    }
}

const fn to(id: PhaseId) -> Successors {
    Successors::One(Target::Phase(id))
}

const fn channel(next: PhaseId) -> Successors {
    Successors::Two {
        saved: Target::Root,
        discarded: Target::Phase(next),
    }
}

use PhaseId as P;

const TABLE: [PhaseDescriptor; PHASE_COUNT] = [
    phase(P::Idle, Scope::Boot, root::idle, root::render_dark, Successors::One(Target::Root)),
    phase(P::Config, Scope::Root, root::config, root::render_dark, to(P::ConfigBegin)),
    phase(P::PedestrianInterval, Scope::Root, root::pedestrian, root::render_dark, to(P::PitCountdown)),
    phase(P::TrafficLight, Scope::Root, root::traffic, root::render_dark, to(P::TrafficYellowPre)),
    phase(P::Lock, Scope::Root, root::lock, root::render_dark, to(P::LockStart)),

    phase(P::ConfigBegin, Scope::Config, config::begin, config::render_begin, to(P::ConfigBrightness)),
    phase(P::ConfigBrightness, Scope::Config, config::channel, config::render_channel, channel(P::ConfigMode)),
    phase(P::ConfigMode, Scope::Config, config::channel, config::render_channel, channel(P::ConfigSequence)),
    phase(P::ConfigSequence, Scope::Config, config::channel, config::render_channel, channel(P::ConfigTimer1)),
    phase(P::ConfigTimer1, Scope::Config, config::channel, config::render_channel, channel(P::ConfigTimer2)),
    phase(P::ConfigTimer2, Scope::Config, config::channel, config::render_channel, channel(P::ConfigLightMin)),
    phase(P::ConfigLightMin, Scope::Config, config::channel, config::render_channel, channel(P::ConfigLightMax)),
    phase(P::ConfigLightMax, Scope::Config, config::channel, config::render_channel, channel(P::ConfigEnd)),
    phase(P::ConfigEnd, Scope::Config, config::end, config::render_end, to(P::ConfigBrightness)),

    phase(P::LockStart, Scope::Lock, lock::start, root::render_dark, to(P::LockOff)),
    phase(P::LockOn, Scope::Lock, lock::on, lock::render_on, to(P::LockOff)),
    phase(P::LockOff, Scope::Lock, lock::off, root::render_dark, to(P::LockOn)),

    phase(P::PitCountdown, Scope::Pedestrian, pedestrian::countdown, pedestrian::render_countdown, to(P::PitYellow)),
    phase(P::PitYellow, Scope::Pedestrian, pedestrian::yellow, pedestrian::render_yellow, to(P::PitGreenToBlack)),
    phase(P::PitGreenToBlack, Scope::Pedestrian, pedestrian::green_to_black, pedestrian::render_green_to_black, to(P::PitRedPre)),
    phase(P::PitRedPre, Scope::Pedestrian, pedestrian::red_pre, pedestrian::render_red_pre, to(P::PitRedCountdown)),
    phase(P::PitRedCountdown, Scope::Pedestrian, pedestrian::red_countdown, pedestrian::render_red_countdown, to(P::PitFinalGreen)),
    phase(P::PitFinalGreen, Scope::Pedestrian, pedestrian::final_green, pedestrian::render_final_green, to(P::Lock)),

    phase(P::TrafficYellowPre, Scope::Traffic, traffic::yellow_pre, traffic::render_yellow_pre, to(P::TrafficSlalom)),
    phase(P::TrafficSlalom, Scope::Traffic, traffic::slalom, traffic::render_slalom, to(P::TrafficShowRandom)),
    phase(P::TrafficShowRandom, Scope::Traffic, traffic::show_random, traffic::render_show_random, to(P::TrafficPower)),
    phase(P::TrafficPower, Scope::Traffic, traffic::power, traffic::render_power, to(P::Lock)),
];

pub static PHASE_TABLE: [PhaseDescriptor; PHASE_COUNT] = TABLE;

/// Defect found in a phase table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDefect {
    /// Table length differs from the number of phase ids
    Length,
    /// Descriptor at `index` is not the descriptor of phase `index`
    Misplaced { index: usize },
    /// A successor points back to the boot phase
    ReentersBoot { from: PhaseId },
    /// A lock phase has a successor outside the lock subtree
    EscapesLock { from: PhaseId },
}

const fn check_target(table: &[PhaseDescriptor], from: &PhaseDescriptor, target: Target) -> Option<TableDefect> {
    match target {
        Target::Root => {
            if from.is_terminal() {
                return Some(TableDefect::EscapesLock { from: from.id });
            }
            // Root resolves to one of the candidates, all of which must be
            // non-boot phases in the table.
            let mut i = 0;
            while i < ROOT_CANDIDATES.len() {
                let candidate = &table[ROOT_CANDIDATES[i] as usize];
                if matches!(candidate.scope, Scope::Boot) {
                    return Some(TableDefect::ReentersBoot { from: from.id });
                }
                i += 1;
            }
            None
        }
        Target::Phase(id) => {
            let next = &table[id as usize];
            if matches!(next.scope, Scope::Boot) {
                return Some(TableDefect::ReentersBoot { from: from.id });
            }
            if from.is_terminal() && !next.is_terminal() {
                return Some(TableDefect::EscapesLock { from: from.id });
            }
            None
        }
    }
}

/// Checks ordering and successor closure of a phase table
pub const fn check_table(table: &[PhaseDescriptor]) -> Option<TableDefect> {
    if table.len() != PHASE_COUNT {
        return Some(TableDefect::Length);
    }
    let mut index = 0;
    while index < table.len() {
        if table[index].id as usize != index {
            return Some(TableDefect::Misplaced { index });
        }
        index += 1;
    }

    let mut index = 0;
    while index < table.len() {
        let from = &table[index];
        let defect = match from.next {
            Successors::One(target) => check_target(table, from, target),
            Successors::Two { saved, discarded } => match check_target(table, from, saved) {
                Some(defect) => Some(defect),
                None => check_target(table, from, discarded),
            },
        };
        if defect.is_some() {
            return defect;
        }
        index += 1;
    }
    None
}

const _: () = {
    if check_table(&TABLE).is_some() {
        panic!("phase table is not closed");
    }
};
