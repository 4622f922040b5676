//! Messages and settings shared between the driver and the game loop thread.

use abyss_core::commands::VehicleCommand;
use abyss_core::types::ActorId;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug, Clone)]
pub enum GameLoopCommand {
    /// Offer a pilot command to the engine once the sim reaches `at_tick`.
    Schedule {
        at_tick: u64,
        actor: ActorId,
        command: VehicleCommand,
    },
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// How the game loop paces itself.
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Stop after this many ticks.
    pub max_ticks: u64,
    /// Sleep to hold the nominal tick rate instead of running flat out.
    pub realtime: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            max_ticks: 400,
            realtime: false,
        }
    }
}
