//! Game session: the turn state machine, reinforcements and scenario hooks

pub mod scenario;
pub mod schedule;
pub mod state;

pub use scenario::ScenarioControl;
pub use schedule::{Reinforcement, ReinforcementSchedule};
pub use state::Game;
