/// World actor blob command.
pub mod actor;
/// Scanner lookup command.
pub mod find;
/// Inventory projection command.
pub mod inventory;
/// Player projection command.
pub mod player;
/// Property bag dump command.
pub mod props;
/// Tribe projection command.
pub mod tribe;
/// Shared flags and output helpers.
pub mod util;
