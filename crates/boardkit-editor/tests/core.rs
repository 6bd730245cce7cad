#[path = "core/commands.rs"]
mod commands;
#[path = "core/controller.rs"]
mod controller;
#[path = "core/coordinates.rs"]
mod coordinates;
#[path = "core/interaction.rs"]
mod interaction;
#[path = "core/scenarios.rs"]
mod scenarios;
