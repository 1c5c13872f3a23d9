//! Game simulation - the main game loop.
//!
//! The simulation owns the level and every player, and advances all
//! character controllers by one fixed tick at a time.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_physics::{CapsuleShape, ConfigError, ControllerError, FrameReport, MovementConfig};
use thiserror::Error;

use crate::input::PlayerInput;
use crate::level::{Level, SpawnPoint};
use crate::player::{EntityId, Player};

/// Errors from building or driving a [`Simulation`].
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A required collaborator was not provided to the builder.
    #[error("simulation is missing its {0}")]
    MissingCollaborator(&'static str),

    #[error("no player with id {0}")]
    UnknownPlayer(EntityId),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// Game simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement physics configuration.
    pub movement: MovementConfig,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            movement: MovementConfig::default(),
            mouse_sensitivity: 0.1,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::NonPositive {
                name: "tick_rate",
                value: 0.0,
            });
        }
        self.movement.validate()
    }
}

/// Builds a [`Simulation`], checking that everything it needs is present.
#[derive(Debug, Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    level: Option<Level>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn movement(mut self, movement: MovementConfig) -> Self {
        self.config.movement = movement;
        self
    }

    /// The level provides both the collision queries and the mover backend.
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn build(self) -> Result<Simulation, SimulationError> {
        let level = self.level.ok_or(SimulationError::MissingCollaborator("level"))?;
        self.config.validate()?;

        log::info!(
            "simulation ready: level '{}', {} spawn points, {} Hz",
            level.name,
            level.player_spawn_count(),
            self.config.tick_rate
        );

        Ok(Simulation {
            frame: 0,
            config: self.config,
            level,
            players: Vec::new(),
            next_entity_id: 1,
        })
    }
}

/// The main game simulation.
///
/// This contains all game state and advances it based on player inputs.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All players in the game.
    pub players: Vec<Player>,

    /// Next entity ID to assign.
    next_entity_id: EntityId,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test() -> Self {
        Self {
            frame: 0,
            config: SimulationConfig::default(),
            level: Level::test_arena(),
            players: Vec::new(),
            next_entity_id: 1,
        }
    }

    /// Add a player to the simulation.
    ///
    /// The player takes the next spawn point, is dropped onto the ground
    /// below it, and starts receiving input immediately. Returns the
    /// player's ID.
    pub fn add_player(&mut self, name: &str) -> Result<EntityId, SimulationError> {
        let id = self.next_entity_id;

        // Find a spawn point
        let spawn_index = self.players.len() % self.level.player_spawn_count().max(1);
        let spawn = self
            .level
            .get_player_spawn(spawn_index)
            .copied()
            .unwrap_or_else(|| SpawnPoint::new(Vec3::ZERO, 0.0));

        let capsule = CapsuleShape::standing(Player::RADIUS, Player::STANDING_HEIGHT);
        let position = match self.level.drop_to_ground(spawn.position, &capsule) {
            Some(position) => position,
            None => {
                log::warn!("no ground below spawn {:?}, spawning in the air", spawn.position);
                spawn.position
            }
        };

        let player = Player::new(
            id,
            name.to_string(),
            self.config.movement.clone(),
            &spawn,
            position,
            &self.level.collision,
            self.config.mouse_sensitivity,
        )?;

        log::info!("player {} '{}' joined at {:?}", id, name, position);
        self.next_entity_id += 1;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player from the simulation and tear down its controller.
    pub fn remove_player(&mut self, player_id: EntityId) -> Result<Player, SimulationError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(SimulationError::UnknownPlayer(player_id))?;

        let mut player = self.players.remove(index);
        player.despawn();
        log::info!("player {} '{}' left", player.id, player.name);
        Ok(player)
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Get a mutable reference to a player by ID.
    pub fn get_player_mut(&mut self, player_id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Advance the simulation by one tick.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Player inputs indexed by player position in the `players` array
    ///
    /// Returns each player's frame report in the same order.
    pub fn tick(&mut self, inputs: &[PlayerInput]) -> Result<Vec<FrameReport>, SimulationError> {
        let delta_time = self.config.delta_time();
        let world = &self.level.collision;

        let mut reports = Vec::with_capacity(self.players.len());
        for (i, player) in self.players.iter_mut().enumerate() {
            // Get input for this player (default if not provided)
            let input = inputs.get(i).cloned().unwrap_or_default();
            reports.push(player.update(&input, world, delta_time)?);
        }

        self.frame += 1;
        Ok(reports)
    }

    /// Teleport a player. `None` sends them to the origin.
    pub fn teleport_player(&mut self, player_id: EntityId, target: Option<Vec3>) -> Result<(), SimulationError> {
        let world = &self.level.collision;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(SimulationError::UnknownPlayer(player_id))?;

        player.teleport(world, target);
        Ok(())
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

// ============================================================================
// Tests
// ============================================================================
