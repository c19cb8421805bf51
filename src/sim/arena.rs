//! Arena state and the fixed-step tick
//!
//! The arena owns the entity pool and scores. A tick first integrates every
//! entity, then runs every overlap test, so all tests see the same settled
//! positions.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Agent, AgentId, Projectile, ProjectileId};
use super::motion::StandardDrag;
use super::shape::ShapeSnapshot;
use crate::Settings;

/// Steering intent for one agent over one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentIntent {
    /// Direction to accelerate in, each component -1, 0 or 1
    pub dir: IVec2,
    /// Fire the carried projectile after moving
    pub fire: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by agent; missing entries mean no input
    pub intents: Vec<AgentIntent>,
}

impl TickInput {
    pub fn intent(&self, agent: AgentId) -> AgentIntent {
        self.intents.get(agent.0).copied().unwrap_or_default()
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    /// An agent picked up an idle projectile
    Loaded {
        agent: AgentId,
        projectile: ProjectileId,
    },
    /// An agent launched its carried projectile
    Fired {
        agent: AgentId,
        projectile: ProjectileId,
        velocity: Vec2,
    },
    /// A live projectile came to rest
    Spent { projectile: ProjectileId },
    /// A live projectile struck an agent other than its owner
    Hit {
        shooter: AgentId,
        target: AgentId,
        projectile: ProjectileId,
    },
    /// Every entity went back to its spawn point
    RoundReset,
}

/// Read-only view of a projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub shape: ShapeSnapshot,
    pub live: bool,
    pub owner: Option<AgentId>,
}

/// Read-only view of the whole arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time_ticks: u64,
    pub agents: Vec<ShapeSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub scores: Vec<u32>,
}

/// The playing field
#[derive(Debug, Clone)]
pub struct Arena {
    settings: Settings,
    drag: StandardDrag,
    agents: Vec<Agent>,
    projectiles: Vec<Projectile>,
    scores: Vec<u32>,
    reset_pending: bool,
    time_ticks: u64,
}

impl Arena {
    /// Standard two-agent arena with a seeded projectile layout.
    ///
    /// `settings` are expected to have passed [`Settings::validate`].
    pub fn new(settings: Settings) -> Self {
        let bounds = settings.bounds();
        let (w, h) = (settings.arena_width as f32, settings.arena_height as f32);
        let divisions = settings.region_divisions;

        let agents = vec![
            Agent::new(Vec2::new(w / 4.0, h / 2.0), settings.agent_size, bounds, divisions),
            Agent::new(Vec2::new(w * 3.0 / 4.0, h / 2.0), settings.agent_size, bounds, divisions),
        ];

        // Mirrored pairs keep the layout fair for both sides
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let margin = settings.ammo_size;
        let mut projectiles = Vec::with_capacity(settings.ammo_count);
        for _ in 0..settings.ammo_count / 2 {
            let x = rng.random_range(margin..settings.arena_width - margin) as f32;
            let y = rng.random_range(margin..settings.arena_height - margin) as f32;
            for spawn in [Vec2::new(x, y), Vec2::new(w - x, h - y)] {
                projectiles.push(Projectile::new(spawn, settings.ammo_size, bounds, divisions));
            }
        }

        Self::with_entities(settings, agents, projectiles)
    }

    /// Arena with a caller-supplied entity layout
    pub fn with_entities(
        settings: Settings,
        agents: Vec<Agent>,
        projectiles: Vec<Projectile>,
    ) -> Self {
        log::debug!(
            "Arena {}x{} with {} agents, {} projectiles, {} region divisions",
            settings.arena_width,
            settings.arena_height,
            agents.len(),
            projectiles.len(),
            settings.region_divisions
        );
        Self {
            drag: StandardDrag::new(settings.drag),
            scores: vec![0; agents.len()],
            settings,
            agents,
            projectiles,
            reset_pending: false,
            time_ticks: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.0]
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectile(&self, id: ProjectileId) -> &Projectile {
        &self.projectiles[id.0]
    }

    pub fn score(&self, agent: AgentId) -> u32 {
        self.scores[agent.0]
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// A hit was scored and the next tick will reset the round
    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Put `projectile` in `agent`'s hands
    pub fn load_onto(&mut self, agent: AgentId, projectile: ProjectileId) {
        let pos = self.agents[agent.0].shape().position();
        let carried = &mut self.projectiles[projectile.0];
        carried.attach(agent);
        carried.shape_mut().set_position(pos);
        self.agents[agent.0].set_carried(Some(projectile));
        log::debug!("Agent {} loaded projectile {}", agent.0, projectile.0);
    }

    /// Launch the agent's carried projectile, returning its velocity
    pub fn fire(&mut self, agent: AgentId) -> Option<Vec2> {
        let carrier = &mut self.agents[agent.0];
        let projectile = carrier.carried()?;
        let velocity = carrier.launch_velocity(self.settings.launch_speed);
        carrier.set_carried(None);

        self.projectiles[projectile.0].launch(agent, velocity);
        log::debug!("Agent {} fired projectile {} at {}", agent.0, projectile.0, velocity);
        Some(velocity)
    }

    /// Move an agent one tick, carrying its projectile along
    pub fn integrate_agent(&mut self, agent: AgentId) -> bool {
        let carrier = &mut self.agents[agent.0];
        let moved = carrier.integrate(&self.drag);
        if moved && let Some(projectile) = carrier.carried() {
            let pos = carrier.shape().position();
            self.projectiles[projectile.0].shape_mut().set_position(pos);
        }
        moved
    }

    /// Send every entity back to its spawn point. Scores are kept.
    pub fn reset(&mut self) {
        for agent in &mut self.agents {
            agent.reset();
        }
        for projectile in &mut self.projectiles {
            projectile.reset();
        }
        self.reset_pending = false;
    }

    /// Advance the arena by one fixed step
    pub fn tick(&mut self, input: &TickInput) -> Vec<ArenaEvent> {
        let mut events = Vec::new();
        self.time_ticks += 1;

        if self.reset_pending {
            self.reset();
            log::info!("Round reset, scores {:?}", self.scores);
            events.push(ArenaEvent::RoundReset);
            return events;
        }

        // Integrate everything first
        for i in 0..self.agents.len() {
            let agent = AgentId(i);
            let intent = input.intent(agent);
            self.agents[i].accelerate(intent.dir, self.settings.acceleration);
            self.integrate_agent(agent);

            if intent.fire {
                let projectile = self.agents[i].carried();
                if let (Some(projectile), Some(velocity)) = (projectile, self.fire(agent)) {
                    events.push(ArenaEvent::Fired {
                        agent,
                        projectile,
                        velocity,
                    });
                }
            }
        }

        for (i, projectile) in self.projectiles.iter_mut().enumerate() {
            if projectile.is_live() {
                projectile.integrate(&self.drag);
                if !projectile.is_live() {
                    events.push(ArenaEvent::Spent {
                        projectile: ProjectileId(i),
                    });
                }
            }
        }

        // Then test against the settled positions
        for i in 0..self.projectiles.len() {
            let id = ProjectileId(i);
            let projectile = &self.projectiles[i];

            if projectile.is_live() {
                let Some(shooter) = projectile.owner() else {
                    continue;
                };
                for (j, target) in self.agents.iter().enumerate() {
                    if AgentId(j) != shooter && projectile.shape().overlaps(target.shape()) {
                        self.scores[shooter.0] += 1;
                        self.reset_pending = true;
                        log::info!("Agent {} hit agent {} with projectile {}", shooter.0, j, i);
                        events.push(ArenaEvent::Hit {
                            shooter,
                            target: AgentId(j),
                            projectile: id,
                        });
                    }
                }
            } else if projectile.is_idle() {
                let picker = self.agents.iter().position(|agent| {
                    !agent.is_loaded() && agent.shape().overlaps(projectile.shape())
                });
                if let Some(j) = picker {
                    self.load_onto(AgentId(j), id);
                    events.push(ArenaEvent::Loaded {
                        agent: AgentId(j),
                        projectile: id,
                    });
                }
            }
        }

        events
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            time_ticks: self.time_ticks,
            agents: self.agents.iter().map(|a| a.shape().snapshot()).collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileSnapshot {
                    shape: p.shape().snapshot(),
                    live: p.is_live(),
                    owner: p.owner(),
                })
                .collect(),
            scores: self.scores.clone(),
        }
    }
}
