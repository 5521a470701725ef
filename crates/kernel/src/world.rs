use glam::{Vec2, Vec3};
use rockyard_common::{DrawCommand, DrawTransform, EntityKind};
use rockyard_input::InputState;
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb2d;
use crate::camera::{CameraState, update_camera};
use crate::collision::{Resolution, apply_knockback, resolve_static};
use crate::config::WorldConfig;
use crate::motion::update_movement;
use crate::patrol::{PatrolDirection, PatrolRoute};
use crate::timing::sanitize_dt;

/// An event record produced by a tick.
///
/// Drained by the driver after each tick; the kernel never reacts to its own
/// events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// The simulation advanced one tick by `dt` seconds.
    Stepped { tick: u64, dt: f32 },
    /// The player was pushed out of an obstacle.
    ObstacleResolved {
        obstacle: usize,
        resolution: Resolution,
    },
    /// The item was picked up. Emitted at most once per world.
    ItemCollected { tick: u64 },
    /// The enemy shoved the player along `direction`.
    KnockedBack { direction: Vec2 },
}

/// Position, facing and cached planar box of a moving entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub position: Vec3,
    pub facing_degrees: f32,
    pub bounds: Aabb2d,
}

impl Actor {
    pub fn new(position: Vec3, facing_degrees: f32, half_extents: Vec2) -> Self {
        Self {
            position,
            facing_degrees,
            bounds: Aabb2d::around(position, half_extents),
        }
    }

    fn sync_bounds(&mut self) {
        self.bounds.sync_to(self.position);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub actor: Actor,
    /// Units per second.
    pub speed: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub actor: Actor,
    pub route: PatrolRoute,
    pub direction: PatrolDirection,
    pub scale: f32,
}

/// A rock. Its box is fixed at construction since it never moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec3,
    pub scale: f32,
    pub bounds: Aabb2d,
}

/// The pickup. `collected` only ever goes from false to true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub position: Vec3,
    pub scale: f32,
    pub bounds: Aabb2d,
    pub collected: bool,
}

/// The authoritative simulation state.
///
/// Every component function reads and writes through this struct; there is
/// no other shared state. `step` runs the fixed per-tick order, so two worlds
/// built from the same config and fed the same inputs and deltas stay
/// identical.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    player: Player,
    enemy: Enemy,
    obstacles: Vec<Obstacle>,
    item: Item,
    camera: CameraState,
    tick: u64,
    elapsed: f64,
    event_log: Vec<WorldEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Build the starting scene from a configuration.
    pub fn new(config: WorldConfig) -> Self {
        let player = Player {
            actor: Actor::new(
                config.player.start,
                config.player.facing_degrees,
                config.player.half_extents,
            ),
            speed: config.player.speed,
            scale: config.player.scale,
        };
        let enemy = Enemy {
            actor: Actor::new(config.enemy.start, 0.0, config.enemy.half_extents),
            route: config.enemy.patrol,
            direction: config.enemy.initial_direction,
            scale: config.enemy.scale,
        };
        let obstacles = config
            .obstacles
            .iter()
            .map(|o| Obstacle {
                position: o.position,
                scale: o.scale,
                bounds: Aabb2d::around(o.position, Vec2::splat(config.obstacle_extent * o.scale)),
            })
            .collect();
        let item = Item {
            position: config.item.position,
            scale: config.item.scale,
            bounds: Aabb2d::around(config.item.position, config.item.half_extents),
            collected: false,
        };
        let camera = CameraState::new(config.camera.start, config.camera.fov_degrees);
        Self {
            config,
            player,
            enemy,
            obstacles,
            item,
            camera,
            tick: 0,
            elapsed: 0.0,
            event_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Number of ticks stepped so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Teleport the player, keeping its box in sync.
    pub fn place_player(&mut self, position: Vec3) {
        self.player.actor.position = position;
        self.player.actor.sync_bounds();
    }

    /// Teleport the enemy along its patrol axis.
    pub fn place_enemy(&mut self, position: Vec3, direction: PatrolDirection) {
        self.enemy.actor.position = position;
        self.enemy.direction = direction;
        self.enemy.actor.sync_bounds();
    }

    /// Advance the simulation by one tick of `dt` seconds.
    ///
    /// Order: player movement, enemy patrol, box refresh, obstacle push-out
    /// (in collection order, one pass), item pickup, enemy knockback, camera.
    /// Camera runs last so it tracks the corrected player position.
    pub fn step(&mut self, input: &InputState, dt: f32) {
        let _span = tracing::trace_span!("world_step", tick = self.tick + 1).entered();
        let dt = sanitize_dt(dt, self.config.timing.min_frame_seconds);
        self.tick += 1;
        self.elapsed += f64::from(dt);

        self.move_player(input, dt);
        self.patrol_enemy(dt);
        self.refresh_bounds();
        self.resolve_obstacles();
        self.collect_item();
        self.knock_back_player();
        self.follow_player(input.scroll_delta, dt);

        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            dt,
        });
        tracing::trace!(
            x = self.player.actor.position.x,
            z = self.player.actor.position.z,
            enemy_x = self.enemy.actor.position.x,
            "tick complete"
        );
    }

    fn move_player(&mut self, input: &InputState, dt: f32) {
        let actor = &mut self.player.actor;
        let (position, facing) =
            update_movement(input, dt, self.player.speed, actor.position, actor.facing_degrees);
        actor.position = position;
        actor.facing_degrees = facing;
    }

    fn patrol_enemy(&mut self, dt: f32) {
        let enemy = &mut self.enemy;
        let (x, direction) = enemy.route.advance(enemy.actor.position.x, enemy.direction, dt);
        if direction != enemy.direction {
            tracing::debug!(x, ?direction, "enemy turned around");
        }
        enemy.actor.position.x = x;
        enemy.direction = direction;
    }

    fn refresh_bounds(&mut self) {
        self.player.actor.sync_bounds();
        self.enemy.actor.sync_bounds();
        self.item.bounds.sync_to(self.item.position);
    }

    fn resolve_obstacles(&mut self) {
        let actor = &mut self.player.actor;
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            if !actor.bounds.intersects(&obstacle.bounds) {
                continue;
            }
            if let Some(resolution) =
                resolve_static(&obstacle.bounds, &mut actor.bounds, &mut actor.position)
            {
                tracing::debug!(
                    obstacle = index,
                    axis = ?resolution.axis,
                    depth = resolution.depth,
                    "resolved obstacle overlap"
                );
                self.event_log.push(WorldEvent::ObstacleResolved {
                    obstacle: index,
                    resolution,
                });
            }
        }
    }

    fn collect_item(&mut self) {
        if self.item.collected || !self.player.actor.bounds.intersects(&self.item.bounds) {
            return;
        }
        self.item.collected = true;
        tracing::info!(tick = self.tick, "picked up the item");
        self.event_log
            .push(WorldEvent::ItemCollected { tick: self.tick });
    }

    fn knock_back_player(&mut self) {
        let actor = &mut self.player.actor;
        if !actor.bounds.intersects(&self.enemy.actor.bounds) {
            return;
        }
        let direction = apply_knockback(
            &self.enemy.actor.bounds,
            &mut actor.bounds,
            &mut actor.position,
            self.config.knockback_distance,
        );
        tracing::debug!(dx = direction.x, dz = direction.y, "enemy knocked the player back");
        self.event_log.push(WorldEvent::KnockedBack { direction });
    }

    fn follow_player(&mut self, scroll: f32, dt: f32) {
        if scroll != 0.0 {
            self.camera.zoom(scroll);
        }
        let actor = &self.player.actor;
        self.camera = update_camera(
            &self.camera,
            actor.position,
            actor.facing_degrees,
            &self.config.camera.rig,
            dt,
        );
    }

    /// World transforms to draw this frame, in order: ground, obstacles,
    /// item (until collected), enemy, player.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let draw = &self.config.draw;
        let mut out = Vec::with_capacity(self.obstacles.len() + 4);
        out.push(DrawCommand::new(
            EntityKind::Ground,
            DrawTransform {
                translation: draw.ground_translation,
                yaw_degrees: 0.0,
                scale: draw.ground_scale,
            },
        ));
        out.extend(self.obstacles.iter().map(|o| {
            DrawCommand::new(
                EntityKind::Obstacle,
                DrawTransform::new(o.position + draw.obstacle_offset, 0.0, o.scale),
            )
        }));
        if !self.item.collected {
            out.push(DrawCommand::new(
                EntityKind::Item,
                DrawTransform::new(
                    self.item.position + draw.actor_offset,
                    self.spin(self.config.item.spin_degrees_per_second),
                    self.item.scale,
                ),
            ));
        }
        out.push(DrawCommand::new(
            EntityKind::Enemy,
            DrawTransform::new(
                self.enemy.actor.position + draw.actor_offset,
                self.spin(self.config.enemy.spin_degrees_per_second),
                self.enemy.scale,
            ),
        ));
        out.push(DrawCommand::new(
            EntityKind::Player,
            DrawTransform::new(
                self.player.actor.position + draw.actor_offset,
                self.player.actor.facing_degrees,
                self.player.scale,
            ),
        ));
        out
    }

    /// Yaw for a prop spinning at `degrees_per_second`, wrapped to one turn.
    fn spin(&self, degrees_per_second: f32) -> f32 {
        (self.elapsed * f64::from(degrees_per_second)).rem_euclid(360.0) as f32
    }

    /// Deterministic FNV-1a hash over the simulated state.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= u64::from(b);
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.tick.to_le_bytes());
        mix(&self.elapsed.to_le_bytes());
        for v in [
            self.player.actor.position,
            self.enemy.actor.position,
            self.camera.position,
        ] {
            for c in v.to_array() {
                mix(&c.to_le_bytes());
            }
        }
        mix(&self.player.actor.facing_degrees.to_le_bytes());
        mix(&self.enemy.direction.sign().to_le_bytes());
        mix(&[u8::from(self.item.collected)]);
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::planar;
    use crate::collision::{Axis, CONTACT_SKIN};
    use crate::config::ObstacleConfig;

    fn empty_config() -> WorldConfig {
        WorldConfig {
            obstacles: Vec::new(),
            ..WorldConfig::default()
        }
    }

    fn count<F: Fn(&WorldEvent) -> bool>(world: &World, f: F) -> usize {
        world.events().iter().filter(|e| f(e)).count()
    }

    #[test]
    fn forward_for_one_second_without_obstacles() {
        let mut world = World::new(empty_config());
        world.step(&InputState::forward(), 1.0);
        let p = world.player().actor;
        assert!(p.position.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-5));
        assert!(p.facing_degrees.abs() < 1e-4);
        assert_eq!(p.bounds.center, planar(p.position));
    }

    #[test]
    fn coincident_obstacle_pushes_along_shallow_axis() {
        let config = WorldConfig {
            obstacles: vec![ObstacleConfig {
                position: Vec3::new(3.0, 0.0, -2.0),
                scale: 1.2,
            }],
            ..empty_config()
        };
        let mut world = World::new(config);
        world.place_player(Vec3::new(3.0, 0.0, -2.0));
        let before = world.player().actor.position;
        world.step(&InputState::idle(), 1.0 / 60.0);

        let player = world.player().actor;
        let rock = world.obstacles()[0].bounds;
        assert!(!player.bounds.intersects(&rock));

        let resolution = world
            .events()
            .iter()
            .find_map(|e| match e {
                WorldEvent::ObstacleResolved { resolution, .. } => Some(*resolution),
                _ => None,
            })
            .unwrap();
        // X reach is 1.7, Z reach is 1.6: Z is shallower.
        assert_eq!(resolution.axis, Axis::Z);
        assert!((resolution.depth - 1.6).abs() < 1e-5);
        let moved = player.position - before;
        assert_eq!(moved.x, 0.0);
        assert!((moved.z.abs() - resolution.depth).abs() <= CONTACT_SKIN * 2.0);
    }

    #[test]
    fn item_is_collected_exactly_once() {
        let mut world = World::new(empty_config());
        world.place_player(Vec3::new(2.0, 0.0, -4.0));
        for _ in 0..10 {
            world.step(&InputState::idle(), 1.0 / 60.0);
            assert!(world.item().collected);
        }
        assert_eq!(
            count(&world, |e| matches!(e, WorldEvent::ItemCollected { .. })),
            1
        );
        // Collected items drop out of the draw list.
        assert!(
            world
                .draw_list()
                .iter()
                .all(|c| c.kind != EntityKind::Item)
        );
    }

    #[test]
    fn enemy_patrol_reaches_bound_then_turns() {
        let mut world = World::new(empty_config());
        // Keep the player far away from everything.
        world.place_player(Vec3::new(50.0, 0.0, 50.0));
        world.step(&InputState::idle(), 3.0);
        assert_eq!(world.enemy().actor.position.x, -3.0);
        assert_eq!(world.enemy().direction, PatrolDirection::Positive);
        world.step(&InputState::idle(), 1.0);
        assert_eq!(world.enemy().direction, PatrolDirection::Negative);
    }

    #[test]
    fn enemy_contact_knocks_player_back() {
        let mut world = World::new(empty_config());
        world.place_enemy(Vec3::new(0.0, 0.0, 0.0), PatrolDirection::Positive);
        world.place_player(Vec3::new(0.0, 0.0, 0.5));
        world.step(&InputState::idle(), 1e-6);

        let p = world.player().actor.position;
        assert!((p.z - (0.5 + 1.2)).abs() < 1e-3);
        assert_eq!(
            count(&world, |e| matches!(e, WorldEvent::KnockedBack { .. })),
            1
        );
    }

    #[test]
    fn coincident_enemy_uses_fallback_direction() {
        let mut world = World::new(empty_config());
        world.place_enemy(Vec3::new(10.0, 0.0, 10.0), PatrolDirection::Positive);
        let route = world.enemy().route;
        // Freeze the enemy so both centers stay equal through the tick.
        world.enemy.route = PatrolRoute { speed: 0.0, ..route };
        world.place_player(Vec3::new(10.0, 0.0, 10.0));
        world.step(&InputState::idle(), 1.0 / 60.0);

        let p = world.player().actor.position;
        assert!(p.is_finite());
        assert!((p.x - 11.2).abs() < 1e-4);
        assert_eq!(p.z, 10.0);
    }

    #[test]
    fn camera_tracks_corrected_position() {
        let config = WorldConfig {
            obstacles: vec![ObstacleConfig {
                position: Vec3::new(0.0, 0.0, -2.0),
                scale: 1.0,
            }],
            ..empty_config()
        };
        let mut world = World::new(config);
        for _ in 0..120 {
            world.step(&InputState::forward(), 1.0 / 60.0);
        }
        let player = world.player().actor.position;
        // Rock face at z = -1, player half depth 0.4.
        assert!(player.z >= -0.6 - 1e-3);
        assert!(player.z < -0.5);
        let aim = (player - world.camera().position).normalize();
        assert!(world.camera().forward.abs_diff_eq(aim, 1e-4));
    }

    #[test]
    fn non_positive_dt_is_guarded() {
        let mut world = World::new(empty_config());
        world.step(&InputState::forward(), 0.0);
        world.step(&InputState::forward(), -5.0);
        world.step(&InputState::forward(), f32::NAN);
        let p = world.player().actor.position;
        assert!(p.is_finite());
        assert!(p.z <= 0.0 && p.z > -1e-3);
        assert!(world.camera().position.is_finite());
    }

    #[test]
    fn scroll_zooms_camera() {
        let mut world = World::new(empty_config());
        let zoom_in = InputState {
            scroll_delta: 5.0,
            ..InputState::idle()
        };
        world.step(&zoom_in, 1.0 / 60.0);
        assert_eq!(world.camera().fov_degrees, 40.0);
    }

    #[test]
    fn draw_list_order_and_transforms() {
        let world = World::default();
        let kinds: Vec<EntityKind> = world.draw_list().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Ground,
                EntityKind::Obstacle,
                EntityKind::Obstacle,
                EntityKind::Obstacle,
                EntityKind::Obstacle,
                EntityKind::Item,
                EntityKind::Enemy,
                EntityKind::Player,
            ]
        );
        let list = world.draw_list();
        assert_eq!(list[0].transform.scale, Vec3::new(20.0, 0.5, 20.0));
        assert_eq!(list[1].transform.translation, Vec3::new(3.0, -0.5, -2.0));
        assert_eq!(list[7].transform.translation, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(list[7].transform.scale, Vec3::splat(0.15));
    }

    #[test]
    fn props_spin_with_simulated_time() {
        let mut world = World::new(empty_config());
        world.place_player(Vec3::new(50.0, 0.0, 50.0));
        world.step(&InputState::idle(), 0.5);
        let list = world.draw_list();
        let item = list.iter().find(|c| c.kind == EntityKind::Item).unwrap();
        let enemy = list.iter().find(|c| c.kind == EntityKind::Enemy).unwrap();
        assert!((item.transform.yaw_degrees - 25.0).abs() < 1e-4);
        assert!((enemy.transform.yaw_degrees - 15.0).abs() < 1e-4);
    }

    #[test]
    fn identical_inputs_give_identical_worlds() {
        let mut a = World::default();
        let mut b = World::default();
        let inputs = [
            InputState::forward(),
            InputState {
                right: true,
                ..InputState::idle()
            },
            InputState::idle(),
        ];
        for i in 0..600 {
            let input = inputs[(i / 50) % inputs.len()];
            a.step(&input, 1.0 / 60.0);
            b.step(&input, 1.0 / 60.0);
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert_eq!(a.events(), b.events());
    }

    #[test]
    fn every_step_logs_a_stepped_event() {
        let mut world = World::new(empty_config());
        world.step(&InputState::idle(), 0.1);
        world.step(&InputState::idle(), 0.1);
        let events = world.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, WorldEvent::Stepped { .. }))
                .count(),
            2
        );
        assert!(world.events().is_empty());
        assert_eq!(world.tick(), 2);
    }
}
