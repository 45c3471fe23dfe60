use super::*;
use crate::app::{InputAction, InputSnapshot};
use crate::catalog::{builtin_kind_catalog, BlockStyle, EnemySpecies, Orientation};
use crate::world::{EnemyState, Entity, PlayerState, Point, Rect, TILE_UNITS};

const PLAYER_SIZE: i32 = 30 * 2 * 6;

fn campaign(levels: &[&[&[&str]]]) -> Campaign {
    Campaign::new(CampaignDef {
        levels: levels
            .iter()
            .enumerate()
            .map(|(idx, maps)| LevelDef {
                name: format!("Level {}", idx + 1),
                music: Some(format!("track_{idx}")),
                maps: maps
                    .iter()
                    .map(|rows| MapBlueprint {
                        rows: rows.iter().map(|row| row.to_string()).collect(),
                    })
                    .collect(),
            })
            .collect(),
    })
    .expect("campaign")
}

fn sim_with(levels: &[&[&[&str]]], config: SimConfig) -> Simulation {
    Simulation::new(
        builtin_kind_catalog().expect("catalog"),
        campaign(levels),
        config,
    )
}

/// Loads the only map and runs out the level splash.
fn single_map(rows: &[&str]) -> Simulation {
    let mut sim = sim_with(&[&[rows]], SimConfig::default());
    sim.load_map(MapId::FIRST).expect("load");
    skip_transition(&mut sim);
    sim.drain_events();
    sim
}

fn skip_transition(sim: &mut Simulation) {
    for _ in 0..2_000 {
        if sim.active_transition().is_none() {
            return;
        }
        sim.advance_tick(&InputSnapshot::empty()).expect("tick");
    }
    panic!("transition did not finish");
}

fn tick(sim: &mut Simulation, input: InputSnapshot) -> TickStatus {
    sim.advance_tick(&input).expect("tick")
}

fn holding(actions: &[InputAction]) -> InputSnapshot {
    actions
        .iter()
        .fold(InputSnapshot::empty(), |input, action| {
            input.with_action_down(*action, true)
        })
}

fn player(sim: &Simulation) -> &Entity {
    let handle = sim.player().expect("player handle");
    sim.world().entity(handle).expect("player entity")
}

fn player_state(sim: &Simulation) -> PlayerState {
    player(sim).player().expect("player body").state
}

fn first_of(sim: &Simulation, kind: EntityKind) -> EntityHandle {
    sim.world()
        .active_handles_where(|entity| entity.kind() == kind)
        .first()
        .copied()
        .expect("entity of kind")
}

fn place(sim: &mut Simulation, handle: EntityHandle, x: i32, y: i32) {
    sim.world
        .entity_mut(handle)
        .expect("active entity")
        .position = Point { x, y };
}

#[test]
fn pool_records_are_conserved_across_loads() {
    let many: &[&str] = &["PCCC", "....", "GGGG"];
    let few: &[&str] = &["PC..", "....", "GGGG"];
    let mut sim = sim_with(&[&[many, few]], SimConfig::default());

    for id in [MapId::new(0, 0), MapId::new(0, 1), MapId::new(0, 0)] {
        sim.load_map(id).expect("load");
        let world = sim.world();
        for kind in [EntityKind::Coin, EntityKind::Block(BlockStyle::Ground)] {
            assert_eq!(
                world.active_count(kind) + world.pooled_count(kind),
                world.constructed_count(kind),
                "conservation for {kind} on {id}"
            );
        }
    }

    assert_eq!(sim.world().constructed_count(EntityKind::Coin), 3);
    assert_eq!(sim.world().constructed_count(EntityKind::Player), 1);
    assert_eq!(sim.world().active_count(EntityKind::Coin), 3);
}

#[test]
fn horizontal_resolution_precedes_vertical() {
    let mut world = World::new(
        builtin_kind_catalog().expect("catalog"),
        Size { w: 4200, h: 4200 },
    );
    let mover = world
        .spawn(EntityKind::Player, Point { x: 0, y: 0 }, Orientation::Left)
        .expect("mover");
    world
        .spawn(
            EntityKind::Block(BlockStyle::Brick),
            Point { x: 400, y: 400 },
            Orientation::Left,
        )
        .expect("block");

    let horizontal = move_horizontal(&mut world, mover, 60);
    let vertical = move_vertical(&mut world, mover, 60);

    assert!(!horizontal.blocked);
    assert!(vertical.blocked);
    // Vertical-first would have ended at (40, 60).
    assert_eq!(
        world.entity(mover).map(|e| e.position),
        Some(Point { x: 60, y: 40 })
    );
}

#[test]
fn player_tick_resolves_horizontal_before_vertical() {
    let mut sim = single_map(&["P.....", "......", "..B...", "GGGGGG"]);
    let handle = sim.player().expect("player");
    // Airborne, 10 units left of and 20 units above the block's corner.
    place(&mut sim, handle, 14, 4);

    tick(&mut sim, holding(&[InputAction::MoveRight]));

    // Vertical-first would have ended at (24, 34).
    assert_eq!(player(&sim).position, Point { x: 38, y: 24 });
    assert!(player(&sim).player().expect("body").grounded);
}

#[test]
fn enemy_tick_resolves_horizontal_before_vertical() {
    let mut sim = single_map(&["P.........", ".......s..", "..B.......", "GGGGGGGGGG"]);
    let snake = first_of(&sim, EntityKind::Enemy(EnemySpecies::Snake));
    // Airborne, 5 units right of and 20 units above the block's corner.
    place(&mut sim, snake, 581, 172);

    tick(&mut sim, InputSnapshot::empty());

    // Vertical-first would have ended at (576, 202) and reversed.
    let entity = sim.world().entity(snake).expect("snake");
    assert_eq!(entity.position, Point { x: 572, y: 192 });
    assert_eq!(entity.enemy().map(|e| e.state), Some(EnemyState::PatrolLeft));
}

#[test]
fn velocity_holds_the_last_proposed_deltas() {
    let mut sim = single_map(&["P...", "....", "GGGG"]);

    tick(&mut sim, holding(&[InputAction::MoveRight]));
    assert_eq!(
        player(&sim).velocity,
        Point {
            x: WALK_SPEED,
            y: GRAVITY
        }
    );
    assert_eq!(player(&sim).rect().bottom(), 2 * TILE_UNITS);

    tick(&mut sim, InputSnapshot::empty());
    assert_eq!(player(&sim).velocity, Point::default());

    let mut sim = single_map(&["B..B...P", "Bs.B....", "GGGGGGGG"]);
    let snake = first_of(&sim, EntityKind::Enemy(EnemySpecies::Snake));
    tick(&mut sim, InputSnapshot::empty());
    assert_eq!(
        sim.world().entity(snake).map(|e| e.velocity),
        Some(Point {
            x: -ENEMY_SPEED,
            y: GRAVITY
        })
    );
}

#[test]
fn snap_uses_most_restrictive_blocker() {
    let mut world = World::new(
        builtin_kind_catalog().expect("catalog"),
        Size { w: 4200, h: 4200 },
    );
    let mover = world
        .spawn(EntityKind::Player, Point { x: 0, y: 0 }, Orientation::Left)
        .expect("mover");
    for x in [500, 400] {
        world
            .spawn(
                EntityKind::Block(BlockStyle::Block),
                Point { x, y: 0 },
                Orientation::Left,
            )
            .expect("block");
    }

    let outcome = move_horizontal(&mut world, mover, 300);
    assert!(outcome.blocked);
    assert_eq!(outcome.contacts.len(), 2);
    assert_eq!(world.entity(mover).map(|e| e.rect().right()), Some(400));
}

#[test]
fn gravity_settles_player_on_ground() {
    let mut sim = single_map(&["P...", "....", "....", "GGGG"]);
    let ground_top = 3 * TILE_UNITS;

    for _ in 0..40 {
        tick(&mut sim, InputSnapshot::empty());
    }
    assert_eq!(player(&sim).rect().bottom(), ground_top);

    for _ in 0..10 {
        tick(&mut sim, InputSnapshot::empty());
        assert_eq!(player(&sim).rect().bottom(), ground_top);
    }
}

#[test]
fn right_wins_when_both_directions_held() {
    let mut sim = single_map(&["P...", "....", "GGGG"]);
    let x_before = player(&sim).position.x;

    tick(
        &mut sim,
        holding(&[InputAction::MoveLeft, InputAction::MoveRight]),
    );
    assert_eq!(player(&sim).position.x, x_before + WALK_SPEED);
    assert_eq!(player_state(&sim), PlayerState::GroundedRight);
}

#[test]
fn jump_needs_ground_and_rises_by_counter() {
    let mut sim = single_map(&["P...", "....", "GGGG"]);
    tick(&mut sim, InputSnapshot::empty());
    assert!(player(&sim).player().expect("body").grounded);

    let y_before = player(&sim).position.y;
    tick(&mut sim, holding(&[InputAction::Jump]));
    assert_eq!(player_state(&sim), PlayerState::JumpingRight);
    assert_eq!(player(&sim).position.y, y_before - (FULL_JUMP - 1));

    // Mid-air jump presses are ignored.
    tick(&mut sim, holding(&[InputAction::Jump]));
    assert_eq!(
        player(&sim).player().expect("body").jump_counter,
        FULL_JUMP - 2
    );
}

fn stomp_setup(player_bottom_px: i32, enemy_bottom_px: i32) -> Simulation {
    let mut sim = single_map(&["P.....d", "s......", "......."]);
    let player = sim.player().expect("player");
    let snake = first_of(&sim, EntityKind::Enemy(EnemySpecies::Snake));
    place(&mut sim, player, 0, px(player_bottom_px) - PLAYER_SIZE);
    place(&mut sim, snake, 0, px(enemy_bottom_px) - TILE_UNITS);
    sim
}

#[test]
fn stomp_when_player_is_five_pixels_higher() {
    let mut sim = stomp_setup(100, 110);
    let snake = first_of(&sim, EntityKind::Enemy(EnemySpecies::Snake));

    tick(&mut sim, InputSnapshot::empty());

    let enemy = sim.world().entity(snake).expect("snake").enemy().copied();
    assert_eq!(enemy.map(|e| e.state), Some(EnemyState::Dead));
    assert_eq!(player_state(&sim), PlayerState::JumpingRight);
    assert_eq!(
        player(&sim).player().expect("body").jump_counter,
        BOUNCE_JUMP - 1
    );
    assert!(sim
        .drain_events()
        .contains(&SimEvent::Sound(SoundCue::Stomp)));
    assert_eq!(sim.active_transition(), None);
}

#[test]
fn side_contact_kills_player() {
    let mut sim = stomp_setup(100, 103);

    tick(&mut sim, InputSnapshot::empty());

    assert_eq!(player_state(&sim), PlayerState::Dead);
    assert_eq!(sim.active_transition(), Some(TransitionKind::Death));
    let snake = first_of(&sim, EntityKind::Enemy(EnemySpecies::Snake));
    let enemy = sim.world().entity(snake).expect("snake").enemy().copied();
    assert_eq!(enemy.map(|e| e.state), Some(EnemyState::PatrolLeft));
}

#[test]
fn bounce_cannot_be_upgraded_to_full_jump() {
    let mut sim = stomp_setup(100, 110);
    let jump = holding(&[InputAction::Jump]);

    tick(&mut sim, jump);
    let body = *player(&sim).player().expect("body");
    assert!(!body.grounded);
    assert_eq!(body.jump_counter, BOUNCE_JUMP - 1);

    tick(&mut sim, jump);
    let body = *player(&sim).player().expect("body");
    assert!(!body.grounded);
    assert_eq!(body.jump_counter, BOUNCE_JUMP - 2);
}

#[test]
fn dead_enemy_bounces_player_instead_of_harming() {
    let mut sim = stomp_setup(100, 110);
    let snake = first_of(&sim, EntityKind::Enemy(EnemySpecies::Snake));
    tick(&mut sim, InputSnapshot::empty());
    sim.drain_events();
    let snake_entity = sim.world().entity(snake).expect("snake");
    assert_eq!(snake_entity.velocity, Point::default());

    // Level with the corpse and falling: a live enemy would kill here.
    let handle = sim.player().expect("player");
    place(&mut sim, handle, 0, px(110) - PLAYER_SIZE);
    if let Some(body) = sim.world.entity_mut(handle).and_then(|e| e.player_mut()) {
        body.jump_counter = 0;
    }
    tick(&mut sim, InputSnapshot::empty());

    assert_eq!(player_state(&sim), PlayerState::JumpingRight);
    assert_eq!(sim.active_transition(), None);
    assert_eq!(
        player(&sim).player().expect("body").jump_counter,
        BOUNCE_JUMP - 1
    );
    assert!(sim
        .drain_events()
        .contains(&SimEvent::Sound(SoundCue::Stomp)));
    let enemy = sim.world().entity(snake).expect("snake").enemy().copied();
    assert_eq!(enemy.map(|e| e.state), Some(EnemyState::Dead));
    assert_eq!(enemy.map(|e| e.death_hold), Some(ENEMY_DEATH_HOLD - 2));
}

#[test]
fn dead_enemy_clears_after_hold() {
    let mut sim = stomp_setup(100, 110);
    let gated = first_of(&sim, EntityKind::EnemyGatedBlock);
    tick(&mut sim, InputSnapshot::empty());
    assert!(!sim.progress().enemies_cleared);

    let mut ticks = 0;
    while !sim.progress().enemies_cleared {
        tick(&mut sim, InputSnapshot::empty());
        assert_ne!(player_state(&sim), PlayerState::Dead);
        ticks += 1;
        assert!(ticks <= ENEMY_DEATH_HOLD, "enemy never cleared");
    }
    assert_eq!(ticks, ENEMY_DEATH_HOLD - 1);

    assert!(sim.world().entity(gated).is_some());
    tick(&mut sim, InputSnapshot::empty());
    assert!(sim.world().entity(gated).is_none());
}

const ENEMY_DEATH_HOLD: u32 = crate::world::ENEMY_DEATH_HOLD_TICKS;

#[test]
fn last_coin_sets_coins_collected() {
    let mut sim = single_map(&["PC..", ".C..", "....", "GGGG"]);
    assert!(!sim.progress().coins_collected);

    tick(&mut sim, InputSnapshot::empty());
    assert!(!sim.progress().coins_collected);
    assert_eq!(sim.world().active_count(EntityKind::Coin), 1);

    tick(&mut sim, InputSnapshot::empty());
    assert!(sim.progress().coins_collected);
    assert_eq!(
        sim.drain_events()
            .iter()
            .filter(|e| **e == SimEvent::Sound(SoundCue::CoinCollected))
            .count(),
        2
    );
}

#[test]
fn key_pickup_is_permanent() {
    let mut sim = single_map(&["PK..", "....", "GGGG"]);
    assert!(!sim.progress().key_found);

    tick(&mut sim, InputSnapshot::empty());
    assert!(sim.progress().key_found);
    assert_eq!(sim.world().active_count(EntityKind::Key), 0);

    for _ in 0..5 {
        tick(&mut sim, InputSnapshot::empty());
    }
    assert!(sim.progress().key_found);
}

#[test]
fn goal_gate_requires_every_objective() {
    let mut flags = ProgressFlags {
        key_found: true,
        coins_collected: true,
        enemies_cleared: true,
        level_finished: false,
    };
    assert!(flags.goal_open());
    flags.coins_collected = false;
    assert!(!flags.goal_open());

    let mut sim = single_map(&["P.....dD", "........", "GGGGGGGG", "K..C..s."]);
    let gated = first_of(&sim, EntityKind::EnemyGatedBlock);
    let goal = first_of(&sim, EntityKind::GoalBlock);

    sim.progress.key_found = true;
    sim.progress.enemies_cleared = true;
    tick(&mut sim, InputSnapshot::empty());
    assert!(sim.world().entity(gated).is_none());
    assert!(sim.world().entity(goal).is_some());

    sim.progress.coins_collected = true;
    tick(&mut sim, InputSnapshot::empty());
    assert!(sim.world().entity(goal).is_none());
}

fn assert_camera_exact(speed_input: InputSnapshot, speed: i32) {
    let mut sim = single_map(&["P.....B", "......B", "GGGGGGG"]);
    let wall_left = 6 * TILE_UNITS;
    let mut blocked_ticks = 0;

    for _ in 0..60 {
        let shift_before = sim.world().camera().world_shift();
        let x_before = player(&sim).position.x;
        tick(&mut sim, speed_input);
        let shift_after = sim.world().camera().world_shift();
        let x_after = player(&sim).position.x;

        if x_after - x_before == speed {
            assert_eq!(shift_after, shift_before - speed);
        } else {
            blocked_ticks += 1;
            assert_eq!(shift_after, shift_before);
            assert_eq!(x_after + PLAYER_SIZE, wall_left);
        }
    }
    assert!(blocked_ticks > 0);
}

#[test]
fn camera_shift_is_exact_at_walk_speed() {
    assert_camera_exact(holding(&[InputAction::MoveRight]), WALK_SPEED);
}

#[test]
fn camera_shift_is_exact_at_run_speed() {
    assert_camera_exact(
        holding(&[InputAction::MoveRight, InputAction::Run]),
        RUN_SPEED,
    );
}

#[test]
fn camera_centres_player_on_load() {
    let sim = single_map(&["....P", "....."]);
    let screen = sim
        .world()
        .screen_rect(sim.player().expect("player"))
        .expect("screen rect");
    assert_eq!(screen.x + screen.w / 2, px(350));
}

#[test]
fn enemy_reverses_at_wall() {
    let mut sim = single_map(&["B..B...P", "Bs.B....", "GGGGGGGG"]);
    let snake = first_of(&sim, EntityKind::Enemy(EnemySpecies::Snake));

    tick(&mut sim, InputSnapshot::empty());
    let entity = sim.world().entity(snake).expect("snake");
    assert_eq!(entity.position.x, TILE_UNITS);
    assert_eq!(entity.enemy().map(|e| e.state), Some(EnemyState::PatrolRight));

    tick(&mut sim, InputSnapshot::empty());
    let entity = sim.world().entity(snake).expect("snake");
    assert_eq!(entity.position.x, TILE_UNITS + ENEMY_SPEED);
}

#[test]
fn quit_aborts_transition_without_side_effects() {
    let mut sim = sim_with(&[&[&["P...", "GGGG"]]], SimConfig::default());
    sim.load_map(MapId::FIRST).expect("load");
    sim.drain_events();
    assert_eq!(sim.active_transition(), Some(TransitionKind::LevelSplash));

    let status = tick(&mut sim, InputSnapshot::quit());
    assert_eq!(status, TickStatus::Quit);
    assert_eq!(sim.active_transition(), None);
    assert!(sim.drain_events().is_empty());
    assert_eq!(sim.lives(), SimConfig::default().starting_lives);
}

#[test]
fn quit_during_death_keeps_lives() {
    let mut sim = single_map(&["P...", "....", "...."]);
    let player_handle = sim.player().expect("player");
    place(&mut sim, player_handle, 0, px(700));
    tick(&mut sim, InputSnapshot::empty());
    assert_eq!(sim.active_transition(), Some(TransitionKind::Death));

    tick(&mut sim, InputSnapshot::quit());
    assert_eq!(sim.lives(), SimConfig::default().starting_lives);
    assert_eq!(sim.active_transition(), None);
}

#[test]
fn death_with_lives_left_reloads_first_map_of_level() {
    let first: &[&str] = &["P...", "GGGG"];
    let second: &[&str] = &["P...", "...."];
    let mut sim = sim_with(&[&[first, second]], SimConfig::default());
    sim.load_map(MapId::new(0, 1)).expect("load second map");
    assert_eq!(sim.active_transition(), None);
    sim.drain_events();

    let player_handle = sim.player().expect("player");
    place(&mut sim, player_handle, 0, px(700));
    tick(&mut sim, InputSnapshot::empty());
    assert_eq!(player_state(&sim), PlayerState::Dead);
    skip_transition(&mut sim);

    let lives = SimConfig::default().starting_lives - 1;
    assert_eq!(sim.lives(), lives);
    assert_eq!(sim.current_map(), Some(MapId::FIRST));
    assert_eq!(player_state(&sim), PlayerState::GroundedRight);
    let events = sim.drain_events();
    assert!(events.contains(&SimEvent::PlayerDied {
        lives_remaining: lives
    }));
    assert!(events.contains(&SimEvent::MapLoaded(MapId::FIRST)));
}

#[test]
fn last_life_ends_in_game_over_and_resets_lives() {
    let config = SimConfig {
        starting_lives: 1,
        ..SimConfig::default()
    };
    let mut sim = sim_with(&[&[&["P...", "...."]]], config);
    sim.load_map(MapId::FIRST).expect("load");
    skip_transition(&mut sim);

    let mut ticks = 0;
    while !sim.game_over() {
        tick(&mut sim, InputSnapshot::empty());
        ticks += 1;
        assert!(ticks < 2_000, "never reached game over");
    }

    assert!(!sim.is_playing());
    assert_eq!(sim.lives(), 1);
    assert!(sim.drain_events().contains(&SimEvent::GameOver));
    assert_eq!(tick(&mut sim, InputSnapshot::empty()), TickStatus::Idle);
}

#[test]
fn pipe_entry_requires_key() {
    let entry: &[&str] = &["P...h....", ".........", "GGGGGGGGG", "........K"];
    let next: &[&str] = &["P...", "GGGG"];
    let mut sim = sim_with(&[&[entry, next]], SimConfig::default());
    sim.load_map(MapId::FIRST).expect("load");
    skip_transition(&mut sim);
    let pipe = first_of(&sim, EntityKind::Pipe);
    let pipe_left = sim.world().entity(pipe).expect("pipe").rect().left();

    let walk = holding(&[InputAction::MoveRight]);
    for _ in 0..40 {
        tick(&mut sim, walk);
    }
    assert_eq!(player(&sim).rect().right(), pipe_left);
    assert_eq!(sim.active_transition(), None);

    sim.progress.key_found = true;
    tick(&mut sim, walk);
    assert_eq!(sim.active_transition(), Some(TransitionKind::PipeEntry));
    assert_eq!(player(&sim).position.y, 0);

    let mut ticks = 0;
    while sim.current_map() != Some(MapId::new(0, 1)) {
        tick(&mut sim, InputSnapshot::empty());
        ticks += 1;
        assert!(ticks < 1_000, "pipe never led to the next map");
    }
}

#[test]
fn down_pipe_slides_player_out_on_load() {
    let first: &[&str] = &["P...", "GGGG"];
    let second: &[&str] = &["VP..", "....", "....", "....", "...."];
    let mut sim = sim_with(&[&[first, second]], SimConfig::default());
    sim.load_map(MapId::new(0, 1)).expect("load");
    assert_eq!(sim.active_transition(), Some(TransitionKind::PipeExit));

    let pipe = first_of(&sim, EntityKind::Pipe);
    let pipe_bottom = sim.world().entity(pipe).expect("pipe").rect().bottom();
    skip_transition(&mut sim);
    assert_eq!(player(&sim).position.y, pipe_bottom + SLIDE_STEP);
    assert!(sim
        .drain_events()
        .contains(&SimEvent::Sound(SoundCue::PipeEnterExit)));
}

#[test]
fn finishing_final_map_signals_victory() {
    let mut sim = single_map(&["P...", "....", "gggg"]);
    assert!(sim.progress().goal_open());

    tick(&mut sim, InputSnapshot::empty());
    assert!(sim.level_finished());
    assert_eq!(sim.active_transition(), Some(TransitionKind::LevelFinish));

    skip_transition(&mut sim);
    assert!(sim.victory());
    assert!(!sim.is_playing());
    let events = sim.drain_events();
    assert!(events.contains(&SimEvent::Victory));
    assert!(events.contains(&SimEvent::Sound(SoundCue::GameComplete)));
}

#[test]
fn finish_slide_keeps_landing_speed() {
    let mut sim = single_map(&["P...", "....", "gggg"]);
    tick(&mut sim, holding(&[InputAction::Run]));
    assert_eq!(sim.active_transition(), Some(TransitionKind::LevelFinish));

    let x_before = player(&sim).position.x;
    tick(&mut sim, InputSnapshot::empty());
    assert_eq!(player(&sim).position.x, x_before + RUN_SPEED);
}

#[test]
fn goal_landing_is_ignored_while_gate_closed() {
    let mut sim = single_map(&["P..C", "....", "gggg"]);
    for _ in 0..10 {
        tick(&mut sim, InputSnapshot::empty());
    }
    assert!(!sim.level_finished());
    assert_eq!(sim.active_transition(), None);
}

#[test]
fn level_splash_starts_music_when_done() {
    let mut sim = sim_with(&[&[&["P...", "GGGG"]]], SimConfig::default());
    sim.load_map(MapId::FIRST).expect("load");
    let events = sim.drain_events();
    assert_eq!(
        events,
        vec![
            SimEvent::MapLoaded(MapId::FIRST),
            SimEvent::MusicPaused,
            SimEvent::LevelSplash {
                level_name: "Level 1".to_string()
            },
        ]
    );

    skip_transition(&mut sim);
    assert_eq!(
        sim.drain_events(),
        vec![SimEvent::MusicStarted {
            track: Some("track_0".to_string())
        }]
    );
}

#[test]
fn load_errors_are_reported() {
    let empty: &[&str] = &["....", "GGGG"];
    let crowded: &[&str] = &["P..P", "GGGG"];
    let mut sim = sim_with(&[&[empty, crowded]], SimConfig::default());

    assert_eq!(
        sim.load_map(MapId::new(3, 0)),
        Err(LoadError::UnknownMap(MapId::new(3, 0)))
    );
    assert_eq!(
        sim.load_map(MapId::new(0, 0)),
        Err(LoadError::MissingPlayer {
            map: MapId::new(0, 0)
        })
    );
    assert_eq!(
        sim.load_map(MapId::new(0, 1)),
        Err(LoadError::MultiplePlayers {
            map: MapId::new(0, 1),
            count: 2
        })
    );
    assert_eq!(tick(&mut sim, InputSnapshot::empty()), TickStatus::Idle);
}

#[test]
fn missing_kind_metadata_fails_load() {
    let catalog = builtin_kind_catalog()
        .expect("catalog")
        .without(EntityKind::Coin);
    let mut sim = Simulation::new(
        catalog,
        campaign(&[&[&["PC..", "GGGG"]]]),
        SimConfig::default(),
    );

    let err = sim.load_map(MapId::FIRST).expect_err("missing coin def");
    assert!(matches!(err, LoadError::Spawn { .. }));
    assert!(sim.world().active_handles().is_empty());
}

#[test]
fn sprites_report_screen_rects_and_poses() {
    let mut sim = single_map(&["P...", "....", "GGGG"]);
    tick(&mut sim, InputSnapshot::empty());
    let handle = sim.player().expect("player");

    let sprite = sim
        .sprites()
        .into_iter()
        .find(|sprite| sprite.handle == handle)
        .expect("player sprite");
    let world_rect: Rect = player(&sim).rect();
    assert_eq!(
        sprite.screen.x,
        world_rect.x + sim.world().camera().world_shift()
    );
    assert_eq!(sprite.visual.pose, crate::world::Pose::Standing);
}
