use std::collections::HashMap;

use glam::IVec2;
use maze_chase::entity::behavior::{Mode, Timings};
use maze_chase::entity::pursuer::Pursuer;
use maze_chase::entity::targeting::Archetype;
use maze_chase::game::{Round, RoundConfig};
use maze_chase::map::builder::Maze;
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use speculoos::prelude::*;
use strum::IntoEnumIterator;

mod common;

use common::{center, default_grid, default_maze, grid_from, player_at, run, STEP};

/// A single direct pursuer on the default board, outside the pen.
fn lone_direct_pursuer() -> Round {
    let maze = default_maze();
    let maze = Maze::new(maze.grid().clone(), maze.player_start(), vec![(Archetype::Direct, IVec2::new(13, 11))]).unwrap();
    Round::new(maze, RoundConfig::default(), 7).unwrap()
}

#[test]
fn test_spawn_wait_is_immobile() {
    let mut round = Round::with_default_board(1).unwrap();
    round.reset_agents();

    let before: Vec<_> = round.pursuers().iter().map(|p| p.position()).collect();
    for _ in 0..5 {
        round.tick(0.1);
    }
    let after: Vec<_> = round.pursuers().iter().map(|p| p.position()).collect();

    assert_eq!(before, after);
    for pursuer in round.pursuers() {
        assert_eq!(pursuer.mode(), Mode::SpawnWait);
    }
}

#[test]
fn test_spawn_wait_ignores_large_steps() {
    let grid = default_grid();
    let player = player_at(&grid, 14, 23);
    let mut rng = SmallRng::seed_from_u64(0);

    let mut pursuer = Pursuer::new(&grid, Archetype::Opportunist, IVec2::new(16, 14), 120.0, Timings::default());
    pursuer.reset(&grid);
    let start = pursuer.position();

    pursuer.update(&grid, &player, None, 5.0, &mut rng);
    assert_eq!(pursuer.mode(), Mode::SpawnWait);
    assert_eq!(pursuer.position(), start);

    // The release tick itself does not move the pursuer either.
    pursuer.update(&grid, &player, None, 5.0, &mut rng);
    assert_eq!(pursuer.mode(), Mode::SpawnExit);
    assert_eq!(pursuer.position(), start);
}

#[test]
fn test_release_and_escape() {
    let mut round = Round::with_default_board(3).unwrap();
    round.reset_agents();

    // The direct pursuer waits one second: sixty frames.
    run(&mut round, 59);
    assert_eq!(round.pursuer(Archetype::Direct).unwrap().mode(), Mode::SpawnWait);
    run(&mut round, 1);
    assert_eq!(round.pursuer(Archetype::Direct).unwrap().mode(), Mode::SpawnExit);

    let mut escaped: HashMap<Archetype, usize> = HashMap::new();
    for tick in 0..60 * 12 {
        round.tick(STEP);
        for pursuer in round.pursuers() {
            if !pursuer.in_pen() && matches!(pursuer.mode(), Mode::Scatter | Mode::Chase | Mode::Frightened) {
                escaped.entry(pursuer.archetype()).or_insert(tick);
            }
        }
    }

    for archetype in Archetype::iter() {
        assert!(escaped.contains_key(&archetype), "{archetype} never left the pen");
    }
}

#[test]
fn test_exit_lands_on_cell_centre() {
    let grid = default_grid();
    let player = player_at(&grid, 14, 23);
    let mut rng = SmallRng::seed_from_u64(0);

    let mut pursuer = Pursuer::new(&grid, Archetype::Direct, IVec2::new(13, 13), 120.0, Timings::default());
    assert_eq!(pursuer.mode(), Mode::SpawnExit);
    assert_eq!(pursuer.exit_cell(), Some(IVec2::new(13, 11)));

    for _ in 0..120 {
        pursuer.update(&grid, &player, None, STEP, &mut rng);
        if pursuer.mode() != Mode::SpawnExit {
            break;
        }
    }

    assert_eq!(pursuer.mode(), Mode::Scatter);
    assert_that(&pursuer.in_pen()).is_false();
    assert_eq!(pursuer.cell(&grid), IVec2::new(13, 11));
    assert_eq!(pursuer.position(), grid.cell_center(IVec2::new(13, 11)));
}

#[test]
fn test_fright_reverses_and_resumes_cycle() {
    let grid = default_grid();
    let player = player_at(&grid, 14, 23);
    let mut rng = SmallRng::seed_from_u64(11);

    let mut pursuer = Pursuer::new(&grid, Archetype::Direct, IVec2::new(13, 11), 120.0, Timings::default());
    for _ in 0..90 {
        pursuer.update(&grid, &player, None, STEP, &mut rng);
    }

    let heading = pursuer.heading();
    let cycle = pursuer.behavior().cycle_timer();
    assert_that(&heading).is_not_equal_to(IVec2::ZERO);

    assert!(pursuer.frighten());
    assert_eq!(pursuer.mode(), Mode::Frightened);
    assert_eq!(pursuer.heading(), -heading);
    assert_eq!(pursuer.effective_speed(), 60.0);

    while pursuer.is_frightened() {
        pursuer.update(&grid, &player, None, STEP, &mut rng);
    }

    assert_eq!(pursuer.mode(), Mode::Scatter);
    assert_eq!(pursuer.effective_speed(), 120.0);
    assert_eq!(pursuer.behavior().cycle_timer(), cycle);
}

#[test]
fn test_fright_speed_over_eight_seconds() {
    let grid = default_grid();
    let player = player_at(&grid, 14, 23);
    let mut rng = SmallRng::seed_from_u64(5);

    let mut pursuer = Pursuer::new(&grid, Archetype::Direct, IVec2::new(13, 11), 120.0, Timings::default());
    assert_eq!(pursuer.effective_speed(), 120.0);
    pursuer.frighten();

    for frame in 1..=480 {
        assert_eq!(pursuer.effective_speed(), 60.0, "frame {frame}");
        pursuer.update(&grid, &player, None, STEP, &mut rng);
    }
    assert_eq!(pursuer.effective_speed(), 120.0);
}

#[test]
fn test_fright_ignored_in_pen() {
    let mut round = Round::with_default_board(2).unwrap();
    round.reset_agents();

    assert_eq!(round.apply_fright_effect(), 0);
    for pursuer in round.pursuers() {
        assert_eq!(pursuer.mode(), Mode::SpawnWait);
    }
}

#[test]
fn test_scatter_then_chase_the_player() {
    let mut round = lone_direct_pursuer();

    run(&mut round, 419);
    assert_eq!(round.pursuer(Archetype::Direct).unwrap().mode(), Mode::Scatter);

    let events = run(&mut round, 1);
    assert_that(&events).is_empty();

    let pursuer = round.pursuer(Archetype::Direct).unwrap();
    assert_eq!(pursuer.mode(), Mode::Chase);
    assert_eq!(round.player().cell(round.grid()), IVec2::new(14, 23));
    assert_eq!(pursuer.target(), IVec2::new(14, 23));
}

#[test]
fn test_pursuer_keeps_moving() {
    let mut round = lone_direct_pursuer();
    let grid = round.grid().clone();

    // Every second of the scatter phase, the pursuer has covered ground and is still out of the walls.
    let mut last = round.pursuers()[0].position();
    for _ in 0..6 {
        run(&mut round, 60);
        let pursuer = &round.pursuers()[0];
        assert_that(&pursuer.position()).is_not_equal_to(last);
        assert!(!grid.is_wall(pursuer.cell(&grid)));
        last = pursuer.position();
    }
}

#[test]
fn test_pursuer_keeps_moving_with_long_steps() {
    let grid = default_grid();
    let player = player_at(&grid, 14, 23);

    for dt in [0.2, 0.5] {
        for seed in 0..3 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut pursuer = Pursuer::new(&grid, Archetype::Direct, IVec2::new(13, 11), 120.0, Timings::default());

            let mut still = 0;
            let mut longest_still = 0;
            for _ in 0..(60.0 / dt) as usize {
                let before = pursuer.position();
                pursuer.update(&grid, &player, None, dt, &mut rng);
                assert!(!grid.is_wall(pursuer.cell(&grid)), "dt {dt}: in a wall at {}", pursuer.cell(&grid));

                still = if pursuer.position() == before { still + 1 } else { 0 };
                longest_still = longest_still.max(still);
            }

            assert_that(&longest_still).is_less_than(2);
        }
    }
}

#[test]
fn test_long_step_stops_at_every_cell_centre() {
    let grid = grid_from(&["#######", "#P    #", "#.#####", "#######"]);
    let player = player_at(&grid, 1, 1);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut pursuer = Pursuer::new(&grid, Archetype::Flanker, IVec2::new(5, 1), 120.0, Timings::default());

    // 60 units per tick: three cells along the corridor.
    pursuer.update(&grid, &player, None, 0.5, &mut rng);
    assert_eq!(pursuer.position(), center(&grid, 2, 1));

    // Turns down at (1,1), bounces off the dead end at (1,2) and comes back up.
    pursuer.update(&grid, &player, None, 0.5, &mut rng);
    assert_eq!(pursuer.position(), center(&grid, 1, 1));
    assert_eq!(pursuer.heading(), IVec2::new(0, -1));
}
