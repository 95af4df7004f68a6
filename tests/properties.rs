use flower_farm::LayoutClass;
use flower_farm::consts::MAX_CATERPILLAR_RATIO;
use flower_farm::settings::DifficultyPreset;
use flower_farm::sim::{
    Cell, DifficultySettings, GameEvent, GameState, Grid, ItemId, click_cell,
    multiplier_for_streak, tick,
};
use proptest::prelude::*;

/// Grid, item store and timer queue agree with each other
fn assert_consistent(state: &GameState) {
    assert_eq!(state.grid.occupied_count(), state.items.len());
    for item in state.items.iter() {
        assert!(state.grid.holds(item.cell, item.id), "{:?} lost its slot", item.id);
    }
    for action in state.scheduler().actions() {
        if let Some(id) = action.target() {
            assert!(state.items.get(id).is_some(), "timer {:?} outlived its item", action);
        }
    }
    assert_eq!(state.combo.multiplier, multiplier_for_streak(state.combo.streak));
}

#[derive(Debug, Clone)]
enum Op {
    Tick(u64),
    Click(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..2_500).prop_map(Op::Tick),
        (0usize..6, 0usize..8).prop_map(|(r, c)| Op::Click(r, c)),
    ]
}

proptest! {
    #[test]
    fn multiplier_is_monotone_and_capped(a in 0u32..10_000, b in 0u32..10_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(multiplier_for_streak(lo) <= multiplier_for_streak(hi));
        prop_assert!(multiplier_for_streak(hi) <= 3.0);
        prop_assert!(multiplier_for_streak(lo) >= 1.0);
    }

    #[test]
    fn progression_is_monotone_and_bounded(level in 0u32..5_000) {
        for preset in DifficultyPreset::ALL {
            let base = DifficultySettings::preset(preset);
            let now = base.at_level(level);
            let next = base.at_level(level + 1);
            prop_assert!(next.spawn_delay.min <= now.spawn_delay.min);
            prop_assert!(next.spawn_delay.max <= now.spawn_delay.max);
            prop_assert!(next.lifetime.min <= now.lifetime.min);
            prop_assert!(next.lifetime.max <= now.lifetime.max);
            prop_assert!(next.caterpillar_ratio >= now.caterpillar_ratio);
            prop_assert!(next.caterpillar_ratio <= MAX_CATERPILLAR_RATIO);
            prop_assert!(next.spawn_delay.min >= 100 && next.lifetime.min >= 500);
        }
    }

    #[test]
    fn place_never_overwrites(cells in prop::collection::vec((0usize..4, 0usize..4), 1..40)) {
        let mut grid = Grid::new(4, 4);
        for (i, (row, col)) in cells.into_iter().enumerate() {
            let cell = Cell::new(row, col);
            let before = grid.get(cell);
            let placed = grid.place(ItemId(i as u32), cell);
            match before {
                Some(existing) => {
                    prop_assert!(placed.is_err());
                    prop_assert_eq!(grid.get(cell), Some(existing));
                }
                None => prop_assert_eq!(grid.get(cell), Some(ItemId(i as u32))),
            }
        }
    }

    #[test]
    fn sessions_stay_consistent(seed in any::<u64>(), ops in prop::collection::vec(op(), 1..120)) {
        let mut state = GameState::with_seed(LayoutClass::Desktop, seed);
        state.start("hard").unwrap();
        let mut last_score = 0u64;

        for op in ops {
            match op {
                Op::Tick(dt) => tick(&mut state, dt),
                Op::Click(row, col) => {
                    if let Some(outcome) = click_cell(&mut state, Cell::new(row, col)) {
                        prop_assert_eq!(state.score as i64, last_score as i64 + outcome.delta);
                    }
                }
            }
            for event in state.drain_events() {
                if let GameEvent::ScoreChanged { score } = event {
                    last_score = score;
                }
            }
            prop_assert_eq!(last_score, state.score);
            assert_consistent(&state);
        }
    }
}
