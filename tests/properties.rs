//! Property tests for simulation and leaderboard invariants

use proptest::prelude::*;

use wheeliepoppers::leaderboard::{
    Leaderboard, LeaderboardEntry, MAX_ENTRIES, MAX_JACKPOT_HISTORY, Submission,
};
use wheeliepoppers::sim::{GameMode, KeySet, MatchState, Side, TickInput, tick};

const KEYS: [&str; 8] = [
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "ArrowDown",
    "a",
    "d",
    "w",
    "s",
];

fn key_set(mask: u8) -> KeySet {
    KeySet::from_keys(
        KEYS.iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, k)| *k),
    )
}

fn mode(choice: u8) -> GameMode {
    match choice % 4 {
        0 => GameMode::TwoPlayer,
        1 => GameMode::OnePlayer { human: Side::P1 },
        2 => GameMode::OnePlayer { human: Side::P2 },
        _ => GameMode::Demo,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn health_stays_in_range_and_never_increases(
        seed in any::<u64>(),
        mode_choice in any::<u8>(),
        masks in prop::collection::vec(any::<u8>(), 1..600),
    ) {
        let mut state = MatchState::with_viewport(800.0, 600.0, seed);
        state.start(mode(mode_choice));
        let max = state.tuning.max_health;

        let mut last = [max, max];
        for (n, mask) in masks.iter().enumerate() {
            let input = TickInput { keys: key_set(*mask), now_ms: n as u64 * 16 };
            tick(&mut state, &input);
            for side in Side::BOTH {
                let health = state.player(side).health;
                prop_assert!(health <= max);
                prop_assert!(health <= last[side.index()]);
                last[side.index()] = health;
            }
        }
    }

    #[test]
    fn actors_stay_inside_the_arena(
        seed in any::<u64>(),
        width in 400.0f32..1600.0,
        height in 20.0f32..1000.0,
        masks in prop::collection::vec(any::<u8>(), 1..400),
    ) {
        let mut state = MatchState::with_viewport(width, height, seed);
        state.start(GameMode::TwoPlayer);

        for (n, mask) in masks.iter().enumerate() {
            let input = TickInput { keys: key_set(*mask), now_ms: n as u64 * 16 };
            tick(&mut state, &input);
            for side in Side::BOTH {
                let actor = state.player(side);
                prop_assert!(actor.pos.y <= state.bounds.bottom);
                prop_assert!(actor.pos.x >= state.bounds.left);
                prop_assert!(actor.pos.x + actor.size.x <= state.bounds.right + 1e-3);
            }
        }
    }

    #[test]
    fn same_seed_same_match(seed in any::<u64>()) {
        let run = || {
            let mut state = MatchState::with_viewport(1024.0, 768.0, seed);
            state.start(GameMode::Demo);
            let mut events = Vec::new();
            for n in 0..600u64 {
                events.extend(tick(&mut state, &TickInput { keys: KeySet::new(), now_ms: n * 16 }));
            }
            (events, state.player(Side::P1).pos, state.player(Side::P2).pos)
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn leaderboard_sorted_and_bounded(
        submissions in prop::collection::vec(("[a-e]{1,2}", -1000i64..1_000_000), 1..250),
    ) {
        let mut board = Leaderboard::seed();
        for (name, score) in &submissions {
            let before = board.get(name).map(|e| e.high_score);
            board.submit(&Submission::new(name.clone(), *score), 0);

            prop_assert!(board.len() <= MAX_ENTRIES);
            prop_assert!(board.entries.windows(2).all(|w| w[0].high_score >= w[1].high_score));
            if let (Some(before), Some(after)) = (before, board.get(name)) {
                prop_assert!(after.high_score >= before);
            }
        }
    }

    #[test]
    fn jackpot_history_bounded(
        timestamps in prop::collection::vec(0i64..10_000, 1..120),
    ) {
        let mut board = Leaderboard::new(vec![LeaderboardEntry::new("Lucky", "🍀", 1)]);
        for t in &timestamps {
            board.submit(&Submission::new("Lucky", 1).with_jackpot(None, 100), *t);
        }
        let history = &board.get("Lucky").unwrap().jackpot_history;
        prop_assert_eq!(history.len(), timestamps.len().min(MAX_JACKPOT_HISTORY));

        if timestamps.len() > MAX_JACKPOT_HISTORY {
            let mut sorted = timestamps.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            let kept_min = history.iter().map(|e| e.timestamp).min().unwrap();
            // Nothing newer than the oldest survivor was dropped
            prop_assert!(kept_min >= sorted[MAX_JACKPOT_HISTORY - 1]);
        }
    }
}
