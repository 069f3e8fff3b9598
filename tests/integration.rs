// Integration tests (native) for the `astro-typer` crate.
// These drive the session the way the browser driver does, minus the canvas.

use astro_typer::{GameConfig, GameEvent, GamePhase, KeyOutcome, MENU_KEY, Session, Summary, tokenize};

const WIDTH: f64 = 1024.0;
const HEIGHT: f64 = 768.0;

fn playing(seed: u64) -> Session {
    let mut s = Session::seeded(GameConfig::default(), seed);
    s.resize(WIDTH, HEIGHT);
    s.start();
    assert_eq!(s.drain_events(), vec![GameEvent::Started]);
    s
}

fn type_str(s: &mut Session, text: &str) -> Vec<KeyOutcome> {
    text.chars().map(|c| s.handle_key(&c.to_string())).collect()
}

/// Finish words until the level moves to `target`.
fn climb_to(s: &mut Session, target: u32) {
    while s.level() < target {
        s.insert_asteroid("extraterrestrial", 300.0, 10.0, 0.0);
        type_str(s, "extraterrestrial");
    }
}

#[test]
fn typing_code_at_level_one_scores_forty() {
    let mut s = playing(1);
    let id = s.insert_asteroid("code", 200.0, 100.0, 1.0);
    let outcomes = type_str(&mut s, "code");
    assert_eq!(
        outcomes,
        vec![
            KeyOutcome::Acquired(id),
            KeyOutcome::Advanced(id),
            KeyOutcome::Advanced(id),
            KeyOutcome::Completed(id),
        ]
    );
    assert_eq!(s.score(), 40);
    assert!(s.asteroid(id).is_none());
    assert_eq!(s.target(), None);
    assert_eq!(s.current_word(), "");
}

#[test]
fn wrong_letter_at_level_two_releases_space() {
    let mut s = playing(2);
    climb_to(&mut s, 2);
    assert_eq!(s.level(), 2);
    let score = s.score();

    let id = s.insert_asteroid("space", 200.0, 100.0, 1.0);
    type_str(&mut s, "sp");
    assert_eq!(s.current_word(), "sp");
    assert_eq!(s.handle_key("x"), KeyOutcome::Missed(id));

    let a = s.asteroid(id).expect("asteroid stays in play");
    assert!(!a.targeted);
    assert_eq!(a.typed_len, 0);
    assert_eq!(s.target(), None);
    assert_eq!(s.current_word(), "");
    assert_eq!(s.score(), score);
}

#[test]
fn uppercase_keys_match() {
    let mut s = playing(3);
    s.insert_asteroid("orbit", 200.0, 100.0, 1.0);
    type_str(&mut s, "ORBIT");
    assert!(s.asteroids().is_empty());
    assert_eq!(s.score(), 50);
}

#[test]
fn score_gain_matches_formula_at_higher_levels() {
    let mut s = playing(4);
    climb_to(&mut s, 3);
    let level = s.level();
    let before = s.score();
    s.insert_asteroid("velocity", 200.0, 100.0, 1.0);
    type_str(&mut s, "velocity");
    let expected = (8.0 * 10.0 * f64::from(level).sqrt()).floor() as u64;
    assert_eq!(s.score() - before, expected);
}

#[test]
fn level_rises_at_most_one_per_destruction() {
    let mut s = playing(5);
    let mut last_level = s.level();
    for _ in 0..40 {
        s.insert_asteroid("extraterrestrial", 300.0, 10.0, 0.0);
        type_str(&mut s, "extraterrestrial");
        let level = s.level();
        assert!(level == last_level || level == last_level + 1);
        if level == last_level + 1 {
            assert!(s.score() > u64::from(last_level) * 300);
        }
        last_level = level;
    }
    assert!(s.level() > 3);
}

#[test]
fn last_life_lost_ends_the_run() {
    let mut s = playing(6);
    for expected in [2, 1] {
        s.insert_asteroid("ship", 200.0, HEIGHT, 1.0);
        s.tick(0.0);
        assert_eq!(s.lives(), expected);
        assert_eq!(s.phase(), GamePhase::Playing);
    }
    s.insert_asteroid("ship", 200.0, HEIGHT, 1.0);
    s.tick(0.0);
    assert_eq!(s.lives(), 0);
    assert_eq!(s.phase(), GamePhase::GameOver);

    let events = s.drain_events();
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver(Summary { score: 0, level: 1 }))
    );

    // nothing moves or spawns once the run is over
    let count = s.asteroids().len();
    for frame in 1..100 {
        s.tick(f64::from(frame) * 5_000.0);
    }
    assert_eq!(s.asteroids().len(), count);
    assert_eq!(s.handle_key("s"), KeyOutcome::Ignored);
}

#[test]
fn game_over_then_restart_then_menu() {
    let mut s = playing(7);
    for _ in 0..3 {
        s.insert_asteroid("ship", 200.0, HEIGHT, 1.0);
        s.tick(0.0);
    }
    assert_eq!(s.phase(), GamePhase::GameOver);

    s.start();
    assert_eq!(s.phase(), GamePhase::Playing);
    assert_eq!((s.score(), s.level(), s.lives()), (0, 1, 3));
    assert!(s.asteroids().is_empty());

    s.handle_key(MENU_KEY);
    assert_eq!(s.phase(), GamePhase::Menu);
}

#[test]
fn invariants_hold_over_a_long_random_run() {
    let mut s = playing(8);
    let keys: Vec<char> = "thequickbrownfoxjumpsoverthelazydogcodeorbitspace".chars().collect();
    let mut now = 0.0;
    for frame in 0..3_000 {
        now += 16.0;
        s.tick(now);
        if frame % 3 == 0 {
            let key = keys[frame / 3 % keys.len()];
            s.handle_key(&key.to_string());
        }
        let targeted: Vec<_> = s.asteroids().iter().filter(|a| a.targeted).collect();
        assert!(targeted.len() <= 1);
        for a in s.asteroids() {
            assert!(a.typed_len <= a.len());
        }
        match s.target() {
            Some(id) => {
                let a = s.asteroid(id).expect("target is in the field");
                assert!(a.targeted);
                assert!(a.word.starts_with(s.current_word()));
            }
            None => assert_eq!(s.current_word(), ""),
        }
        if s.phase() != GamePhase::Playing {
            break;
        }
    }
}

#[test]
fn custom_text_scenario() {
    assert_eq!(tokenize("Hello World! A"), vec!["hello", "world"]);

    let mut s = Session::seeded(GameConfig::default(), 9);
    s.resize(WIDTH, HEIGHT);
    assert_eq!(s.load_custom_text("Hello World! A").unwrap(), 2);
    assert!(s.load_custom_text("!! ?").is_err());
    assert_eq!(s.words().custom_words(), ["hello", "world"]);
}

#[test]
fn tuning_overrides_apply_on_start() {
    let mut s = Session::seeded(GameConfig::default(), 10);
    s.set_config(GameConfig {
        initial_lives: 1,
        ..GameConfig::default()
    });
    s.resize(WIDTH, HEIGHT);
    s.start();
    assert_eq!(s.lives(), 1);
    s.insert_asteroid("star", 10.0, HEIGHT, 5.0);
    s.tick(0.0);
    assert_eq!(s.phase(), GamePhase::GameOver);
}
