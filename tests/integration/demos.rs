//! Bundled demo projects driven tick by tick

use std::path::Path;

use scratch_vm::util::config::Config;
use scratch_vm::{load_file, Runtime, Value};

fn demo(name: &str) -> Runtime {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name);
    Runtime::init(load_file(&path, &Config::default()).unwrap())
}

fn ticks(
    rt: &mut Runtime,
    n: usize,
    dt: f64,
) {
    for _ in 0..n {
        rt.advance(dt);
    }
}

fn number(
    rt: &Runtime,
    target: &str,
    name: &str,
) -> f64 {
    rt.find_variable(target, name).unwrap().read_number()
}

// ============================================================================
// Digital clock
// ============================================================================

#[test]
fn test_clock_counts_first_second() {
    let mut rt = demo("digital_clock.json");
    ticks(&mut rt, 4, 0.25);
    assert_eq!(number(&rt, "Stage", "Seconds"), 0.0);
    ticks(&mut rt, 1, 0.25);
    assert_eq!(number(&rt, "Stage", "Seconds"), 1.0);
    assert_eq!(number(&rt, "Stage", "Minutes"), 0.0);
}

#[test]
fn test_clock_rolls_over_minute() {
    let mut rt = demo("digital_clock.json");
    ticks(&mut rt, 241, 0.25);
    assert_eq!(number(&rt, "Stage", "Minutes"), 1.0);
    assert_eq!(number(&rt, "Stage", "Seconds"), 0.0);

    ticks(&mut rt, 4, 0.25);
    assert_eq!(number(&rt, "Stage", "Minutes"), 1.0);
    assert_eq!(number(&rt, "Stage", "Seconds"), 1.0);
    assert!(!rt.is_idle());
}

// ============================================================================
// Move until edge
// ============================================================================

#[test]
fn test_move_until_edge_stops_past_240() {
    let mut rt = demo("move_until_edge.json");
    ticks(&mut rt, 19, 1.0);
    assert_eq!(rt.position("red_100x70").unwrap().x, 241.0);
    assert_eq!(number(&rt, "red_100x70", "finished"), 0.0);

    ticks(&mut rt, 1, 1.0);
    assert_eq!(rt.position("red_100x70").unwrap().x, 241.0);
    assert_eq!(
        rt.find_variable("red_100x70", "finished"),
        Some(&Value::number(1.0))
    );
    assert!(rt.is_idle());
}

#[test]
fn test_move_until_edge_ignores_delta_size() {
    let mut slow = demo("move_until_edge.json");
    let mut fast = demo("move_until_edge.json");
    ticks(&mut slow, 20, 0.001);
    ticks(&mut fast, 20, 50.0);
    assert_eq!(slow.position("red_100x70"), fast.position("red_100x70"));
    assert_eq!(
        slow.find_variable("red_100x70", "finished"),
        fast.find_variable("red_100x70", "finished")
    );
}

// ============================================================================
// Glide and wait
// ============================================================================

#[test]
fn test_glide_wait_phases() {
    let dt = 1000.0 / 30.0;
    let mut rt = demo("glide_wait.json");
    let mut xs = Vec::new();
    for _ in 0..150 {
        rt.advance(dt);
        let p = rt.position("Sprite1").unwrap();
        assert_eq!(p.x, p.y);
        xs.push(p.x);
    }

    // Outbound: strictly increasing until the exact target
    let reached = xs.iter().position(|&x| x == 100.0).unwrap();
    assert!((29..=31).contains(&reached), "reached 100 at tick {}", reached + 1);
    assert!(xs[..=reached].windows(2).all(|w| w[0] < w[1]));

    // Hold for the wait, about 500 units
    let held = xs[reached..].iter().take_while(|&&x| x == 100.0).count();
    assert!((14..=16).contains(&held), "held for {} ticks", held);

    // Return: non-increasing down to the exact origin, then stays put
    let back = reached + held;
    let home = back + xs[back..].iter().position(|&x| x == 0.0).unwrap();
    assert!((back + 58..=back + 61).contains(&home), "home at tick {}", home + 1);
    assert!(xs[back - 1..=home].windows(2).all(|w| w[0] > w[1]));
    assert!(xs[home..].iter().all(|&x| x == 0.0));
    assert!(rt.is_idle());
}

#[test]
fn test_glide_independent_of_split() {
    let mut whole = demo("glide_wait.json");
    whole.advance(250.0);
    let mut halves = demo("glide_wait.json");
    halves.advance(125.0);
    halves.advance(125.0);
    // Glide position is a function of elapsed time only
    assert_eq!(whole.position("Sprite1"), halves.position("Sprite1"));
    assert_eq!(whole.position("Sprite1").unwrap().x, 25.0);
}
