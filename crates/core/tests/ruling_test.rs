use gridline_core::ruling::DEFAULT_MAX_DISTANCE;
use gridline_core::{GridError, HasRect, Ruling, clean_rulings};

fn h(top: f64, left: f64, right: f64) -> Ruling {
    Ruling::horizontal(top, left, right).unwrap()
}

fn v(left: f64, top: f64, bottom: f64) -> Ruling {
    Ruling::vertical(left, top, bottom).unwrap()
}

fn messy_inputs() -> Vec<Vec<Ruling>> {
    vec![
        vec![],
        vec![h(0.0, 0.0, 100.0)],
        vec![h(0.0, 0.0, 40.0), h(0.0, 44.0, 100.0), h(1.5, 10.0, 120.0)],
        vec![h(0.0, 0.0, 10.0), h(3.0, 0.0, 10.0), h(5.0, 0.0, 10.0), h(8.5, 0.0, 10.0)],
        vec![
            v(10.0, 0.0, 50.0),
            v(12.0, 55.0, 90.0),
            v(13.5, 0.0, 20.0),
            v(80.0, 0.0, 100.0),
            h(20.0, 0.0, 100.0),
            h(22.0, 0.0, 30.0),
            h(22.0, 70.0, 100.0),
        ],
        vec![
            v(0.0, 0.0, 10.0),
            v(0.0, 30.0, 40.0),
            v(0.0, 12.0, 25.0),
            v(2.0, 100.0, 110.0),
        ],
    ]
}

#[test]
fn test_clean_rulings_is_idempotent() {
    for input in messy_inputs() {
        let once = clean_rulings(input.clone(), DEFAULT_MAX_DISTANCE);
        let twice = clean_rulings(once.clone(), DEFAULT_MAX_DISTANCE);
        assert_eq!(once, twice, "input: {input:?}");
    }
}

#[test]
fn test_clean_rulings_keeps_orientation_partition() {
    for input in messy_inputs() {
        let cleaned = clean_rulings(input, DEFAULT_MAX_DISTANCE);
        let first_vertical = cleaned.iter().position(Ruling::is_vertical).unwrap_or(cleaned.len());
        assert!(cleaned[..first_vertical].iter().all(Ruling::is_horizontal));
        assert!(cleaned[first_vertical..].iter().all(Ruling::is_vertical));
    }
}

#[test]
fn test_split_border_becomes_one_ruling() {
    let cleaned = clean_rulings(
        vec![h(50.0, 0.0, 30.0), h(50.0, 33.0, 61.0), h(50.0, 65.0, 100.0)],
        DEFAULT_MAX_DISTANCE,
    );
    assert_eq!(cleaned, vec![h(50.0, 0.0, 100.0)]);
}

#[test]
fn test_nearby_parallel_pieces_collapse_into_one_span() {
    let cleaned = clean_rulings(vec![h(10.0, 0.0, 40.0), h(12.0, 100.0, 150.0)], DEFAULT_MAX_DISTANCE);
    assert_eq!(cleaned, vec![h(11.0, 0.0, 150.0)]);

    let cleaned = clean_rulings(
        vec![h(20.0, 0.0, 100.0), h(22.0, 0.0, 30.0), h(22.0, 70.0, 100.0)],
        DEFAULT_MAX_DISTANCE,
    );
    assert_eq!(cleaned, vec![h(21.0, 0.0, 100.0)]);
}

#[test]
fn test_distant_parallel_rulings_are_kept() {
    let input = vec![v(0.0, 0.0, 10.0), v(20.0, 0.0, 10.0), v(40.0, 0.0, 10.0)];
    let cleaned = clean_rulings(input.clone(), DEFAULT_MAX_DISTANCE);
    assert_eq!(cleaned, input);
}

#[test]
fn test_stroking_color_is_carried() {
    let r = h(0.0, 0.0, 10.0).with_stroking_color("#000000");
    assert_eq!(r.stroking_color.as_deref(), Some("#000000"));
    assert_eq!(r.length(), 10.0);
    assert_eq!(r.width(), 10.0);
}

#[test]
fn test_rulings_must_be_axis_aligned() {
    let err = Ruling::new(5.0, 5.0, 3.0, 4.0).unwrap_err();
    assert!(matches!(err, GridError::DegenerateRuling { width, height, .. } if width == 3.0 && height == 4.0));
    assert!(err.to_string().contains("neither horizontal nor vertical"));
}

#[test]
fn test_grid_corners_nearly_intersect() {
    let top = h(0.0, 0.0, 100.0);
    let bottom = h(100.0, 0.0, 100.0);
    let left = v(0.0, 0.0, 100.0);
    let right = v(100.0, 0.0, 100.0);
    for horizontal in [&top, &bottom] {
        for vertical in [&left, &right] {
            assert!(horizontal.nearly_intersects(vertical));
            assert!(vertical.nearly_intersects(horizontal));
        }
    }
    assert!(top.intersects(&left));
    assert!(!bottom.intersects(&right));
}
