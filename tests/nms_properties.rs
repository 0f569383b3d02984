use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ramyeon::model::{BoxConvention, Detection, iou, iou_with, suppress, suppress_with};

fn random_detections(rng: &mut StdRng, count: usize) -> Vec<Detection> {
  (0..count)
    .map(|_| {
      Detection::new(
        rng.random_range(0.0..200.0),
        rng.random_range(0.0..200.0),
        rng.random_range(1.0..80.0),
        rng.random_range(1.0..80.0),
        rng.random_range(0..31),
        rng.random_range(0.26..1.0),
      )
    })
    .collect()
}

#[test]
fn output_is_sorted_subset_of_input() {
  let mut rng = StdRng::seed_from_u64(7);
  for _ in 0..50 {
    let input = random_detections(&mut rng, 40);
    let kept = suppress(input.clone(), 0.45);

    assert!(kept.iter().all(|det| input.contains(det)));
    assert!(
      kept
        .windows(2)
        .all(|w| w[0].confidence() >= w[1].confidence())
    );
  }
}

#[test]
fn suppression_is_idempotent() {
  let mut rng = StdRng::seed_from_u64(11);
  for convention in [BoxConvention::AsCorner, BoxConvention::Center] {
    for _ in 0..50 {
      let input = random_detections(&mut rng, 40);
      let once = suppress_with(input, 0.45, convention);
      let twice = suppress_with(once.clone(), 0.45, convention);
      assert_eq!(once, twice);
    }
  }
}

#[test]
fn kept_boxes_do_not_overlap_beyond_threshold() {
  let mut rng = StdRng::seed_from_u64(13);
  let kept = suppress(random_detections(&mut rng, 100), 0.3);
  for (i, a) in kept.iter().enumerate() {
    for b in &kept[i + 1..] {
      assert!(iou(a, b) <= 0.3);
    }
  }
}

#[test]
fn iou_is_symmetric_and_bounded() {
  let mut rng = StdRng::seed_from_u64(17);
  let boxes = random_detections(&mut rng, 60);
  for a in &boxes {
    for b in &boxes {
      for convention in [BoxConvention::AsCorner, BoxConvention::Center] {
        let ab = iou_with(a, b, convention);
        assert_eq!(ab, iou_with(b, a, convention));
        assert!((0.0..=1.0).contains(&ab));
      }
    }
  }
}

#[test]
fn degenerate_boxes_never_suppress() {
  let point = Detection::new(5.0, 5.0, 0.0, 0.0, 0, 0.9);
  let other = Detection::new(5.0, 5.0, 0.0, 0.0, 1, 0.8);
  assert_eq!(iou(&point, &other), 0.0);
  assert_eq!(suppress(vec![other, point], 0.0), vec![point, other]);
}

#[test]
fn center_convention_separates_shifted_boxes() {
  // 按左上角解释时重叠 0.2，按中心解释时互不相交
  let wide = Detection::new(0.0, 0.0, 20.0, 10.0, 0, 0.9);
  let narrow = Detection::new(15.0, 0.0, 10.0, 10.0, 0, 0.8);

  assert_eq!(suppress(vec![wide, narrow], 0.1).len(), 1);
  assert_eq!(
    suppress_with(vec![wide, narrow], 0.1, BoxConvention::Center).len(),
    2
  );
}
