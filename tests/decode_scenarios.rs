use ramyeon::model::{
  Detection, PipelineConfig, UNSET_CLASS_ID, decode, record_stride, suppress,
};

const CLASSES: i32 = 31;
const STRIDE: usize = 36;

fn record(geometry: [f32; 4], objectness: f32, class_id: usize, score: f32) -> Vec<f32> {
  let mut out = vec![0.0f32; STRIDE];
  out[..4].copy_from_slice(&geometry);
  out[4] = objectness;
  for (i, v) in out[5..].iter_mut().enumerate() {
    *v = 0.01 * (i % 7) as f32;
  }
  out[5 + class_id] = score;
  out
}

#[test]
fn reference_layout_has_stride_36() {
  assert_eq!(record_stride(CLASSES), STRIDE);
  assert_eq!(PipelineConfig::default().stride(), STRIDE);
}

#[test]
fn two_separate_records_both_survive() {
  let mut tensor = record([10.0, 10.0, 20.0, 20.0], 0.8, 3, 0.9);
  tensor.extend(record([300.0, 300.0, 20.0, 20.0], 0.7, 12, 0.95));

  let candidates = decode(&tensor, STRIDE, CLASSES, 0.25);
  assert_eq!(candidates.len(), 2);

  let kept = suppress(candidates, 0.45);
  assert_eq!(kept.len(), 2);
  assert_eq!(kept[0].class_id(), 3);
  assert_eq!(kept[1].class_id(), 12);
}

#[test]
fn overlapping_records_keep_the_stronger() {
  let mut tensor = record([100.0, 100.0, 50.0, 50.0], 0.6, 1, 0.9);
  tensor.extend(record([102.0, 101.0, 50.0, 50.0], 0.9, 2, 0.9));

  let kept = suppress(decode(&tensor, STRIDE, CLASSES, 0.25), 0.45);
  assert_eq!(kept.len(), 1);
  assert_eq!(kept[0].confidence(), 0.9);
  assert_eq!(kept[0].class_id(), 2);
}

#[test]
fn confidence_equal_to_threshold_is_rejected() {
  let tensor = record([0.0, 0.0, 1.0, 1.0], 0.25, 0, 0.9);
  assert!(decode(&tensor, STRIDE, CLASSES, 0.25).is_empty());
}

#[test]
fn partial_trailing_record_is_ignored() {
  let mut tensor = record([1.0, 2.0, 3.0, 4.0], 0.9, 5, 0.9);
  tensor.extend_from_slice(&[0.9, 0.9, 0.9, 0.9]);
  assert_eq!(tensor.len(), 40);

  let dets = decode(&tensor, STRIDE, CLASSES, 0.25);
  assert_eq!(dets, vec![Detection::new(1.0, 2.0, 3.0, 4.0, 5, 0.9)]);
}

#[test]
fn empty_tensor_gives_nothing() {
  assert!(decode(&[], STRIDE, CLASSES, 0.25).is_empty());
  assert!(suppress(Vec::new(), 0.45).is_empty());
}

#[test]
fn threshold_property_holds_for_every_record() {
  let objectness = [0.0, 0.1, 0.25, 0.2500001, 0.5, 1.0, -1.0, 0.3];
  let mut tensor = Vec::new();
  for (i, &o) in objectness.iter().enumerate() {
    tensor.extend(record([i as f32, 0.0, 1.0, 1.0], o, i, 0.9));
  }

  let dets = decode(&tensor, STRIDE, CLASSES, 0.25);
  let expected: Vec<_> = objectness
    .iter()
    .enumerate()
    .filter(|(_, o)| **o > 0.25)
    .map(|(i, _)| i as f32)
    .collect();
  let got: Vec<_> = dets.iter().map(|d| d.center_x()).collect();
  assert_eq!(got, expected);
}

#[test]
fn class_id_is_argmax_of_scores() {
  for class_id in [0, 7, 30] {
    let tensor = record([0.0; 4], 0.9, class_id, 0.99);
    let dets = decode(&tensor, STRIDE, CLASSES, 0.25);
    assert_eq!(dets[0].class_index(), Some(class_id));
  }
}

#[test]
fn zero_classes_emit_sentinel() {
  let tensor = record([0.0; 4], 0.9, 4, 0.99);
  let dets = decode(&tensor, STRIDE, 0, 0.25);
  assert_eq!(dets.len(), 1);
  assert_eq!(dets[0].class_id(), UNSET_CLASS_ID);
  assert_eq!(dets[0].class_index(), None);
}
