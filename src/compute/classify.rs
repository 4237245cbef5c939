//! Manager/worker classification of individual parts.

use super::simulator::Colour;
use super::tensor::GrowthTensor;

/// Classify one part at one sampled step.
///
/// A part is a manager when its orange count strictly exceeds its green
/// count; equality means worker. The part under focus is always red by
/// convention of the underlying game, so the rule reads the same two
/// channels regardless of which part index is being classified.
#[inline]
pub fn is_manager(tensor: &GrowthTensor, seed: usize, step: u64, part: usize) -> bool {
    tensor.count(seed, step, Colour::Orange, part) > tensor.count(seed, step, Colour::Green, part)
}

/// Manager labels for every part of one seed at one sampled step.
pub fn manager_labels(tensor: &GrowthTensor, seed: usize, step: u64) -> Vec<bool> {
    (0..tensor.num_parts())
        .map(|part| is_manager(tensor, seed, step, part))
        .collect()
}
