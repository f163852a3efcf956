use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::StudyBlock;

/// Group blocks by day, then order each day by priority rank so topics mix within
/// a day. Blocks sharing a rank on the same day are shuffled with `rng`.
pub fn interleave_blocks<R: Rng + ?Sized>(blocks: Vec<StudyBlock>, rng: &mut R) -> Vec<StudyBlock> {
    let mut by_day: BTreeMap<u32, Vec<StudyBlock>> = BTreeMap::new();
    for block in blocks {
        by_day.entry(block.day).or_default().push(block);
    }

    let mut ordered = Vec::new();
    for (_, mut day_blocks) in by_day {
        day_blocks.sort_by_key(|b| b.priority_rank);

        let mut start = 0;
        while start < day_blocks.len() {
            let rank = day_blocks[start].priority_rank;
            let end = day_blocks[start..]
                .iter()
                .position(|b| b.priority_rank != rank)
                .map_or(day_blocks.len(), |offset| start + offset);
            day_blocks[start..end].shuffle(rng);
            start = end;
        }

        ordered.extend(day_blocks);
    }
    ordered
}
