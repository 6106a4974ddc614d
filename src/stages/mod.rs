pub mod stage0_index;
pub mod stage1_exact;
pub mod stage2_realign;
pub mod stage3_merge;

pub use stage0_index::*;
pub use stage1_exact::*;
pub use stage2_realign::*;
pub use stage3_merge::*;
