//! Skill registry search: the indexed search client and result ranking.

pub mod index;
pub mod ranking;

pub use index::{IndexClient, SearchHit, SkillIndex};
pub use ranking::{RankedHit, RankingPolicy};
