//! 排行榜奖牌

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// 前三名对应奖牌，其余名次没有
    pub fn for_rank(rank: u32) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Medal::Gold => "Gold medal",
            Medal::Silver => "Silver medal",
            Medal::Bronze => "Bronze medal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_three_get_medals() {
        assert_eq!(Medal::for_rank(1), Some(Medal::Gold));
        assert_eq!(Medal::for_rank(2), Some(Medal::Silver));
        assert_eq!(Medal::for_rank(3).map(Medal::emoji), Some("🥉"));
        assert_eq!(Medal::for_rank(0), None);
        assert_eq!(Medal::for_rank(4), None);
    }
}
