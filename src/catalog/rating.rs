use std::cmp::Ordering;
use std::fmt;

/// 聚合评分。`rating_count < 1` 视为“暂无评分”，与真实的低分区分开。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Unrated,
    Rated { average: f64, count: u32 },
}

impl Rating {
    pub fn from_parts(average: Option<f64>, count: Option<u32>) -> Self {
        match count {
            Some(count) if count >= 1 => Rating::Rated {
                average: average.filter(|a| a.is_finite()).unwrap_or(0.0),
                count,
            },
            _ => Rating::Unrated,
        }
    }

    pub fn is_rated(&self) -> bool {
        matches!(self, Rating::Rated { .. })
    }

    pub fn average(&self) -> Option<f64> {
        match self {
            Rating::Rated { average, .. } => Some(*average),
            Rating::Unrated => None,
        }
    }

    /// 未评分 < 任何已评分；已评分先比平均分，再比评分人数
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Rating::Unrated, Rating::Unrated) => Ordering::Equal,
            (Rating::Unrated, Rating::Rated { .. }) => Ordering::Less,
            (Rating::Rated { .. }, Rating::Unrated) => Ordering::Greater,
            (
                Rating::Rated { average: a, count: ca },
                Rating::Rated { average: b, count: cb },
            ) => a.total_cmp(b).then_with(|| ca.cmp(cb)),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Unrated => write!(f, "Pas encore noté"),
            Rating::Rated { average, count } => write!(f, "★ {:.1} ({} avis)", average, count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_count_is_unrated_even_with_a_score() {
        assert_eq!(Rating::from_parts(Some(4.0), Some(0)), Rating::Unrated);
        assert_eq!(Rating::from_parts(None, None), Rating::Unrated);
        assert_eq!(
            Rating::from_parts(None, Some(3)),
            Rating::Rated { average: 0.0, count: 3 }
        );
    }

    #[test]
    fn unrated_ranks_below_a_genuine_zero() {
        let zero = Rating::from_parts(Some(0.0), Some(5));
        assert_eq!(Rating::Unrated.rank_cmp(&zero), Ordering::Less);
        let low = Rating::from_parts(Some(4.5), Some(2));
        let high_count = Rating::from_parts(Some(4.5), Some(10));
        assert_eq!(low.rank_cmp(&high_count), Ordering::Less);
    }

    #[test]
    fn display_distinguishes_no_data() {
        assert_eq!(Rating::Unrated.to_string(), "Pas encore noté");
        assert_eq!(
            Rating::from_parts(Some(4.3), Some(10)).to_string(),
            "★ 4.3 (10 avis)"
        );
    }
}
