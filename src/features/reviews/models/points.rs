/// Points earned for a single review, by source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsBreakdown {
    pub base: i64,
    pub distance: i64,
    pub comment: i64,
    pub image: i64,
    pub total: i64,
}
