mod review_dto;

pub use review_dto::{
    PointsEarnedDto, ReviewCommentDto, ReviewHistoryDto, ReviewHistoryQuery, ReviewSummaryDto,
    SaveReviewForm, SaveReviewFormDoc, SaveReviewResponseDto,
};
