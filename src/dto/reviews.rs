use crate::db_models::OrderReview;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub reviewid: i32,
    pub orderid: i32,
    pub rest_rating: Option<i32>,
    pub delivery_rating: Option<i32>,
    pub comment: Option<String>,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

impl From<OrderReview> for ReviewResponse {
    fn from(review: OrderReview) -> Self {
        Self {
            reviewid: review.reviewid,
            orderid: review.orderid,
            rest_rating: review.rest_rating,
            delivery_rating: review.delivery_rating,
            comment: review.comment,
            created_time: review.created_time,
            updated_time: review.updated_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RestaurantRating {
    pub average_rating: f64,
    pub rating_count: usize,
}
