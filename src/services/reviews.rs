use crate::db_models::{NewReview, OrderReview};
use crate::domain::OrderStatus;
use crate::dto::reviews::RestaurantRating;
use crate::errors::custom::{CustomError, DbError, ReviewError};
use crate::repository::Repository;
use crate::services::orders::{load_order_for, Caller};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub rest_rating: Option<i32>,
    pub delivery_rating: Option<i32>,
    pub comment: Option<String>,
}

fn parse_rating(field: &str, rating: Option<i32>) -> Result<i32, ReviewError> {
    match rating {
        Some(value) if (1..=5).contains(&value) => Ok(value),
        Some(value) => Err(ReviewError::InvalidRating(format!(
            "{} must be between 1 and 5, got {}.",
            field, value
        ))),
        None => Err(ReviewError::InvalidRating(format!("{} is required.", field))),
    }
}

#[instrument(name = "Submit review", skip(repo, request))]
pub async fn submit_review(
    repo: &dyn Repository,
    custid: i32,
    orderid: i32,
    request: ReviewRequest,
) -> Result<OrderReview, CustomError> {
    let rest_rating = parse_rating("rest_rating", request.rest_rating)?;
    let delivery_rating = parse_rating("delivery_rating", request.delivery_rating)?;

    let order = repo
        .find_order(orderid)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Order {} not found", orderid)))?;
    if order.custid != custid {
        return Err(CustomError::Forbidden(format!(
            "Order {} does not belong to you",
            orderid
        )));
    }
    if order.status != OrderStatus::Delivered {
        return Err(ReviewError::NotDelivered.into());
    }
    if repo.find_review_by_order(orderid).await?.is_some() {
        return Err(ReviewError::AlreadyReviewed.into());
    }

    let now = Utc::now().naive_utc();
    let review = NewReview {
        orderid,
        custid,
        rest_rating: Some(rest_rating),
        delivery_rating: Some(delivery_rating),
        comment: request
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        created_time: now,
        updated_time: now,
    };
    repo.insert_review(review).await.map_err(|err| match err {
        // Two submissions racing past the lookup above.
        DbError::UniqueViolation(_) => ReviewError::AlreadyReviewed.into(),
        other => CustomError::from(other),
    })
}

/// Readable by the parties to the order.
#[instrument(name = "Get review", skip(repo))]
pub async fn get_review(
    repo: &dyn Repository,
    caller: Caller,
    orderid: i32,
) -> Result<OrderReview, CustomError> {
    load_order_for(repo, caller, orderid).await?;
    repo.find_review_by_order(orderid)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Order {} has no review", orderid)))
}

/// Mean restaurant rating rounded to one decimal place.
pub fn aggregate_rating(reviews: &[OrderReview]) -> RestaurantRating {
    let ratings: Vec<i32> = reviews.iter().filter_map(|r| r.rest_rating).collect();
    if ratings.is_empty() {
        return RestaurantRating {
            average_rating: 0.0,
            rating_count: 0,
        };
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let average = sum as f64 / ratings.len() as f64;
    RestaurantRating {
        average_rating: (average * 10.0).round() / 10.0,
        rating_count: ratings.len(),
    }
}

pub async fn restaurant_rating(
    repo: &dyn Repository,
    restid: i32,
) -> Result<RestaurantRating, CustomError> {
    crate::services::catalog::get_restaurant(repo, restid).await?;
    Ok(aggregate_rating(&repo.restaurant_reviews(restid).await?))
}
