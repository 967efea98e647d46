//! Owner-facing write path for job offerings and their nested pricing rows.
//!
//! Every multi-statement write runs inside one SQLite transaction. The
//! aggregate `category_price` is recomputed from the pricing rows on every
//! mutation, and pricing updates are full-replace: delete all rows, then
//! re-insert the provided set.

use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Job, SubCategory};

#[derive(Debug, Clone, Deserialize)]
pub struct SubCategoryInput {
    pub sub_category_name: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct JobInput {
    pub category_id: String,
    pub category_price: Option<f64>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategoryInput>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

fn validate_input(input: &JobInput) -> Result<f64, AppError> {
    for sub in &input.sub_categories {
        if sub.sub_category_name.trim().is_empty() {
            return Err(AppError::Validation(
                "sub_category_name must not be empty".to_string(),
            ));
        }
        if sub.price <= 0.0 {
            return Err(AppError::Validation(
                "sub-category price must be positive".to_string(),
            ));
        }
    }

    // Aggregate price is the sum of sub-category prices when any are given,
    // otherwise the explicit category price.
    if !input.sub_categories.is_empty() {
        return Ok(input.sub_categories.iter().map(|s| s.price).sum());
    }

    match input.category_price {
        Some(price) if price > 0.0 => Ok(price),
        Some(_) => Err(AppError::Validation(
            "category_price must be positive".to_string(),
        )),
        None => Err(AppError::Validation(
            "either category_price or sub_categories is required".to_string(),
        )),
    }
}

/// Look up a sub-category by exact name under the category; insert it when
/// absent. Runs inside the caller's transaction.
fn resolve_sub_category(
    conn: &Connection,
    category_id: &str,
    name: &str,
) -> Result<String, AppError> {
    if let Some(existing) = queries::find_sub_category(conn, category_id, name)? {
        return Ok(existing.sub_category_id);
    }

    let sub = SubCategory {
        sub_category_id: Uuid::new_v4().to_string(),
        category_id: category_id.to_string(),
        sub_category_name: name.to_string(),
    };
    queries::create_sub_category(conn, &sub)?;
    Ok(sub.sub_category_id)
}

fn insert_pricing_rows(
    conn: &Connection,
    job_id: &str,
    category_id: &str,
    subs: &[SubCategoryInput],
) -> Result<(), AppError> {
    for sub in subs {
        let sub_category_id = resolve_sub_category(conn, category_id, &sub.sub_category_name)?;
        queries::insert_pricing(
            conn,
            &Uuid::new_v4().to_string(),
            job_id,
            &sub_category_id,
            sub.price,
        )?;
    }
    Ok(())
}

pub fn create_job(conn: &mut Connection, user_id: &str, input: &JobInput) -> Result<Job, AppError> {
    let category_price = validate_input(input)?;

    if queries::get_category(conn, &input.category_id)?.is_none() {
        return Err(AppError::NotFound("category".to_string()));
    }

    let now = Utc::now().naive_utc();
    let job = Job {
        job_id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        category_id: input.category_id.clone(),
        category_price,
        latitude: input.location.map(|l| l.latitude),
        longitude: input.location.map(|l| l.longitude),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let tx = conn.transaction()?;
    queries::insert_job(&tx, &job)?;
    insert_pricing_rows(&tx, &job.job_id, &job.category_id, &input.sub_categories)?;
    tx.commit()?;

    tracing::info!(job_id = %job.job_id, user_id, "job created");
    Ok(job)
}

pub fn update_job(
    conn: &mut Connection,
    job_id: &str,
    user_id: &str,
    input: &JobInput,
) -> Result<(), AppError> {
    let category_price = validate_input(input)?;

    if queries::get_category(conn, &input.category_id)?.is_none() {
        return Err(AppError::NotFound("category".to_string()));
    }

    let tx = conn.transaction()?;

    let updated = queries::update_job_row(
        &tx,
        job_id,
        user_id,
        &input.category_id,
        category_price,
        input.location.map(|l| l.latitude),
        input.location.map(|l| l.longitude),
    )?;
    if updated == 0 {
        return Err(AppError::NotFound("job".to_string()));
    }

    // Full-replace, not a diff: drop every pricing row and re-insert.
    queries::delete_pricing_for_job(&tx, job_id)?;
    insert_pricing_rows(&tx, job_id, &input.category_id, &input.sub_categories)?;

    tx.commit()?;

    tracing::info!(job_id, user_id, "job updated");
    Ok(())
}

pub fn delete_job(conn: &mut Connection, job_id: &str, user_id: &str) -> Result<(), AppError> {
    let tx = conn.transaction()?;

    // Pricing rows first; there is no database-level cascade.
    queries::delete_pricing_for_job(&tx, job_id)?;
    let deleted = queries::delete_job_row(&tx, job_id, user_id)?;
    if deleted == 0 {
        return Err(AppError::NotFound("job".to_string()));
    }

    tx.commit()?;

    tracing::info!(job_id, user_id, "job deleted");
    Ok(())
}

/// Isolated single-field toggle; repeating the same value is a no-op, not
/// an error.
pub fn set_job_active(
    conn: &Connection,
    job_id: &str,
    user_id: &str,
    active: bool,
) -> Result<(), AppError> {
    let updated = queries::set_job_active(conn, job_id, user_id, active)?;
    if updated == 0 {
        return Err(AppError::NotFound("job".to_string()));
    }

    tracing::info!(job_id, user_id, active, "job active flag set");
    Ok(())
}
